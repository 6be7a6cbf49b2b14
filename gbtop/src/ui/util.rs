//! Small UI helpers.

use ratatui::layout::Rect;

/// Shorten to at most `max` chars, eliding the middle.
pub fn truncate_middle(s: &str, max: usize) -> String {
    let n = s.chars().count();
    if n <= max {
        return s.to_string();
    }
    if max <= 3 {
        return "...".into();
    }
    let keep = max - 3;
    let left = keep / 2;
    let right = keep - left;
    let head: String = s.chars().take(left).collect();
    let tail: String = s.chars().skip(n - right).collect();
    format!("{head}...{tail}")
}

/// Area inside a one-cell border.
pub fn inner(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

/// Gauge widgets reject anything outside 0..=100.
pub fn gauge_percent(p: f64) -> u16 {
    if p.is_finite() {
        p.clamp(0.0, 100.0).round() as u16
    } else {
        0
    }
}
