//! Top header with status badge and backend target.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
};

use crate::derive::HealthStatus;
use crate::ui::theme::status_color;
use crate::ui::util::truncate_middle;

pub fn draw_header(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    status: Option<HealthStatus>,
    target: &str,
) {
    let badge = match status {
        Some(s) => Span::styled(
            format!(" {} ", s.as_str().to_uppercase()),
            Style::default()
                .fg(ratatui::style::Color::Black)
                .bg(status_color(s))
                .add_modifier(Modifier::BOLD),
        ),
        None => Span::raw(" CONNECTING "),
    };
    let host = truncate_middle(target, (area.width as usize).saturating_sub(60).max(16));
    let title = Line::from(vec![
        Span::styled("gbtop ", Style::default().add_modifier(Modifier::BOLD)),
        badge,
        Span::raw(format!(" {host} | 'd' export logs, 'q' quit")),
    ]);
    f.render_widget(Block::default().title(title).borders(Borders::BOTTOM), area);
}
