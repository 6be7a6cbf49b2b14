//! Gauge cards: bar with the headline value, info line underneath.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Gauge, Paragraph},
};

use crate::derive::GaugeView;
use crate::ui::theme::gauge_color;
use crate::ui::util::{gauge_percent, inner};

pub fn draw_gauge(f: &mut ratatui::Frame<'_>, area: Rect, title: &str, g: Option<&GaugeView>) {
    f.render_widget(Block::default().borders(Borders::ALL).title(title.to_string()), area);
    let body = inner(area);
    if body.height == 0 {
        return;
    }
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(body);

    let Some(g) = g else {
        f.render_widget(Paragraph::new("waiting..."), rows[0]);
        return;
    };
    let gauge = Gauge::default()
        .percent(gauge_percent(g.percent))
        .gauge_style(Style::default().fg(gauge_color(g.percent)))
        .label(g.value.clone());
    f.render_widget(gauge, rows[0]);
    if rows[1].height > 0 {
        f.render_widget(
            Paragraph::new(g.info.clone()).style(Style::default().fg(Color::Gray)),
            rows[1],
        );
    }
}

pub fn draw_uptime(f: &mut ratatui::Frame<'_>, area: Rect, uptime: Option<&str>) {
    let text = uptime.unwrap_or("--");
    f.render_widget(
        Paragraph::new(text.to_string())
            .block(Block::default().borders(Borders::ALL).title("Uptime"))
            .centered(),
        area,
    );
}
