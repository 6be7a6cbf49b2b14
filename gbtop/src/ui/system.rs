//! Host and runtime details.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::derive::SystemView;

pub fn draw_system(f: &mut ratatui::Frame<'_>, area: Rect, sys: Option<&SystemView>) {
    let lines: Vec<Line> = sys
        .map(|s| {
            s.rows
                .iter()
                .map(|(k, v)| {
                    Line::from(vec![
                        Span::styled(
                            format!("{k}: "),
                            Style::default()
                                .fg(Color::Gray)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(v.clone()),
                    ])
                })
                .collect()
        })
        .unwrap_or_default();
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("System")),
        area,
    );
}
