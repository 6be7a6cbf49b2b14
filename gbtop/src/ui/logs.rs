//! Log terminal: newest lines at the bottom, level-colored.

use std::collections::VecDeque;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::logs::{LogEntry, LogOrigin};
use crate::ui::theme::{level_color, TIMESTAMP};

pub fn log_line(e: &LogEntry) -> Line<'static> {
    let mut msg_style = Style::default();
    if e.origin == LogOrigin::Client {
        msg_style = msg_style.add_modifier(Modifier::ITALIC);
    }
    Line::from(vec![
        Span::styled(
            e.timestamp.format("[%H:%M:%S] ").to_string(),
            Style::default().fg(TIMESTAMP),
        ),
        Span::styled(
            format!("[{}] ", e.level),
            Style::default()
                .fg(level_color(&e.level))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(e.message.clone(), msg_style),
    ])
}

pub fn draw_logs(f: &mut ratatui::Frame<'_>, area: Rect, entries: &VecDeque<LogEntry>) {
    let visible = area.height.saturating_sub(2) as usize;
    let start = entries.len().saturating_sub(visible);
    let lines: Vec<Line> = entries.iter().skip(start).map(log_line).collect();
    let title = format!("Logs ({})", entries.len());
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title)),
        area,
    );
}
