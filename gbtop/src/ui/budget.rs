//! App memory against the 1 GB budget, with the ready/over pill.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

use crate::derive::{BudgetPill, BudgetView};
use crate::ui::theme::band_color;
use crate::ui::util::{gauge_percent, inner};

pub fn draw_budget(f: &mut ratatui::Frame<'_>, area: Rect, b: Option<&BudgetView>) {
    let title = match b {
        Some(b) => {
            let bg = match b.pill {
                BudgetPill::Ready => Color::Green,
                BudgetPill::Over => Color::Red,
            };
            Line::from(vec![
                Span::raw("1GB Budget "),
                Span::styled(
                    format!(" {} ", b.pill.label()),
                    Style::default()
                        .fg(Color::Black)
                        .bg(bg)
                        .add_modifier(Modifier::BOLD),
                ),
            ])
        }
        None => Line::from("1GB Budget"),
    };
    f.render_widget(Block::default().borders(Borders::ALL).title(title), area);
    let body = inner(area);
    let Some(b) = b else { return };
    if body.height == 0 {
        return;
    }
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(body);
    let bar = Gauge::default()
        .percent(gauge_percent(b.percent))
        .gauge_style(Style::default().fg(band_color(b.band)))
        .label(b.text.clone());
    f.render_widget(bar, rows[0]);
    if rows[1].height > 0 {
        f.render_widget(Paragraph::new(b.headroom_text.clone()), rows[1]);
    }
}
