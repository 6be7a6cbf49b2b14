//! History chart (memory % and CPU % over the backend's window) and the host
//! memory split.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, GraphType},
};

use crate::derive::ChartView;
use crate::history::chart_series;
use crate::ui::theme::{CPU_LINE, MEM_LINE};
use crate::ui::util::gauge_percent;

pub fn draw_history(f: &mut ratatui::Frame<'_>, area: Rect, view: Option<&ChartView>) {
    let block = Block::default().borders(Borders::ALL).title("History (60s)");
    let Some(view) = view else {
        f.render_widget(block, area);
        return;
    };
    let (mem, cpu) = chart_series(view);
    let x_max = view.memory.len().saturating_sub(1).max(1) as f64;

    let datasets = vec![
        Dataset::default()
            .name("Memory %")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(MEM_LINE))
            .data(&mem),
        Dataset::default()
            .name("CPU %")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(CPU_LINE))
            .data(&cpu),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, x_max])
                .labels(x_labels(&view.labels)),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, 100.0])
                .labels(vec![Span::raw("0"), Span::raw("50"), Span::raw("100")]),
        );
    f.render_widget(chart, area);
}

// First, middle and last label; a full row of `-Ns` labels would not fit
fn x_labels(labels: &[String]) -> Vec<Span<'static>> {
    match labels.len() {
        0 => vec![],
        1 => vec![Span::raw(labels[0].clone())],
        n => vec![
            Span::raw(labels[0].clone()),
            Span::raw(labels[n / 2].clone()),
            Span::raw(labels[n - 1].clone()),
        ],
    }
}

pub fn draw_memory_split(f: &mut ratatui::Frame<'_>, area: Rect, view: Option<&ChartView>) {
    let block = Block::default().borders(Borders::ALL).title("Memory Split");
    let Some((used, available)) = view.map(|v| v.split) else {
        f.render_widget(block, area);
        return;
    };
    let total = used + available;
    let pct = if total > 0.0 { used / total * 100.0 } else { 0.0 };
    let g = Gauge::default()
        .block(block)
        .gauge_style(Style::default().fg(MEM_LINE).bg(Color::DarkGray))
        .percent(gauge_percent(pct))
        .label(format!("used {used:.0} MB | available {available:.0} MB"));
    f.render_widget(g, area);
}
