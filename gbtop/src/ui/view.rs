//! Terminal surface: keeps the latest value of every panel and lays them out.

use std::collections::{BTreeMap, VecDeque};

use ratatui::layout::{Constraint, Direction, Layout};

use crate::derive::{BudgetView, ChartView, GaugeView, HealthStatus, SystemView};
use crate::history::push_capped;
use crate::logs::{LogEntry, DEFAULT_LOG_CAP};
use crate::surface::{GaugeId, RenderSurface};
use crate::ui::{
    budget::draw_budget,
    chart::{draw_history, draw_memory_split},
    gauges::{draw_gauge, draw_uptime},
    header::draw_header,
    logs::draw_logs,
    system::draw_system,
};

#[derive(Debug, Clone)]
pub struct TuiView {
    target: String,
    status: Option<HealthStatus>,
    gauges: BTreeMap<GaugeId, GaugeView>,
    budget: Option<BudgetView>,
    uptime: Option<String>,
    system: Option<SystemView>,
    chart: Option<ChartView>,
    log_lines: VecDeque<LogEntry>,
    log_cap: usize,
}

impl TuiView {
    pub fn new(target: impl Into<String>, log_cap: usize) -> Self {
        Self {
            target: target.into(),
            status: None,
            gauges: BTreeMap::new(),
            budget: None,
            uptime: None,
            system: None,
            chart: None,
            log_lines: VecDeque::with_capacity(log_cap.min(DEFAULT_LOG_CAP)),
            log_cap,
        }
    }

    pub fn log_lines(&self) -> &VecDeque<LogEntry> {
        &self.log_lines
    }

    pub fn draw(&self, f: &mut ratatui::Frame<'_>) {
        let area = f.area();

        // Root rows: header, gauges, app memory + budget, charts, logs
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(4),
                Constraint::Length(4),
                Constraint::Min(8),
                Constraint::Percentage(35),
            ])
            .split(area);

        draw_header(f, rows[0], self.status, &self.target);

        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(rows[1]);
        draw_gauge(f, cards[0], "Memory", self.gauges.get(&GaugeId::Memory));
        draw_gauge(f, cards[1], "CPU", self.gauges.get(&GaugeId::Cpu));
        draw_gauge(f, cards[2], "Disk", self.gauges.get(&GaugeId::Disk));
        draw_uptime(f, cards[3], self.uptime.as_deref());

        let app_lr = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(34), Constraint::Percentage(66)])
            .split(rows[2]);
        draw_gauge(f, app_lr[0], "App Memory", self.gauges.get(&GaugeId::AppMemory));
        draw_budget(f, app_lr[1], self.budget.as_ref());

        let mid_lr = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(66), Constraint::Percentage(34)])
            .split(rows[3]);
        draw_history(f, mid_lr[0], self.chart.as_ref());
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(4)])
            .split(mid_lr[1]);
        draw_memory_split(f, right[0], self.chart.as_ref());
        draw_system(f, right[1], self.system.as_ref());

        draw_logs(f, rows[4], &self.log_lines);
    }
}

impl RenderSurface for TuiView {
    fn update_status(&mut self, status: HealthStatus) {
        self.status = Some(status);
    }

    fn update_gauge(&mut self, id: GaugeId, gauge: GaugeView) {
        self.gauges.insert(id, gauge);
    }

    fn update_budget(&mut self, budget: BudgetView) {
        self.budget = Some(budget);
    }

    fn update_uptime(&mut self, uptime: String) {
        self.uptime = Some(uptime);
    }

    fn update_system(&mut self, system: SystemView) {
        self.system = Some(system);
    }

    fn update_chart(&mut self, chart: ChartView) {
        self.chart = Some(chart.or_previous_series(self.chart.as_ref()));
    }

    fn append_log_line(&mut self, entry: &LogEntry) {
        push_capped(&mut self.log_lines, entry.clone(), self.log_cap);
    }
}
