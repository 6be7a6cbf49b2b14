//! Rendering targets.
//!
//! A surface exposes the capabilities the renderer writes to. Every method has
//! a no-op default, so a surface without a given target skips it silently.

use std::collections::BTreeMap;

use crate::derive::{BudgetView, ChartView, GaugeView, HealthStatus, SystemView};
use crate::logs::LogEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum GaugeId {
    Memory,
    Cpu,
    Disk,
    AppMemory,
}

impl GaugeId {
    pub fn title(self) -> &'static str {
        match self {
            GaugeId::Memory => "Memory",
            GaugeId::Cpu => "CPU",
            GaugeId::Disk => "Disk",
            GaugeId::AppMemory => "App Memory",
        }
    }
}

pub trait RenderSurface {
    fn update_status(&mut self, _status: HealthStatus) {}
    fn update_gauge(&mut self, _id: GaugeId, _gauge: GaugeView) {}
    fn update_budget(&mut self, _budget: BudgetView) {}
    fn update_uptime(&mut self, _uptime: String) {}
    fn update_system(&mut self, _system: SystemView) {}
    fn update_chart(&mut self, _chart: ChartView) {}
    fn append_log_line(&mut self, _entry: &LogEntry) {}
}

/// Surface that keeps the latest value of every target as plain text. Used by
/// `--once` and handy in tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextSurface {
    pub status: Option<HealthStatus>,
    pub gauges: BTreeMap<GaugeId, GaugeView>,
    pub budget: Option<BudgetView>,
    pub uptime: Option<String>,
    pub system: Option<SystemView>,
    pub chart: Option<ChartView>,
    pub log_lines: Vec<String>,
}

impl RenderSurface for TextSurface {
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
        self.log_lines.push(entry.line());
    }
}

impl TextSurface {
    /// Report in display order; targets never written are left out.
    pub fn to_lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(status) = self.status {
            out.push(format!("Status: {}", status.as_str().to_uppercase()));
        }
        for (id, g) in &self.gauges {
            out.push(format!(
                "{:<11} {:>12}  [{:>5.1}%]  {}",
                id.title(),
                g.value,
                g.percent,
                g.info
            ));
        }
        if let Some(up) = &self.uptime {
            out.push(format!("{:<11} {up}", "Uptime"));
        }
        if let Some(b) = &self.budget {
            out.push(format!(
                "{:<11} {}  {}  {}",
                "Budget",
                b.text,
                b.headroom_text,
                b.pill.label()
            ));
        }
        if let Some(c) = &self.chart {
            if let (Some(m), Some(cpu)) = (c.memory.last(), c.cpu.last()) {
                out.push(format!(
                    "{:<11} {} points, last mem {m:.1}% cpu {cpu:.1}%",
                    "History",
                    c.memory.len()
                ));
            }
        }
        if let Some(sys) = &self.system {
            for (k, v) in &sys.rows {
                out.push(format!("{k}: {v}"));
            }
        }
        out.extend(self.log_lines.iter().cloned());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Nothing;
    impl RenderSurface for Nothing {}

    #[test]
    fn default_methods_are_noops() {
        let mut s = Nothing;
        s.update_status(HealthStatus::Critical);
        s.update_uptime("1h 0m 0s".into());
    }

    #[test]
    fn text_surface_reports_written_targets_only() {
        let mut s = TextSurface::default();
        assert!(s.to_lines().is_empty());
        s.update_status(HealthStatus::Warning);
        s.update_uptime("0h 1m 0s".into());
        let lines = s.to_lines();
        assert_eq!(lines[0], "Status: WARNING");
        assert!(lines[1].ends_with("0h 1m 0s"));
        assert_eq!(lines.len(), 2);
    }
}
