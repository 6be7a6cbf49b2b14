//! Snapshot → surface. Rendering the same input twice leaves the surface
//! unchanged; an empty history leaves the trend series as it was.

use crate::derive::{
    app_memory_gauge, budget_view, chart_view, cpu_gauge, disk_gauge, format_uptime,
    memory_gauge, system_view, HealthStatus,
};
use crate::surface::{GaugeId, RenderSurface};
use crate::types::{HistoryPoint, MetricsSnapshot};

pub fn render<S: RenderSurface + ?Sized>(
    surface: &mut S,
    snapshot: &MetricsSnapshot,
    history: &[HistoryPoint],
) {
    surface.update_status(HealthStatus::from_percent(snapshot.memory.percent));
    surface.update_gauge(GaugeId::Memory, memory_gauge(snapshot));
    surface.update_gauge(GaugeId::Cpu, cpu_gauge(snapshot));
    surface.update_gauge(GaugeId::Disk, disk_gauge(snapshot.disk.as_ref()));
    surface.update_uptime(format_uptime(snapshot.uptime));
    surface.update_gauge(GaugeId::AppMemory, app_memory_gauge(snapshot));
    surface.update_budget(budget_view(snapshot));
    surface.update_system(system_view(snapshot));
    surface.update_chart(chart_view(snapshot, history));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::BudgetPill;
    use crate::surface::TextSurface;
    use crate::types::{CpuStats, DiskStats, MemoryStats, ProcessStats};

    fn snapshot() -> MetricsSnapshot {
        MetricsSnapshot {
            memory: MemoryStats {
                used: 870.0,
                available: 130.0,
                total: 1000.0,
                percent: 87.0,
            },
            cpu: CpuStats {
                percent: 12.34,
                cores: 2,
            },
            disk: Some(DiskStats {
                error: Some("no permission".into()),
                ..Default::default()
            }),
            uptime: 3661.0,
            process: ProcessStats {
                memory_mb: 100.0,
                threads: 5,
            },
            ..Default::default()
        }
    }

    #[test]
    fn render_fills_every_target() {
        let mut s = TextSurface::default();
        let hist = vec![HistoryPoint {
            memory: 87.0,
            cpu: 12.0,
            timestamp: None,
        }];
        render(&mut s, &snapshot(), &hist);

        assert_eq!(s.status, Some(HealthStatus::Warning));
        assert_eq!(s.gauges[&GaugeId::Memory].value, "870 MB");
        assert_eq!(s.gauges[&GaugeId::Cpu].value, "12.3%");
        assert_eq!(s.gauges[&GaugeId::Cpu].info, "2 cores available");
        assert_eq!(s.uptime.as_deref(), Some("1h 1m 1s"));
        assert_eq!(s.budget.as_ref().unwrap().pill, BudgetPill::Ready);
        assert_eq!(s.chart.as_ref().unwrap().split, (870.0, 130.0));
        assert_eq!(s.chart.as_ref().unwrap().labels, vec!["-1s"]);
    }

    #[test]
    fn disk_error_renders_placeholder() {
        let mut s = TextSurface::default();
        render(&mut s, &snapshot(), &[]);
        let disk = &s.gauges[&GaugeId::Disk];
        assert_eq!(disk.value, "-- GB");
        assert_eq!(disk.percent, 0.0);
        assert!(disk.info.contains("no permission"));
    }

    #[test]
    fn empty_history_keeps_previous_trend() {
        let mut s = TextSurface::default();
        let hist = vec![HistoryPoint {
            memory: 50.0,
            cpu: 4.0,
            timestamp: None,
        }];
        render(&mut s, &snapshot(), &hist);

        let mut next = snapshot();
        next.memory.used = 900.0;
        next.memory.available = 100.0;
        render(&mut s, &next, &[]);

        let chart = s.chart.as_ref().unwrap();
        assert_eq!(chart.memory, vec![50.0]);
        assert_eq!(chart.cpu, vec![4.0]);
        assert_eq!(chart.labels, vec!["-1s"]);
        assert_eq!(chart.split, (900.0, 100.0));
    }

    #[test]
    fn render_is_idempotent() {
        let snap = snapshot();
        let mut once = TextSurface::default();
        render(&mut once, &snap, &[]);
        let mut twice = once.clone();
        render(&mut twice, &snap, &[]);
        assert_eq!(once, twice);
    }
}
