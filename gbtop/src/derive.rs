//! Display derivations: turns a snapshot into the strings, percentages and
//! bands the dashboard shows. Everything here is pure so it can be tested
//! without a terminal.

use std::fmt;

use crate::types::{DiskStats, HistoryPoint, MetricsSnapshot};

/// Reference line for the app memory budget, in MB.
pub const MEMORY_BUDGET_MB: f64 = 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

impl HealthStatus {
    /// Band for a host memory percentage: > 90 critical, > 80 warning.
    pub fn from_percent(percent: f64) -> Self {
        if percent > 90.0 {
            HealthStatus::Critical
        } else if percent > 80.0 {
            HealthStatus::Warning
        } else {
            HealthStatus::Healthy
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Warning => "warning",
            HealthStatus::Critical => "critical",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fill color band of the budget bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetBand {
    Green,
    Blue,
    Amber,
    Red,
}

impl BudgetBand {
    pub fn from_percent(pct: f64) -> Self {
        if pct < 50.0 {
            BudgetBand::Green
        } else if pct < 75.0 {
            BudgetBand::Blue
        } else if pct < 90.0 {
            BudgetBand::Amber
        } else {
            BudgetBand::Red
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetPill {
    Ready,
    Over,
}

impl BudgetPill {
    pub fn from_memory_mb(mb: f64) -> Self {
        if mb <= MEMORY_BUDGET_MB {
            BudgetPill::Ready
        } else {
            BudgetPill::Over
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BudgetPill::Ready => "1GB READY",
            BudgetPill::Over => "OVER 1GB",
        }
    }
}

pub fn budget_percent(memory_mb: f64) -> f64 {
    (memory_mb / MEMORY_BUDGET_MB * 100.0).min(100.0)
}

pub fn headroom_mb(memory_mb: f64) -> f64 {
    (MEMORY_BUDGET_MB - memory_mb).max(0.0)
}

/// `{h}h {m}m {s}s`, floor-truncated; negative or NaN input reads as zero.
pub fn format_uptime(seconds: f64) -> String {
    let s = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let hours = s / 3600;
    let minutes = (s % 3600) / 60;
    let secs = s % 60;
    format!("{hours}h {minutes}m {secs}s")
}

/// One gauge card: headline value, bar fill and an info line.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeView {
    pub value: String,
    /// Bar fill, 0..=100.
    pub percent: f64,
    pub info: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetView {
    pub memory_mb: f64,
    pub percent: f64,
    pub headroom_mb: f64,
    pub band: BudgetBand,
    pub pill: BudgetPill,
    pub text: String,
    pub headroom_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SystemView {
    /// Label/value pairs in display order.
    pub rows: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    /// `-Ns` labels, oldest first.
    pub labels: Vec<String>,
    pub memory: Vec<f64>,
    pub cpu: Vec<f64>,
    /// Host memory split for the ratio chart: (used, available).
    pub split: (f64, f64),
}

impl ChartView {
    /// An empty trend keeps the series already on screen; the split always updates.
    pub fn or_previous_series(self, prev: Option<&ChartView>) -> ChartView {
        match prev {
            Some(prev) if self.labels.is_empty() => ChartView {
                labels: prev.labels.clone(),
                memory: prev.memory.clone(),
                cpu: prev.cpu.clone(),
                split: self.split,
            },
            _ => self,
        }
    }
}

fn clamp_pct(p: f64) -> f64 {
    if p.is_finite() {
        p.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

pub fn memory_gauge(s: &MetricsSnapshot) -> GaugeView {
    let m = &s.memory;
    GaugeView {
        value: format!("{:.0} MB", m.used),
        percent: clamp_pct(m.percent),
        info: format!("{:.0} MB available of {:.0} MB", m.available, m.total),
    }
}

pub fn cpu_gauge(s: &MetricsSnapshot) -> GaugeView {
    GaugeView {
        value: format!("{:.1}%", s.cpu.percent),
        percent: clamp_pct(s.cpu.percent),
        info: format!("{} cores available", s.cpu.cores),
    }
}

/// Disk card; falls back to a placeholder when the backend could not read the
/// disk, surfacing its error string if one was sent.
pub fn disk_gauge(disk: Option<&DiskStats>) -> GaugeView {
    if let Some(d) = disk {
        if let (Some(used), Some(percent)) = (d.used, d.percent) {
            return GaugeView {
                value: format!("{used:.1} GB"),
                percent: clamp_pct(percent),
                info: format!(
                    "{:.1} GB free of {:.1} GB",
                    d.free.unwrap_or(0.0),
                    d.total.unwrap_or(0.0)
                ),
            };
        }
    }
    let err = disk
        .and_then(|d| d.error.as_deref())
        .map(|e| format!(" ({e})"))
        .unwrap_or_default();
    GaugeView {
        value: "-- GB".into(),
        percent: 0.0,
        info: format!("Disk metrics unavailable{err}"),
    }
}

pub fn app_memory_gauge(s: &MetricsSnapshot) -> GaugeView {
    let mb = s.process.memory_mb;
    let pct = budget_percent(mb);
    GaugeView {
        value: format!("{mb:.2} MB"),
        percent: clamp_pct(pct),
        info: format!(
            "Using {pct:.1}% of 1GB • Headroom {:.0} MB",
            headroom_mb(mb)
        ),
    }
}

pub fn budget_view(s: &MetricsSnapshot) -> BudgetView {
    let mb = s.process.memory_mb;
    let percent = budget_percent(mb);
    let headroom = headroom_mb(mb);
    BudgetView {
        memory_mb: mb,
        percent,
        headroom_mb: headroom,
        band: BudgetBand::from_percent(percent),
        pill: BudgetPill::from_memory_mb(mb),
        text: format!("{mb:.0} MB / 1024 MB"),
        headroom_text: format!("Headroom: {headroom:.0} MB"),
    }
}

pub fn system_view(s: &MetricsSnapshot) -> SystemView {
    let sys = &s.system;
    let mut rows = vec![
        ("Platform".to_string(), sys.platform.clone()),
        ("Release".to_string(), sys.release.clone()),
        ("Machine".to_string(), sys.machine.clone()),
        ("Runtime".to_string(), sys.runtime_version.clone()),
        (
            "Process Memory (RSS)".to_string(),
            format!("{:.2} MB", s.process.memory_mb),
        ),
        ("Threads".to_string(), s.process.threads.to_string()),
    ];
    if let Some(host) = sys.hostname.as_ref().filter(|h| !h.is_empty()) {
        rows.insert(0, ("Hostname".to_string(), host.clone()));
    }
    if let Some(app_up) = s.app_uptime {
        rows.push(("App Uptime".to_string(), format_uptime(app_up)));
    }
    if let Some(net) = &s.network {
        rows.push((
            "Network".to_string(),
            format!(
                "↑ {:.2} MB ({} pkts) ↓ {:.2} MB ({} pkts)",
                net.bytes_sent_mb, net.packets_sent, net.bytes_recv_mb, net.packets_recv
            ),
        ));
    }
    SystemView { rows }
}

pub fn chart_view(s: &MetricsSnapshot, history: &[HistoryPoint]) -> ChartView {
    let n = history.len();
    ChartView {
        labels: (0..n).map(|i| format!("-{}s", n - i)).collect(),
        memory: history.iter().map(|h| h.memory).collect(),
        cpu: history.iter().map(|h| h.cpu).collect(),
        split: (s.memory.used, s.memory.available),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProcessStats;

    fn snapshot_with_mb(mb: f64) -> MetricsSnapshot {
        MetricsSnapshot {
            process: ProcessStats {
                memory_mb: mb,
                threads: 4,
            },
            ..Default::default()
        }
    }

    #[test]
    fn status_bands_use_strict_thresholds() {
        assert_eq!(HealthStatus::from_percent(0.0), HealthStatus::Healthy);
        assert_eq!(HealthStatus::from_percent(80.0), HealthStatus::Healthy);
        assert_eq!(HealthStatus::from_percent(80.1), HealthStatus::Warning);
        assert_eq!(HealthStatus::from_percent(90.0), HealthStatus::Warning);
        assert_eq!(HealthStatus::from_percent(90.5), HealthStatus::Critical);
        assert_eq!(HealthStatus::Critical.to_string(), "critical");
    }

    #[test]
    fn budget_percent_is_monotonic_and_capped() {
        let mut prev = -1.0;
        for mb in (0..4096).step_by(7) {
            let p = budget_percent(mb as f64);
            assert!(p >= prev, "not monotonic at {mb}");
            assert!(p <= 100.0);
            prev = p;
        }
        assert_eq!(budget_percent(0.0), 0.0);
        assert_eq!(budget_percent(512.0), 50.0);
        assert_eq!(budget_percent(1024.0), 100.0);
        assert_eq!(budget_percent(5000.0), 100.0);
    }

    #[test]
    fn headroom_never_negative() {
        assert_eq!(headroom_mb(24.0), 1000.0);
        assert_eq!(headroom_mb(1024.0), 0.0);
        assert_eq!(headroom_mb(2048.0), 0.0);
    }

    #[test]
    fn pill_boundary_is_inclusive() {
        assert_eq!(BudgetPill::from_memory_mb(1023.9), BudgetPill::Ready);
        assert_eq!(BudgetPill::from_memory_mb(1024.0), BudgetPill::Ready);
        assert_eq!(BudgetPill::from_memory_mb(1024.01), BudgetPill::Over);
        assert_eq!(BudgetPill::Ready.label(), "1GB READY");
        assert_eq!(BudgetPill::Over.label(), "OVER 1GB");
    }

    #[test]
    fn budget_band_edges() {
        assert_eq!(BudgetBand::from_percent(49.9), BudgetBand::Green);
        assert_eq!(BudgetBand::from_percent(50.0), BudgetBand::Blue);
        assert_eq!(BudgetBand::from_percent(74.9), BudgetBand::Blue);
        assert_eq!(BudgetBand::from_percent(75.0), BudgetBand::Amber);
        assert_eq!(BudgetBand::from_percent(89.9), BudgetBand::Amber);
        assert_eq!(BudgetBand::from_percent(90.0), BudgetBand::Red);
        assert_eq!(BudgetBand::from_percent(100.0), BudgetBand::Red);
    }

    #[test]
    fn uptime_formatting() {
        assert_eq!(format_uptime(0.0), "0h 0m 0s");
        assert_eq!(format_uptime(3661.0), "1h 1m 1s");
        assert_eq!(format_uptime(3661.99), "1h 1m 1s");
        assert_eq!(format_uptime(-5.0), "0h 0m 0s");
        assert_eq!(format_uptime(f64::NAN), "0h 0m 0s");
        assert_eq!(format_uptime(90061.0), "25h 1m 1s");
    }

    #[test]
    fn disk_unavailable_surfaces_error() {
        let d = DiskStats {
            error: Some("no permission".into()),
            ..Default::default()
        };
        let g = disk_gauge(Some(&d));
        assert_eq!(g.value, "-- GB");
        assert_eq!(g.percent, 0.0);
        assert_eq!(g.info, "Disk metrics unavailable (no permission)");

        let g = disk_gauge(None);
        assert_eq!(g.info, "Disk metrics unavailable");
    }

    #[test]
    fn disk_available_formats_gb() {
        let d = DiskStats {
            used: Some(2.31),
            free: Some(5.69),
            total: Some(8.0),
            percent: Some(28.1),
            ..Default::default()
        };
        let g = disk_gauge(Some(&d));
        assert_eq!(g.value, "2.3 GB");
        assert_eq!(g.percent, 28.1);
        assert_eq!(g.info, "5.7 GB free of 8.0 GB");
    }

    #[test]
    fn app_gauge_and_budget_text() {
        let s = snapshot_with_mb(256.0);
        let g = app_memory_gauge(&s);
        assert_eq!(g.value, "256.00 MB");
        assert_eq!(g.percent, 25.0);
        assert_eq!(g.info, "Using 25.0% of 1GB • Headroom 768 MB");

        let b = budget_view(&s);
        assert_eq!(b.text, "256 MB / 1024 MB");
        assert_eq!(b.headroom_text, "Headroom: 768 MB");
        assert_eq!(b.band, BudgetBand::Green);
        assert_eq!(b.pill, BudgetPill::Ready);

        let b = budget_view(&snapshot_with_mb(1500.0));
        assert_eq!(b.percent, 100.0);
        assert_eq!(b.headroom_mb, 0.0);
        assert_eq!(b.band, BudgetBand::Red);
        assert_eq!(b.pill, BudgetPill::Over);
    }

    #[test]
    fn chart_labels_count_back_from_now() {
        let hist: Vec<HistoryPoint> = [(10.0, 1.0), (20.0, 2.0), (30.0, 3.0)]
            .into_iter()
            .map(|(memory, cpu)| HistoryPoint {
                memory,
                cpu,
                timestamp: None,
            })
            .collect();
        let c = chart_view(&MetricsSnapshot::default(), &hist);
        assert_eq!(c.labels, vec!["-3s", "-2s", "-1s"]);
        assert_eq!(c.memory, vec![10.0, 20.0, 30.0]);
        assert_eq!(c.cpu, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn gauge_percent_is_clamped_for_bars() {
        let mut s = MetricsSnapshot::default();
        s.cpu.percent = 140.0;
        assert_eq!(cpu_gauge(&s).percent, 100.0);
        s.memory.percent = -3.0;
        assert_eq!(memory_gauge(&s).percent, 0.0);
    }
}
