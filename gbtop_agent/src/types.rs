//! JSON bodies served by the agent. Field names follow the gbtop wire format
//! (`*_mb`, `*_gb`); the client also accepts the shorter legacy names.

use serde::Serialize;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CpuInfo {
    pub percent: f64,
    pub cores: usize,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct MemoryInfo {
    pub total_mb: f64,
    pub used_mb: f64,
    pub available_mb: f64,
    pub percent: f64,
}

/// Usage figures, or just the path and an error when nothing is mounted there.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum DiskInfo {
    Usage {
        path: String,
        total_gb: f64,
        used_gb: f64,
        free_gb: f64,
        percent: f64,
    },
    Unavailable {
        path: String,
        error: String,
    },
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct NetworkInfo {
    pub bytes_sent_mb: f64,
    pub bytes_recv_mb: f64,
    pub packets_sent: u64,
    pub packets_recv: u64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ProcessInfo {
    pub rss_mb: f64,
    pub threads: usize,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SystemInfo {
    pub platform: String,
    pub release: String,
    pub machine: String,
    pub runtime_version: String,
    pub hostname: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Snapshot {
    pub cpu: CpuInfo,
    pub memory: MemoryInfo,
    pub disk: DiskInfo,
    pub network: NetworkInfo,
    pub process: ProcessInfo,
    pub system: SystemInfo,
    /// Host uptime, seconds.
    pub uptime: f64,
    /// Agent uptime, seconds.
    pub app_uptime: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct HistoryPoint {
    pub timestamp: String,
    pub memory: f64,
    pub cpu: f64,
}

#[derive(Debug, Serialize, Clone)]
pub struct MetricsBody {
    pub current: Snapshot,
    pub history: Vec<HistoryPoint>,
}

/// One request-log record.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct LogRecord {
    pub ts: String,
    pub level: String,
    pub message: String,
    pub path: String,
    pub status_code: u16,
    pub duration_ms: f64,
    pub request_id: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct LogsBody {
    pub logs: Vec<LogRecord>,
}

#[derive(Debug, Serialize, Clone)]
pub struct HealthBody {
    pub status: &'static str,
    pub timestamp: String,
    pub app_rss_mb: f64,
    pub memory_budget_mb: u32,
    pub headroom_mb: f64,
    pub is_1gb_ready: bool,
    pub metrics: Snapshot,
    pub version: &'static str,
}
