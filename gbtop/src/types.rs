//! Types that mirror the backend's JSON schema.
//!
//! Every struct defaults when a field is missing so a partial payload still
//! parses; the renderer decides what to show for absent values. Field aliases
//! accept the unit-suffixed names some backends emit (`used_mb`, `rss_mb`, ...).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryStats {
    #[serde(alias = "used_mb")]
    pub used: f64,
    #[serde(alias = "available_mb")]
    pub available: f64,
    #[serde(alias = "total_mb")]
    pub total: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuStats {
    pub percent: f64,
    pub cores: u32,
}

/// Disk usage in GB. Either the numeric fields or `error` are expected; a
/// disk without `used`/`percent` is treated as unavailable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskStats {
    #[serde(alias = "used_gb")]
    pub used: Option<f64>,
    #[serde(alias = "free_gb")]
    pub free: Option<f64>,
    #[serde(alias = "total_gb")]
    pub total: Option<f64>,
    pub percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessStats {
    #[serde(alias = "rss_mb")]
    pub memory_mb: f64,
    pub threads: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemInfo {
    pub platform: String,
    pub release: String,
    pub machine: String,
    #[serde(alias = "python_version")]
    pub runtime_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkStats {
    pub bytes_sent_mb: f64,
    pub bytes_recv_mb: f64,
    pub packets_sent: u64,
    pub packets_recv: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsSnapshot {
    pub memory: MemoryStats,
    pub cpu: CpuStats,
    pub disk: Option<DiskStats>,
    /// Instance uptime in seconds.
    pub uptime: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_uptime: Option<f64>,
    pub process: ProcessStats,
    pub system: SystemInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryPoint {
    pub memory: f64,
    pub cpu: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Body of `GET /api/v1/metrics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsResponse {
    pub current: MetricsSnapshot,
    pub history: Vec<HistoryPoint>,
}

/// One structured line from the backend's request log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendLogLine {
    pub ts: Option<String>,
    pub level: Option<String>,
    pub message: Option<String>,
    pub path: Option<String>,
    /// Kept as raw JSON: non-numeric values are ignored when formatting.
    pub status_code: Option<serde_json::Value>,
    pub duration_ms: Option<serde_json::Value>,
    pub request_id: Option<String>,
}

/// Body of `GET /api/v1/logs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogsResponse {
    pub logs: Vec<BackendLogLine>,
}
