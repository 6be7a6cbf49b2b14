//! Shared agent state: sysinfo handles, metric history and the request log.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use sysinfo::{Disks, Networks, System};
use tokio::sync::Mutex;

use crate::types::{HistoryPoint, LogRecord};

pub const HISTORY_CAP: usize = 60;
pub const LOG_CAP: usize = 500;

pub type SharedSystem = Arc<Mutex<System>>;
pub type SharedNetworks = Arc<Mutex<Networks>>;
pub type SharedDisks = Arc<Mutex<Disks>>;

#[derive(Clone)]
pub struct AppState {
    // Persistent sysinfo handles
    pub sys: SharedSystem,
    pub networks: SharedNetworks,
    pub disks: SharedDisks,

    pub history: Arc<Mutex<VecDeque<HistoryPoint>>>,
    pub logs: Arc<Mutex<VecDeque<LogRecord>>>,

    pub started: Instant,
    pub disk_path: PathBuf,
    pub hostname: String,
    request_seq: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(disk_path: PathBuf) -> Self {
        let mut sys = System::new();
        // Prime CPU usage so the first sample isn't always 0
        sys.refresh_cpu_usage();
        sys.refresh_memory();

        Self {
            sys: Arc::new(Mutex::new(sys)),
            networks: Arc::new(Mutex::new(Networks::new_with_refreshed_list())),
            disks: Arc::new(Mutex::new(Disks::new_with_refreshed_list())),
            history: Arc::new(Mutex::new(VecDeque::with_capacity(HISTORY_CAP))),
            logs: Arc::new(Mutex::new(VecDeque::with_capacity(LOG_CAP))),
            started: Instant::now(),
            disk_path,
            hostname: System::host_name().unwrap_or_else(|| "unknown".into()),
            request_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// 16 hex chars: wall-clock millis then a per-process sequence number.
    pub fn next_request_id(&self) -> String {
        let seq = self.request_seq.fetch_add(1, Ordering::Relaxed);
        let millis = Utc::now().timestamp_millis() as u64;
        format!("{:08x}{:08x}", millis as u32, seq as u32)
    }

    /// Append a history point, keeping the newest [`HISTORY_CAP`]; returns a copy.
    pub async fn push_history(&self, point: HistoryPoint) -> Vec<HistoryPoint> {
        let mut h = self.history.lock().await;
        while h.len() >= HISTORY_CAP {
            h.pop_front();
        }
        h.push_back(point);
        h.iter().cloned().collect()
    }

    pub async fn push_log(&self, record: LogRecord) {
        let mut logs = self.logs.lock().await;
        while logs.len() >= LOG_CAP {
            logs.pop_front();
        }
        logs.push_back(record);
    }

    /// The newest `limit` records, oldest first.
    pub async fn recent_logs(&self, limit: usize) -> Vec<LogRecord> {
        let logs = self.logs.lock().await;
        let start = logs.len().saturating_sub(limit);
        logs.iter().skip(start).cloned().collect()
    }
}
