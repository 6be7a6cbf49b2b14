//! Log entries shown in the terminal pane, the bounded buffer that backs the
//! export, and formatting of backend request-log lines.

use std::collections::{HashSet, VecDeque};
use std::fmt;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

use crate::history::push_capped;
use crate::types::BackendLogLine;

/// Default buffer capacity.
pub const DEFAULT_LOG_CAP: usize = 300;
/// How many of the newest buffered lines a backend batch is checked against.
pub const DEDUP_WINDOW: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
    /// Any other level string the backend sends, upper-cased.
    Other(String),
}

impl LogLevel {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => LogLevel::Debug,
            "INFO" => LogLevel::Info,
            "WARNING" => LogLevel::Warning,
            "ERROR" => LogLevel::Error,
            "CRITICAL" => LogLevel::Critical,
            other => LogLevel::Other(other.to_string()),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => f.write_str("DEBUG"),
            LogLevel::Info => f.write_str("INFO"),
            LogLevel::Warning => f.write_str("WARNING"),
            LogLevel::Error => f.write_str("ERROR"),
            LogLevel::Critical => f.write_str("CRITICAL"),
            LogLevel::Other(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOrigin {
    /// Synthesized by the dashboard (connection failures, exports, ...).
    Client,
    Backend,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
    pub origin: LogOrigin,
}

impl LogEntry {
    pub fn client(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            message: message.into(),
            origin: LogOrigin::Client,
        }
    }

    /// Build an entry from a backend line. `now` stands in for a missing or
    /// unparsable timestamp.
    pub fn from_backend(l: &BackendLogLine, now: DateTime<Local>) -> Self {
        let timestamp = l.ts.as_deref().and_then(parse_ts).unwrap_or(now);
        let level = LogLevel::parse(l.level.as_deref().filter(|s| !s.is_empty()).unwrap_or("INFO"));

        let mut body = l.message.clone().unwrap_or_default();
        if let Some(path) = l.path.as_deref().filter(|p| !p.is_empty()) {
            body.push(' ');
            body.push_str(path);
        }
        if let Some(serde_json::Value::Number(status)) = l.status_code.as_ref() {
            body.push_str(&format!(" status={status}"));
        }
        if let Some(ms) = l.duration_ms.as_ref().and_then(|v| v.as_f64()) {
            body.push_str(&format!(" {ms:.2}ms"));
        }
        if let Some(rid) = l.request_id.as_deref().filter(|r| !r.is_empty()) {
            let prefix: String = rid.chars().take(8).collect();
            body.push_str(&format!(" rid={prefix}"));
        }

        Self {
            timestamp,
            level,
            message: body.trim().to_string(),
            origin: LogOrigin::Backend,
        }
    }

    /// `[HH:MM:SS] [LEVEL] message`; also the dedup key.
    pub fn line(&self) -> String {
        format!(
            "[{}] [{}] {}",
            self.timestamp.format("%H:%M:%S"),
            self.level,
            self.message
        )
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line())
    }
}

// RFC 3339 first, then a naive ISO stamp read as local time
fn parse_ts(s: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Local.from_local_datetime(&naive).earliest()
}

/// Bounded FIFO of log entries. Entries are never mutated once admitted.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    entries: VecDeque<LogEntry>,
    cap: usize,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAP)
    }
}

impl LogBuffer {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(cap),
            cap,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, entry: LogEntry) {
        push_capped(&mut self.entries, entry, self.cap);
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Formatted lines of the newest `n` entries.
    pub fn recent_lines(&self, n: usize) -> HashSet<String> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).map(LogEntry::line).collect()
    }

    /// Admit backend lines not already among the newest [`DEDUP_WINDOW`]
    /// lines (nor repeated within the batch). Returns the admitted entries in
    /// source order.
    pub fn admit_backend(
        &mut self,
        lines: &[BackendLogLine],
        now: DateTime<Local>,
    ) -> Vec<LogEntry> {
        let mut seen = self.recent_lines(DEDUP_WINDOW);
        let mut admitted = Vec::new();
        for l in lines {
            let entry = LogEntry::from_backend(l, now);
            if seen.insert(entry.line()) {
                self.push(entry.clone());
                admitted.push(entry);
            }
        }
        admitted
    }
}
