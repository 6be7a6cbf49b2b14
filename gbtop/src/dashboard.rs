//! Dashboard state: the log buffer and the last good snapshot. Applies poll
//! results to a surface; a failed fetch becomes a log entry and leaves the
//! previous display in place.

use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{info, warn};

use crate::export::{export_logs, write_export, LogExport};
use crate::logs::{LogBuffer, LogEntry, LogLevel, DEFAULT_LOG_CAP};
use crate::poller::PollEvent;
use crate::render::render;
use crate::surface::RenderSurface;
use crate::types::{BackendLogLine, MetricsResponse};

#[derive(Debug)]
pub struct Dashboard {
    logs: LogBuffer,
    last: Option<MetricsResponse>,
    metrics_failures: u64,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAP)
    }
}

impl Dashboard {
    pub fn new(log_cap: usize) -> Self {
        Self {
            logs: LogBuffer::new(log_cap),
            last: None,
            metrics_failures: 0,
        }
    }

    pub fn logs(&self) -> &LogBuffer {
        &self.logs
    }

    pub fn last_metrics(&self) -> Option<&MetricsResponse> {
        self.last.as_ref()
    }

    /// Fetch failures since start.
    pub fn metrics_failures(&self) -> u64 {
        self.metrics_failures
    }

    pub fn apply<S: RenderSurface + ?Sized>(&mut self, event: PollEvent, surface: &mut S) {
        match event {
            PollEvent::Metrics(Ok(resp)) => {
                render(surface, &resp.current, &resp.history);
                self.last = Some(resp);
            }
            PollEvent::Metrics(Err(e)) => {
                self.metrics_failures += 1;
                warn!(error = %e, "metrics fetch failed");
                self.log(LogLevel::Error, format!("Failed to fetch metrics: {e}"), surface);
            }
            PollEvent::Logs(Ok(lines)) => {
                self.ingest_backend_logs(&lines, surface);
            }
            PollEvent::Logs(Err(e)) => {
                warn!(error = %e, "log fetch failed");
                self.log(LogLevel::Warning, format!("Backend logs unavailable: {e}"), surface);
            }
        }
    }

    /// Append a client-side entry.
    pub fn log<S: RenderSurface + ?Sized>(
        &mut self,
        level: LogLevel,
        message: impl Into<String>,
        surface: &mut S,
    ) {
        let entry = LogEntry::client(level, message);
        surface.append_log_line(&entry);
        self.logs.push(entry);
    }

    /// Admit backend lines not seen in the recent window; returns how many
    /// were new.
    pub fn ingest_backend_logs<S: RenderSurface + ?Sized>(
        &mut self,
        lines: &[BackendLogLine],
        surface: &mut S,
    ) -> usize {
        let admitted = self.logs.admit_backend(lines, Local::now());
        for entry in &admitted {
            surface.append_log_line(entry);
        }
        admitted.len()
    }

    pub fn export(&self) -> LogExport {
        export_logs(self.logs.iter(), Local::now())
    }

    /// Write the export to `dir` and note it in the log.
    pub fn export_to<S: RenderSurface + ?Sized>(
        &mut self,
        dir: &Path,
        surface: &mut S,
    ) -> io::Result<PathBuf> {
        let export = self.export();
        match write_export(dir, &export) {
            Ok(path) => {
                info!(path = %path.display(), "logs exported");
                self.log(LogLevel::Info, "Logs downloaded successfully", surface);
                Ok(path)
            }
            Err(e) => {
                warn!(error = %e, "log export failed");
                self.log(LogLevel::Error, format!("Log export failed: {e}"), surface);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::surface::{GaugeId, TextSurface};
    use crate::types::MetricsSnapshot;

    fn ok_metrics(used: f64) -> PollEvent {
        let mut current = MetricsSnapshot::default();
        current.memory.used = used;
        PollEvent::Metrics(Ok(MetricsResponse {
            current,
            history: vec![],
        }))
    }

    #[test]
    fn failed_fetch_keeps_stale_display_and_logs_error() {
        let mut d = Dashboard::default();
        let mut s = TextSurface::default();
        d.apply(ok_metrics(100.0), &mut s);
        d.apply(PollEvent::Metrics(Err(FetchError::Status(500))), &mut s);

        assert_eq!(s.gauges[&GaugeId::Memory].value, "100 MB");
        assert_eq!(d.last_metrics().map(|m| m.current.memory.used), Some(100.0));
        assert_eq!(d.metrics_failures(), 1);
        let last = d.logs().iter().last().unwrap();
        assert_eq!(last.level, LogLevel::Error);
        assert_eq!(last.message, "Failed to fetch metrics: HTTP 500");
        assert_eq!(s.log_lines.len(), 1);
    }

    #[test]
    fn log_failure_is_a_warning() {
        let mut d = Dashboard::default();
        let mut s = TextSurface::default();
        d.apply(
            PollEvent::Logs(Err(FetchError::Network("refused".into()))),
            &mut s,
        );
        let e = d.logs().iter().next().unwrap();
        assert_eq!(e.level, LogLevel::Warning);
        assert_eq!(e.message, "Backend logs unavailable: network error: refused");
    }

    #[test]
    fn repeated_backend_batch_is_not_rendered_twice() {
        let mut d = Dashboard::default();
        let mut s = TextSurface::default();
        let batch = vec![
            BackendLogLine {
                ts: Some("2026-01-01T10:00:00+00:00".into()),
                message: Some("a".into()),
                ..Default::default()
            },
            BackendLogLine {
                ts: Some("2026-01-01T10:00:01+00:00".into()),
                message: Some("b".into()),
                ..Default::default()
            },
        ];
        d.apply(PollEvent::Logs(Ok(batch.clone())), &mut s);
        d.apply(PollEvent::Logs(Ok(batch)), &mut s);
        assert_eq!(s.log_lines.len(), 2);
        assert_eq!(d.logs().len(), 2);
    }

    #[test]
    fn export_to_writes_file_and_logs_success() {
        let dir = tempfile::tempdir().unwrap();
        let mut d = Dashboard::new(100);
        let mut s = TextSurface::default();
        d.log(LogLevel::Info, "hello", &mut s);
        let path = d.export_to(dir.path(), &mut s).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("[INFO] hello"));
        assert!(!text.contains("Logs downloaded successfully"));
        assert_eq!(
            d.logs().iter().last().unwrap().message,
            "Logs downloaded successfully"
        );
    }
}
