//! Plain-text log export: header, buffered lines oldest-first, footer.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, SecondsFormat, Utc};

use crate::logs::LogEntry;

pub const EXPORT_MIME: &str = "text/plain";
pub const EXPORT_TITLE: &str = "1GB SERVER - SYSTEM LOGS";
pub const EXPORT_FOOTER: &str = "End of Logs";
const RULE_WIDTH: usize = 70;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogExport {
    pub file_name: String,
    pub contents: String,
}

impl LogExport {
    pub fn mime(&self) -> &'static str {
        EXPORT_MIME
    }
}

/// `1gb-server-logs-<ISO-8601 UTC, ':' and '.' replaced by '-'>.txt`
pub fn export_file_name(now: DateTime<Utc>) -> String {
    let iso = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("1gb-server-logs-{iso}.txt")
}

pub fn export_logs<'a, I>(entries: I, now: DateTime<Local>) -> LogExport
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    let rule = "=".repeat(RULE_WIDTH);
    let mut lines = vec![
        rule.clone(),
        EXPORT_TITLE.to_string(),
        rule.clone(),
        format!("Generated: {}", now.format("%Y-%m-%d %H:%M:%S")),
        rule.clone(),
        String::new(),
    ];
    lines.extend(entries.into_iter().map(LogEntry::line));
    lines.push(String::new());
    lines.push(rule);
    lines.push(EXPORT_FOOTER.to_string());

    LogExport {
        file_name: export_file_name(now.with_timezone(&Utc)),
        contents: lines.join("\n"),
    }
}

/// Write the export under `dir`, creating it if needed.
pub fn write_export(dir: &Path, export: &LogExport) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(&export.file_name);
    fs::write(&path, export.contents.as_bytes())?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logs::{LogLevel, LogOrigin};
    use chrono::TimeZone;

    fn entry(msg: &str, s: u32) -> LogEntry {
        LogEntry {
            timestamp: Local.with_ymd_and_hms(2026, 5, 1, 12, 0, s).unwrap(),
            level: LogLevel::Info,
            message: msg.into(),
            origin: LogOrigin::Client,
        }
    }

    #[test]
    fn file_name_is_sanitized() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 58, 7).unwrap()
            + chrono::Duration::milliseconds(123);
        assert_eq!(
            export_file_name(now),
            "1gb-server-logs-2026-10-19T08-58-07-123Z.txt"
        );
    }

    #[test]
    fn entries_sit_between_header_and_footer_in_order() {
        let entries = vec![entry("first", 1), entry("second", 2), entry("third", 3)];
        let now = Local.with_ymd_and_hms(2026, 5, 1, 12, 30, 0).unwrap();
        let ex = export_logs(&entries, now);
        let lines: Vec<&str> = ex.contents.lines().collect();

        assert_eq!(lines[0], "=".repeat(70));
        assert_eq!(lines[1], EXPORT_TITLE);
        assert_eq!(lines[3], "Generated: 2026-05-01 12:30:00");
        assert_eq!(lines[5], "");
        assert_eq!(
            &lines[6..9],
            &[
                "[12:00:01] [INFO] first",
                "[12:00:02] [INFO] second",
                "[12:00:03] [INFO] third"
            ]
        );
        assert_eq!(lines[9], "");
        assert_eq!(lines[10], "=".repeat(70));
        assert_eq!(*lines.last().unwrap(), EXPORT_FOOTER);
        assert_eq!(ex.mime(), "text/plain");
        assert!(ex.file_name.starts_with("1gb-server-logs-2026-"));
        assert!(!ex.file_name.contains(':'));
    }

    #[test]
    fn empty_buffer_still_has_frame() {
        let now = Local.with_ymd_and_hms(2026, 5, 1, 12, 30, 0).unwrap();
        let ex = export_logs(std::iter::empty(), now);
        assert_eq!(ex.contents.lines().count(), 9);
        assert!(ex.contents.ends_with(EXPORT_FOOTER));
    }

    #[test]
    fn write_export_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let ex = LogExport {
            file_name: "1gb-server-logs-x.txt".into(),
            contents: "hello".into(),
        };
        let path = write_export(&dir.path().join("nested"), &ex).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "hello");
    }
}
