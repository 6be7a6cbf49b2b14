//! Metrics collection using sysinfo for gbtop_agent.

use std::path::Path;

use sysinfo::{Disks, Networks, ProcessRefreshKind, ProcessesToUpdate, System};
use tracing::warn;

use crate::state::AppState;
use crate::types::{
    CpuInfo, DiskInfo, MemoryInfo, NetworkInfo, ProcessInfo, Snapshot, SystemInfo,
};

const MB: f64 = 1024.0 * 1024.0;
const GB: f64 = MB * 1024.0;

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Host health band; the boundaries are inclusive.
pub fn health_status(memory_percent: f64) -> &'static str {
    if memory_percent >= 90.0 {
        "critical"
    } else if memory_percent >= 80.0 {
        "warning"
    } else {
        "healthy"
    }
}

pub fn default_disk_path() -> &'static str {
    if cfg!(windows) {
        "C:\\"
    } else {
        "/"
    }
}

pub async fn collect_snapshot(state: &AppState) -> Snapshot {
    let (cpu, memory, process) = {
        let mut sys = state.sys.lock().await;
        sys.refresh_cpu_usage();
        sys.refresh_memory();
        let cpu = CpuInfo {
            percent: round2(sys.global_cpu_usage() as f64),
            cores: sys.cpus().len().max(1),
        };
        let memory = memory_info(sys.total_memory(), sys.available_memory(), sys.used_memory());
        let process = own_process(&mut sys);
        (cpu, memory, process)
    };

    let disk = {
        let mut disks = state.disks.lock().await;
        disks.refresh(true);
        disk_info(&disks, &state.disk_path)
    };

    let network = {
        let mut nets = state.networks.lock().await;
        nets.refresh(true);
        network_info(&nets)
    };

    Snapshot {
        cpu,
        memory,
        disk,
        network,
        process,
        system: system_info(&state.hostname),
        uptime: System::uptime() as f64,
        app_uptime: round2(state.started.elapsed().as_secs_f64()),
    }
}

fn memory_info(total: u64, available: u64, used: u64) -> MemoryInfo {
    let percent = if total > 0 {
        total.saturating_sub(available) as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    MemoryInfo {
        total_mb: round2(total as f64 / MB),
        used_mb: round2(used as f64 / MB),
        available_mb: round2(available as f64 / MB),
        percent: round2(percent),
    }
}

fn own_process(sys: &mut System) -> ProcessInfo {
    let pid = match sysinfo::get_current_pid() {
        Ok(pid) => pid,
        Err(e) => {
            warn!("cannot resolve own pid: {e}");
            return ProcessInfo {
                rss_mb: 0.0,
                threads: 1,
            };
        }
    };
    sys.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid]),
        true,
        ProcessRefreshKind::everything(),
    );
    match sys.process(pid) {
        Some(p) => ProcessInfo {
            rss_mb: round2(p.memory() as f64 / MB),
            // Thread list is only populated on Linux
            threads: p.tasks().map(|t| t.len()).unwrap_or(0).max(1),
        },
        None => ProcessInfo {
            rss_mb: 0.0,
            threads: 1,
        },
    }
}

/// Usage of the filesystem holding `path`: the disk with the longest mount
/// point that prefixes it.
pub fn disk_info(disks: &Disks, path: &Path) -> DiskInfo {
    let best = disks
        .list()
        .iter()
        .filter(|d| path.starts_with(d.mount_point()))
        .max_by_key(|d| d.mount_point().as_os_str().len());

    match best {
        Some(d) => disk_usage(path, d.total_space(), d.available_space()),
        None => DiskInfo::Unavailable {
            path: path.display().to_string(),
            error: format!("no mounted filesystem contains {}", path.display()),
        },
    }
}

fn disk_usage(path: &Path, total: u64, available: u64) -> DiskInfo {
    let used = total.saturating_sub(available);
    let percent = if total > 0 {
        used as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    DiskInfo::Usage {
        path: path.display().to_string(),
        total_gb: round2(total as f64 / GB),
        used_gb: round2(used as f64 / GB),
        free_gb: round2(available as f64 / GB),
        percent: round2(percent),
    }
}

fn network_info(nets: &Networks) -> NetworkInfo {
    let (mut sent, mut recv, mut psent, mut precv) = (0u64, 0u64, 0u64, 0u64);
    for (_, data) in nets.iter() {
        sent = sent.saturating_add(data.total_transmitted());
        recv = recv.saturating_add(data.total_received());
        psent = psent.saturating_add(data.total_packets_transmitted());
        precv = precv.saturating_add(data.total_packets_received());
    }
    NetworkInfo {
        bytes_sent_mb: round2(sent as f64 / MB),
        bytes_recv_mb: round2(recv as f64 / MB),
        packets_sent: psent,
        packets_recv: precv,
    }
}

fn system_info(hostname: &str) -> SystemInfo {
    SystemInfo {
        platform: System::name().unwrap_or_else(|| std::env::consts::OS.to_string()),
        release: System::kernel_version().unwrap_or_default(),
        machine: std::env::consts::ARCH.to_string(),
        runtime_version: format!("gbtop_agent {}", env!("CARGO_PKG_VERSION")),
        hostname: hostname.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_bands_are_inclusive() {
        assert_eq!(health_status(79.99), "healthy");
        assert_eq!(health_status(80.0), "warning");
        assert_eq!(health_status(89.9), "warning");
        assert_eq!(health_status(90.0), "critical");
    }

    #[test]
    fn memory_percent_uses_available() {
        let m = memory_info(1000 * MB as u64, 250 * MB as u64, 700 * MB as u64);
        assert_eq!(m.total_mb, 1000.0);
        assert_eq!(m.used_mb, 700.0);
        assert_eq!(m.percent, 75.0);
        assert_eq!(memory_info(0, 0, 0).percent, 0.0);
    }

    #[test]
    fn disk_usage_rounds_to_two_places() {
        let d = disk_usage(Path::new("/"), 8 * GB as u64, (GB * 5.69) as u64);
        match d {
            DiskInfo::Usage {
                total_gb,
                free_gb,
                used_gb,
                percent,
                ..
            } => {
                assert_eq!(total_gb, 8.0);
                assert_eq!(free_gb, 5.69);
                assert_eq!(used_gb, 2.31);
                assert_eq!(percent, 28.88);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unmounted_path_reports_error() {
        let disks = Disks::new();
        let d = disk_info(&disks, Path::new("/definitely/not/mounted"));
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["path"], "/definitely/not/mounted");
        assert!(json["error"].as_str().unwrap().contains("no mounted filesystem"));
        assert!(json.get("total_gb").is_none());
    }

    #[tokio::test]
    async fn snapshot_has_sane_values() {
        let st = AppState::new(default_disk_path().into());
        let s = collect_snapshot(&st).await;
        assert!(s.cpu.cores >= 1);
        assert!(s.memory.total_mb > 0.0);
        assert!((0.0..=100.0).contains(&s.memory.percent));
        assert!(s.process.rss_mb > 0.0);
        assert!(s.process.threads >= 1);
        assert!(s.app_uptime >= 0.0);
    }
}
