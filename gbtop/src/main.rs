//! Entry point for the gbtop TUI. Parses args, resolves the backend and runs the App.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gbtop::app::App;
use gbtop::logs::DEFAULT_LOG_CAP;
use gbtop::profiles::{
    load_profiles, save_profiles, ProfileEntry, ProfileRequest, ProfilesFile, ResolveProfile,
};
use gbtop::{Dashboard, HttpBackend, MetricsBackend, PollEvent, PollerConfig, TextSurface};

const DEMO_PORT: u16 = 3231;

#[derive(Parser, Debug)]
#[command(name = "gbtop", version)]
#[command(about = "Terminal dashboard for a 1GB server: live metrics, app memory budget and request logs")]
struct Args {
    /// Backend base URL, e.g. http://127.0.0.1:3000
    #[arg(env = "GBTOP_URL")]
    url: Option<String>,

    /// Extra PEM root certificate for https backends
    #[arg(short = 't', long)]
    tls_ca: Option<String>,

    /// Named connection profile (use "demo" for a local agent)
    #[arg(short = 'P', long)]
    profile: Option<String>,

    /// Overwrite an existing profile without asking
    #[arg(long)]
    save: bool,

    /// Start a local gbtop_agent and connect to it
    #[arg(long)]
    demo: bool,

    /// Fetch once, print a text report and exit
    #[arg(long, conflicts_with = "demo")]
    once: bool,

    /// Resolve the target (saving profiles as needed) and exit without connecting
    #[arg(long)]
    dry_run: bool,

    /// Directory log exports are written to (default: current directory)
    #[arg(long)]
    export_dir: Option<String>,

    /// Write diagnostics to this file (filtered by RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    metrics_interval_ms: u64,

    #[arg(long, default_value_t = 2000, value_parser = clap::value_parser!(u64).range(1..))]
    logs_interval_ms: u64,

    /// Per-request timeout for backend fetches
    #[arg(long, default_value_t = 5000, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_ms: u64,

    /// Backend log lines requested per poll
    #[arg(long, default_value_t = 80)]
    log_limit: usize,

    /// Log lines kept in memory (and in exports), 100-300
    #[arg(
        long,
        default_value_t = DEFAULT_LOG_CAP,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(100..=300)
    )]
    log_cap: usize,
}

impl Args {
    fn poller_config(&self) -> PollerConfig {
        PollerConfig {
            metrics_interval: Duration::from_millis(self.metrics_interval_ms),
            logs_interval: Duration::from_millis(self.logs_interval_ms),
            log_limit: self.log_limit,
        }
    }
}

enum Target {
    Backend(ProfileEntry),
    Demo,
    Abort,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args)?;

    let target = if args.demo || args.profile.as_deref() == Some("demo") {
        Target::Demo
    } else {
        resolve_target(&args)?
    };

    match target {
        Target::Backend(entry) if args.dry_run => {
            println!("{}", entry.url);
            Ok(())
        }
        Target::Demo if args.dry_run => {
            println!("{}", demo_url());
            Ok(())
        }
        Target::Backend(entry) => run(&args, entry).await,
        Target::Demo => run_demo(&args).await,
        Target::Abort => Ok(()),
    }
}

fn init_tracing(args: &Args) -> Result<()> {
    let default = if args.log_file.is_some() { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    // The TUI owns the terminal, so interactive runs only log to a file
    if let Some(path) = &args.log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open log file {}", path.display()))?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    } else if args.once || args.dry_run {
        builder.with_writer(io::stderr).init();
    } else {
        builder.with_writer(io::sink).init();
    }
    Ok(())
}

fn resolve_target(args: &Args) -> Result<Target> {
    let mut profiles = load_profiles();
    let req = ProfileRequest {
        profile_name: args.profile.clone(),
        url: args.url.clone(),
        tls_ca: args.tls_ca.clone(),
        export_dir: args.export_dir.clone(),
    };

    let target = match req.resolve(&profiles) {
        ResolveProfile::Direct(entry) => {
            if let Some(name) = args.profile.as_ref() {
                remember_profile(&mut profiles, name, &entry, args.save)?;
            }
            Target::Backend(entry)
        }
        ResolveProfile::Loaded(entry) => Target::Backend(entry),
        ResolveProfile::PromptSelect(mut names) => {
            if !names.iter().any(|n| n == "demo") {
                names.push("demo".into());
            }
            eprintln!("Select profile:");
            for (i, n) in names.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, n);
            }
            let line = prompt_string("Enter number (or blank to abort): ")?;
            match line.trim().parse::<usize>() {
                Ok(idx) if (1..=names.len()).contains(&idx) => {
                    let name = &names[idx - 1];
                    match profiles.profiles.get(name) {
                        _ if name == "demo" => Target::Demo,
                        Some(entry) => Target::Backend(ProfileEntry {
                            tls_ca: args.tls_ca.clone().or_else(|| entry.tls_ca.clone()),
                            export_dir: args
                                .export_dir
                                .clone()
                                .or_else(|| entry.export_dir.clone()),
                            url: entry.url.clone(),
                        }),
                        None => Target::Abort,
                    }
                }
                _ => Target::Abort,
            }
        }
        ResolveProfile::PromptCreate(name) => {
            eprintln!("Profile '{name}' does not exist yet.");
            let url = prompt_string("Enter URL (http://HOST:PORT or https://...): ")?;
            if url.trim().is_empty() {
                return Ok(Target::Abort);
            }
            let ca = prompt_string("Enter TLS CA path (or leave blank): ")?;
            let entry = ProfileEntry {
                url: url.trim().to_string(),
                tls_ca: Some(ca.trim().to_string()).filter(|s| !s.is_empty()),
                export_dir: args.export_dir.clone(),
            };
            profiles.profiles.insert(name, entry.clone());
            save_profiles(&profiles).context("save profiles")?;
            Target::Backend(entry)
        }
        ResolveProfile::None => {
            eprintln!("No URL provided and no profiles to select.");
            Target::Abort
        }
    };
    Ok(target)
}

// New names are saved straight away; changed ones only with --save or a yes
fn remember_profile(
    profiles: &mut ProfilesFile,
    name: &str,
    entry: &ProfileEntry,
    force: bool,
) -> Result<()> {
    let write = match profiles.profiles.get(name) {
        None => true,
        Some(existing) if existing == entry => false,
        Some(_) => {
            force || prompt_yes_no(&format!("Overwrite existing profile '{name}'? [y/N]: "))
        }
    };
    if write {
        profiles.profiles.insert(name.to_string(), entry.clone());
        save_profiles(profiles).context("save profiles")?;
        info!(profile = name, "profile saved");
    }
    Ok(())
}

async fn run(args: &Args, entry: ProfileEntry) -> Result<()> {
    let backend = HttpBackend::builder(&entry.url)
        .tls_ca(entry.tls_ca.as_deref())
        .timeout(Duration::from_millis(args.timeout_ms))
        .build()
        .with_context(|| format!("backend {}", entry.url))?;
    let backend: Arc<dyn MetricsBackend> = Arc::new(backend);
    info!(target = %backend.description(), "starting");

    if args.once {
        return run_once(backend, args, entry.export_dir.as_deref()).await;
    }

    let export_dir = entry
        .export_dir
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let mut app = App::new(backend, args.poller_config(), args.log_cap, export_dir);
    app.run().await
}

async fn run_once(
    backend: Arc<dyn MetricsBackend>,
    args: &Args,
    export_dir: Option<&str>,
) -> Result<()> {
    let mut dashboard = Dashboard::new(args.log_cap);
    let mut out = TextSurface::default();

    let metrics = backend.fetch_metrics().await;
    dashboard.apply(PollEvent::Metrics(metrics), &mut out);
    let logs = backend.fetch_logs(args.log_limit).await;
    dashboard.apply(PollEvent::Logs(logs), &mut out);

    if let Some(dir) = export_dir {
        dashboard
            .export_to(Path::new(dir), &mut out)
            .with_context(|| format!("export logs to {dir}"))?;
    }

    let stdout = io::stdout();
    let mut lock = stdout.lock();
    for line in out.to_lines() {
        writeln!(lock, "{line}")?;
    }

    // The failure reason is already in the printed log lines
    if dashboard.last_metrics().is_none() {
        anyhow::bail!("metrics fetch failed");
    }
    Ok(())
}

fn prompt_yes_no(prompt: &str) -> bool {
    prompt_string(prompt)
        .map(|line| matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
        .unwrap_or(false)
}

fn prompt_string(prompt: &str) -> io::Result<String> {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}

// --- Demo Mode ---

fn demo_url() -> String {
    format!("http://127.0.0.1:{DEMO_PORT}")
}

async fn run_demo(args: &Args) -> Result<()> {
    let _agent = DemoAgent::spawn(DEMO_PORT)?;
    // Give the agent a brief moment to bind
    tokio::time::sleep(Duration::from_millis(300)).await;

    let entry = ProfileEntry {
        url: demo_url(),
        tls_ca: None,
        export_dir: args.export_dir.clone(),
    };
    tokio::select! {
        res = run(args, entry) => res,
        _ = tokio::signal::ctrl_c() => Ok(()),
    }
}

/// Local agent process, killed on drop.
struct DemoAgent(Child);

impl DemoAgent {
    fn spawn(port: u16) -> Result<Self> {
        let exe = find_agent_executable();
        let child = Command::new(&exe)
            .arg("--port")
            .arg(port.to_string())
            .spawn()
            .with_context(|| format!("spawn {}", exe.display()))?;
        Ok(Self(child))
    }
}

impl Drop for DemoAgent {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

fn find_agent_executable() -> PathBuf {
    #[cfg(windows)]
    let name = "gbtop_agent.exe";
    #[cfg(not(windows))]
    let name = "gbtop_agent";

    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        let candidate = dir.join(name);
        if candidate.exists() {
            return candidate;
        }
    }
    // Fallback to relying on PATH
    PathBuf::from(name)
}
