//! App state and main loop: input handling, draining poll events, and drawing.

use std::{
    io,
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::backend::MetricsBackend;
use crate::dashboard::Dashboard;
use crate::logs::LogLevel;
use crate::poller::{Poller, PollerConfig};
use crate::ui::{Debouncer, TuiView};

const FRAME: Duration = Duration::from_millis(50);

pub struct App {
    backend: Arc<dyn MetricsBackend>,
    poll: PollerConfig,
    export_dir: PathBuf,
    dashboard: Dashboard,
    view: TuiView,
    resize: Debouncer,
    should_quit: bool,
}

impl App {
    pub fn new(
        backend: Arc<dyn MetricsBackend>,
        poll: PollerConfig,
        log_cap: usize,
        export_dir: PathBuf,
    ) -> Self {
        let view = TuiView::new(backend.description(), log_cap);
        Self {
            backend,
            poll,
            export_dir,
            dashboard: Dashboard::new(log_cap),
            view,
            resize: Debouncer::default(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        // Terminal setup; the guard restores it on every exit path
        let guard = TerminalGuard::enter()?;
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        terminal.clear()?;

        let mut poller = Poller::start(self.backend.clone(), &self.poll);
        info!(target = %self.backend.description(), "pollers started");
        self.dashboard.log(
            LogLevel::Info,
            "Dashboard initialized (1s metrics + backend logs)",
            &mut self.view,
        );

        let res = self.event_loop(&mut terminal, &mut poller).await;

        // Stop fetching before the screen goes away
        poller.shutdown().await;
        drop(guard);

        res
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        poller: &mut Poller,
    ) -> anyhow::Result<()> {
        loop {
            // Input (non-blocking)
            while event::poll(Duration::from_millis(10))? {
                match event::read()? {
                    Event::Key(k) if k.kind == KeyEventKind::Press => match k.code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            self.should_quit = true;
                        }
                        KeyCode::Char('d') | KeyCode::Char('D') => self.export_logs(),
                        _ => {}
                    },
                    Event::Resize(w, h) => {
                        debug!(w, h, "resize");
                        self.resize.trigger(Instant::now());
                    }
                    _ => {}
                }
            }
            if self.should_quit {
                break;
            }

            while let Ok(ev) = poller.events.try_recv() {
                self.dashboard.apply(ev, &mut self.view);
            }

            // Hold frames while a resize burst settles, then relayout once
            if self.resize.fire(Instant::now()) {
                terminal.autoresize()?;
            }
            if !self.resize.is_pending() {
                terminal.draw(|f| self.view.draw(f))?;
            }

            sleep(FRAME).await;
        }

        Ok(())
    }

    fn export_logs(&mut self) {
        // Failures are already written to the log pane
        let _ = self.dashboard.export_to(&self.export_dir, &mut self.view);
    }
}

/// Raw mode plus alternate screen, undone on drop. Also covers a failed
/// setup and a cancelled `run` future (ctrl-c in demo mode).
struct TerminalGuard {
    restore: fn(),
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        Self::enter_with(
            enable_raw_mode,
            || {
                let mut stdout = io::stdout();
                execute!(stdout, EnterAlternateScreen)
            },
            restore_terminal,
        )
    }

    fn enter_with(
        enable: impl FnOnce() -> io::Result<()>,
        setup: impl FnOnce() -> io::Result<()>,
        restore: fn(),
    ) -> io::Result<Self> {
        enable()?;
        let guard = Self { restore };
        setup()?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        (self.restore)();
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen, cursor::Show);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static SETUP_FAILED: AtomicUsize = AtomicUsize::new(0);
    static ENABLE_FAILED: AtomicUsize = AtomicUsize::new(0);
    static CLEAN_RUN: AtomicUsize = AtomicUsize::new(0);

    #[test]
    fn failed_setup_restores_raw_mode() {
        let res = TerminalGuard::enter_with(
            || Ok(()),
            || Err(io::Error::other("no alternate screen")),
            || {
                SETUP_FAILED.fetch_add(1, Ordering::SeqCst);
            },
        );
        assert!(res.is_err());
        assert_eq!(SETUP_FAILED.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn nothing_to_restore_when_raw_mode_fails() {
        let res = TerminalGuard::enter_with(
            || Err(io::Error::other("not a tty")),
            || Ok(()),
            || {
                ENABLE_FAILED.fetch_add(1, Ordering::SeqCst);
            },
        );
        assert!(res.is_err());
        assert_eq!(ENABLE_FAILED.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn restores_once_when_dropped() {
        let guard = TerminalGuard::enter_with(
            || Ok(()),
            || Ok(()),
            || {
                CLEAN_RUN.fetch_add(1, Ordering::SeqCst);
            },
        )
        .unwrap();
        assert_eq!(CLEAN_RUN.load(Ordering::SeqCst), 0);
        drop(guard);
        assert_eq!(CLEAN_RUN.load(Ordering::SeqCst), 1);
    }
}
