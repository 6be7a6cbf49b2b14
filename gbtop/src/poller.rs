//! Background pollers.
//!
//! Metrics and logs are fetched by two independent tasks, each on its own
//! interval. A task awaits its fetch before the next tick, so a slow response
//! delays that task's next poll but never overlaps it. Results go to a single
//! consumer over an mpsc channel; the consumer owns all dashboard state.
//! Stopping flips a watch channel that both loops and any in-flight fetch
//! select on, so nothing is emitted after [`Poller::stop`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::backend::MetricsBackend;
use crate::error::FetchError;
use crate::types::{BackendLogLine, MetricsResponse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerConfig {
    pub metrics_interval: Duration,
    pub logs_interval: Duration,
    /// Backend log lines requested per poll.
    pub log_limit: usize,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            metrics_interval: Duration::from_millis(1000),
            logs_interval: Duration::from_millis(2000),
            log_limit: 80,
        }
    }
}

#[derive(Debug, Clone)]
pub enum PollEvent {
    Metrics(Result<MetricsResponse, FetchError>),
    Logs(Result<Vec<BackendLogLine>, FetchError>),
}

/// One periodic fetch.
#[async_trait]
pub trait PollTask: Send + Sync + 'static {
    fn name(&self) -> &'static str;
    fn period(&self) -> Duration;
    async fn poll(&self) -> PollEvent;
}

pub struct MetricsPoller {
    backend: Arc<dyn MetricsBackend>,
    period: Duration,
}

impl MetricsPoller {
    pub fn new(backend: Arc<dyn MetricsBackend>, period: Duration) -> Self {
        Self { backend, period }
    }
}

#[async_trait]
impl PollTask for MetricsPoller {
    fn name(&self) -> &'static str {
        "metrics"
    }

    fn period(&self) -> Duration {
        self.period
    }

    async fn poll(&self) -> PollEvent {
        PollEvent::Metrics(self.backend.fetch_metrics().await)
    }
}

pub struct LogPoller {
    backend: Arc<dyn MetricsBackend>,
    period: Duration,
    limit: usize,
}

impl LogPoller {
    pub fn new(backend: Arc<dyn MetricsBackend>, period: Duration, limit: usize) -> Self {
        Self {
            backend,
            period,
            limit,
        }
    }
}

#[async_trait]
impl PollTask for LogPoller {
    fn name(&self) -> &'static str {
        "logs"
    }

    fn period(&self) -> Duration {
        self.period
    }

    async fn poll(&self) -> PollEvent {
        PollEvent::Logs(self.backend.fetch_logs(self.limit).await)
    }
}

/// Running pollers plus the receiving end of their events.
pub struct Poller {
    pub events: mpsc::Receiver<PollEvent>,
    stop_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl Poller {
    /// Start the metrics and log pollers. Both fire immediately, then on
    /// their intervals.
    pub fn start(backend: Arc<dyn MetricsBackend>, config: &PollerConfig) -> Self {
        let tasks: Vec<Box<dyn PollTask>> = vec![
            Box::new(MetricsPoller::new(backend.clone(), config.metrics_interval)),
            Box::new(LogPoller::new(backend, config.logs_interval, config.log_limit)),
        ];
        Self::start_tasks(tasks)
    }

    pub fn start_tasks(tasks: Vec<Box<dyn PollTask>>) -> Self {
        let (tx, events) = mpsc::channel(64);
        let (stop_tx, stop_rx) = watch::channel(false);
        let tasks = tasks
            .into_iter()
            .map(|t| spawn_task(t, tx.clone(), stop_rx.clone()))
            .collect();
        Self {
            events,
            stop_tx,
            tasks,
        }
    }

    /// Signal both loops to stop; in-flight fetches are abandoned.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.stop_tx.borrow()
    }

    /// Stop and wait for the tasks to exit.
    pub async fn shutdown(mut self) {
        self.stop();
        for t in self.tasks.drain(..) {
            let _ = t.await;
        }
        // Drop anything queued before the stop landed
        self.events.close();
        while self.events.try_recv().is_ok() {}
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(true);
    }
}

fn spawn_task(
    task: Box<dyn PollTask>,
    tx: mpsc::Sender<PollEvent>,
    mut stop_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(task.period());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = stop_rx.changed() => {
                    if *stop_rx.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let event = tokio::select! {
                        biased;
                        _ = stop_rx.changed() => {
                            debug!(task = task.name(), "stopped with fetch in flight");
                            break;
                        }
                        ev = task.poll() => ev,
                    };
                    if *stop_rx.borrow() {
                        break;
                    }
                    if tx.send(event).await.is_err() {
                        warn!(task = task.name(), "event receiver dropped; poller exiting");
                        break;
                    }
                }
            }
        }
        debug!(task = task.name(), "poller exited");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;

    use crate::types::MetricsResponse;

    #[derive(Default)]
    struct CountingBackend {
        metrics_calls: AtomicUsize,
        log_calls: AtomicUsize,
        slow: bool,
    }

    #[async_trait]
    impl MetricsBackend for CountingBackend {
        async fn fetch_metrics(&self) -> Result<MetricsResponse, FetchError> {
            self.metrics_calls.fetch_add(1, Ordering::SeqCst);
            if self.slow {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            Ok(MetricsResponse::default())
        }

        async fn fetch_logs(&self, limit: usize) -> Result<Vec<BackendLogLine>, FetchError> {
            self.log_calls.fetch_add(1, Ordering::SeqCst);
            if self.slow {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            assert_eq!(limit, 80);
            Err(FetchError::Status(503))
        }

        fn description(&self) -> String {
            "counting".into()
        }
    }

    #[test]
    fn default_config_matches_dashboard_cadence() {
        let c = PollerConfig::default();
        assert_eq!(c.metrics_interval, Duration::from_secs(1));
        assert_eq!(c.logs_interval, Duration::from_secs(2));
        assert_eq!(c.log_limit, 80);
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_follow_their_own_intervals() {
        let backend = Arc::new(CountingBackend::default());
        let mut poller = Poller::start(backend.clone(), &PollerConfig::default());
        let start = Instant::now();

        let mut metric_times = Vec::new();
        let mut log_times = Vec::new();
        while metric_times.len() < 4 {
            let ev = poller.events.recv().await.expect("event");
            let at = start.elapsed().as_secs();
            match ev {
                PollEvent::Metrics(r) => {
                    assert!(r.is_ok());
                    metric_times.push(at);
                }
                PollEvent::Logs(r) => {
                    assert_eq!(r.unwrap_err(), FetchError::Status(503));
                    log_times.push(at);
                }
            }
        }
        assert_eq!(metric_times, vec![0, 1, 2, 3]);
        assert_eq!(log_times, vec![0, 2]);
        poller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_abandons_inflight_fetches() {
        let backend = Arc::new(CountingBackend {
            slow: true,
            ..Default::default()
        });
        let mut poller = Poller::start(backend.clone(), &PollerConfig::default());

        // Let both tasks start their first (hanging) fetch
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(backend.metrics_calls.load(Ordering::SeqCst), 1);
        assert_eq!(backend.log_calls.load(Ordering::SeqCst), 1);

        poller.stop();
        assert!(poller.is_stopped());
        // Channel closes once both tasks have exited without sending
        assert!(poller.events.recv().await.is_none());
        assert_eq!(backend.metrics_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn no_events_after_shutdown() {
        let backend = Arc::new(CountingBackend::default());
        let poller = Poller::start(backend.clone(), &PollerConfig::default());
        tokio::time::sleep(Duration::from_millis(1500)).await;
        poller.shutdown().await;
        let calls = backend.metrics_calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(backend.metrics_calls.load(Ordering::SeqCst), calls);
    }
}
