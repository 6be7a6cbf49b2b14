//! HTTP routes.

use axum::{
    extract::{Query, State},
    middleware,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;

use crate::logs::{record_request, LOGS_ROUTE};
use crate::metrics::{collect_snapshot, health_status, round2};
use crate::state::{AppState, LOG_CAP};
use crate::types::{HealthBody, HistoryPoint, LogsBody, MetricsBody, Snapshot};

pub const DEFAULT_LOG_LIMIT: usize = 80;
pub const MEMORY_BUDGET_MB: u32 = 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/metrics", get(metrics))
        .route(LOGS_ROUTE, get(logs))
        .route("/api/v1/health", get(health))
        .route("/api/v1/system", get(system))
        .layer(middleware::from_fn_with_state(state.clone(), record_request))
        .with_state(state)
}

pub async fn metrics(State(state): State<AppState>) -> Json<MetricsBody> {
    let current = collect_snapshot(&state).await;
    let history = state
        .push_history(HistoryPoint {
            timestamp: Utc::now().to_rfc3339(),
            memory: current.memory.percent,
            cpu: current.cpu.percent,
        })
        .await;
    Json(MetricsBody { current, history })
}

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<usize>,
}

pub async fn logs(State(state): State<AppState>, Query(q): Query<LogsQuery>) -> Json<LogsBody> {
    let limit = q.limit.unwrap_or(DEFAULT_LOG_LIMIT).min(LOG_CAP);
    Json(LogsBody {
        logs: state.recent_logs(limit).await,
    })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthBody> {
    let metrics = collect_snapshot(&state).await;
    let rss = metrics.process.rss_mb;
    let budget = MEMORY_BUDGET_MB as f64;
    Json(HealthBody {
        status: health_status(metrics.memory.percent),
        timestamp: Utc::now().to_rfc3339(),
        app_rss_mb: rss,
        memory_budget_mb: MEMORY_BUDGET_MB,
        headroom_mb: round2(budget - rss),
        is_1gb_ready: rss < budget,
        metrics,
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn system(State(state): State<AppState>) -> Json<Snapshot> {
    Json(collect_snapshot(&state).await)
}
