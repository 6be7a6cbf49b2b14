//! HTTP client for the metrics backend.
//!
//! [`MetricsBackend`] is the seam the pollers fetch through; [`HttpBackend`]
//! is the reqwest implementation. Requests always bypass caches.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, PRAGMA};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::FetchError;
use crate::types::{BackendLogLine, LogsResponse, MetricsResponse};

pub const METRICS_PATH: &str = "api/v1/metrics";
pub const LOGS_PATH: &str = "api/v1/logs";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[async_trait]
pub trait MetricsBackend: Send + Sync {
    async fn fetch_metrics(&self) -> Result<MetricsResponse, FetchError>;

    /// The newest `limit` backend log lines, in the order the backend sent them.
    async fn fetch_logs(&self, limit: usize) -> Result<Vec<BackendLogLine>, FetchError>;

    /// Human-readable target, shown in the header.
    fn description(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    pub fn builder(base_url: &str) -> HttpBackendBuilder {
        HttpBackendBuilder {
            base_url: base_url.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            tls_ca: None,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        debug!(%url, "fetch");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Parse(e.to_string()))
    }
}

#[async_trait]
impl MetricsBackend for HttpBackend {
    async fn fetch_metrics(&self) -> Result<MetricsResponse, FetchError> {
        let url = self.base.join(METRICS_PATH)?;
        self.get_json(url).await
    }

    async fn fetch_logs(&self, limit: usize) -> Result<Vec<BackendLogLine>, FetchError> {
        let mut url = self.base.join(LOGS_PATH)?;
        url.query_pairs_mut().append_pair("limit", &limit.to_string());
        let body: LogsResponse = self.get_json(url).await?;
        Ok(body.logs)
    }

    fn description(&self) -> String {
        self.base.to_string()
    }
}

pub struct HttpBackendBuilder {
    base_url: String,
    timeout: Duration,
    tls_ca: Option<String>,
}

impl HttpBackendBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Extra PEM root certificate for https backends with a private CA.
    pub fn tls_ca(mut self, path: Option<&str>) -> Self {
        self.tls_ca = path.map(str::to_string);
        self
    }

    pub fn build(self) -> Result<HttpBackend, FetchError> {
        let base = normalize_base(&self.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache, no-store"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

        let mut builder = Client::builder()
            .default_headers(headers)
            .timeout(self.timeout);
        if let Some(path) = self.tls_ca.as_deref() {
            builder = builder.add_root_certificate(load_ca(Path::new(path))?);
        }
        // Only the TLS setup can make the client builder fail
        let client = builder.build().map_err(|e| FetchError::Tls(e.to_string()))?;
        Ok(HttpBackend { client, base })
    }
}

fn load_ca(path: &Path) -> Result<reqwest::Certificate, FetchError> {
    let pem = std::fs::read(path)
        .map_err(|e| FetchError::Tls(format!("read {}: {e}", path.display())))?;
    reqwest::Certificate::from_pem(&pem)
        .map_err(|e| FetchError::Tls(format!("{}: {e}", path.display())))
}

/// Accept `host:port`, `http://host:port` or `http://host/prefix`; the result
/// always ends in `/` so relative joins keep any prefix.
pub fn normalize_base(raw: &str) -> Result<Url, FetchError> {
    let raw = raw.trim();
    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };
    let mut url = Url::parse(&with_scheme)?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(FetchError::Url(format!("unsupported scheme '{other}'"))),
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
