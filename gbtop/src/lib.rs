//! gbtop: terminal dashboard for a small server's metrics and request logs.
//!
//! The library holds everything except the binary's argument handling so the
//! pieces can be driven from tests with a fake backend and a text surface.

pub mod app;
pub mod backend;
pub mod dashboard;
pub mod derive;
pub mod error;
pub mod export;
pub mod history;
pub mod logs;
pub mod poller;
pub mod profiles;
pub mod render;
pub mod surface;
pub mod types;
pub mod ui;

pub use backend::{HttpBackend, MetricsBackend};
pub use dashboard::Dashboard;
pub use error::FetchError;
pub use poller::{PollEvent, Poller, PollerConfig};
pub use surface::{RenderSurface, TextSurface};
