//! UI module root: the terminal surface and the panels it draws.

pub mod budget;
pub mod chart;
pub mod debounce;
pub mod gauges;
pub mod header;
pub mod logs;
pub mod system;
pub mod theme;
pub mod util;
pub mod view;

pub use debounce::Debouncer;
pub use view::TuiView;
