//! Shared UI theme constants.

use ratatui::style::Color;

use crate::derive::{BudgetBand, HealthStatus};
use crate::logs::LogLevel;

pub const MEM_LINE: Color = Color::Magenta;
pub const CPU_LINE: Color = Color::Cyan;
pub const AMBER: Color = Color::Rgb(245, 158, 11);
pub const TIMESTAMP: Color = Color::DarkGray;

pub fn status_color(s: HealthStatus) -> Color {
    match s {
        HealthStatus::Healthy => Color::Green,
        HealthStatus::Warning => Color::Yellow,
        HealthStatus::Critical => Color::Red,
    }
}

pub fn band_color(b: BudgetBand) -> Color {
    match b {
        BudgetBand::Green => Color::Green,
        BudgetBand::Blue => Color::Blue,
        BudgetBand::Amber => AMBER,
        BudgetBand::Red => Color::Red,
    }
}

pub fn level_color(l: &LogLevel) -> Color {
    match l {
        LogLevel::Debug => Color::DarkGray,
        LogLevel::Info => Color::Green,
        LogLevel::Warning => Color::Yellow,
        LogLevel::Error => Color::Red,
        LogLevel::Critical => Color::LightRed,
        LogLevel::Other(_) => Color::Gray,
    }
}

// Gauge fill: green below 70, yellow below 90, red above
pub fn gauge_color(pct: f64) -> Color {
    if pct < 70.0 {
        Color::Green
    } else if pct < 90.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}
