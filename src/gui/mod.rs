//! GUI module - User interface components

mod app;
mod dashboard;
mod filter_panel;

pub use app::PulseApp;
pub use dashboard::{DashboardView, Section};
pub use filter_panel::{FilterAction, FilterPanel};
