//! Aadhaar Pulse - Aadhaar Update Analysis Dashboard
//!
//! Interactive reporting over the Aadhaar update-records dataset.

use aadhaar_pulse::gui::PulseApp;
use eframe::egui;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1200.0, 700.0])
            .with_title("Aadhaar Pulse"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Aadhaar Pulse",
        options,
        Box::new(|cc| Ok(Box::new(PulseApp::new(cc)))),
    )
}
