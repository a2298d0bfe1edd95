//! Aadhaar Pulse Main Application
//! Main window with filter panel and dashboard.

use egui::SidePanel;
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::thread;

use crate::data::{read_dataset, DataLoader, DEFAULT_DATA_PATH};
use crate::gui::{DashboardView, FilterAction, FilterPanel};
use crate::stats::Analyzer;

/// CSV loading result from background thread
enum LoadResult {
    Complete { df: DataFrame, path: PathBuf },
    Error(String),
}

/// Main application window.
pub struct PulseApp {
    loader: DataLoader,
    panel: FilterPanel,
    dashboard: DashboardView,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,

    // Recompute the dashboard on the next frame
    dirty: bool,
}

impl PulseApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut app = Self {
            loader: DataLoader::new(),
            panel: FilterPanel::new(),
            dashboard: DashboardView::new(),
            load_rx: None,
            is_loading: false,
            dirty: false,
        };

        // Pick up the shipped dataset when it is present
        if Path::new(DEFAULT_DATA_PATH).exists() {
            app.start_load(PathBuf::from(DEFAULT_DATA_PATH));
        }
        app
    }

    /// Handle CSV file selection via dialog.
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return; // Already loading
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_load(path);
        }
    }

    /// Load a CSV in a background thread so the UI stays responsive.
    fn start_load(&mut self, path: PathBuf) {
        self.dashboard.clear();
        self.panel.csv_path = Some(path.clone());
        self.panel.set_status("Loading CSV file...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let path_str = path.to_string_lossy().to_string();
            match read_dataset(&path_str) {
                Ok(df) => {
                    let _ = tx.send(LoadResult::Complete { df, path });
                }
                Err(e) => {
                    let _ = tx.send(LoadResult::Error(e.to_string()));
                }
            }
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Complete { df, path } => {
                        let rows = df.height();
                        self.loader.set_dataframe(df, path);
                        self.panel.selection = Default::default();
                        self.panel
                            .update_options(self.loader.states(), self.loader.districts(None));
                        self.panel.set_status(&format!("Loaded {} records", rows));
                        self.is_loading = false;
                        self.dirty = true;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(error) => {
                        self.panel.set_status(&format!("Error: {}", error));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Re-derive the dashboard view-model from the current selection.
    fn recompute(&mut self) {
        let Some(df) = self.loader.get_dataframe() else {
            return;
        };

        let result = self
            .panel
            .selection
            .apply(df)
            .map_err(|e| e.to_string())
            .and_then(|filtered| {
                Analyzer::compute_dashboard(&filtered, self.panel.top_n)
                    .map_err(|e| e.to_string())
            });

        match result {
            Ok(data) => self.dashboard.set_data(data),
            Err(error) => {
                self.dashboard.clear();
                self.panel.set_status(&format!("Error: {}", error));
            }
        }
    }
}

impl eframe::App for PulseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        if self.dirty && !self.is_loading {
            self.recompute();
            self.dirty = false;
        }

        // Left panel - filters
        SidePanel::left("filter_panel")
            .min_width(280.0)
            .max_width(330.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.panel.show(ui);

                    match action {
                        FilterAction::BrowseCsv => self.handle_browse_csv(),
                        FilterAction::StateChanged => {
                            let state = self.panel.selection.state.clone();
                            self.panel.update_options(
                                self.loader.states(),
                                self.loader.districts(state.as_deref()),
                            );
                            self.dirty = true;
                        }
                        FilterAction::SelectionChanged => {
                            self.dirty = true;
                        }
                        FilterAction::None => {}
                    }
                });
            });

        // Central panel - dashboard
        let top_n = self.panel.top_n;
        egui::CentralPanel::default().show(ctx, |ui| {
            self.dashboard.show(ui, top_n);
        });
    }
}
