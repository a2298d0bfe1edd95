//! Filter Panel Widget
//! Left side panel with the dataset picker and filter controls.

use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

use crate::data::FilterSelection;

const TOP_N_RANGE: std::ops::RangeInclusive<usize> = 5..=20;

/// Left side panel: file selection, state/district/month filters, top-N.
pub struct FilterPanel {
    pub csv_path: Option<PathBuf>,
    pub selection: FilterSelection,
    pub top_n: usize,
    pub states: Vec<String>,
    pub districts: Vec<String>,
    pub status: String,
}

impl Default for FilterPanel {
    fn default() -> Self {
        Self {
            csv_path: None,
            selection: FilterSelection::default(),
            top_n: 10,
            states: Vec::new(),
            districts: Vec::new(),
            status: "Ready".to_string(),
        }
    }
}

impl FilterPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh the observed-value lists after a load or state change. The
    /// district list is always scoped to the selected state.
    pub fn update_options(&mut self, states: Vec<String>, districts: Vec<String>) {
        self.states = states;
        self.districts = districts;
        if let Some(district) = &self.selection.district {
            if !self.districts.contains(district) {
                self.selection.district = None;
            }
        }
    }

    /// Draw the panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> FilterAction {
        let mut action = FilterAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Aadhaar Pulse")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Update service planning insights")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.csv_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = FilterAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filters & Selection =====
        ui.label(RichText::new("🔧 Filters & Selection").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 70.0;
        let combo_width = 170.0;

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("State:"));
            let selected = self.selection.state.clone().unwrap_or_else(|| "All".into());
            ComboBox::from_id_salt("state_filter")
                .width(combo_width)
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    if ui
                        .selectable_label(self.selection.state.is_none(), "All")
                        .clicked()
                    {
                        self.selection.state = None;
                        action = FilterAction::StateChanged;
                    }
                    for state in &self.states {
                        let checked = self.selection.state.as_deref() == Some(state);
                        if ui.selectable_label(checked, state).clicked() {
                            self.selection.state = Some(state.clone());
                            action = FilterAction::StateChanged;
                        }
                    }
                });
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("District:"));
            let selected = self
                .selection
                .district
                .clone()
                .unwrap_or_else(|| "All".into());
            ComboBox::from_id_salt("district_filter")
                .width(combo_width)
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    if ui
                        .selectable_label(self.selection.district.is_none(), "All")
                        .clicked()
                    {
                        self.selection.district = None;
                        action = FilterAction::SelectionChanged;
                    }
                    for district in &self.districts {
                        let checked = self.selection.district.as_deref() == Some(district);
                        if ui.selectable_label(checked, district).clicked() {
                            self.selection.district = Some(district.clone());
                            action = FilterAction::SelectionChanged;
                        }
                    }
                });
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Month:"));
            let selected = self
                .selection
                .month
                .map(|m| m.to_string())
                .unwrap_or_else(|| "All".into());
            ComboBox::from_id_salt("month_filter")
                .width(combo_width)
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    if ui
                        .selectable_label(self.selection.month.is_none(), "All")
                        .clicked()
                    {
                        self.selection.month = None;
                        action = FilterAction::SelectionChanged;
                    }
                    for month in 1..=12 {
                        let checked = self.selection.month == Some(month);
                        if ui.selectable_label(checked, month.to_string()).clicked() {
                            self.selection.month = Some(month);
                            action = FilterAction::SelectionChanged;
                        }
                    }
                });
        });

        ui.add_space(10.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Top N:"));
            if ui
                .add(egui::Slider::new(&mut self.top_n, TOP_N_RANGE))
                .changed()
            {
                action = FilterAction::SelectionChanged;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status =====
        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Loaded") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set status line
    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by the filter panel
#[derive(Debug, Clone, PartialEq)]
pub enum FilterAction {
    None,
    BrowseCsv,
    StateChanged,
    SelectionChanged,
}
