//! Dashboard View Widget
//! Central panel: section tabs, KPI strip, and the four analysis views.

use egui::{Color32, RichText, ScrollArea};

use crate::charts::ChartPlotter;
use crate::stats::{Analyzer, DashboardData};

/// The four read-only analysis views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Overview,
    Bivariate,
    Trivariate,
    Pressure,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Overview,
        Section::Bivariate,
        Section::Trivariate,
        Section::Pressure,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Section::Overview => "Overview",
            Section::Bivariate => "Bivariate Analysis",
            Section::Trivariate => "Trivariate Analysis",
            Section::Pressure => "Pressure Index",
        }
    }
}

/// Central dashboard area, a pure rendering of the computed view-model.
#[derive(Default)]
pub struct DashboardView {
    pub section: Section,
    pub data: Option<DashboardData>,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.data = None;
    }

    pub fn set_data(&mut self, data: DashboardData) {
        self.data = Some(data);
    }

    /// Draw the dashboard
    pub fn show(&mut self, ui: &mut egui::Ui, top_n: usize) {
        ui.label(
            RichText::new("UIDAI Aadhaar Update Analysis")
                .size(20.0)
                .strong(),
        );
        ui.label(
            RichText::new("Data-driven insights for update service planning")
                .size(12.0)
                .color(Color32::GRAY),
        );
        ui.add_space(8.0);

        // Section tabs
        ui.horizontal(|ui| {
            for section in Section::ALL {
                if ui
                    .selectable_label(self.section == section, section.label())
                    .clicked()
                {
                    self.section = section;
                }
            }
        });
        ui.add_space(8.0);
        ui.separator();
        ui.add_space(8.0);

        let Some(data) = self.data.clone() else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        Self::draw_kpis(ui, &data);
        ui.add_space(12.0);

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| match self.section {
                Section::Overview => Self::draw_overview(ui, &data, top_n),
                Section::Bivariate => Self::draw_bivariate(ui, &data, top_n),
                Section::Trivariate => Self::draw_trivariate(ui, &data),
                Section::Pressure => Self::draw_pressure(ui, &data, top_n),
            });
    }

    fn draw_kpis(ui: &mut egui::Ui, data: &DashboardData) {
        ui.columns(4, |cols| {
            Self::kpi(&mut cols[0], "Total Records", data.total_records.to_string());
            Self::kpi(&mut cols[1], "Total States", data.state_count.to_string());
            Self::kpi(&mut cols[2], "Total Districts", data.district_count.to_string());
            Self::kpi(
                &mut cols[3],
                "Highest Pressure Index",
                format!("{:.2}", data.max_pressure),
            );
        });
    }

    fn kpi(ui: &mut egui::Ui, label: &str, value: String) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.label(RichText::new(label).size(11.0).color(Color32::GRAY));
                    ui.label(RichText::new(value).size(18.0).strong());
                });
            });
    }

    fn draw_overview(ui: &mut egui::Ui, data: &DashboardData, top_n: usize) {
        ui.label(RichText::new("State vs Update Count").size(14.0).strong());
        ChartPlotter::draw_count_bars(
            ui,
            "overview_states",
            &Analyzer::top_n(&data.state_counts, top_n),
        );

        ui.add_space(12.0);
        ui.label(RichText::new("Month vs Update Count").size(14.0).strong());
        ChartPlotter::draw_month_trend(ui, "overview_months", &data.month_counts);
    }

    fn draw_bivariate(ui: &mut egui::Ui, data: &DashboardData, top_n: usize) {
        ui.label(RichText::new("State vs Updates").size(14.0).strong());
        ChartPlotter::draw_count_bars(
            ui,
            "bivariate_states",
            &Analyzer::top_n(&data.state_counts, top_n),
        );

        ui.add_space(12.0);
        ui.label(RichText::new("District vs Updates").size(14.0).strong());
        ChartPlotter::draw_count_bars(
            ui,
            "bivariate_districts",
            &Analyzer::top_n(&data.district_counts, top_n),
        );
    }

    fn draw_trivariate(ui: &mut egui::Ui, data: &DashboardData) {
        ui.label(
            RichText::new("Month vs Updates for Top Districts")
                .size(14.0)
                .strong(),
        );
        ChartPlotter::draw_district_month_lines(ui, "trivariate", &data.district_month);
    }

    fn draw_pressure(ui: &mut egui::Ui, data: &DashboardData, top_n: usize) {
        let top_pressure = Analyzer::top_n(&data.pressure, top_n);

        ui.label(
            RichText::new("Top Districts Pressure Index")
                .size(14.0)
                .strong(),
        );
        ChartPlotter::draw_pressure_bars(ui, "pressure_bars", &top_pressure);

        ui.add_space(12.0);
        ui.label(RichText::new("High-Pressure Table").size(14.0).strong());
        ChartPlotter::draw_pressure_table(ui, &top_pressure);
    }
}
