//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use crate::stats::{GroupCount, PressureRow};

/// Color palette for chart series
pub const BAR_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

const CHART_HEIGHT: f32 = 300.0;

/// Creates dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Horizontal bar chart of (label, count) rows, ranked top to bottom.
    pub fn draw_count_bars(ui: &mut egui::Ui, id: &str, rows: &[GroupCount]) {
        let labels: Vec<String> = rows.iter().map(|r| r.key.clone()).collect();
        let values: Vec<f64> = rows.iter().map(|r| r.count as f64).collect();
        Self::draw_horizontal_bars(ui, id, &labels, &values, BAR_COLOR);
    }

    /// Horizontal bar chart of pressure indices, ranked top to bottom.
    pub fn draw_pressure_bars(ui: &mut egui::Ui, id: &str, rows: &[PressureRow]) {
        let labels: Vec<String> = rows.iter().map(|r| r.district.clone()).collect();
        let values: Vec<f64> = rows.iter().map(|r| r.pressure_index).collect();
        Self::draw_horizontal_bars(ui, id, &labels, &values, PALETTE[3]);
    }

    fn draw_horizontal_bars(
        ui: &mut egui::Ui,
        id: &str,
        labels: &[String],
        values: &[f64],
        color: Color32,
    ) {
        if labels.is_empty() {
            ui.label(RichText::new("No data for this selection").color(Color32::GRAY));
            return;
        }

        // Rank 0 drawn at the top
        let bars: Vec<Bar> = values
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                Bar::new((labels.len() - 1 - i) as f64, value)
                    .width(0.6)
                    .fill(color.gamma_multiply(0.8))
            })
            .collect();

        let y_labels = labels.to_vec();
        Plot::new(id.to_string())
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .y_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                // y positions count up from the bottom of the ranking
                if mark.value.fract().abs() < 1e-6 && idx < y_labels.len() {
                    y_labels[y_labels.len() - 1 - idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).horizontal());
            });
    }

    /// Line chart of update counts per month, x fixed to 1-12.
    pub fn draw_month_trend(ui: &mut egui::Ui, id: &str, points: &[(i32, u32)]) {
        if points.is_empty() {
            ui.label(RichText::new("No data for this selection").color(Color32::GRAY));
            return;
        }

        let line_points: PlotPoints = points
            .iter()
            .map(|&(month, count)| [month as f64, count as f64])
            .collect();

        Plot::new(id.to_string())
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .include_x(1.0)
            .include_x(12.0)
            .include_y(0.0)
            .x_axis_label("Month")
            .y_axis_label("Updates")
            .x_axis_formatter(|mark, _range| {
                let month = mark.value.round();
                if (1.0..=12.0).contains(&month) && (mark.value - month).abs() < 1e-6 {
                    format!("{}", month as i32)
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new(line_points).color(BAR_COLOR).width(2.0));
            });
    }

    /// One month-trend line per district, palette-colored with a legend.
    pub fn draw_district_month_lines(
        ui: &mut egui::Ui,
        id: &str,
        series: &[(String, Vec<(i32, u32)>)],
    ) {
        if series.is_empty() {
            ui.label(RichText::new("No data for this selection").color(Color32::GRAY));
            return;
        }

        Plot::new(id.to_string())
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .include_x(1.0)
            .include_x(12.0)
            .include_y(0.0)
            .x_axis_label("Month")
            .y_axis_label("Updates")
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                for (i, (district, points)) in series.iter().enumerate() {
                    let line_points: PlotPoints = points
                        .iter()
                        .map(|&(month, count)| [month as f64, count as f64])
                        .collect();
                    plot_ui.line(
                        Line::new(line_points)
                            .color(PALETTE[i % PALETTE.len()])
                            .width(2.0)
                            .name(district),
                    );
                }
            });
    }

    /// High-pressure table: district, count, pressure index.
    pub fn draw_pressure_table(ui: &mut egui::Ui, rows: &[PressureRow]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id("pressure_table"))
                    .striped(true)
                    .min_col_width(90.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("District").strong().size(12.0));
                        ui.label(RichText::new("Updates").strong().size(12.0));
                        ui.label(RichText::new("Pressure Index").strong().size(12.0));
                        ui.end_row();

                        let default_text_color = ui.visuals().text_color();
                        for row in rows {
                            let text_color = if row.pressure_index > 1.0 {
                                Color32::from_rgb(220, 53, 69)
                            } else {
                                default_text_color
                            };
                            ui.label(RichText::new(&row.district).size(12.0).color(text_color));
                            ui.label(RichText::new(row.count.to_string()).size(12.0));
                            ui.label(
                                RichText::new(format!("{:.3}", row.pressure_index))
                                    .size(12.0)
                                    .color(text_color),
                            );
                            ui.end_row();
                        }
                    });
            });
    }
}
