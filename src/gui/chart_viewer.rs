//! Chart Viewer Widget
//! Right side scrollable panel showing the three dashboard sections.

use crate::charts::{ChartPlotter, LineChart, PieChart};
use crate::dashboard::DashboardView;
use egui::{Color32, RichText, ScrollArea};

const SECTION_SPACING: f32 = 20.0;
const LINE_HEIGHT: f32 = 320.0;
const BAR_HEIGHT: f32 = 300.0;
const PIE_SIZE: f32 = 240.0;

/// Scrollable chart display area.
#[derive(Default)]
pub struct ChartViewer {
    view: Option<DashboardView>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_view(&mut self, view: DashboardView) {
        self.view = Some(view);
    }

    pub fn view(&self) -> Option<&DashboardView> {
        self.view.as_ref()
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        let Some(view) = &self.view else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("Sem dados").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                Self::section(ui, "Sistema Primário - Britagem", |ui| {
                    Self::line_with_pie(ui, &view.primary_stock, &view.primary_outflow);
                });

                Self::section(ui, "Sistema Secundário - Rebritagem", |ui| {
                    Self::line_with_pie(ui, &view.secondary_stock, &view.secondary_stock_share);
                    ui.add_space(10.0);
                    ui.horizontal_top(|ui| {
                        let width = (ui.available_width() * 0.6).max(300.0);
                        ui.vertical(|ui| {
                            ui.set_width(width);
                            ChartPlotter::draw_bar_chart(ui, &view.secondary_outflow, BAR_HEIGHT);
                        });
                        ui.add_space(10.0);
                        ui.vertical(|ui| {
                            ui.add_space(30.0);
                            ChartPlotter::draw_table(
                                ui,
                                &view.secondary_outflow_table,
                                "secondary_outflow",
                            );
                        });
                    });
                });

                Self::section(ui, "Produção USA e USS", |ui| {
                    ChartPlotter::draw_line_chart(ui, &view.plant_intake, LINE_HEIGHT);
                    ui.add_space(10.0);
                    ui.horizontal_wrapped(|ui| {
                        for pie in &view.plant_product_lines {
                            ui.vertical(|ui| {
                                ui.set_width(PIE_SIZE + 20.0);
                                ChartPlotter::draw_pie_chart(ui, pie, PIE_SIZE);
                            });
                            ui.add_space(10.0);
                        }
                    });
                });
            });
    }

    /// Line chart on the left, its pie on the right.
    fn line_with_pie(ui: &mut egui::Ui, line: &LineChart, pie: &PieChart) {
        ui.horizontal_top(|ui| {
            let width = (ui.available_width() - PIE_SIZE - 40.0).max(300.0);
            ui.vertical(|ui| {
                ui.set_width(width);
                ChartPlotter::draw_line_chart(ui, line, LINE_HEIGHT);
            });
            ui.add_space(10.0);
            ui.vertical(|ui| {
                ChartPlotter::draw_pie_chart(ui, pie, PIE_SIZE);
            });
        });
    }

    fn section(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, Color32::from_gray(120)))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(title).size(18.0).strong());
                ui.add_space(8.0);
                add_contents(ui);
            });
        ui.add_space(SECTION_SPACING);
    }
}
