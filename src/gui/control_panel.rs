//! Control Panel Widget
//! Left side panel with the period and plant selectors.

use crate::data::Period;
use crate::summary::Plant;
use egui::{Color32, ComboBox, RichText};

/// Current dashboard selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub period: Period,
    pub plant: Plant,
}

/// Left side control panel with selectors and export.
pub struct ControlPanel {
    pub selection: Selection,
    pub periods: Vec<Period>,
    pub status: String,
    pub export_enabled: bool,
}

impl ControlPanel {
    pub fn new(periods: Vec<Period>, selection: Selection) -> Self {
        Self {
            selection,
            periods,
            status: "Pronto".to_string(),
            export_enabled: true,
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("Estoque IIPG")
                    .size(22.0)
                    .color(Color32::from_rgb(0, 102, 153)),
            );
            ui.label(
                RichText::new("Estoque e Produção")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        ui.label(RichText::new("Seleção").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 70.0;
        let combo_width = 150.0;

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Mês:"));
            ComboBox::from_id_salt("period")
                .width(combo_width)
                .selected_text(self.selection.period.to_string())
                .show_ui(ui, |ui| {
                    for period in &self.periods {
                        if ui
                            .selectable_label(self.selection.period == *period, period.to_string())
                            .clicked()
                            && self.selection.period != *period
                        {
                            self.selection.period = *period;
                            action = ControlPanelAction::SelectionChanged;
                        }
                    }
                });
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Usina:"));
            ComboBox::from_id_salt("plant")
                .width(combo_width)
                .selected_text(self.selection.plant.code())
                .show_ui(ui, |ui| {
                    for plant in Plant::ALL {
                        if ui
                            .selectable_label(self.selection.plant == plant, plant.code())
                            .clicked()
                            && self.selection.plant != plant
                        {
                            self.selection.plant = plant;
                            action = ControlPanelAction::SelectionChanged;
                        }
                    }
                });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("Exportar PNG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportPng;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(5.0);

        let status_color = if self.status.starts_with("Erro") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    SelectionChanged,
    ExportPng,
}
