//! Estoque IIPG Main Application
//! Main window with control panel and chart viewer.

use crate::charts::ChartRenderer;
use crate::dashboard::{DashboardData, DashboardView};
use crate::data::Period;
use crate::gui::control_panel::Selection;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::summary::Plant;
use egui::SidePanel;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;

/// PNG export result from background thread
enum ExportResult {
    Complete { dir: PathBuf, count: usize },
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    data: Arc<DashboardData>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async export
    export_rx: Option<Receiver<ExportResult>>,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, data: Arc<DashboardData>) -> Self {
        let selection = Selection {
            period: data
                .default_period()
                .unwrap_or_else(|| Period::from_date(chrono::Local::now().date_naive())),
            plant: Plant::Usa,
        };
        let mut app = Self {
            control_panel: ControlPanel::new(data.periods().to_vec(), selection),
            chart_viewer: ChartViewer::new(),
            data,
            export_rx: None,
        };

        if app.data.periods().is_empty() {
            app.control_panel.export_enabled = false;
            app.control_panel
                .set_status("Nenhum período encontrado na planilha");
        } else {
            app.refresh_view();
        }
        app
    }

    /// Rebuild every chart for the current selection.
    fn refresh_view(&mut self) {
        let Selection { period, plant } = self.control_panel.selection;
        match self.data.view(period, plant) {
            Ok(view) => {
                self.chart_viewer.set_view(view);
                self.control_panel.export_enabled = true;
                self.control_panel
                    .set_status(format!("Exibindo {} - {}", period, plant));
            }
            Err(e) => {
                tracing::warn!(%period, %plant, error = %e, "selection failed");
                self.control_panel.export_enabled = false;
                self.control_panel.set_status(format!("Erro: {}", e));
            }
        }
    }

    /// Ask for a folder and write every chart of the current view there.
    fn handle_export_png(&mut self) {
        if self.export_rx.is_some() {
            return;
        }

        let Some(view) = self.chart_viewer.view().cloned() else {
            self.control_panel.set_status("Nenhum gráfico para exportar");
            return;
        };

        let Some(dir) = rfd::FileDialog::new()
            .set_title("Pasta de destino")
            .pick_folder()
        else {
            return;
        };

        self.control_panel.export_enabled = false;
        self.control_panel.set_status("Exportando gráficos...");

        let (tx, rx) = channel();
        self.export_rx = Some(rx);

        thread::spawn(move || {
            let dir = dir.join(Self::export_folder_name(&view));
            let result = match ChartRenderer::export_view(&view, &dir) {
                Ok(paths) => ExportResult::Complete {
                    dir,
                    count: paths.len(),
                },
                Err(e) => ExportResult::Error(e.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    fn export_folder_name(view: &DashboardView) -> String {
        format!("estoque_{}_{}", view.period, view.plant.code().to_lowercase())
    }

    /// Check for export results
    fn check_export_results(&mut self) {
        let Some(rx) = self.export_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(ExportResult::Complete { dir, count }) => {
                self.control_panel.export_enabled = true;
                self.control_panel.set_status(format!(
                    "{} gráficos exportados para {}",
                    count,
                    dir.display()
                ));
                if let Err(e) = open::that(&dir) {
                    tracing::warn!(dir = %dir.display(), error = %e, "could not open export folder");
                }
            }
            Ok(ExportResult::Error(error)) => {
                tracing::error!(%error, "PNG export failed");
                self.control_panel.export_enabled = true;
                self.control_panel.set_status(format!("Erro: {}", error));
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => {
                self.export_rx = Some(rx);
            }
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.control_panel.export_enabled = true;
                self.control_panel.set_status("Erro: exportação interrompida");
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_export_results();

        if self.export_rx.is_some() {
            ctx.request_repaint();
        }

        SidePanel::left("control_panel")
            .min_width(240.0)
            .max_width(300.0)
            .show(ctx, |ui| {
                match self.control_panel.show(ui) {
                    ControlPanelAction::SelectionChanged => self.refresh_view(),
                    ControlPanelAction::ExportPng => self.handle_export_png(),
                    ControlPanelAction::None => {}
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{raw_plants, raw_primary, raw_secondary};

    #[test]
    fn export_folder_is_named_after_selection() {
        let data = DashboardData::from_raw(raw_primary(), raw_secondary(), raw_plants()).unwrap();
        let view = data
            .view(Period::new(2025, 1).unwrap(), Plant::Uss)
            .unwrap();
        assert_eq!(
            DashboardApp::export_folder_name(&view),
            "estoque_2025-01_uss"
        );
    }
}
