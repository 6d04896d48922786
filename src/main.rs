//! Estoque IIPG - Inventory & Production Dashboard
//!
//! Loads the plant's stock workbook once at startup and shows the primary,
//! secondary and asphalt/base plant charts for a selected month and plant.

mod charts;
mod config;
mod dashboard;
mod data;
mod gui;
mod server;
mod summary;

#[cfg(test)]
mod test_support;

use anyhow::Context;
use clap::Parser;
use config::{Cli, Command};
use dashboard::DashboardData;
use eframe::egui;
use gui::DashboardApp;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let source = cli.workbook_source();

    let data = DashboardData::load(&source)
        .with_context(|| format!("Failed to load workbook from {}", source.describe()))?;
    let data = Arc::new(data);

    match cli.command() {
        Command::Gui => run_gui(data),
        Command::Serve { port, host } => {
            let addr = config::bind_address(&host, port)
                .with_context(|| format!("Invalid bind host '{host}'"))?;
            let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
            runtime.block_on(server::serve(data, addr))
        }
    }
}

fn run_gui(data: Arc<DashboardData>) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("Estoque IIPG"),
        ..Default::default()
    };

    eframe::run_native(
        "Estoque IIPG",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, data)))),
    )
    .map_err(|e| anyhow::anyhow!("Dashboard window failed: {e}"))
}
