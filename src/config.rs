//! Command line and environment configuration.

use crate::data::WorkbookSource;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_SOURCE_URL: &str =
    "https://github.com/JacoLucas/EstoqueIIPG/raw/main/Long_Estoque%20IIPG.xlsx";
pub const DEFAULT_PORT: u16 = 8050;

#[derive(Parser, Debug)]
#[command(name = "estoque_iipg")]
#[command(about = "Inventory & Production Dashboard for the IIPG aggregates plant")]
pub struct Cli {
    /// Workbook URL, fetched once at startup
    #[arg(long, env = "ESTOQUE_SOURCE_URL", default_value = DEFAULT_SOURCE_URL)]
    pub source_url: String,

    /// Read a local workbook instead of downloading
    #[arg(long, env = "ESTOQUE_WORKBOOK")]
    pub workbook: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Desktop dashboard (default)
    Gui,
    /// JSON API over HTTP
    Serve {
        #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,

        #[arg(long, default_value = "0.0.0.0")]
        host: String,
    },
}

impl Cli {
    /// A local workbook wins over the URL.
    pub fn workbook_source(&self) -> WorkbookSource {
        match &self.workbook {
            Some(path) => WorkbookSource::Local(path.clone()),
            None => WorkbookSource::Remote(self.source_url.clone()),
        }
    }

    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Gui)
    }
}

/// Bind address for `serve`; hostnames other than IP literals are rejected.
pub fn bind_address(host: &str, port: u16) -> Result<SocketAddr, std::net::AddrParseError> {
    let ip: std::net::IpAddr = host.parse()?;
    Ok(SocketAddr::new(ip, port))
}
