//! Plant View Module
//! Projects the combined USA & USS table onto a single plant.

use crate::data::schema::OutflowColumns;
use crate::data::PeriodParseError;
use polars::prelude::*;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("Unknown plant '{0}', expected USA or USS")]
    UnknownPlant(String),
    #[error("Plant {plant} is missing columns: {}", missing.join(", "))]
    MissingColumnGroup { plant: Plant, missing: Vec<String> },
    #[error("Plant {plant} column '{source_column}' clashes with existing column '{column}'")]
    ConflictingColumn {
        plant: Plant,
        source_column: String,
        column: String,
    },
    #[error("{0}")]
    InvalidPeriod(String),
    #[error("Failed to project plant table: {0}")]
    Frame(#[from] PolarsError),
}

impl SelectionError {
    /// Whether the request itself was at fault, as opposed to a table failure.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, SelectionError::Frame(_))
    }
}

impl From<PeriodParseError> for SelectionError {
    fn from(err: PeriodParseError) -> Self {
        SelectionError::InvalidPeriod(err.to_string())
    }
}

/// The two production units of the combined table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Plant {
    /// Asphalt plant.
    #[serde(rename = "USA")]
    Usa,
    /// Soil plant.
    #[serde(rename = "USS")]
    Uss,
}

impl Plant {
    pub const ALL: [Plant; 2] = [Plant::Usa, Plant::Uss];

    pub fn code(self) -> &'static str {
        match self {
            Plant::Usa => "USA",
            Plant::Uss => "USS",
        }
    }

    pub fn profile(self) -> &'static PlantProfile {
        match self {
            Plant::Usa => &USA_PROFILE,
            Plant::Uss => &USS_PROFILE,
        }
    }

    pub fn other(self) -> Plant {
        match self {
            Plant::Usa => Plant::Uss,
            Plant::Uss => Plant::Usa,
        }
    }
}

impl fmt::Display for Plant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Plant {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Plant::ALL
            .into_iter()
            .find(|plant| plant.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SelectionError::UnknownPlant(s.to_string()))
    }
}

/// Everything that differs between the two plants.
#[derive(Debug)]
pub struct PlantProfile {
    /// Columns of the combined table that belong to this plant.
    pub owned_columns: &'static [&'static str],
    /// Plant-specific names mapped onto shared material names.
    pub renames: &'static [(&'static str, &'static str)],
    /// Intake materials in chart order, after renaming.
    pub materials: &'static [&'static str],
    /// Product lines with their sales / internal-use columns.
    pub product_lines: &'static [OutflowColumns],
}

pub static USA_PROFILE: PlantProfile = PlantProfile {
    owned_columns: &[
        "Cimento Asfáltico",
        "USA B2",
        "USA B1",
        "USA Pedrisco",
        "USA Pó de Pedra",
        "Enchimento",
        "CBUQ",
        "Vendas CBUQ",
        "Obras CBUQ",
        "Binder",
        "Vendas Binder",
        "Obras Binder",
    ],
    renames: &[
        ("USA B2", "Brita 2"),
        ("USA B1", "Brita 1"),
        ("USA Pedrisco", "Pedrisco"),
        ("USA Pó de Pedra", "Pó de Pedra"),
    ],
    materials: &[
        "Cimento Asfáltico",
        "Brita 2",
        "Brita 1",
        "Pedrisco",
        "Pó de Pedra",
        "Enchimento",
    ],
    product_lines: &[
        OutflowColumns {
            material: "CBUQ",
            sales: "Vendas CBUQ",
            internal_use: "Obras CBUQ",
        },
        OutflowColumns {
            material: "Binder",
            sales: "Vendas Binder",
            internal_use: "Obras Binder",
        },
    ],
};

pub static USS_PROFILE: PlantProfile = PlantProfile {
    owned_columns: &[
        "BGS",
        "Vendas BGS",
        "Obras BGS",
        "BGMC",
        "Vendas BGMC",
        "Obras BGMC",
        "BGTC",
        "Vendas BGTC",
        "Obras BGTC",
        "USS Cimento",
        "USS B2",
        "USS B1",
        "USS Pedrisco",
        "USS Pó de Pedra",
    ],
    renames: &[
        ("USS B2", "Brita 2"),
        ("USS B1", "Brita 1"),
        ("USS Pedrisco", "Pedrisco"),
        ("USS Pó de Pedra", "Pó de Pedra"),
        ("USS Cimento", "Cimento"),
    ],
    materials: &["Brita 2", "Brita 1", "Pedrisco", "Pó de Pedra", "Cimento"],
    product_lines: &[
        OutflowColumns {
            material: "BGS",
            sales: "Vendas BGS",
            internal_use: "Obras BGS",
        },
        OutflowColumns {
            material: "BGMC",
            sales: "Vendas BGMC",
            internal_use: "Obras BGMC",
        },
        OutflowColumns {
            material: "BGTC",
            sales: "Vendas BGTC",
            internal_use: "Obras BGTC",
        },
    ],
};

/// Aggregate materials produced by both plants; they bound the intake chart.
pub const SHARED_MATERIALS: [&str; 4] = ["Pó de Pedra", "Pedrisco", "Brita 1", "Brita 2"];

/// One plant's projection of the combined table.
#[derive(Debug, Clone)]
pub struct PlantView {
    pub profile: &'static PlantProfile,
    pub frame: DataFrame,
}

impl PlantView {
    pub fn materials(&self) -> &'static [&'static str] {
        self.profile.materials
    }

    pub fn product_lines(&self) -> &'static [OutflowColumns] {
        self.profile.product_lines
    }
}

/// Builds per-plant projections.
pub struct PlantViewSelector;

impl PlantViewSelector {
    /// Parse a plant identifier coming from the UI.
    pub fn parse(identifier: &str) -> Result<Plant, SelectionError> {
        identifier.parse()
    }

    /// Drop the other plant's columns and rename this plant's ones.
    pub fn select(plants: &DataFrame, plant: Plant) -> Result<PlantView, SelectionError> {
        let profile = plant.profile();

        let missing: Vec<String> = profile
            .owned_columns
            .iter()
            .filter(|name| plants.column(name).is_err())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(SelectionError::MissingColumnGroup { plant, missing });
        }

        let foreign = plant.other().profile().owned_columns;
        let keep: Vec<PlSmallStr> = plants
            .get_column_names()
            .into_iter()
            .filter(|name| !foreign.contains(&name.as_str()))
            .cloned()
            .collect();
        let mut frame = plants.select(keep)?;

        for (source, canonical) in profile.renames {
            if frame.column(canonical).is_ok() {
                return Err(SelectionError::ConflictingColumn {
                    plant,
                    source_column: source.to_string(),
                    column: canonical.to_string(),
                });
            }
            frame.rename(source, (*canonical).into())?;
        }

        debug!(plant = %plant, columns = frame.width(), "plant view selected");
        Ok(PlantView { profile, frame })
    }
}
