//! Summary module - per-period aggregates and plant projections

mod aggregator;
mod plant_view;

pub use aggregator::{AggregateError, Aggregator, MaterialSeries, ObservationMarker, OutflowTotals};
pub use plant_view::{Plant, PlantViewSelector, SelectionError, SHARED_MATERIALS};
