//! Data module - workbook loading and sheet normalization

mod loader;
mod normalizer;
mod period;
pub mod schema;

pub use loader::{FetchError, WorkbookSource};
pub use normalizer::{Normalizer, ParseError};
pub use period::{Period, PeriodParseError};
