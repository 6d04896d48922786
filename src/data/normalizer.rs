//! Normalizer Module
//! Cleans raw sheets: canonical column names, zero-filled quantities,
//! parsed dates and the derived reporting period.

use crate::data::loader::DATE_FORMAT;
use crate::data::period::Period;
use crate::data::schema::{SheetSchema, DATE_COL, NOTE_COL, PERIOD_COL};
use chrono::NaiveDate;
use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Sheet '{sheet}' is missing column '{column}'")]
    MissingColumn { sheet: String, column: String },
    #[error("Invalid date '{value}' in row {row} of sheet '{sheet}'")]
    InvalidDate {
        sheet: String,
        row: usize,
        value: String,
    },
    #[error("Invalid number '{value}' in column '{column}', row {row} of sheet '{sheet}'")]
    InvalidNumber {
        sheet: String,
        column: String,
        row: usize,
        value: String,
    },
}

/// Days between 0001-01-01 and the Unix epoch, as used by Polars dates.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Turns raw sheets into canonical tables.
pub struct Normalizer;

impl Normalizer {
    /// Normalize a raw sheet. Applying this to its own output is a no-op.
    pub fn normalize(raw: DataFrame, schema: &SheetSchema) -> Result<DataFrame, ParseError> {
        let sheet = schema.sheet_name;
        let mut df = raw;

        for (source, canonical) in schema.renames {
            if df.column(source).is_ok() && df.column(canonical).is_err() {
                df.rename(source, (*canonical).into())?;
            }
        }

        for required in std::iter::once(&DATE_COL).chain(schema.required.iter()) {
            if df.column(required).is_err() {
                return Err(ParseError::MissingColumn {
                    sheet: sheet.to_string(),
                    column: required.to_string(),
                });
            }
        }

        let numeric: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .filter(|name| schema.is_quantity_column(name))
            .collect();
        for name in &numeric {
            let filled = Self::zero_filled(df.column(name)?, sheet)?;
            df.with_column(filled)?;
        }

        let dates = Self::parse_dates(df.column(DATE_COL)?, sheet)?;
        let periods: Vec<String> = dates
            .iter()
            .map(|d| Period::from_date(*d).to_string())
            .collect();
        df.with_column(Column::new(DATE_COL.into(), dates))?;

        let notes = match df.column(NOTE_COL) {
            Ok(column) => Self::clean_notes(column)?,
            Err(_) => vec![String::new(); df.height()],
        };
        df.with_column(Column::new(NOTE_COL.into(), notes))?;
        df.with_column(Column::new(PERIOD_COL.into(), periods))?;

        debug!(sheet, rows = df.height(), columns = df.width(), "sheet normalized");
        Ok(df)
    }

    /// Numeric column as Float64 with every missing cell set to zero.
    fn zero_filled(column: &Column, sheet: &str) -> Result<Column, ParseError> {
        let name = column.name().clone();
        let values: Vec<f64> = match column.dtype() {
            DataType::String => column
                .str()?
                .into_iter()
                .enumerate()
                .map(|(row, value)| match value.map(str::trim) {
                    None | Some("") => Ok(0.0),
                    Some(text) => text.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
                        sheet: sheet.to_string(),
                        column: name.to_string(),
                        row,
                        value: text.to_string(),
                    }),
                })
                .collect::<Result<_, _>>()?,
            _ => {
                let cast = column.cast(&DataType::Float64)?;
                cast.f64()?
                    .into_iter()
                    .map(|v| v.filter(|x| !x.is_nan()).unwrap_or(0.0))
                    .collect()
            }
        };
        Ok(Column::new(name, values))
    }

    fn parse_dates(column: &Column, sheet: &str) -> Result<Vec<NaiveDate>, ParseError> {
        if column.dtype() == &DataType::Date {
            return Self::date_values(column)?
                .into_iter()
                .enumerate()
                .map(|(row, date)| {
                    date.ok_or_else(|| ParseError::InvalidDate {
                        sheet: sheet.to_string(),
                        row,
                        value: String::new(),
                    })
                })
                .collect();
        }

        let text = column.cast(&DataType::String)?;
        text.str()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                let value = value.unwrap_or("").trim();
                NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| ParseError::InvalidDate {
                    sheet: sheet.to_string(),
                    row,
                    value: value.to_string(),
                })
            })
            .collect()
    }

    /// Notes as text; missing, blank or zero notes become empty.
    fn clean_notes(column: &Column) -> Result<Vec<String>, ParseError> {
        let text = column.cast(&DataType::String)?;
        let notes = text
            .str()?
            .into_iter()
            .map(|value| {
                let trimmed = value.unwrap_or("").trim();
                match trimmed.parse::<f64>() {
                    Ok(v) if v == 0.0 => String::new(),
                    _ => trimmed.to_string(),
                }
            })
            .collect();
        Ok(notes)
    }

    /// Read a Date column back as chrono dates.
    pub fn date_values(column: &Column) -> Result<Vec<Option<NaiveDate>>, PolarsError> {
        let days = column.cast(&DataType::Int32)?;
        Ok(days
            .i32()?
            .into_iter()
            .map(|d| d.and_then(|d| NaiveDate::from_num_days_from_ce_opt(d + EPOCH_DAYS_FROM_CE)))
            .collect())
    }
}
