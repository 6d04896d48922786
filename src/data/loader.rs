//! Workbook Loader Module
//! Downloads the inventory workbook and decodes one sheet into a raw Polars DataFrame.

use crate::data::schema::DATE_COL;
use calamine::{open_workbook, open_workbook_from_rs, Data, Range, Reader, Xlsx, XlsxError};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::collections::HashSet;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Textual date format the normalizer expects.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to download workbook: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Workbook download from {url} failed with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("Failed to open workbook: {0}")]
    Workbook(#[from] XlsxError),
    #[error("Sheet '{0}' not found in workbook")]
    MissingSheet(String),
    #[error("Sheet '{0}' has no header row")]
    EmptySheet(String),
    #[error("Failed to build table: {0}")]
    Frame(#[from] PolarsError),
}

/// Where the workbook comes from.
#[derive(Debug, Clone)]
pub enum WorkbookSource {
    Remote(String),
    Local(PathBuf),
}

impl WorkbookSource {
    /// Load one sheet. A remote source costs one round-trip per call.
    pub fn load_sheet(&self, sheet: &str) -> Result<DataFrame, FetchError> {
        match self {
            WorkbookSource::Remote(url) => DataLoader::fetch_sheet(url, sheet),
            WorkbookSource::Local(path) => DataLoader::read_sheet(path, sheet),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            WorkbookSource::Remote(url) => url.clone(),
            WorkbookSource::Local(path) => path.display().to_string(),
        }
    }
}

/// One decoded cell.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

/// Decodes xlsx sheets into DataFrames.
pub struct DataLoader;

impl DataLoader {
    /// Download the workbook at `url` and decode `sheet`. Single attempt, no retry.
    pub fn fetch_sheet(url: &str, sheet: &str) -> Result<DataFrame, FetchError> {
        info!(url, sheet, "downloading workbook sheet");
        let response = reqwest::blocking::get(url)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        let bytes = response.bytes()?;
        debug!(sheet, size = bytes.len(), "workbook downloaded");
        Self::decode_sheet(Cursor::new(bytes), sheet)
    }

    /// Decode `sheet` from a workbook file on disk.
    pub fn read_sheet(path: &Path, sheet: &str) -> Result<DataFrame, FetchError> {
        info!(path = %path.display(), sheet, "reading workbook sheet");
        let mut workbook: Xlsx<_> = open_workbook(path)?;
        Self::sheet_from_workbook(&mut workbook, sheet)
    }

    /// Decode `sheet` from any seekable xlsx stream.
    pub fn decode_sheet<RS: Read + Seek>(reader: RS, sheet: &str) -> Result<DataFrame, FetchError> {
        let mut workbook: Xlsx<RS> = open_workbook_from_rs(reader)?;
        Self::sheet_from_workbook(&mut workbook, sheet)
    }

    fn sheet_from_workbook<RS: Read + Seek>(
        workbook: &mut Xlsx<RS>,
        sheet: &str,
    ) -> Result<DataFrame, FetchError> {
        if !workbook.sheet_names().iter().any(|name| name == sheet) {
            return Err(FetchError::MissingSheet(sheet.to_string()));
        }
        let range = workbook.worksheet_range(sheet)?;
        Self::range_to_dataframe(&range, sheet)
    }

    /// Convert a worksheet range into a raw table.
    ///
    /// The first row holds the headers. A column whose non-empty cells are all
    /// numeric becomes nullable Float64, anything else nullable String. Date
    /// cells are rendered with [`DATE_FORMAT`].
    pub fn range_to_dataframe(range: &Range<Data>, sheet: &str) -> Result<DataFrame, FetchError> {
        let mut rows = range.rows();
        let header = rows
            .next()
            .ok_or_else(|| FetchError::EmptySheet(sheet.to_string()))?;

        // Keep (position, name) of usable headers
        let mut seen: HashSet<String> = HashSet::new();
        let mut headers: Vec<(usize, String)> = Vec::new();
        for (idx, cell) in header.iter().enumerate() {
            let name = cell.to_string().trim().to_string();
            if name.is_empty() {
                continue;
            }
            if !seen.insert(name.clone()) {
                warn!(sheet, column = %name, "duplicate header ignored");
                continue;
            }
            headers.push((idx, name));
        }
        if headers.is_empty() {
            return Err(FetchError::EmptySheet(sheet.to_string()));
        }

        let body: Vec<&[Data]> = rows
            .filter(|row| row.iter().any(|c| !matches!(Self::decode_cell(c), Cell::Empty)))
            .collect();

        let columns = headers
            .iter()
            .map(|(idx, name)| {
                let is_date = name == DATE_COL;
                let cells: Vec<Cell> = body
                    .iter()
                    .map(|row| {
                        let cell = row.get(*idx).map(Self::decode_cell).unwrap_or(Cell::Empty);
                        match cell {
                            Cell::Number(serial) if is_date => Self::serial_to_text(serial),
                            other => other,
                        }
                    })
                    .collect();
                Self::build_column(name, cells)
            })
            .collect::<Vec<_>>();

        let df = DataFrame::new(columns)?;
        debug!(sheet, rows = df.height(), columns = df.width(), "sheet decoded");
        Ok(df)
    }

    fn decode_cell(cell: &Data) -> Cell {
        match cell {
            Data::Empty => Cell::Empty,
            Data::Float(v) => Cell::Number(*v),
            Data::Int(v) => Cell::Number(*v as f64),
            Data::Bool(v) => Cell::Number(if *v { 1.0 } else { 0.0 }),
            Data::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(trimmed.to_string())
                }
            }
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(value) => Cell::Text(value.format(DATE_FORMAT).to_string()),
                None => Self::serial_to_text(dt.as_f64()),
            },
            Data::DateTimeIso(s) => Cell::Text(Self::iso_to_text(s)),
            Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Error(_) => Cell::Empty,
        }
    }

    /// Excel serial day number (1900 date system) to text.
    fn serial_to_text(serial: f64) -> Cell {
        let date = NaiveDate::from_ymd_opt(1899, 12, 30)
            .and_then(|base| base.checked_add_signed(Duration::days(serial.floor() as i64)));
        match date {
            Some(date) => Cell::Text(date.format(DATE_FORMAT).to_string()),
            None => Cell::Text(Self::format_number(serial)),
        }
    }

    fn iso_to_text(value: &str) -> String {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
            .map(|dt| dt.date())
            .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
            .map(|date| date.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|_| value.to_string())
    }

    fn format_number(v: f64) -> String {
        if v.fract() == 0.0 && v.abs() < 1e15 {
            format!("{}", v as i64)
        } else {
            v.to_string()
        }
    }

    fn build_column(name: &str, cells: Vec<Cell>) -> Column {
        let all_numeric = cells
            .iter()
            .all(|c| matches!(c, Cell::Empty | Cell::Number(_)));

        if all_numeric {
            let values: Vec<Option<f64>> = cells
                .into_iter()
                .map(|c| match c {
                    Cell::Number(v) => Some(v),
                    _ => None,
                })
                .collect();
            Column::new(name.into(), values)
        } else {
            let values: Vec<Option<String>> = cells
                .into_iter()
                .map(|c| match c {
                    Cell::Empty => None,
                    Cell::Number(v) => Some(Self::format_number(v)),
                    Cell::Text(s) => Some(s),
                })
                .collect();
            Column::new(name.into(), values)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_range() -> Range<Data> {
        let mut range = Range::new((0, 0), (3, 4));
        range.set_value((0, 0), Data::String("Dias".into()));
        range.set_value((0, 1), Data::String(" Estoque RD ".into()));
        range.set_value((0, 2), Data::String("Obs".into()));
        range.set_value((0, 3), Data::Empty);
        range.set_value((0, 4), Data::String("Estoque RD".into()));

        range.set_value((1, 0), Data::Float(45662.0));
        range.set_value((1, 1), Data::Float(100.0));
        range.set_value((1, 2), Data::Int(0));
        range.set_value((1, 4), Data::Float(1.0));

        range.set_value((2, 0), Data::DateTimeIso("2025-01-06T00:00:00".into()));
        range.set_value((2, 2), Data::String("manutenção".into()));

        range.set_value((3, 0), Data::String("07/01/2025".into()));
        range.set_value((3, 1), Data::Int(80));
        range
    }

    #[test]
    fn decodes_headers_and_types() {
        let df = DataLoader::range_to_dataframe(&sample_range(), "PRIMARIO").unwrap();
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, vec!["Dias", "Estoque RD", "Obs"]);
        assert_eq!(df.height(), 3);
        assert_eq!(df.column("Estoque RD").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("Obs").unwrap().dtype(), &DataType::String);

        let stock: Vec<Option<f64>> = df
            .column("Estoque RD")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(stock, vec![Some(100.0), None, Some(80.0)]);
    }

    #[test]
    fn renders_date_cells_as_day_month_year() {
        let df = DataLoader::range_to_dataframe(&sample_range(), "PRIMARIO").unwrap();
        let dates: Vec<Option<&str>> = df.column("Dias").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(
            dates,
            vec![Some("05/01/2025"), Some("06/01/2025"), Some("07/01/2025")]
        );

        let notes: Vec<Option<&str>> = df.column("Obs").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(notes, vec![Some("0"), Some("manutenção"), None]);
    }

    #[test]
    fn skips_blank_rows() {
        let mut range = Range::new((0, 0), (3, 1));
        range.set_value((0, 0), Data::String("Dias".into()));
        range.set_value((0, 1), Data::String("Vendas".into()));
        range.set_value((1, 0), Data::String("01/02/2025".into()));
        range.set_value((1, 1), Data::Float(3.5));
        range.set_value((2, 0), Data::String("   ".into()));

        let df = DataLoader::range_to_dataframe(&range, "PRIMARIO").unwrap();
        assert_eq!(df.height(), 1);
    }

    #[test]
    fn empty_sheet_is_an_error() {
        let range: Range<Data> = Range::empty();
        let err = DataLoader::range_to_dataframe(&range, "SECUNDARIO").unwrap_err();
        assert!(matches!(err, FetchError::EmptySheet(ref s) if s == "SECUNDARIO"));
    }

    #[test]
    fn local_missing_file_fails() {
        let source = WorkbookSource::Local(PathBuf::from("/nonexistent/estoque.xlsx"));
        assert!(source.load_sheet("PRIMARIO").is_err());
    }
}
