//! Aggregator Module
//! Per-period filtering and the derived sums behind every chart.

use crate::data::schema::{
    OutflowColumns, DATE_COL, INTERNAL_USE_COL, NOTE_COL, PERIOD_COL, PRODUCTION_COL, SALES_COL,
};
use crate::data::{Normalizer, Period};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Row {0} has no date")]
    MissingDate(usize),
}

/// Summed sales and internal use of one material.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutflowTotals {
    pub material: String,
    pub sales: f64,
    pub internal_use: f64,
}

/// Production against outflow for one period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StockBalance {
    pub production: f64,
    pub sales: f64,
    pub internal_use: f64,
    pub remaining: f64,
}

impl StockBalance {
    pub fn new(production: f64, sales: f64, internal_use: f64) -> Self {
        Self {
            production,
            sales,
            internal_use,
            remaining: production - (sales + internal_use),
        }
    }
}

/// A noted event, kept at its original date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationMarker {
    pub date: NaiveDate,
    pub note: String,
}

/// Daily values of one material.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialSeries {
    pub material: String,
    pub points: Vec<(NaiveDate, f64)>,
}

impl MaterialSeries {
    pub fn total(&self) -> f64 {
        self.points.iter().map(|(_, v)| v).sum()
    }
}

/// Computes per-period aggregates over normalized tables.
pub struct Aggregator;

impl Aggregator {
    /// Rows belonging to `period`, in their original order.
    pub fn filter_period(df: &DataFrame, period: Period) -> Result<DataFrame, AggregateError> {
        let filtered = df
            .clone()
            .lazy()
            .filter(col(PERIOD_COL).eq(lit(period.to_string())))
            .collect()?;
        Ok(filtered)
    }

    /// Plain sum of one column; zero for an empty table.
    pub fn column_total(df: &DataFrame, column: &str) -> Result<f64, AggregateError> {
        let values = df.column(column)?.cast(&DataType::Float64)?;
        Ok(values.f64()?.sum().unwrap_or(0.0))
    }

    /// Largest value across `columns`; zero for an empty table.
    pub fn column_max(df: &DataFrame, columns: &[&str]) -> Result<f64, AggregateError> {
        let mut max = 0.0_f64;
        for column in columns {
            let values = df.column(column)?.cast(&DataType::Float64)?;
            if let Some(v) = values.f64()?.max() {
                max = max.max(v);
            }
        }
        Ok(max)
    }

    /// Sales and internal-use totals for each tracked material.
    pub fn outflow_totals(
        df: &DataFrame,
        lines: &[OutflowColumns],
    ) -> Result<Vec<OutflowTotals>, AggregateError> {
        lines
            .iter()
            .map(|line| {
                Ok(OutflowTotals {
                    material: line.material.to_string(),
                    sales: Self::column_total(df, line.sales)?,
                    internal_use: Self::column_total(df, line.internal_use)?,
                })
            })
            .collect()
    }

    /// Production minus total outflow for a primary-circuit slice.
    pub fn stock_balance(df: &DataFrame) -> Result<StockBalance, AggregateError> {
        Ok(StockBalance::new(
            Self::column_total(df, PRODUCTION_COL)?,
            Self::column_total(df, SALES_COL)?,
            Self::column_total(df, INTERNAL_USE_COL)?,
        ))
    }

    /// Rows carrying a non-empty note.
    pub fn observations(df: &DataFrame) -> Result<Vec<ObservationMarker>, AggregateError> {
        let dates = Self::dates(df)?;
        let notes = df.column(NOTE_COL)?.cast(&DataType::String)?;
        let markers = dates
            .into_iter()
            .zip(notes.str()?.into_iter())
            .filter_map(|(date, note)| {
                let note = note.unwrap_or("").trim();
                (!note.is_empty() && note != "0").then(|| ObservationMarker {
                    date,
                    note: note.to_string(),
                })
            })
            .collect();
        Ok(markers)
    }

    /// Daily values for each material, in row order.
    pub fn material_series(
        df: &DataFrame,
        materials: &[&str],
    ) -> Result<Vec<MaterialSeries>, AggregateError> {
        let dates = Self::dates(df)?;
        materials
            .iter()
            .map(|material| {
                let values = df.column(material)?.cast(&DataType::Float64)?;
                let points = dates
                    .iter()
                    .zip(values.f64()?.into_iter())
                    .map(|(date, v)| (*date, v.unwrap_or(0.0)))
                    .collect();
                Ok(MaterialSeries {
                    material: material.to_string(),
                    points,
                })
            })
            .collect()
    }

    fn dates(df: &DataFrame) -> Result<Vec<NaiveDate>, AggregateError> {
        Normalizer::date_values(df.column(DATE_COL)?)?
            .into_iter()
            .enumerate()
            .map(|(row, date)| date.ok_or(AggregateError::MissingDate(row)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::{PRIMARY_SCHEMA, SECONDARY_OUTFLOWS, SECONDARY_SCHEMA};

    fn primary() -> DataFrame {
        let raw = df!(
            "Dias" => ["05/01/2025", "06/01/2025", "31/01/2025", "01/02/2025", "02/02/2025"],
            "Estoque RD" => [100.0, 95.0, 90.0, 80.0, 70.0],
            "Estoque Rachão" => [50.0, 45.0, 40.0, 35.0, 30.0],
            "Total Producao" => [Some(20.0), Some(30.0), None, Some(12.0), Some(8.0)],
            "Vendas" => [Some(10.0), Some(4.0), Some(1.5), None, Some(2.0)],
            "Obras" => [Some(5.0), None, Some(0.5), Some(3.0), Some(1.0)],
            "Obs" => [Some("0"), Some("manutenção"), None, Some("britador parado"), Some("")]
        )
        .unwrap();
        Normalizer::normalize(raw, &PRIMARY_SCHEMA).unwrap()
    }

    fn january() -> Period {
        Period::new(2025, 1).unwrap()
    }

    #[test]
    fn filter_matches_calendar_month() {
        let df = primary();
        let filtered = Aggregator::filter_period(&df, january()).unwrap();
        assert_eq!(filtered.height(), 3);

        let dates = Normalizer::date_values(df.column(DATE_COL).unwrap()).unwrap();
        let sales = df.column("Vendas").unwrap().f64().unwrap();
        let expected: f64 = dates
            .iter()
            .zip(sales.into_iter())
            .filter(|(d, _)| january().contains(d.unwrap()))
            .map(|(_, v)| v.unwrap())
            .sum();
        assert_eq!(Aggregator::column_total(&filtered, "Vendas").unwrap(), expected);
    }

    #[test]
    fn filter_preserves_row_order() {
        let filtered = Aggregator::filter_period(&primary(), january()).unwrap();
        let series = Aggregator::material_series(&filtered, &["Rocha Detonada"]).unwrap();
        let values: Vec<f64> = series[0].points.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![100.0, 95.0, 90.0]);
        assert_eq!(series[0].points[0].0, NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());
    }

    #[test]
    fn remaining_stock_identity() {
        let filtered = Aggregator::filter_period(&primary(), january()).unwrap();
        let balance = Aggregator::stock_balance(&filtered).unwrap();
        assert_eq!(balance.production, 50.0);
        assert_eq!(balance.sales, 15.5);
        assert_eq!(balance.internal_use, 5.5);
        assert_eq!(
            balance.remaining,
            balance.production - (balance.sales + balance.internal_use)
        );
        assert_eq!(balance.remaining, 29.0);
    }

    #[test]
    fn empty_period_sums_to_zero() {
        let empty = Aggregator::filter_period(&primary(), Period::new(2030, 6).unwrap()).unwrap();
        assert_eq!(empty.height(), 0);
        assert_eq!(Aggregator::stock_balance(&empty).unwrap(), StockBalance::default());
        assert!(Aggregator::observations(&empty).unwrap().is_empty());
        assert_eq!(Aggregator::column_max(&empty, &["Rachão"]).unwrap(), 0.0);
        let series = Aggregator::material_series(&empty, &["Rachão"]).unwrap();
        assert!(series[0].points.is_empty());
    }

    #[test]
    fn observation_markers_keep_their_dates() {
        let filtered = Aggregator::filter_period(&primary(), january()).unwrap();
        let markers = Aggregator::observations(&filtered).unwrap();
        assert_eq!(
            markers,
            vec![ObservationMarker {
                date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
                note: "manutenção".to_string(),
            }]
        );
    }

    #[test]
    fn single_row_with_zero_note() {
        let raw = df!(
            "Dias" => ["05/01/2025"],
            "Estoque RD" => [100.0],
            "Estoque Rachão" => [50.0],
            "Total Producao" => [20.0],
            "Vendas" => [10.0],
            "Obras" => [5.0],
            "Obs" => [0.0]
        )
        .unwrap();
        let df = Normalizer::normalize(raw, &PRIMARY_SCHEMA).unwrap();
        let filtered = Aggregator::filter_period(&df, january()).unwrap();

        assert_eq!(filtered.height(), 1);
        assert_eq!(Aggregator::column_total(&filtered, "Rocha Detonada").unwrap(), 100.0);
        assert_eq!(Aggregator::stock_balance(&filtered).unwrap().remaining, 5.0);
        assert!(Aggregator::observations(&filtered).unwrap().is_empty());
    }

    #[test]
    fn outflow_totals_per_material() {
        let raw = df!(
            "Dias" => ["05/01/2025", "06/01/2025"],
            "Estoque Mac" => [1.0, 2.0],
            "Estoque Po" => [1.0, 2.0],
            "Estoque Ped" => [1.0, 2.0],
            "Estoque B1" => [1.0, 2.0],
            "Estoque B2" => [1.0, 2.0],
            "Venda Mac" => [Some(3.0), None],
            "Obras Mac" => [1.0, 1.0],
            "Venda Po" => [2.0, 2.0],
            "Obras Po" => [0.0, 4.0],
            "Venda Ped" => [0.0, 0.0],
            "Obras Ped" => [0.0, 0.0],
            "Venda B1" => [7.0, 0.5],
            "Obras B1" => [0.0, 0.0],
            "Venda B2" => [0.0, 0.0],
            "Obras B2" => [9.0, 1.0]
        )
        .unwrap();
        let df = Normalizer::normalize(raw, &SECONDARY_SCHEMA).unwrap();
        let totals = Aggregator::outflow_totals(&df, &SECONDARY_OUTFLOWS).unwrap();

        assert_eq!(totals.len(), 5);
        assert_eq!(totals[0].material, "Macadame");
        assert_eq!((totals[0].sales, totals[0].internal_use), (3.0, 2.0));
        assert_eq!((totals[1].sales, totals[1].internal_use), (4.0, 4.0));
        assert_eq!(totals[3].sales, 7.5);
        assert_eq!(totals[4].sales + totals[4].internal_use, 10.0);
    }
}
