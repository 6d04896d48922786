//! Dashboard Module
//! Owns the startup tables and rebuilds every chart for a selection.

use crate::charts::palette;
use crate::charts::{
    BarChart, BarSeries, Chart, LineChart, LineSeries, PieChart, PieSlice, Rgb, TableRow,
    TableSpec,
};
use crate::data::schema::{
    SheetKind, PERIOD_COL, PRIMARY_MATERIALS, SECONDARY_MATERIALS, SECONDARY_OUTFLOWS,
};
use crate::data::{FetchError, Normalizer, ParseError, Period, WorkbookSource};
use crate::summary::{
    AggregateError, Aggregator, MaterialSeries, ObservationMarker, OutflowTotals, Plant,
    PlantViewSelector, SelectionError, SHARED_MATERIALS,
};
use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

/// Headroom added above the tallest series.
const Y_HEADROOM: f64 = 5.0;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

impl DashboardError {
    /// Errors caused by the user's selection rather than by the data.
    pub fn is_selection(&self) -> bool {
        matches!(self, DashboardError::Selection(e) if e.is_user_error())
    }
}

/// The three normalized sheets. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct DashboardData {
    primary: DataFrame,
    secondary: DataFrame,
    plants: DataFrame,
    periods: Vec<Period>,
}

impl DashboardData {
    /// Load and normalize all sheets. Any failure aborts the whole load.
    pub fn load(source: &WorkbookSource) -> Result<Self, DashboardError> {
        info!(source = %source.describe(), "loading workbook");
        let load_sheet = |kind: SheetKind| -> Result<DataFrame, DashboardError> {
            let schema = kind.schema();
            let raw = source.load_sheet(schema.sheet_name)?;
            Ok(Normalizer::normalize(raw, schema)?)
        };
        let (primary, (secondary, plants)) = rayon::join(
            || load_sheet(SheetKind::Primary),
            || {
                rayon::join(
                    || load_sheet(SheetKind::Secondary),
                    || load_sheet(SheetKind::Plants),
                )
            },
        );
        let data = Self::from_normalized(primary?, secondary?, plants?)?;
        info!(periods = data.periods.len(), "workbook ready");
        Ok(data)
    }

    /// Build from raw sheets, normalizing each one.
    #[cfg(test)]
    pub fn from_raw(
        primary: DataFrame,
        secondary: DataFrame,
        plants: DataFrame,
    ) -> Result<Self, DashboardError> {
        Self::from_normalized(
            Normalizer::normalize(primary, SheetKind::Primary.schema())?,
            Normalizer::normalize(secondary, SheetKind::Secondary.schema())?,
            Normalizer::normalize(plants, SheetKind::Plants.schema())?,
        )
    }

    fn from_normalized(
        primary: DataFrame,
        secondary: DataFrame,
        plants: DataFrame,
    ) -> Result<Self, DashboardError> {
        let periods = Self::distinct_periods(&primary)?;
        Ok(Self {
            primary,
            secondary,
            plants,
            periods,
        })
    }

    /// Distinct periods in order of first appearance.
    fn distinct_periods(df: &DataFrame) -> Result<Vec<Period>, DashboardError> {
        let mut periods: Vec<Period> = Vec::new();
        let column = df.column(PERIOD_COL).map_err(AggregateError::from)?;
        for value in column.str().map_err(AggregateError::from)?.into_iter().flatten() {
            let period = value.parse::<Period>().map_err(SelectionError::from)?;
            if !periods.contains(&period) {
                periods.push(period);
            }
        }
        Ok(periods)
    }

    /// Selectable periods; the first one is the default selection.
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn default_period(&self) -> Option<Period> {
        self.periods.first().copied()
    }

    /// Parse UI identifiers and rebuild the view.
    pub fn view_for(&self, period: &str, plant: &str) -> Result<DashboardView, DashboardError> {
        let period = period.parse::<Period>().map_err(SelectionError::from)?;
        let plant = PlantViewSelector::parse(plant)?;
        self.view(period, plant)
    }

    /// One full recomputation for the selected period and plant.
    pub fn view(&self, period: Period, plant: Plant) -> Result<DashboardView, DashboardError> {
        debug!(%period, %plant, "recomputing dashboard");

        // Primary circuit
        let primary = Aggregator::filter_period(&self.primary, period)?;
        let primary_series = Aggregator::material_series(&primary, &PRIMARY_MATERIALS)?;
        let primary_stock = line_chart(
            format!("Estoque - {period}"),
            "Estoque (ton.)",
            period,
            primary_series,
            Aggregator::observations(&primary)?,
            Aggregator::column_max(&primary, &PRIMARY_MATERIALS)?,
        );
        let balance = Aggregator::stock_balance(&primary)?;
        let primary_outflow = PieChart {
            title: format!("Distribuição de Saída de Materiais - {period}"),
            slices: vec![
                slice("Vendas", balance.sales, palette::PIE_SALES),
                slice("Obras", balance.internal_use, palette::PIE_INTERNAL_USE),
                slice("Estoque", balance.remaining, palette::PIE_REMAINING),
            ],
        };

        // Secondary circuit
        let secondary = Aggregator::filter_period(&self.secondary, period)?;
        let secondary_series = Aggregator::material_series(&secondary, &SECONDARY_MATERIALS)?;
        let secondary_stock_share = PieChart {
            title: format!("Distribuição de Materiais no Estoque - {period}"),
            slices: secondary_series
                .iter()
                .map(|s| slice(&s.material, s.total(), palette::material_color(&s.material)))
                .collect(),
        };
        let secondary_stock = line_chart(
            format!("Estoque de Materiais - {period}"),
            "Estoque (ton.)",
            period,
            secondary_series,
            Aggregator::observations(&secondary)?,
            Aggregator::column_max(&secondary, &SECONDARY_MATERIALS)?,
        );
        let outflows = Aggregator::outflow_totals(&secondary, &SECONDARY_OUTFLOWS)?;
        let secondary_outflow = outflow_bars(format!("Saídas Totais de Materiais - {period}"), &outflows);
        let secondary_outflow_table = outflow_table(&outflows);

        // Plants
        let view = PlantViewSelector::select(&self.plants, plant)?;
        let plant_rows = Aggregator::filter_period(&view.frame, period)?;
        let plant_intake = line_chart(
            format!("Entrada de Materiais {plant} - {period}"),
            "Quantidade (ton.)",
            period,
            Aggregator::material_series(&plant_rows, view.materials())?,
            Aggregator::observations(&plant_rows)?,
            Aggregator::column_max(&plant_rows, &SHARED_MATERIALS)?,
        );
        let plant_product_lines = Aggregator::outflow_totals(&plant_rows, view.product_lines())?
            .into_iter()
            .map(|line| PieChart {
                title: format!("Distribuição de {} - {plant}", line.material),
                slices: vec![
                    slice("Vendas", line.sales, palette::SALES),
                    slice("Consumo", line.internal_use, palette::INTERNAL_USE),
                ],
            })
            .collect();

        Ok(DashboardView {
            period,
            plant,
            primary_stock,
            primary_outflow,
            secondary_stock,
            secondary_stock_share,
            secondary_outflow,
            secondary_outflow_table,
            plant_intake,
            plant_product_lines,
        })
    }
}

/// Everything the front ends draw for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub period: Period,
    pub plant: Plant,
    pub primary_stock: LineChart,
    pub primary_outflow: PieChart,
    pub secondary_stock: LineChart,
    pub secondary_stock_share: PieChart,
    pub secondary_outflow: BarChart,
    pub secondary_outflow_table: TableSpec,
    pub plant_intake: LineChart,
    pub plant_product_lines: Vec<PieChart>,
}

impl DashboardView {
    /// The six fixed charts, in page order.
    pub fn charts(&self) -> [Chart<'_>; 6] {
        [
            Chart::Line(&self.primary_stock),
            Chart::Pie(&self.primary_outflow),
            Chart::Line(&self.secondary_stock),
            Chart::Pie(&self.secondary_stock_share),
            Chart::Bar(&self.secondary_outflow),
            Chart::Line(&self.plant_intake),
        ]
    }

    /// Fixed charts followed by the plant's product-line pies.
    pub fn all_charts(&self) -> Vec<Chart<'_>> {
        let mut charts = self.charts().to_vec();
        charts.extend(self.plant_product_lines.iter().map(Chart::Pie));
        charts
    }
}

fn slice(label: &str, value: f64, color: Rgb) -> PieSlice {
    PieSlice {
        label: label.to_string(),
        value,
        color,
    }
}

fn line_chart(
    title: String,
    y_title: &str,
    period: Period,
    series: Vec<MaterialSeries>,
    markers: Vec<ObservationMarker>,
    max: f64,
) -> LineChart {
    LineChart {
        title,
        x_title: period.to_string(),
        y_title: y_title.to_string(),
        series: series
            .into_iter()
            .map(|s| LineSeries {
                color: palette::material_color(&s.material),
                name: s.material,
                points: s.points,
            })
            .collect(),
        markers,
        y_max: max + Y_HEADROOM,
        days: period.days(),
    }
}

fn outflow_bars(title: String, outflows: &[OutflowTotals]) -> BarChart {
    BarChart {
        title,
        y_title: "Quantidade (ton.)".to_string(),
        categories: outflows.iter().map(|o| o.material.clone()).collect(),
        series: vec![
            BarSeries {
                name: "Vendas".to_string(),
                color: palette::SALES,
                values: outflows.iter().map(|o| o.sales).collect(),
            },
            BarSeries {
                name: "Obras".to_string(),
                color: palette::INTERNAL_USE,
                values: outflows.iter().map(|o| o.internal_use).collect(),
            },
        ],
    }
}

fn outflow_table(outflows: &[OutflowTotals]) -> TableSpec {
    TableSpec {
        headers: vec![
            "Material".to_string(),
            "Vendas (ton.)".to_string(),
            "Obras (ton.)".to_string(),
        ],
        rows: outflows
            .iter()
            .map(|o| TableRow {
                label: o.material.clone(),
                values: vec![o.sales, o.internal_use],
            })
            .collect(),
    }
}
