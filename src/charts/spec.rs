//! Chart Specification Module
//! Renderer-independent description of every chart on the dashboard.

use crate::summary::ObservationMarker;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// sRGB color, serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub color: Rgb,
    pub points: Vec<(NaiveDate, f64)>,
}

/// Daily values over one period, with observation markers drawn on y = 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub series: Vec<LineSeries>,
    pub markers: Vec<ObservationMarker>,
    /// Upper bound of the y axis; the lower bound is always zero.
    pub y_max: f64,
    /// Days in the period, for the x axis.
    pub days: u32,
}

impl LineChart {
    /// X coordinate of a date: its day of month.
    pub fn x_of(date: NaiveDate) -> f64 {
        date.day() as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    /// Sum of the drawable (positive) slices.
    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value.max(0.0)).sum()
    }

    /// Share of one slice in percent; zero when nothing is drawable.
    pub fn share(&self, slice: &PieSlice) -> f64 {
        let total = self.total();
        if total > 0.0 {
            slice.value.max(0.0) / total * 100.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub name: String,
    pub color: Rgb,
    pub values: Vec<f64>,
}

/// Grouped bars: one group per category, one bar per series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub y_title: String,
    pub categories: Vec<String>,
    pub series: Vec<BarSeries>,
}

impl BarChart {
    pub fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub label: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSpec {
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

/// Borrowed view over any chart kind.
#[derive(Debug, Clone, Copy)]
pub enum Chart<'a> {
    Line(&'a LineChart),
    Pie(&'a PieChart),
    Bar(&'a BarChart),
}

impl Chart<'_> {
    pub fn title(&self) -> &str {
        match self {
            Chart::Line(c) => &c.title,
            Chart::Pie(c) => &c.title,
            Chart::Bar(c) => &c.title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_serialize_as_hex() {
        let json = serde_json::to_string(&Rgb(0, 0x66, 0x99)).unwrap();
        assert_eq!(json, "\"#006699\"");
    }

    #[test]
    fn pie_share_ignores_negative_slices() {
        let pie = PieChart {
            title: "t".into(),
            slices: vec![
                PieSlice {
                    label: "Vendas".into(),
                    value: 30.0,
                    color: Rgb(0, 0, 0),
                },
                PieSlice {
                    label: "Obras".into(),
                    value: 10.0,
                    color: Rgb(0, 0, 0),
                },
                PieSlice {
                    label: "Estoque".into(),
                    value: -5.0,
                    color: Rgb(0, 0, 0),
                },
            ],
        };
        assert_eq!(pie.total(), 40.0);
        assert_eq!(pie.share(&pie.slices[0]), 75.0);
        assert_eq!(pie.share(&pie.slices[2]), 0.0);
    }

    #[test]
    fn empty_pie_has_no_share() {
        let pie = PieChart {
            title: "t".into(),
            slices: vec![PieSlice {
                label: "Vendas".into(),
                value: 0.0,
                color: Rgb(0, 0, 0),
            }],
        };
        assert_eq!(pie.share(&pie.slices[0]), 0.0);
    }
}
