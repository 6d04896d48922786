//! Charts module - Chart descriptions, interactive drawing and PNG export

pub mod palette;
mod plotter;
mod renderer;
mod spec;

pub use plotter::ChartPlotter;
pub use renderer::ChartRenderer;
pub use spec::{
    BarChart, BarSeries, Chart, LineChart, LineSeries, PieChart, PieSlice, Rgb, TableRow,
    TableSpec,
};
