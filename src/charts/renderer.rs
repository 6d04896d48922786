//! Static Chart Renderer
//! Writes dashboard charts to PNG files with plotters.
//!
//! Every chart of a view becomes one image named after its position and
//! title, e.g. `01_estoque_2025_01.png`.

use crate::charts::palette::MARKER_COLOR;
use crate::charts::{BarChart, Chart, LineChart, PieChart, Rgb};
use crate::dashboard::DashboardView;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_WIDTH: u32 = 1200;
pub const DEFAULT_HEIGHT: u32 = 700;

const TITLE_FONT: (&str, u32) = ("sans-serif", 28);
const LABEL_FONT: (&str, u32) = ("sans-serif", 16);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to draw chart '{title}': {message}")]
    Draw { title: String, message: String },

    #[error("Failed to prepare output directory: {0}")]
    Io(#[from] std::io::Error),
}

fn to_rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

pub struct ChartRenderer;

impl ChartRenderer {
    /// Render every chart of a view into `dir`, returning the written files in display order.
    pub fn export_view(view: &DashboardView, dir: &Path) -> Result<Vec<PathBuf>, RenderError> {
        std::fs::create_dir_all(dir)?;

        let mut written = Vec::new();
        for (idx, chart) in view.all_charts().into_iter().enumerate() {
            let path = dir.join(Self::file_name(idx + 1, chart.title()));
            Self::render_png(chart, &path, DEFAULT_WIDTH, DEFAULT_HEIGHT)?;
            tracing::debug!(path = %path.display(), "chart exported");
            written.push(path);
        }

        tracing::info!(
            count = written.len(),
            dir = %dir.display(),
            period = %view.period,
            plant = %view.plant,
            "dashboard exported to PNG"
        );
        Ok(written)
    }

    pub fn render_png(chart: Chart<'_>, path: &Path, width: u32, height: u32) -> Result<(), RenderError> {
        let title = chart.title().to_string();
        let result = match chart {
            Chart::Line(c) => Self::draw_line(c, path, width, height),
            Chart::Pie(c) => Self::draw_pie(c, path, width, height),
            Chart::Bar(c) => Self::draw_bar(c, path, width, height),
        };
        result.map_err(|message| RenderError::Draw { title, message })
    }

    fn draw_line(chart: &LineChart, path: &Path, width: u32, height: u32) -> Result<(), String> {
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;

        let days = chart.days.max(1) as f64;
        let y_max = if chart.y_max > 0.0 { chart.y_max } else { 1.0 };

        let mut ctx = ChartBuilder::on(&root)
            .caption(&chart.title, TITLE_FONT)
            .margin(20)
            .set_label_area_size(LabelAreaPosition::Left, 70)
            .set_label_area_size(LabelAreaPosition::Bottom, 50)
            .build_cartesian_2d(1.0..days, 0.0..y_max)
            .map_err(|e| e.to_string())?;

        ctx.configure_mesh()
            .x_desc(chart.x_title.as_str())
            .y_desc(chart.y_title.as_str())
            .x_labels(chart.days as usize)
            .x_label_formatter(&|v| format!("{:02}", v.round() as u32))
            .y_label_formatter(&|v| format!("{:.0}", v))
            .label_style(LABEL_FONT)
            .draw()
            .map_err(|e| e.to_string())?;

        for series in &chart.series {
            let color = to_rgb(series.color);
            ctx.draw_series(LineSeries::new(
                series
                    .points
                    .iter()
                    .map(|(date, value)| (LineChart::x_of(*date), *value)),
                color.stroke_width(2),
            ))
            .map_err(|e| e.to_string())?
            .label(series.name.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 25, y)], color.stroke_width(2)));
        }

        let marker = to_rgb(MARKER_COLOR);
        for obs in &chart.markers {
            let x = LineChart::x_of(obs.date);
            ctx.draw_series(std::iter::once(Circle::new((x, 0.0), 5, marker.filled())))
                .map_err(|e| e.to_string())?;
            ctx.draw_series(std::iter::once(Text::new(
                obs.note.clone(),
                (x, y_max * 0.06),
                ("sans-serif", 14).into_font().color(&marker),
            )))
            .map_err(|e| e.to_string())?;
        }

        if !chart.series.is_empty() {
            ctx.configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .label_font(LABEL_FONT)
                .draw()
                .map_err(|e| e.to_string())?;
        }

        root.present().map_err(|e| e.to_string())
    }

    fn draw_pie(chart: &PieChart, path: &Path, width: u32, height: u32) -> Result<(), String> {
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;
        let root = root
            .titled(&chart.title, TITLE_FONT)
            .map_err(|e| e.to_string())?;

        let (w, h) = root.dim_in_pixel();
        let center = (w as i32 / 2, h as i32 / 2);
        let radius = (w.min(h) as f64) * 0.38;

        // Negative remainders cannot be drawn as a wedge
        let drawable: Vec<_> = chart.slices.iter().filter(|s| s.value > 0.0).collect();
        if drawable.is_empty() {
            root.draw(&Text::new(
                "Sem dados",
                (center.0 - 40, center.1),
                ("sans-serif", 22).into_font().color(&BLACK),
            ))
            .map_err(|e| e.to_string())?;
            return root.present().map_err(|e| e.to_string());
        }

        let sizes: Vec<f64> = drawable.iter().map(|s| s.value).collect();
        let colors: Vec<RGBColor> = drawable.iter().map(|s| to_rgb(s.color)).collect();
        let labels: Vec<String> = drawable
            .iter()
            .map(|s| format!("{} ({:.1}%)", s.label, chart.share(s)))
            .collect();

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.start_angle(-90.0);
        pie.label_style(LABEL_FONT.into_font().color(&BLACK));
        root.draw(&pie).map_err(|e| e.to_string())?;

        root.present().map_err(|e| e.to_string())
    }

    fn draw_bar(chart: &BarChart, path: &Path, width: u32, height: u32) -> Result<(), String> {
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;

        let groups = chart.categories.len().max(1);
        let y_max = (chart.max_value() * 1.1).max(1.0);
        let series_count = chart.series.len().max(1) as f64;
        let bar_width = 0.8 / series_count;

        let mut ctx = ChartBuilder::on(&root)
            .caption(&chart.title, TITLE_FONT)
            .margin(20)
            .set_label_area_size(LabelAreaPosition::Left, 70)
            .set_label_area_size(LabelAreaPosition::Bottom, 50)
            .build_cartesian_2d(-0.5..(groups as f64 - 0.5), 0.0..y_max)
            .map_err(|e| e.to_string())?;

        let categories = &chart.categories;
        let category_label = |v: &f64| {
            let idx = v.round();
            if (v - idx).abs() < 1e-6 && idx >= 0.0 {
                categories.get(idx as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        };
        ctx.configure_mesh()
            .disable_x_mesh()
            .x_labels(groups)
            .x_label_formatter(&category_label)
            .y_desc(chart.y_title.as_str())
            .y_label_formatter(&|v| format!("{:.0}", v))
            .label_style(LABEL_FONT)
            .draw()
            .map_err(|e| e.to_string())?;

        for (s_idx, series) in chart.series.iter().enumerate() {
            let color = to_rgb(series.color);
            let offset = (s_idx as f64 - (series_count - 1.0) / 2.0) * bar_width;
            ctx.draw_series(series.values.iter().enumerate().map(|(i, value)| {
                let left = i as f64 + offset - bar_width / 2.0;
                Rectangle::new([(left, 0.0), (left + bar_width * 0.95, *value)], color.filled())
            }))
            .map_err(|e| e.to_string())?
            .label(series.name.clone())
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 14, y + 6)], color.filled()));
        }

        if !chart.series.is_empty() {
            ctx.configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .label_font(LABEL_FONT)
                .draw()
                .map_err(|e| e.to_string())?;
        }

        root.present().map_err(|e| e.to_string())
    }

    /// `NN_slug.png` for the chart at 1-based `position`.
    pub fn file_name(position: usize, title: &str) -> String {
        format!("{:02}_{}.png", position, Self::slug(title))
    }

    fn slug(title: &str) -> String {
        let mut slug = String::with_capacity(title.len());
        for ch in title.chars().flat_map(char::to_lowercase) {
            let ch = match ch {
                'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
                'é' | 'è' | 'ê' | 'ë' => 'e',
                'í' | 'ì' | 'î' | 'ï' => 'i',
                'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
                'ú' | 'ù' | 'û' | 'ü' => 'u',
                'ç' => 'c',
                other => other,
            };
            if ch.is_ascii_alphanumeric() {
                slug.push(ch);
            } else if !slug.is_empty() && !slug.ends_with('_') {
                slug.push('_');
            }
        }
        while slug.ends_with('_') {
            slug.pop();
        }
        if slug.is_empty() {
            slug.push_str("grafico");
        }
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::DashboardData;
    use crate::data::Period;
    use crate::summary::Plant;
    use crate::test_support::{raw_plants, raw_primary, raw_secondary};

    fn data() -> DashboardData {
        DashboardData::from_raw(raw_primary(), raw_secondary(), raw_plants()).unwrap()
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("estoque_{name}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn assert_pngs(written: &[PathBuf]) {
        for path in written {
            let bytes = std::fs::read(path).unwrap();
            assert!(bytes.starts_with(b"\x89PNG"), "{} is not a PNG", path.display());
        }
    }

    #[test]
    fn file_names_are_ascii_and_ordered() {
        assert_eq!(
            ChartRenderer::file_name(1, "Estoque - 2025-01"),
            "01_estoque_2025_01.png"
        );
        assert_eq!(
            ChartRenderer::file_name(12, "Distribuição de CBUQ - USA"),
            "12_distribuicao_de_cbuq_usa.png"
        );
        assert_eq!(
            ChartRenderer::file_name(3, "Pó de Pedra / Brita 1"),
            "03_po_de_pedra_brita_1.png"
        );
    }

    #[test]
    fn untitled_chart_gets_placeholder_name() {
        assert_eq!(ChartRenderer::file_name(2, " - "), "02_grafico.png");
    }

    #[test]
    fn exports_one_png_per_chart() {
        let view = data().view(Period::new(2025, 1).unwrap(), Plant::Uss).unwrap();
        let dir = scratch_dir("uss_2025_01");

        let written = ChartRenderer::export_view(&view, &dir).unwrap();
        assert_eq!(written.len(), 9);
        assert_eq!(written.len(), view.all_charts().len());
        assert!(written[0].ends_with("01_estoque_2025_01.png"));
        assert_pngs(&written);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn exports_empty_period_with_placeholder_pies() {
        let view = data().view(Period::new(2024, 7).unwrap(), Plant::Usa).unwrap();
        let dir = scratch_dir("usa_2024_07");

        let written = ChartRenderer::export_view(&view, &dir).unwrap();
        assert_eq!(written.len(), 8);
        assert_pngs(&written);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
