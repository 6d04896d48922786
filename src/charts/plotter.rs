//! Chart Plotter Module
//! Draws chart descriptions interactively using egui_plot.

use crate::charts::palette::MARKER_COLOR;
use crate::charts::{BarChart, LineChart, PieChart, Rgb, TableSpec};
use egui::{Color32, Pos2, RichText, Stroke};
use egui_plot::{Bar, BarChart as PlotBarChart, Legend, Line, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Text};
use std::f32::consts::TAU;

/// Largest arc drawn as one triangle of a pie wedge (radians).
const PIE_ARC_STEP: f32 = 0.05;

pub fn to_color32(color: Rgb) -> Color32 {
    Color32::from_rgb(color.0, color.1, color.2)
}

/// Creates dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Line chart with one line per material and red observation markers on y = 0.
    pub fn draw_line_chart(ui: &mut egui::Ui, chart: &LineChart, height: f32) {
        ui.label(RichText::new(&chart.title).size(15.0).strong());

        Plot::new(format!("line_{}", chart.title))
            .height(height)
            .legend(Legend::default())
            .x_axis_label(chart.x_title.clone())
            .y_axis_label(chart.y_title.clone())
            .allow_scroll(false)
            .include_x(1.0)
            .include_x(chart.days as f64)
            .include_y(0.0)
            .include_y(chart.y_max)
            .x_axis_formatter(|mark, _range| {
                let day = mark.value;
                if day >= 1.0 && day.fract() == 0.0 {
                    format!("{:02}", day as u32)
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for series in &chart.series {
                    let points: PlotPoints = series
                        .points
                        .iter()
                        .map(|(date, value)| [LineChart::x_of(*date), *value])
                        .collect();
                    plot_ui.line(
                        Line::new(points)
                            .color(to_color32(series.color))
                            .width(2.0)
                            .name(&series.name),
                    );
                }

                if !chart.markers.is_empty() {
                    let points: PlotPoints = chart
                        .markers
                        .iter()
                        .map(|m| [LineChart::x_of(m.date), 0.0])
                        .collect();
                    plot_ui.points(
                        Points::new(points)
                            .shape(MarkerShape::Circle)
                            .radius(5.0)
                            .color(to_color32(MARKER_COLOR))
                            .name("Observação"),
                    );
                    for marker in &chart.markers {
                        plot_ui.text(
                            Text::new(
                                PlotPoint::new(LineChart::x_of(marker.date), chart.y_max * 0.06),
                                RichText::new(&marker.note).size(11.0),
                            )
                            .color(to_color32(MARKER_COLOR)),
                        );
                    }
                }
            });
    }

    /// Grouped bar chart; categories on the x axis.
    pub fn draw_bar_chart(ui: &mut egui::Ui, chart: &BarChart, height: f32) {
        ui.label(RichText::new(&chart.title).size(15.0).strong());

        let labels = chart.categories.clone();
        let series_count = chart.series.len().max(1) as f64;
        let bar_width = 0.8 / series_count;

        Plot::new(format!("bar_{}", chart.title))
            .height(height)
            .legend(Legend::default())
            .y_axis_label(chart.y_title.clone())
            .allow_scroll(false)
            .include_y(0.0)
            .include_y(chart.max_value() * 1.1)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() < 1e-6 && idx >= 0.0 {
                    labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for (s_idx, series) in chart.series.iter().enumerate() {
                    let offset = (s_idx as f64 - (series_count - 1.0) / 2.0) * bar_width;
                    let color = to_color32(series.color);
                    let bars: Vec<Bar> = series
                        .values
                        .iter()
                        .enumerate()
                        .map(|(i, value)| {
                            Bar::new(i as f64 + offset, *value)
                                .width(bar_width * 0.95)
                                .fill(color)
                                .name(format!("{} {}", series.name, chart.categories[i]))
                        })
                        .collect();
                    plot_ui.bar_chart(PlotBarChart::new(bars).color(color).name(&series.name));
                }
            });
    }

    /// Pie chart painted as triangle fans, legend with percentages below.
    pub fn draw_pie_chart(ui: &mut egui::Ui, chart: &PieChart, size: f32) {
        ui.label(RichText::new(&chart.title).size(15.0).strong());

        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::hover());
        let painter = ui.painter_at(rect);
        let center = rect.center();
        let radius = size * 0.45;
        let total = chart.total();

        if total <= 0.0 {
            painter.circle_stroke(center, radius, Stroke::new(1.0, Color32::GRAY));
            painter.text(
                center,
                egui::Align2::CENTER_CENTER,
                "Sem dados",
                egui::FontId::proportional(13.0),
                Color32::GRAY,
            );
        } else {
            // Start at 12 o'clock, clockwise like the web dashboard
            let mut start = -TAU / 4.0;
            for slice in &chart.slices {
                let share = (slice.value.max(0.0) / total) as f32;
                if share <= 0.0 {
                    continue;
                }
                let sweep = share * TAU;
                Self::paint_wedge(&painter, center, radius, start, sweep, to_color32(slice.color));
                start += sweep;
            }
        }

        if let Some(pos) = response.hover_pos() {
            if let Some(slice) = Self::slice_at(chart, center, radius, pos) {
                response.on_hover_text(format!(
                    "{}: {:.2} ({:.1}%)",
                    chart.slices[slice].label,
                    chart.slices[slice].value,
                    chart.share(&chart.slices[slice])
                ));
            }
        }

        for slice in &chart.slices {
            ui.horizontal(|ui| {
                let (swatch, _) =
                    ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                ui.painter().rect_filled(swatch, 2.0, to_color32(slice.color));
                ui.label(
                    RichText::new(format!(
                        "{}  {:.1}%",
                        slice.label,
                        chart.share(slice)
                    ))
                    .size(12.0),
                );
            });
        }
    }

    fn paint_wedge(
        painter: &egui::Painter,
        center: Pos2,
        radius: f32,
        start: f32,
        sweep: f32,
        color: Color32,
    ) {
        let steps = ((sweep / PIE_ARC_STEP).ceil() as usize).max(1);
        let step = sweep / steps as f32;
        let point = |angle: f32| center + radius * egui::vec2(angle.cos(), angle.sin());
        for i in 0..steps {
            let a0 = start + step * i as f32;
            let a1 = a0 + step;
            painter.add(egui::Shape::convex_polygon(
                vec![center, point(a0), point(a1)],
                color,
                Stroke::new(0.5, color),
            ));
        }
    }

    /// Index of the slice under `pos`, if any.
    fn slice_at(chart: &PieChart, center: Pos2, radius: f32, pos: Pos2) -> Option<usize> {
        let delta = pos - center;
        if delta.length() > radius {
            return None;
        }
        let total = chart.total();
        if total <= 0.0 {
            return None;
        }
        // Angle measured clockwise from 12 o'clock
        let angle = (delta.y.atan2(delta.x) + TAU / 4.0).rem_euclid(TAU);
        let mut acc = 0.0_f32;
        for (idx, slice) in chart.slices.iter().enumerate() {
            acc += (slice.value.max(0.0) / total) as f32 * TAU;
            if angle <= acc && slice.value > 0.0 {
                return Some(idx);
            }
        }
        None
    }

    /// Bordered table, numbers with two decimals.
    pub fn draw_table(ui: &mut egui::Ui, table: &TableSpec, id: &str) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .stroke(Stroke::new(2.0, ui.visuals().text_color()))
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(format!("table_{id}")))
                    .striped(true)
                    .min_col_width(90.0)
                    .spacing([12.0, 6.0])
                    .show(ui, |ui| {
                        for header in &table.headers {
                            ui.label(RichText::new(header).strong().size(13.0));
                        }
                        ui.end_row();

                        for row in &table.rows {
                            ui.label(RichText::new(&row.label).size(13.0));
                            for value in &row.values {
                                ui.label(RichText::new(format!("{value:.2}")).size(13.0));
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}
