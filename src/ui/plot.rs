use std::f64::consts::TAU;
use std::ops::RangeInclusive;

use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, GridMark, Legend, Line, MarkerShape, Plot, PlotPoint, PlotPoints, PlotUi,
    Points, Polygon,
};

use crate::chart::{AxisScale, ChartKind, PlotChart};
use crate::color::{ColorMap, GUIDELINE_COLOR, MEASURED_COLOR, NATIONAL_COLOR};
use crate::data::model::UNIT;
use crate::data::series::LOG_FLOOR;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Chart (central panel)
// ---------------------------------------------------------------------------

/// Render the active chart in the central panel.
pub fn compliance_chart(ui: &mut Ui, state: &AppState) {
    let Some(chart) = state.chart.current() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No chart available");
        });
        return;
    };

    ui.heading(chart.title());
    if !chart.show_measured {
        ui.weak("Press Evaluate to overlay the measured values.");
    }

    if chart.series.is_empty() {
        ui.label("Nothing to draw: every pollutant is excluded from this chart.");
        return;
    }

    match chart.kind {
        ChartKind::Bar => bar_chart(ui, chart),
        ChartKind::Line => line_chart(ui, chart),
        ChartKind::Scatter => scatter_chart(ui, chart),
        ChartKind::Pie => pie_chart(ui, chart),
    }
}

/// Named value sequences drawn by the axis charts.
fn datasets(chart: &PlotChart) -> Vec<(&'static str, &[f64], Color32)> {
    let s = &chart.series;
    let mut sets = vec![
        ("WHO", s.guideline.as_slice(), GUIDELINE_COLOR),
        ("Peru", s.national.as_slice(), NATIONAL_COLOR),
    ];
    if chart.show_measured {
        sets.push(("Measured", s.measured.as_slice(), MEASURED_COLOR));
    }
    sets
}

/// Category x axis with one slot per label, value y axis in `chart.scale`.
fn axis_plot(ui: &mut Ui, chart: &PlotChart, build: impl FnOnce(&mut PlotUi)) {
    let scale = chart.scale;
    let labels = chart.series.labels.clone();
    Plot::new(("compliance_chart", chart.generation))
        .legend(Legend::default())
        .y_axis_label(format!("Concentration ({UNIT}, {})", scale.name().to_lowercase()))
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            category_label(&labels, mark.value)
        })
        .y_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            format_value(scale.from_plot(mark.value))
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, build);
}

fn bar_chart(ui: &mut Ui, chart: &PlotChart) {
    let sets = datasets(chart);
    let width = 0.8 / sets.len() as f64;
    // Bars on a log axis grow from the floor instead of from 10^0.
    let base = match chart.scale {
        AxisScale::Linear => 0.0,
        AxisScale::Logarithmic => LOG_FLOOR.log10(),
    };

    axis_plot(ui, chart, |plot_ui: &mut PlotUi| {
        for (g, (name, values, color)) in sets.iter().enumerate() {
            let offset = (g as f64 - (sets.len() - 1) as f64 / 2.0) * width;
            let bars: Vec<Bar> = values
                .iter()
                .enumerate()
                .filter_map(|(i, &v)| {
                    let top = chart.scale.to_plot(v)?;
                    Some(
                        Bar::new(i as f64 + offset, top - base)
                            .base_offset(base)
                            .width(width * 0.95)
                            .name(format!("{}: {v}", chart.series.labels[i])),
                    )
                })
                .collect();
            plot_ui.bar_chart(BarChart::new(bars).name(*name).color(*color));
        }
    });
}

fn line_chart(ui: &mut Ui, chart: &PlotChart) {
    let sets = datasets(chart);
    let shapes = [MarkerShape::Circle, MarkerShape::Square, MarkerShape::Diamond];

    axis_plot(ui, chart, |plot_ui: &mut PlotUi| {
        for ((name, values, color), shape) in sets.iter().zip(shapes) {
            let coords: Vec<[f64; 2]> = values
                .iter()
                .enumerate()
                .filter_map(|(i, &v)| Some([i as f64, chart.scale.to_plot(v)?]))
                .collect();
            plot_ui.line(
                Line::new(PlotPoints::from(coords.clone()))
                    .name(*name)
                    .color(*color)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(coords))
                    .name(*name)
                    .color(*color)
                    .shape(shape)
                    .radius(4.0),
            );
        }
    });
}

fn scatter_chart(ui: &mut Ui, chart: &PlotChart) {
    let scale = chart.scale;
    let s = &chart.series;
    let pairs = |ys: &[f64]| -> Vec<[f64; 2]> {
        s.guideline
            .iter()
            .zip(ys)
            .filter_map(|(&x, &y)| Some([scale.to_plot(x)?, scale.to_plot(y)?]))
            .collect()
    };

    let limits = pairs(&s.national);
    let measured = chart.show_measured.then(|| pairs(&s.measured));

    // Points on this line have equal WHO and Peru limits.
    let lo = s.guideline.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = s.max_value();
    let diagonal: Vec<[f64; 2]> = [lo, hi]
        .iter()
        .filter_map(|&v| scale.to_plot(v).map(|c| [c, c]))
        .collect();

    Plot::new(("compliance_chart", chart.generation))
        .legend(Legend::default())
        .x_axis_label(format!("WHO ({UNIT})"))
        .y_axis_label(format!("Peru ({UNIT})"))
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            format_value(scale.from_plot(mark.value))
        })
        .y_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            format_value(scale.from_plot(mark.value))
        })
        .label_formatter(move |name: &str, point: &PlotPoint| {
            format!(
                "{name}\nWHO: {}\nvalue: {}",
                format_value(scale.from_plot(point.x)),
                format_value(scale.from_plot(point.y))
            )
        })
        .show(ui, |plot_ui: &mut PlotUi| {
            plot_ui.line(
                Line::new(PlotPoints::from(diagonal))
                    .name("WHO = Peru")
                    .color(Color32::GRAY)
                    .width(1.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(limits))
                    .name("Limits (Peru vs WHO)")
                    .color(NATIONAL_COLOR)
                    .radius(6.0),
            );
            if let Some(measured) = measured {
                plot_ui.points(
                    Points::new(PlotPoints::from(measured))
                        .name("Measured vs WHO")
                        .color(MEASURED_COLOR)
                        .shape(MarkerShape::Diamond)
                        .radius(6.0),
                );
            }
        });
}

/// Largest angle of one wedge polygon; keeps every polygon convex.
const MAX_WEDGE: f64 = TAU / 8.0;

fn pie_chart(ui: &mut Ui, chart: &PlotChart) {
    let s = &chart.series;
    let values = if chart.show_measured {
        &s.measured
    } else {
        &s.national
    };
    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    if total <= 0.0 {
        ui.label("All values are zero.");
        return;
    }
    let colors = ColorMap::new(&s.labels);

    Plot::new(("compliance_chart", chart.generation))
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui: &mut PlotUi| {
            let mut start = 0.0;
            for (i, &v) in values.iter().enumerate() {
                if v <= 0.0 {
                    continue;
                }
                let sweep = v / total * TAU;
                let name = format!("{} ({:.1}%)", s.labels[i], v / total * 100.0);
                for wedge in wedges(start, sweep) {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(wedge))
                            .name(&name)
                            .fill_color(colors.color_at(i))
                            .stroke(Stroke::new(1.0, Color32::WHITE)),
                    );
                }
                start += sweep;
            }
        });
}

/// Split a slice into convex wedges of unit radius starting at 12 o'clock.
fn wedges(start: f64, sweep: f64) -> Vec<Vec<[f64; 2]>> {
    let pieces = (sweep / MAX_WEDGE).ceil().max(1.0) as usize;
    let step = sweep / pieces as f64;
    (0..pieces)
        .map(|p| {
            let a0 = start + p as f64 * step;
            let arc_points = 8;
            let mut points = vec![[0.0, 0.0]];
            for k in 0..=arc_points {
                let a = a0 + step * k as f64 / arc_points as f64;
                points.push([a.sin(), a.cos()]);
            }
            points
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Axis helpers
// ---------------------------------------------------------------------------

/// Label of the category at an integer x position, empty elsewhere.
fn category_label(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if idx < 0.0 || (x - idx).abs() > 1e-6 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

fn format_value(v: f64) -> String {
    if v >= 100.0 {
        format!("{v:.0}")
    } else if v >= 1.0 {
        format!("{v:.1}")
    } else {
        format!("{v:.3}")
    }
}
