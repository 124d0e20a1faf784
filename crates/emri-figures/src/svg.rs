//! SVG rendering of [`Figure`] values through `plotters`' SVG backend.
//!
//! Output depends only on the figure and the canvas size, so the same
//! figure always renders to the same bytes.

use std::f64::consts::PI;
use std::fmt::Display;
use std::ops::Range;

use emri_core::{EmriError, ErrorInfo};
use plotters::coord::ranged1d::{AsRangedCoord, ValueFormatter};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::figure::{AxisScale, Figure, FigureBody, FigureConfig, HistogramStyle, Panel, PieSlice};

/// Matplotlib's `tab10` cycle.
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0x8c, 0x56, 0x4b),
    RGBColor(0xe3, 0x77, 0xc2),
    RGBColor(0x7f, 0x7f, 0x7f),
    RGBColor(0xbc, 0xbd, 0x22),
    RGBColor(0x17, 0xbe, 0xcf),
];

const FONT: &str = "sans-serif";
const PIE_SEGMENTS: usize = 180;

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

fn render_error(err: impl Display) -> EmriError {
    EmriError::Render(ErrorInfo::new("svg-render", err.to_string()))
}

fn color(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}

/// Renders `figure` to a standalone SVG document.
pub fn render_svg(figure: &Figure, config: &FigureConfig) -> Result<String, EmriError> {
    let size = (config.width.max(64), config.height.max(64));
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;
        let body = match &figure.title {
            Some(title) => root.titled(title, (FONT, 18)).map_err(render_error)?,
            None => root.clone(),
        };
        match &figure.body {
            FigureBody::Panels { panels } => {
                let areas = body.split_evenly((panels.len().max(1), 1));
                for (panel, area) in panels.iter().zip(&areas) {
                    render_panel(area, panel)?;
                }
            }
            FigureBody::Pie { slices } => render_pie(&body, slices)?,
        }
        root.present().map_err(render_error)?;
    }
    Ok(svg)
}

fn x_values(panel: &Panel) -> Vec<f64> {
    let mut values: Vec<f64> = panel
        .scatter
        .iter()
        .flat_map(|series| series.x.iter().copied())
        .collect();
    values.extend(panel.binned.iter().flat_map(|s| s.edges.iter().copied()));
    values.extend(panel.reference_lines.iter().map(|line| line.x));
    values
}

fn y_values(panel: &Panel) -> Vec<f64> {
    let mut values: Vec<f64> = panel
        .scatter
        .iter()
        .flat_map(|series| series.y.iter().copied())
        .collect();
    values.extend(panel.binned.iter().flat_map(|s| s.heights.iter().copied()));
    values
}

/// Data range of one axis with some headroom. Log axes only look at
/// positive values; `include_zero` pins a linear axis to the bar baseline.
fn axis_range(scale: AxisScale, values: &[f64], include_zero: bool) -> Range<f64> {
    let usable = values
        .iter()
        .copied()
        .filter(|v| v.is_finite() && (scale == AxisScale::Linear || *v > 0.0));
    let (lo, hi) = usable.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    match scale {
        AxisScale::Log => {
            if lo > hi {
                return 1.0..10.0;
            }
            lo / 1.25..hi * 1.25
        }
        AxisScale::Linear => {
            if lo > hi {
                return 0.0..1.0;
            }
            let (lo, hi) = if include_zero {
                (lo.min(0.0), hi.max(0.0))
            } else {
                (lo, hi)
            };
            let pad = if hi > lo { 0.05 * (hi - lo) } else { 0.5 };
            let start = if include_zero && lo == 0.0 { 0.0 } else { lo - pad };
            start..hi + pad
        }
    }
}

fn render_panel(area: &Area<'_>, panel: &Panel) -> Result<(), EmriError> {
    let x_range = match &panel.x_axis.categories {
        Some(categories) => -0.5..categories.len().max(1) as f64 - 0.5,
        None => axis_range(panel.x_axis.scale, &x_values(panel), false),
    };
    let y_range = axis_range(panel.y_axis.scale, &y_values(panel), !panel.binned.is_empty());
    let baseline = match panel.y_axis.scale {
        AxisScale::Log => y_range.start,
        AxisScale::Linear => 0.0_f64.clamp(y_range.start, y_range.end),
    };
    match (panel.x_axis.scale, panel.y_axis.scale) {
        (AxisScale::Linear, AxisScale::Linear) => draw_chart(area, panel, x_range, y_range, baseline),
        (AxisScale::Linear, AxisScale::Log) => {
            draw_chart(area, panel, x_range, y_range.log_scale(), baseline)
        }
        (AxisScale::Log, AxisScale::Linear) => {
            draw_chart(area, panel, x_range.log_scale(), y_range, baseline)
        }
        (AxisScale::Log, AxisScale::Log) => {
            draw_chart(area, panel, x_range.log_scale(), y_range.log_scale(), baseline)
        }
    }
}

fn drawable(scale: AxisScale, value: f64) -> bool {
    value.is_finite() && (scale == AxisScale::Linear || value > 0.0)
}

fn draw_chart<X, Y>(
    area: &Area<'_>,
    panel: &Panel,
    x: X,
    y: Y,
    baseline: f64,
) -> Result<(), EmriError>
where
    X: AsRangedCoord<Value = f64>,
    Y: AsRangedCoord<Value = f64>,
    X::CoordDescType: ValueFormatter<f64>,
    Y::CoordDescType: ValueFormatter<f64>,
{
    let mut chart = ChartBuilder::on(area)
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x, y)
        .map_err(render_error)?;

    let categories = panel.x_axis.categories.clone().unwrap_or_default();
    let category_label = |value: &f64| {
        let nearest = value.round();
        if (value - nearest).abs() > 1e-6 || nearest < 0.0 {
            return String::new();
        }
        categories.get(nearest as usize).cloned().unwrap_or_default()
    };
    {
        let mut mesh = chart.configure_mesh();
        mesh.x_desc(panel.x_axis.label.as_str())
            .y_desc(panel.y_axis.label.as_str())
            .label_style((FONT, 12));
        if !categories.is_empty() {
            mesh.x_labels(categories.len()).x_label_formatter(&category_label);
        }
        if !panel.x_axis.grid {
            mesh.disable_x_mesh();
        }
        if !panel.y_axis.grid {
            mesh.disable_y_mesh();
        }
        mesh.draw().map_err(render_error)?;
    }

    let (x_scale, y_scale) = (panel.x_axis.scale, panel.y_axis.scale);
    let mut labelled = false;
    let mut series_index = 0;
    for series in &panel.binned {
        let stroke = color(series_index);
        series_index += 1;
        let bins: Vec<(f64, f64, f64)> = series
            .edges
            .windows(2)
            .zip(&series.heights)
            .map(|(edge, &height)| (edge[0], edge[1], height))
            .filter(|&(x0, x1, _)| drawable(x_scale, x0) && drawable(x_scale, x1))
            .collect();
        let anno = match series.style {
            HistogramStyle::Bars => chart
                .draw_series(
                    bins.iter()
                        .filter(|&&(_, _, height)| drawable(y_scale, height))
                        .map(|&(x0, x1, height)| {
                            Rectangle::new(
                                [(x0, baseline), (x1, height)],
                                stroke.mix(series.opacity).filled(),
                            )
                        }),
                )
                .map_err(render_error)?,
            HistogramStyle::Step => {
                let mut points: Vec<(f64, f64)> = Vec::with_capacity(2 * bins.len() + 2);
                for &(x0, x1, height) in &bins {
                    let height = if drawable(y_scale, height) { height } else { baseline };
                    if points.is_empty() {
                        points.push((x0, baseline));
                    }
                    points.push((x0, height));
                    points.push((x1, height));
                }
                if let Some(&(last, _)) = points.last() {
                    points.push((last, baseline));
                }
                chart
                    .draw_series(LineSeries::new(points, stroke.mix(series.opacity).stroke_width(2)))
                    .map_err(render_error)?
            }
        };
        if let Some(label) = &series.label {
            labelled = true;
            let half = match series.style {
                HistogramStyle::Bars => 5,
                HistogramStyle::Step => 1,
            };
            anno.label(label.as_str()).legend(move |(x, y)| {
                Rectangle::new([(x, y - half), (x + 16, y + half)], stroke.filled())
            });
        }
    }

    for series in &panel.scatter {
        let fill = color(series_index);
        series_index += 1;
        let anno = chart
            .draw_series(
                series
                    .x
                    .iter()
                    .zip(&series.y)
                    .filter(|&(&x, &y)| drawable(x_scale, x) && drawable(y_scale, y))
                    .map(|(&x, &y)| Circle::new((x, y), 3, fill.filled())),
            )
            .map_err(render_error)?;
        if !series.label.is_empty() {
            labelled = true;
            anno.label(series.label.as_str())
                .legend(move |(x, y)| Circle::new((x + 8, y), 3, fill.filled()));
        }
    }

    let (y_lo, y_hi) = {
        let range = chart.y_range();
        (range.start, range.end)
    };
    for line in &panel.reference_lines {
        let stroke = color(series_index);
        series_index += 1;
        if !drawable(x_scale, line.x) {
            continue;
        }
        let anno = chart
            .draw_series(LineSeries::new(
                vec![(line.x, y_lo), (line.x, y_hi)],
                stroke.stroke_width(2),
            ))
            .map_err(render_error)?;
        if let Some(label) = &line.label {
            labelled = true;
            anno.label(label.as_str()).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 16, y)], stroke.stroke_width(2))
            });
        }
    }

    if panel.legend && labelled {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font((FONT, 12))
            .border_style(BLACK)
            .background_style(WHITE.mix(0.8))
            .draw()
            .map_err(render_error)?;
    }
    Ok(())
}

fn render_pie(area: &Area<'_>, slices: &[PieSlice]) -> Result<(), EmriError> {
    let (width, height) = area.dim_in_pixel();
    let aspect = f64::from(width.max(1)) / f64::from(height.max(1));
    let mut chart = ChartBuilder::on(area)
        .margin(12)
        .build_cartesian_2d(-1.5 * aspect..1.5 * aspect, -1.5..1.5)
        .map_err(render_error)?;

    let total: f64 = slices
        .iter()
        .map(|slice| slice.value)
        .filter(|value| value.is_finite() && *value > 0.0)
        .sum();
    if total <= 0.0 {
        let outline: Vec<(f64, f64)> = (0..=PIE_SEGMENTS)
            .map(|step| {
                let angle = 2.0 * PI * step as f64 / PIE_SEGMENTS as f64;
                (angle.cos(), angle.sin())
            })
            .collect();
        chart
            .draw_series(LineSeries::new(outline, RGBColor(0x99, 0x99, 0x99).stroke_width(1)))
            .map_err(render_error)?;
        let centred = TextStyle::from((FONT, 14)).pos(Pos::new(HPos::Center, VPos::Center));
        chart
            .draw_series(std::iter::once(Text::new("no data", (0.0, 0.0), centred)))
            .map_err(render_error)?;
        return Ok(());
    }

    let mut start = 0.0_f64;
    for (index, slice) in slices.iter().enumerate() {
        if !(slice.value.is_finite() && slice.value > 0.0) {
            continue;
        }
        let sweep = 2.0 * PI * slice.value / total;
        let steps = ((PIE_SEGMENTS as f64 * sweep / (2.0 * PI)).ceil() as usize).max(1);
        let mut wedge = Vec::with_capacity(steps + 2);
        wedge.push((0.0, 0.0));
        wedge.extend((0..=steps).map(|step| {
            let angle = start + sweep * step as f64 / steps as f64;
            (angle.cos(), angle.sin())
        }));
        chart
            .draw_series(std::iter::once(Polygon::new(wedge, color(index).filled())))
            .map_err(render_error)?;

        let middle = start + sweep / 2.0;
        let anchor = if middle.cos() >= 0.0 { HPos::Left } else { HPos::Right };
        let style = TextStyle::from((FONT, 13)).pos(Pos::new(anchor, VPos::Center));
        chart
            .draw_series(std::iter::once(Text::new(
                slice.label.clone(),
                (1.12 * middle.cos(), 1.12 * middle.sin()),
                style,
            )))
            .map_err(render_error)?;
        start += sweep;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::{AxisSpec, ScatterSeries};

    #[test]
    fn log_axis_drops_non_positive_points() {
        let panel = Panel::new(AxisSpec::linear("x"), AxisSpec::log("y"))
            .with_scatter(ScatterSeries::indexed("s", vec![0.0, 1.0, 10.0]));
        let svg = render_svg(&Figure::single(panel), &FigureConfig::default()).unwrap();
        assert_eq!(svg.matches("<circle").count(), 2);
    }

    #[test]
    fn linear_range_keeps_the_bar_baseline() {
        let range = axis_range(AxisScale::Linear, &[2.0, 4.0], true);
        assert_eq!(range.start, 0.0);
        assert!(range.end > 4.0);
    }

    #[test]
    fn log_range_ignores_non_positive_values() {
        let range = axis_range(AxisScale::Log, &[-3.0, 0.0, 10.0, 100.0], false);
        assert_eq!(range, 8.0..125.0);
        assert_eq!(axis_range(AxisScale::Log, &[0.0], false), 1.0..10.0);
    }
}
