//! Plain-data description of figures, panels, and series.

use serde::{Deserialize, Serialize};

/// Canvas size of a rendered figure in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

/// Mapping of data values onto an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisScale {
    /// Evenly spaced values.
    #[default]
    Linear,
    /// Evenly spaced decades; non-positive values are not drawn.
    Log,
}

/// Axis label, scale and optional categorical tick labels.
///
/// With `categories` set, tick `i` sits at `x = i` and the numeric range is
/// fixed to `[-0.5, n - 0.5]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisSpec {
    /// Axis description; empty for none.
    pub label: String,
    /// Linear or logarithmic.
    pub scale: AxisScale,
    /// Tick labels of a categorical axis.
    pub categories: Option<Vec<String>>,
    /// Draw grid lines across the plot area.
    pub grid: bool,
}

impl AxisSpec {
    /// Linear axis without grid lines.
    pub fn linear(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Logarithmic axis without grid lines.
    pub fn log(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            scale: AxisScale::Log,
            ..Self::default()
        }
    }

    /// One tick per category, with grid lines.
    pub fn categorical(label: impl Into<String>, categories: Vec<String>) -> Self {
        Self {
            label: label.into(),
            categories: Some(categories),
            grid: true,
            ..Self::default()
        }
    }

    /// Turns grid lines on or off.
    pub fn with_grid(mut self, grid: bool) -> Self {
        self.grid = grid;
        self
    }
}

/// Points drawn as filled dots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterSeries {
    /// Legend entry; empty for none.
    pub label: String,
    /// Horizontal positions.
    pub x: Vec<f64>,
    /// Vertical positions, paired with `x`.
    pub y: Vec<f64>,
}

impl ScatterSeries {
    /// Points at `x = 0, 1, ..., n - 1`.
    pub fn indexed(label: impl Into<String>, y: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            x: (0..y.len()).map(|idx| idx as f64).collect(),
            y,
        }
    }
}

/// How pre-binned values are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistogramStyle {
    /// Filled rectangles from the baseline.
    #[default]
    Bars,
    /// Outline of the bin tops, closed down to the baseline.
    Step,
}

/// Pre-binned values: `heights[i]` covers `[edges[i], edges[i + 1]]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinnedSeries {
    /// Legend entry.
    pub label: Option<String>,
    /// Bin edges, one more than `heights`.
    pub edges: Vec<f64>,
    /// Bin heights.
    pub heights: Vec<f64>,
    /// Bars or step outline.
    pub style: HistogramStyle,
    /// Fill or stroke opacity in `[0, 1]`.
    pub opacity: f64,
}

impl BinnedSeries {
    /// Opaque bars.
    pub fn bars(label: Option<String>, edges: Vec<f64>, heights: Vec<f64>) -> Self {
        Self {
            label,
            edges,
            heights,
            style: HistogramStyle::Bars,
            opacity: 1.0,
        }
    }

    /// Opaque step outline.
    pub fn step(label: Option<String>, edges: Vec<f64>, heights: Vec<f64>) -> Self {
        Self {
            style: HistogramStyle::Step,
            ..Self::bars(label, edges, heights)
        }
    }

    /// Sets the opacity, clamped to `[0, 1]`.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }
}

/// Vertical line at `x` spanning the panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    /// Horizontal position.
    pub x: f64,
    /// Legend entry.
    pub label: Option<String>,
}

/// One set of axes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Panel {
    /// Horizontal axis.
    pub x_axis: AxisSpec,
    /// Vertical axis.
    pub y_axis: AxisSpec,
    /// Scatter series, drawn above the binned ones.
    pub scatter: Vec<ScatterSeries>,
    /// Histograms.
    pub binned: Vec<BinnedSeries>,
    /// Vertical markers.
    pub reference_lines: Vec<ReferenceLine>,
    /// Draw a legend of the labelled series.
    pub legend: bool,
}

impl Panel {
    /// Empty panel over the given axes.
    pub fn new(x_axis: AxisSpec, y_axis: AxisSpec) -> Self {
        Self {
            x_axis,
            y_axis,
            ..Self::default()
        }
    }

    /// Adds a scatter series.
    pub fn with_scatter(mut self, series: ScatterSeries) -> Self {
        self.scatter.push(series);
        self
    }

    /// Adds a histogram.
    pub fn with_binned(mut self, series: BinnedSeries) -> Self {
        self.binned.push(series);
        self
    }

    /// Adds a vertical reference line.
    pub fn with_reference_line(mut self, line: ReferenceLine) -> Self {
        self.reference_lines.push(line);
        self
    }

    /// Enables the legend.
    pub fn with_legend(mut self) -> Self {
        self.legend = true;
        self
    }
}

/// One labelled wedge of a pie chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    /// Text next to the wedge.
    pub label: String,
    /// Weight; non-positive or non-finite values are skipped.
    pub value: f64,
}

/// What a figure draws below its title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FigureBody {
    /// Axes stacked top to bottom.
    Panels {
        /// Panels in drawing order.
        panels: Vec<Panel>,
    },
    /// Wedges drawn counter-clockwise from three o'clock.
    Pie {
        /// Wedges in drawing order.
        slices: Vec<PieSlice>,
    },
}

/// A complete figure, independent of where it is rendered to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    /// Caption above the body.
    pub title: Option<String>,
    /// Panels or pie.
    pub body: FigureBody,
}

impl Figure {
    /// A figure with one panel.
    pub fn single(panel: Panel) -> Self {
        Self::stacked(vec![panel])
    }

    /// Panels sharing the canvas height evenly.
    pub fn stacked(panels: Vec<Panel>) -> Self {
        Self {
            title: None,
            body: FigureBody::Panels { panels },
        }
    }

    /// A pie chart.
    pub fn pie(slices: Vec<PieSlice>) -> Self {
        Self {
            title: None,
            body: FigureBody::Pie { slices },
        }
    }

    /// Sets the caption.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}
