//! Figures for the glitch-bias study, rendered as standalone SVG.
//!
//! A [`Figure`] is plain data; [`render_svg`] draws it with `plotters` and a
//! [`FigureSink`] decides where the resulting string goes.

#![deny(missing_docs)]

pub mod figure;
pub mod sink;
pub mod svg;

pub use figure::{
    AxisScale, AxisSpec, BinnedSeries, Figure, FigureBody, FigureConfig, HistogramStyle, Panel,
    PieSlice, ReferenceLine, ScatterSeries,
};
pub use sink::{DirectorySink, FigureSink, MemorySink};
pub use svg::{render_svg, PALETTE};
