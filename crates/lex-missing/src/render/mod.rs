//! Rendering of intermediate results into chart specifications.
//!
//! A [`MissingRenderer`] has one routine per analyzer kind. Renderers receive
//! the [`Intermediate`] by shared reference and cannot alter it. The default
//! [`ChartRenderer`] produces serializable [`Figure`] values that a frontend
//! can draw directly.

mod charts;
mod stats;

pub use charts::{ChartRenderer, MAX_CATEGORIES, MAX_JITTER_POINTS};
pub use stats::{BoxPlotSummary, HistogramBin};

use crate::config::{LegendPosition, RenderConfig};
use crate::error::Result;
use crate::types::Intermediate;
use serde::Serialize;

/// Turns intermediate results into displayable figures.
pub trait MissingRenderer: Send + Sync {
    /// Render a whole-table spectrum result.
    fn render_spectrum(&self, intermediate: &Intermediate, config: &RenderConfig) -> Result<Figure>;

    /// Render a single-column impact result.
    fn render_impact(&self, intermediate: &Intermediate, config: &RenderConfig) -> Result<Figure>;

    /// Render a two-column impact result.
    fn render_impact_pair(
        &self,
        intermediate: &Intermediate,
        config: &RenderConfig,
    ) -> Result<Figure>;
}

// ============================================================================
// Figure Types
// ============================================================================

/// A single chart or a tabbed collection of charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Figure {
    Chart(Chart),
    Tabs { tabs: Vec<Tab> },
}

impl Figure {
    /// Tab titles, or the chart title for a single chart.
    pub fn titles(&self) -> Vec<&str> {
        match self {
            Figure::Chart(chart) => vec![chart.title.as_str()],
            Figure::Tabs { tabs } => tabs.iter().map(|tab| tab.title.as_str()).collect(),
        }
    }

    /// All charts in display order.
    pub fn charts(&self) -> Vec<&Chart> {
        match self {
            Figure::Chart(chart) => vec![chart],
            Figure::Tabs { tabs } => tabs.iter().map(|tab| &tab.chart).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tab {
    pub title: String,
    pub chart: Chart,
}

/// One chart together with its display options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub title: String,
    pub height: u32,
    pub width: u32,
    pub alpha: f64,
    pub legend_position: LegendPosition,
    pub plot: Plot,
}

impl Chart {
    pub fn new(title: impl Into<String>, config: &RenderConfig, plot: Plot) -> Self {
        Self {
            title: title.into(),
            height: config.height,
            width: config.width,
            alpha: config.alpha,
            legend_position: config.legend_position,
            plot,
        }
    }
}

/// What a chart draws.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Plot {
    /// 0/1 missing indicators, one inner vector per column.
    Heatmap {
        x_labels: Vec<String>,
        n_rows: usize,
        values: Vec<Vec<u8>>,
    },
    /// One value per position on the x axis.
    Line {
        x_label: String,
        y_label: String,
        values: Vec<f64>,
    },
    Bar {
        categories: Vec<String>,
        series: Vec<NamedSeries<Vec<f64>>>,
    },
    Histogram {
        series: Vec<NamedSeries<Vec<HistogramBin>>>,
    },
    BoxPlot {
        series: Vec<NamedSeries<BoxPlotSummary>>,
    },
    /// Empirical CDF as (value, cumulative fraction) points.
    Cdf {
        series: Vec<NamedSeries<Vec<(f64, f64)>>>,
    },
    /// Estimated density as (bin midpoint, density) points.
    Pdf {
        series: Vec<NamedSeries<Vec<(f64, f64)>>>,
    },
    /// Quantiles of one sample against another.
    Qq {
        x_label: String,
        y_label: String,
        points: Vec<(f64, f64)>,
    },
    /// Raw values per series, spread horizontally by the frontend.
    Jitter {
        series: Vec<NamedSeries<Vec<f64>>>,
    },
}

/// A data series labelled for the legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedSeries<T> {
    pub name: String,
    pub data: T,
}

impl<T> NamedSeries<T> {
    pub fn new(name: impl Into<String>, data: T) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}
