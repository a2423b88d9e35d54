//! Missing-Value Analysis Library
//!
//! Locate and characterize missing values in tabular datasets, built with
//! Rust and Polars.
//!
//! # Overview
//!
//! Three views answer three questions about a table:
//!
//! - **Missing Spectrum**: where are the missing cells, and how dense is each
//!   row in present values? ([`compute_missing_spectrum`])
//! - **Missing Impact**: how does dropping the rows missing in one column
//!   change the distribution of every other column? ([`compute_missing_impact`])
//! - **Missing Impact (pair)**: the same, for one specific other column
//!   ([`compute_missing_impact_pair`])
//!
//! A cell is missing when it is null, or NaN in a float column.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_missing::plot_missing;
//! use polars::prelude::*;
//!
//! let df = CsvReadOptions::default()
//!     .with_has_header(true)
//!     .try_into_reader_with_file_path(Some("data.csv".into()))?
//!     .finish()?;
//!
//! // Whole-table spectrum, heatmap capped to the first 100 rows
//! let output = plot_missing(&df, None, None, Some(100), None, false)?;
//!
//! // Impact of "age" on every other column, with the intermediate result
//! let output = plot_missing(&df, Some("age"), None, None, None, true)?;
//! let (figure, intermediate) = output.into_parts();
//! println!("{}", serde_json::to_string_pretty(&figure)?);
//! ```
//!
//! # Customization
//!
//! [`MissingPlotter`] accepts a custom [`ColumnClassifier`] (the type gate),
//! a custom [`MissingRenderer`], and a [`RenderConfig`]:
//!
//! ```rust,ignore
//! use lex_missing::{MissingPlotter, MissingRequest, RenderConfig};
//!
//! let plotter = MissingPlotter::builder()
//!     .render_config(RenderConfig::builder().height(500).alpha(0.5).build()?)
//!     .build()?;
//!
//! let request = MissingRequest::from_args(Some("age"), Some("income"), None, None)?
//!     .with_num_bins(20)?;
//! let output = plotter.plot(&df, &request, false)?;
//! ```

pub mod analysis;
pub mod classifier;
pub mod config;
pub mod dispatch;
pub mod error;
mod parallel;
pub mod render;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use analysis::{
    DEFAULT_NUM_BINS, MAX_NUM_BINS, PresenceMatrix, compute_missing_impact,
    compute_missing_impact_pair, compute_missing_spectrum,
};
pub use classifier::{ColumnClassifier, ColumnType, DtypeClassifier, validate_column_types};
pub use config::{ConfigValidationError, LegendPosition, RenderConfig, RenderConfigBuilder};
pub use dispatch::{MissingPlotter, MissingPlotterBuilder, MissingRequest, PlotOutput, plot_missing};
pub use error::{MissingError, Result as MissingResult, ResultExt};
pub use render::{Chart, ChartRenderer, Figure, MissingRenderer, NamedSeries, Plot, Tab};
pub use types::{Intermediate, IntermediateKind, IntermediateSummary, Payload, Source};
pub use utils::missing_mask;
