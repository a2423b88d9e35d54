//! Entry point: validate the table, pick an analyzer, render its result.
//!
//! Arguments are turned into a [`MissingRequest`] once, at the boundary. The
//! plotter then runs the type gate over the whole table, matches the request,
//! and hands the [`Intermediate`] to the matching render routine:
//!
//! | x | y | analysis |
//! |---|---|---|
//! | - | - | [`compute_missing_spectrum`] |
//! | x | - | [`compute_missing_impact`] |
//! | x | y | [`compute_missing_impact_pair`] |
//! | - | y | error: `InvalidArguments` |
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_missing::{MissingPlotter, MissingRequest};
//!
//! let request = MissingRequest::from_args(Some("HDI_for_year"), None, None, None)?;
//! let output = MissingPlotter::builder().build()?.plot(&df, &request, true)?;
//! let (figure, intermediate) = output.into_parts();
//! ```

use crate::analysis::{
    DEFAULT_NUM_BINS, MAX_NUM_BINS, compute_missing_impact, compute_missing_impact_pair,
    compute_missing_spectrum,
};
use crate::classifier::{ColumnClassifier, DtypeClassifier, validate_column_types};
use crate::config::RenderConfig;
use crate::error::{MissingError, Result};
use crate::render::{ChartRenderer, Figure, MissingRenderer};
use crate::types::Intermediate;
use polars::prelude::*;
use std::sync::Arc;
use tracing::{info, warn};

// ============================================================================
// Request
// ============================================================================

/// The analysis selected by the caller's arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingRequest {
    /// Whole-table presence matrix and densities.
    Spectrum {
        num_rows: Option<usize>,
        num_cols: Option<usize>,
    },
    /// Impact of `x`'s missingness on every other column.
    Impact { x: String, num_bins: usize },
    /// Impact of `x`'s missingness on `y`.
    ImpactPair {
        x: String,
        y: String,
        num_bins: usize,
    },
}

impl MissingRequest {
    /// Build a request from optional column names and matrix caps.
    ///
    /// Fails with `InvalidArguments` when `y` is given without `x`, or when
    /// `x` and `y` name the same column. The caps
    /// only apply to the spectrum view and are ignored otherwise.
    pub fn from_args(
        x: Option<&str>,
        y: Option<&str>,
        num_rows: Option<usize>,
        num_cols: Option<usize>,
    ) -> Result<Self> {
        let request = match (x, y) {
            (None, None) => MissingRequest::Spectrum { num_rows, num_cols },
            (Some(x), None) => MissingRequest::Impact {
                x: x.to_string(),
                num_bins: DEFAULT_NUM_BINS,
            },
            (Some(x), Some(y)) if x == y => {
                return Err(MissingError::InvalidArguments(format!(
                    "x and y must name different columns, both are '{x}'"
                )));
            }
            (Some(x), Some(y)) => MissingRequest::ImpactPair {
                x: x.to_string(),
                y: y.to_string(),
                num_bins: DEFAULT_NUM_BINS,
            },
            (None, Some(_)) => {
                return Err(MissingError::InvalidArguments(
                    "x must be given when y is given".to_string(),
                ));
            }
        };

        if request.is_impact() && (num_rows.is_some() || num_cols.is_some()) {
            warn!("num_rows/num_cols only apply to the spectrum view and are ignored");
        }

        Ok(request)
    }

    /// Override the histogram bin count of an impact request.
    ///
    /// The count must lie in `1..=MAX_NUM_BINS`.
    pub fn with_num_bins(self, bins: usize) -> Result<Self> {
        if !(1..=MAX_NUM_BINS).contains(&bins) {
            return Err(MissingError::InvalidArguments(format!(
                "num_bins must be between 1 and {MAX_NUM_BINS}, got {bins}"
            )));
        }
        Ok(match self {
            MissingRequest::Impact { x, .. } => MissingRequest::Impact { x, num_bins: bins },
            MissingRequest::ImpactPair { x, y, .. } => MissingRequest::ImpactPair {
                x,
                y,
                num_bins: bins,
            },
            spectrum @ MissingRequest::Spectrum { .. } => spectrum,
        })
    }

    pub fn is_impact(&self) -> bool {
        !matches!(self, MissingRequest::Spectrum { .. })
    }

    fn describe(&self) -> String {
        match self {
            MissingRequest::Spectrum { .. } => "missing spectrum".to_string(),
            MissingRequest::Impact { x, .. } => format!("missing impact of '{x}'"),
            MissingRequest::ImpactPair { x, y, .. } => {
                format!("missing impact of '{x}' on '{y}'")
            }
        }
    }
}

// ============================================================================
// Output
// ============================================================================

/// A rendered figure, plus the intermediate result when it was requested.
#[derive(Debug, Clone)]
pub struct PlotOutput {
    pub figure: Figure,
    pub intermediate: Option<Intermediate>,
}

impl PlotOutput {
    pub fn into_parts(self) -> (Figure, Option<Intermediate>) {
        (self.figure, self.intermediate)
    }
}

// ============================================================================
// Plotter
// ============================================================================

/// Validates tables and runs the analysis selected by a [`MissingRequest`].
pub struct MissingPlotter {
    classifier: Arc<dyn ColumnClassifier>,
    renderer: Arc<dyn MissingRenderer>,
    config: RenderConfig,
}

impl std::fmt::Debug for MissingPlotter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MissingPlotter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for MissingPlotter {
    fn default() -> Self {
        let classifier: Arc<dyn ColumnClassifier> = Arc::new(DtypeClassifier);
        Self {
            renderer: Arc::new(ChartRenderer::with_classifier(classifier.clone())),
            classifier,
            config: RenderConfig::default(),
        }
    }
}

impl MissingPlotter {
    pub fn builder() -> MissingPlotterBuilder {
        MissingPlotterBuilder::default()
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Run the analysis for `request` on `df` and render it.
    ///
    /// Every column must pass the type gate before any analysis starts. The
    /// intermediate result is included in the output only when
    /// `return_intermediate` is set.
    pub fn plot(
        &self,
        df: &DataFrame,
        request: &MissingRequest,
        return_intermediate: bool,
    ) -> Result<PlotOutput> {
        validate_column_types(df, self.classifier.as_ref())?;

        info!(
            "Computing {} for {} rows x {} columns",
            request.describe(),
            df.height(),
            df.width()
        );

        let (intermediate, figure) = match request {
            MissingRequest::Spectrum { num_rows, num_cols } => {
                let intermediate = compute_missing_spectrum(df, *num_rows, *num_cols)?;
                let figure = self.renderer.render_spectrum(&intermediate, &self.config)?;
                (intermediate, figure)
            }
            MissingRequest::Impact { x, num_bins } => {
                let intermediate = compute_missing_impact(df, x, *num_bins)?;
                let figure = self.renderer.render_impact(&intermediate, &self.config)?;
                (intermediate, figure)
            }
            MissingRequest::ImpactPair { x, y, num_bins } => {
                let intermediate = compute_missing_impact_pair(df, x, y, *num_bins)?;
                let figure = self
                    .renderer
                    .render_impact_pair(&intermediate, &self.config)?;
                (intermediate, figure)
            }
        };

        Ok(PlotOutput {
            figure,
            intermediate: return_intermediate.then_some(intermediate),
        })
    }
}

/// Builder for [`MissingPlotter`].
#[derive(Default)]
pub struct MissingPlotterBuilder {
    classifier: Option<Arc<dyn ColumnClassifier>>,
    renderer: Option<Arc<dyn MissingRenderer>>,
    config: Option<RenderConfig>,
}

impl MissingPlotterBuilder {
    /// Use a custom column type gate. The default renderer shares it.
    pub fn classifier(mut self, classifier: Arc<dyn ColumnClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Use a custom renderer.
    pub fn renderer(mut self, renderer: Arc<dyn MissingRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Set the rendering configuration.
    pub fn render_config(mut self, config: RenderConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the plotter, validating the rendering configuration.
    pub fn build(self) -> Result<MissingPlotter> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let classifier = self
            .classifier
            .unwrap_or_else(|| Arc::new(DtypeClassifier) as Arc<dyn ColumnClassifier>);
        let renderer = self.renderer.unwrap_or_else(|| {
            let renderer = ChartRenderer::with_classifier(classifier.clone());
            Arc::new(renderer) as Arc<dyn MissingRenderer>
        });

        Ok(MissingPlotter {
            classifier,
            renderer,
            config,
        })
    }
}

/// Analyze missing values in `df` and render the result with default settings.
///
/// - no `x`, no `y`: whole-table spectrum, matrix capped to `num_rows` × `num_cols`
/// - `x`: impact of `x`'s missingness on every other column
/// - `x` and `y`: impact of `x`'s missingness on `y`
pub fn plot_missing(
    df: &DataFrame,
    x: Option<&str>,
    y: Option<&str>,
    num_rows: Option<usize>,
    num_cols: Option<usize>,
    return_intermediate: bool,
) -> Result<PlotOutput> {
    let request = MissingRequest::from_args(x, y, num_rows, num_cols)?;
    MissingPlotter::default().plot(df, &request, return_intermediate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ColumnType;
    use crate::render::Plot;
    use crate::types::IntermediateKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sample() -> DataFrame {
        df!(
            "A" => &[Some(1.0), None, Some(3.0)],
            "B" => &[None, Some(2.0), Some(3.0)],
        )
        .unwrap()
    }

    /// Classifier that rejects everything and counts calls.
    #[derive(Default)]
    struct RejectAll {
        calls: AtomicUsize,
    }

    impl ColumnClassifier for RejectAll {
        fn classify(&self, column: &Column) -> Result<ColumnType> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(MissingError::UnclassifiableColumn {
                column: column.name().to_string(),
                dtype: "Opaque".to_string(),
            })
        }
    }

    #[test]
    fn test_request_from_args() {
        assert_eq!(
            MissingRequest::from_args(None, None, Some(5), None).unwrap(),
            MissingRequest::Spectrum {
                num_rows: Some(5),
                num_cols: None
            }
        );
        assert_eq!(
            MissingRequest::from_args(Some("a"), None, None, None).unwrap(),
            MissingRequest::Impact {
                x: "a".to_string(),
                num_bins: DEFAULT_NUM_BINS
            }
        );
        assert!(matches!(
            MissingRequest::from_args(Some("a"), Some("b"), None, None).unwrap(),
            MissingRequest::ImpactPair { .. }
        ));
    }

    #[test]
    fn test_y_without_x_is_rejected() {
        let err = MissingRequest::from_args(None, Some("b"), None, None).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ARGUMENTS");
        assert!(err.to_string().contains("x must be given when y is given"));
    }

    #[test]
    fn test_with_num_bins() {
        let request = MissingRequest::from_args(Some("a"), None, None, None)
            .unwrap()
            .with_num_bins(25)
            .unwrap();
        assert_eq!(
            request,
            MissingRequest::Impact {
                x: "a".to_string(),
                num_bins: 25
            }
        );
        assert!(request.clone().with_num_bins(0).is_err());
        assert!(request.clone().with_num_bins(MAX_NUM_BINS).is_ok());

        let err = request.with_num_bins(usize::MAX).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ARGUMENTS");
    }

    #[test]
    fn test_oversized_bins_in_request_do_not_abort_plot() {
        let request = MissingRequest::Impact {
            x: "A".to_string(),
            num_bins: usize::MAX,
        };
        let output = MissingPlotter::default()
            .plot(&sample(), &request, false)
            .unwrap();

        match &output.figure.charts()[0].plot {
            Plot::Histogram { series } => assert_eq!(series[0].data.len(), MAX_NUM_BINS),
            other => panic!("expected a histogram, got {other:?}"),
        }
    }

    #[test]
    fn test_same_column_rejected_before_gate() {
        let classifier = Arc::new(RejectAll::default());
        let plotter = MissingPlotter::builder()
            .classifier(classifier.clone())
            .build()
            .unwrap();

        let err = MissingRequest::from_args(Some("A"), Some("A"), None, None).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ARGUMENTS");

        let dates = df!("A" => &[1i32, 2])
            .unwrap()
            .lazy()
            .with_column(col("A").cast(DataType::Date))
            .collect()
            .unwrap();
        let err = plot_missing(&dates, Some("A"), Some("A"), None, None, false).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ARGUMENTS");

        let request = MissingRequest::from_args(Some("A"), Some("B"), None, None).unwrap();
        assert!(plotter.plot(&sample(), &request, false).is_err());
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_plot_spectrum_without_intermediate() {
        let output = plot_missing(&sample(), None, None, None, None, false).unwrap();
        assert!(output.intermediate.is_none());
        assert_eq!(output.figure.titles().len(), 3);
    }

    #[test]
    fn test_plot_returns_intermediate_on_request() {
        let output = plot_missing(&sample(), Some("A"), None, None, None, true).unwrap();
        let (figure, intermediate) = output.into_parts();
        let intermediate = intermediate.unwrap();

        assert_eq!(intermediate.kind(), IntermediateKind::Impact);
        assert_eq!(figure.titles(), vec!["B"]);
    }

    #[test]
    fn test_gate_runs_before_analysis() {
        let classifier = Arc::new(RejectAll::default());
        let plotter = MissingPlotter::builder()
            .classifier(classifier.clone())
            .build()
            .unwrap();

        // A missing column would otherwise fail with ColumnNotFound.
        let request = MissingRequest::from_args(Some("nope"), None, None, None).unwrap();
        let err = plotter.plot(&sample(), &request, false).unwrap_err();

        assert_eq!(err.error_code(), "UNSUPPORTED_COLUMN_TYPE");
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unknown_column_after_gate() {
        let err = plot_missing(&sample(), Some("Z"), None, None, None, false).unwrap_err();
        assert!(matches!(err, MissingError::ColumnNotFound(_)));
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let config = RenderConfig {
            alpha: 2.0,
            ..RenderConfig::default()
        };
        let err = MissingPlotter::builder()
            .render_config(config)
            .build()
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }
}
