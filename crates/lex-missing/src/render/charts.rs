//! Default renderer producing chart specifications.

use super::stats::{
    box_plot, build_histogram, category_counts, density_points, ecdf_at, qq_points, stride_sample,
};
use super::{Chart, Figure, MissingRenderer, NamedSeries, Plot, Tab};
use crate::analysis::DEFAULT_NUM_BINS;
use crate::classifier::{ColumnClassifier, ColumnType, DtypeClassifier};
use crate::config::RenderConfig;
use crate::error::{MissingError, Result};
use crate::types::{Intermediate, IntermediateKind, Payload};
use crate::utils::{present_labels, sorted_present_values};
use polars::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Bars shown per categorical chart, most frequent categories first.
pub const MAX_CATEGORIES: usize = 10;

/// Points per series in jitter plots.
pub const MAX_JITTER_POINTS: usize = 1_000;

const QQ_POINTS: usize = 100;

const ORIGINAL: &str = "Original";
const AFTER_DROP: &str = "After Drop";

/// Renders intermediate results as [`Figure`] specifications.
///
/// Impact charts compare each column before and after dropping the rows
/// missing in the designated column. Column types come from the classifier
/// so charts agree with the type gate.
#[derive(Clone)]
pub struct ChartRenderer {
    classifier: Arc<dyn ColumnClassifier>,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::with_classifier(Arc::new(DtypeClassifier))
    }
}

impl std::fmt::Debug for ChartRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartRenderer").finish_non_exhaustive()
    }
}

impl ChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_classifier(classifier: Arc<dyn ColumnClassifier>) -> Self {
        Self { classifier }
    }

    fn impact_parts<'a>(
        intermediate: &'a Intermediate,
        expected: IntermediateKind,
    ) -> Result<(&'a DataFrame, &'a [String], &'a str, usize)> {
        let (dropped, columns) = intermediate
            .impact()
            .filter(|_| intermediate.kind() == expected)
            .ok_or_else(|| {
                MissingError::RenderFailed(format!(
                    "expected a {} result, got {}",
                    expected.display_name(),
                    intermediate.kind().display_name()
                ))
            })?;
        let x = intermediate.source().x.as_deref().ok_or_else(|| {
            MissingError::RenderFailed("impact result has no designated column".to_string())
        })?;
        let bins = intermediate.source().num_bins.unwrap_or(DEFAULT_NUM_BINS);
        Ok((dropped, columns, x, bins))
    }

    fn histogram_plot(original: &[f64], dropped: &[f64], bins: usize) -> Plot {
        let (min, max) = match (original.first(), original.last()) {
            (Some(min), Some(max)) => (*min, *max),
            _ => (f64::NAN, f64::NAN),
        };
        Plot::Histogram {
            series: vec![
                NamedSeries::new(ORIGINAL, build_histogram(original, min, max, bins)),
                NamedSeries::new(AFTER_DROP, build_histogram(dropped, min, max, bins)),
            ],
        }
    }

    fn bar_plot(original: &Column, dropped: &Column) -> Result<Plot> {
        let original_counts = category_counts(&present_labels(original)?);
        let dropped_counts: HashMap<String, usize> =
            category_counts(&present_labels(dropped)?).into_iter().collect();

        let top: Vec<(String, usize)> = original_counts.into_iter().take(MAX_CATEGORIES).collect();
        let categories: Vec<String> = top.iter().map(|(label, _)| label.clone()).collect();
        let original_values: Vec<f64> = top.iter().map(|(_, count)| *count as f64).collect();
        let dropped_values: Vec<f64> = categories
            .iter()
            .map(|label| dropped_counts.get(label).copied().unwrap_or(0) as f64)
            .collect();

        Ok(Plot::Bar {
            categories,
            series: vec![
                NamedSeries::new(ORIGINAL, original_values),
                NamedSeries::new(AFTER_DROP, dropped_values),
            ],
        })
    }

    fn column_chart(
        &self,
        name: &str,
        x: &str,
        original_df: &DataFrame,
        dropped_df: &DataFrame,
        bins: usize,
        config: &RenderConfig,
    ) -> Result<Chart> {
        let original = original_df.column(name)?;
        let dropped = dropped_df.column(name)?;
        let title = format!("{name} (rows missing in {x} dropped)");

        let plot = match self.classifier.classify(original)? {
            ColumnType::Numeric => Self::histogram_plot(
                &sorted_present_values(original)?,
                &sorted_present_values(dropped)?,
                bins,
            ),
            ColumnType::Categorical => Self::bar_plot(original, dropped)?,
        };
        Ok(Chart::new(title, config, plot))
    }

    /// Histogram, QQ, box, jitter, CDF and PDF views of a numeric column
    /// before and after the drop. `original` and `after` are sorted.
    fn numeric_pair_tabs(
        original: &[f64],
        after: &[f64],
        title: &str,
        bins: usize,
        config: &RenderConfig,
    ) -> Vec<Tab> {
        let (min, max) = match (original.first(), original.last()) {
            (Some(min), Some(max)) => (*min, *max),
            _ => (f64::NAN, f64::NAN),
        };
        let original_bins = build_histogram(original, min, max, bins);
        let after_bins = build_histogram(after, min, max, bins);

        let edges: Vec<f64> = original_bins
            .iter()
            .map(|bin| bin.start)
            .chain(original_bins.last().map(|bin| bin.end))
            .collect();

        let boxes = [(ORIGINAL, original), (AFTER_DROP, after)]
            .into_iter()
            .filter_map(|(name, values)| {
                box_plot(values).map(|summary| NamedSeries::new(name, summary))
            })
            .collect();

        let cdf = vec![
            NamedSeries::new(ORIGINAL, ecdf_at(original, &edges)),
            NamedSeries::new(AFTER_DROP, ecdf_at(after, &edges)),
        ];
        let pdf = vec![
            NamedSeries::new(ORIGINAL, density_points(&original_bins)),
            NamedSeries::new(AFTER_DROP, density_points(&after_bins)),
        ];

        let plots = [
            (
                "Histogram",
                Plot::Histogram {
                    series: vec![
                        NamedSeries::new(ORIGINAL, original_bins),
                        NamedSeries::new(AFTER_DROP, after_bins),
                    ],
                },
            ),
            (
                "QQ Plot",
                Plot::Qq {
                    x_label: ORIGINAL.to_string(),
                    y_label: AFTER_DROP.to_string(),
                    points: qq_points(original, after, QQ_POINTS),
                },
            ),
            ("Box Plot", Plot::BoxPlot { series: boxes }),
            (
                "Jitter",
                Plot::Jitter {
                    series: vec![
                        NamedSeries::new(ORIGINAL, stride_sample(original, MAX_JITTER_POINTS)),
                        NamedSeries::new(AFTER_DROP, stride_sample(after, MAX_JITTER_POINTS)),
                    ],
                },
            ),
            ("CDF", Plot::Cdf { series: cdf }),
            ("PDF", Plot::Pdf { series: pdf }),
        ];

        plots
            .into_iter()
            .map(|(tab, plot)| Tab {
                title: tab.to_string(),
                chart: Chart::new(title, config, plot),
            })
            .collect()
    }
}

impl MissingRenderer for ChartRenderer {
    fn render_spectrum(&self, intermediate: &Intermediate, config: &RenderConfig) -> Result<Figure> {
        let Payload::Spectrum {
            distribution,
            density,
            column_missing_rates,
        } = intermediate.payload()
        else {
            return Err(MissingError::RenderFailed(format!(
                "expected a spectrum result, got {}",
                intermediate.kind().display_name()
            )));
        };

        let all_columns: Vec<String> = intermediate
            .source()
            .df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let tabs = vec![
            Tab {
                title: "Missing Spectrum".to_string(),
                chart: Chart::new(
                    "Missing Spectrum",
                    config,
                    Plot::Heatmap {
                        x_labels: distribution.column_names().to_vec(),
                        n_rows: distribution.n_rows(),
                        values: distribution.to_indicator_rows(),
                    },
                ),
            },
            Tab {
                title: "Row Density".to_string(),
                chart: Chart::new(
                    "Non-missing Density per Row",
                    config,
                    Plot::Line {
                        x_label: "row".to_string(),
                        y_label: "density".to_string(),
                        values: density.clone(),
                    },
                ),
            },
            Tab {
                title: "Missing Rate".to_string(),
                chart: Chart::new(
                    "Missing Rate per Column",
                    config,
                    Plot::Bar {
                        categories: all_columns,
                        series: vec![NamedSeries::new(
                            "missing rate",
                            column_missing_rates.clone(),
                        )],
                    },
                ),
            },
        ];

        Ok(Figure::Tabs { tabs })
    }

    fn render_impact(&self, intermediate: &Intermediate, config: &RenderConfig) -> Result<Figure> {
        let (dropped, columns, x, bins) =
            Self::impact_parts(intermediate, IntermediateKind::Impact)?;
        let original = &intermediate.source().df;

        let tabs = columns
            .iter()
            .map(|name| {
                Ok(Tab {
                    title: name.clone(),
                    chart: self.column_chart(name, x, original, dropped, bins, config)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("Rendered {} impact tabs for '{}'", tabs.len(), x);
        Ok(Figure::Tabs { tabs })
    }

    fn render_impact_pair(
        &self,
        intermediate: &Intermediate,
        config: &RenderConfig,
    ) -> Result<Figure> {
        let (dropped, columns, x, bins) =
            Self::impact_parts(intermediate, IntermediateKind::ImpactPair)?;
        let y = columns.first().ok_or_else(|| {
            MissingError::RenderFailed("pair result has no target column".to_string())
        })?;

        let original_col = intermediate.source().df.column(y)?;
        let dropped_col = dropped.column(y)?;

        let tabs = match self.classifier.classify(original_col)? {
            ColumnType::Numeric => Self::numeric_pair_tabs(
                &sorted_present_values(original_col)?,
                &sorted_present_values(dropped_col)?,
                &format!("{y} by missingness of {x}"),
                bins,
                config,
            ),
            ColumnType::Categorical => vec![Tab {
                title: "Bar Chart".to_string(),
                chart: Chart::new(
                    format!("{y} by missingness of {x}"),
                    config,
                    Self::bar_plot(original_col, dropped_col)?,
                ),
            }],
        };

        Ok(Figure::Tabs { tabs })
    }
}
