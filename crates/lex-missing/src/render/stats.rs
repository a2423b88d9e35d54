//! Small descriptive statistics used by the chart renderer.

use crate::analysis::MAX_NUM_BINS;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxPlotSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Equal-width bins over `[min, max]`. A zero-width range collapses to one bin.
///
/// The bin count is clamped to `1..=MAX_NUM_BINS`.
pub(crate) fn build_histogram(values: &[f64], min: f64, max: f64, bins: usize) -> Vec<HistogramBin> {
    if !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }

    if (max - min).abs() < f64::EPSILON {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: values.len(),
        }];
    }

    let bin_count = bins.clamp(1, MAX_NUM_BINS);
    let width = (max - min) / bin_count as f64;
    let mut counts = vec![0usize; bin_count];

    for value in values {
        if *value < min || *value > max {
            continue;
        }
        let index = (((value - min) / width) as usize).min(bin_count - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(idx, count)| HistogramBin {
            start: min + idx as f64 * width,
            end: min + (idx as f64 + 1.0) * width,
            count,
        })
        .collect()
}

pub(crate) fn quantile_sorted(values: &[f64], quantile: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let pos = quantile.clamp(0.0, 1.0) * (values.len() as f64 - 1.0);
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return values[lower];
    }
    let weight = pos - lower as f64;
    values[lower] + (values[upper] - values[lower]) * weight
}

pub(crate) fn box_plot(sorted: &[f64]) -> Option<BoxPlotSummary> {
    let (first, last) = (sorted.first()?, sorted.last()?);
    Some(BoxPlotSummary {
        min: *first,
        q1: quantile_sorted(sorted, 0.25),
        median: quantile_sorted(sorted, 0.5),
        q3: quantile_sorted(sorted, 0.75),
        max: *last,
    })
}

/// Fraction of `sorted` at or below each point.
pub(crate) fn ecdf_at(sorted: &[f64], points: &[f64]) -> Vec<(f64, f64)> {
    if sorted.is_empty() {
        return Vec::new();
    }
    points
        .iter()
        .map(|&p| {
            let below = sorted.partition_point(|v| *v <= p);
            (p, below as f64 / sorted.len() as f64)
        })
        .collect()
}

/// Matching quantiles of two sorted samples at `points` evenly spaced probabilities.
pub(crate) fn qq_points(left: &[f64], right: &[f64], points: usize) -> Vec<(f64, f64)> {
    if left.is_empty() || right.is_empty() || points == 0 {
        return Vec::new();
    }
    (0..points)
        .map(|i| {
            let q = (i as f64 + 0.5) / points as f64;
            (quantile_sorted(left, q), quantile_sorted(right, q))
        })
        .collect()
}

/// Histogram heights scaled to a probability density, at bin midpoints.
///
/// A zero-width bin has no density and yields no points.
pub(crate) fn density_points(bins: &[HistogramBin]) -> Vec<(f64, f64)> {
    let total: usize = bins.iter().map(|bin| bin.count).sum();
    if total == 0 {
        return Vec::new();
    }
    bins.iter()
        .filter(|bin| bin.end > bin.start)
        .map(|bin| {
            let width = bin.end - bin.start;
            (
                bin.start + width / 2.0,
                bin.count as f64 / (total as f64 * width),
            )
        })
        .collect()
}

/// At most `max` values taken at an even stride, keeping the first and last.
pub(crate) fn stride_sample(values: &[f64], max: usize) -> Vec<f64> {
    if values.len() <= max {
        return values.to_vec();
    }
    if max < 2 {
        return values.iter().take(max).copied().collect();
    }
    let step = (values.len() - 1) as f64 / (max - 1) as f64;
    (0..max)
        .map(|i| values[((i as f64 * step).round() as usize).min(values.len() - 1)])
        .collect()
}

/// Label frequencies, most frequent first; ties break alphabetically.
pub(crate) fn category_counts(labels: &[String]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label.as_str()).or_insert(0) += 1;
    }

    let mut sorted: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(label, count)| (label.to_string(), count))
        .collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}
