//! Whole-table missingness: where are the gaps, and how dense is each row.

use super::presence::PresenceMatrix;
use crate::error::{Result, ResultExt};
use crate::types::{Intermediate, IntermediateKind, Payload, Source};
use polars::prelude::*;
use tracing::debug;

/// Compute the presence matrix and per-row densities for `df`.
///
/// Densities and column missing rates always describe the full table. Only the
/// returned matrix is cut down to the first `num_cols` columns and `num_rows`
/// rows; caps beyond the table size clamp to it.
pub fn compute_missing_spectrum(
    df: &DataFrame,
    num_rows: Option<usize>,
    num_cols: Option<usize>,
) -> Result<Intermediate> {
    let full = PresenceMatrix::from_dataframe(df).context("Building presence matrix")?;
    let density = full.row_densities();
    let column_missing_rates = full.column_missing_rates();

    let distribution = full.truncate(num_rows, num_cols);
    debug!(
        "Presence matrix {:?} truncated to {:?}",
        full.shape(),
        distribution.shape()
    );

    let mut source = Source::new(df);
    source.num_rows = num_rows;
    source.num_cols = num_cols;

    Ok(Intermediate::new(
        Payload::Spectrum {
            distribution,
            density,
            column_missing_rates,
        },
        source,
        IntermediateKind::Spectrum,
    ))
}
