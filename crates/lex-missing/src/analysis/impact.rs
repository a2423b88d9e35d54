//! Missing impact: how dropping the rows where one column is missing changes
//! the remaining columns.

use crate::error::{MissingError, Result, ResultExt};
use crate::types::{Intermediate, IntermediateKind, Payload, Source};
use crate::utils::{presence_filter, require_column};
use polars::prelude::*;
use tracing::debug;

/// Bin count used by histogram renderers when none is given.
pub const DEFAULT_NUM_BINS: usize = 10;

/// Largest bin count a request may ask for.
pub const MAX_NUM_BINS: usize = 1_000;

/// Drop the rows where `x` is missing and list every other column.
///
/// `num_bins` is not used here; it travels with the result for rendering.
pub fn compute_missing_impact(df: &DataFrame, x: &str, num_bins: usize) -> Result<Intermediate> {
    require_column(df, x)?;

    let dropped = drop_missing(df, x)?;
    let columns: Vec<String> = df
        .get_column_names()
        .into_iter()
        .filter(|name| name.as_str() != x)
        .map(|name| name.to_string())
        .collect();

    let mut source = Source::new(df);
    source.x = Some(x.to_string());
    source.num_bins = Some(num_bins);

    Ok(Intermediate::new(
        Payload::Impact { dropped, columns },
        source,
        IntermediateKind::Impact,
    ))
}

/// Narrow `df` to `[x, y]`, then drop the rows where `x` is missing.
///
/// `x` and `y` must be distinct columns.
pub fn compute_missing_impact_pair(
    df: &DataFrame,
    x: &str,
    y: &str,
    num_bins: usize,
) -> Result<Intermediate> {
    require_column(df, x)?;
    require_column(df, y)?;
    if x == y {
        return Err(MissingError::InvalidArguments(format!(
            "x and y must name different columns, both are '{x}'"
        )));
    }

    let narrowed = df.select([x, y]).context("Selecting impact columns")?;
    let dropped = drop_missing(&narrowed, x)?;

    let mut source = Source::new(df);
    source.x = Some(x.to_string());
    source.y = Some(y.to_string());
    source.num_bins = Some(num_bins);

    Ok(Intermediate::new(
        Payload::Impact {
            dropped,
            columns: vec![y.to_string()],
        },
        source,
        IntermediateKind::ImpactPair,
    ))
}

fn drop_missing(df: &DataFrame, x: &str) -> Result<DataFrame> {
    let mask = presence_filter(df.column(x)?)?;
    let dropped = df.filter(&mask).context("Dropping missing rows")?;
    debug!(
        "Dropped {} of {} rows missing in '{}'",
        df.height() - dropped.height(),
        df.height(),
        x
    );
    Ok(dropped)
}
