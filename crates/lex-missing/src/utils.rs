//! Shared helpers for dtype inspection and missing-cell detection.

use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType can hold NaN values.
#[inline]
pub fn is_float_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Check if a DataType holds discrete labels (strings, categoricals, booleans).
#[inline]
pub fn is_label_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::String
            | DataType::Categorical(_, _)
            | DataType::Enum(_, _)
            | DataType::Boolean
    )
}

// =============================================================================
// Missing Value Utilities
// =============================================================================

/// Per-cell missing flags for a column: `true` where the value is null or NaN.
pub fn missing_mask(column: &Column) -> PolarsResult<Vec<bool>> {
    let series = column.as_materialized_series();
    match series.dtype() {
        DataType::Float64 => Ok(series
            .f64()?
            .into_iter()
            .map(|v| v.is_none_or(f64::is_nan))
            .collect()),
        DataType::Float32 => Ok(series
            .f32()?
            .into_iter()
            .map(|v| v.is_none_or(f32::is_nan))
            .collect()),
        _ => Ok(series
            .is_null()
            .into_iter()
            .map(|v| v.unwrap_or(false))
            .collect()),
    }
}

/// Boolean mask that keeps the rows where `column` is present.
pub fn presence_filter(column: &Column) -> PolarsResult<BooleanChunked> {
    let keep: Vec<bool> = missing_mask(column)?.into_iter().map(|m| !m).collect();
    Ok(BooleanChunked::from_slice("mask".into(), &keep))
}

/// Non-missing values of a numeric column as `f64`, sorted ascending.
pub fn sorted_present_values(column: &Column) -> PolarsResult<Vec<f64>> {
    let float_series = column
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    let mut values: Vec<f64> = float_series
        .f64()?
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Ok(values)
}

/// Non-missing values of a column rendered as labels.
pub fn present_labels(column: &Column) -> PolarsResult<Vec<String>> {
    let str_series = column
        .as_materialized_series()
        .drop_nulls()
        .cast(&DataType::String)?;
    Ok(str_series
        .str()?
        .into_iter()
        .flatten()
        .map(|s| s.to_string())
        .collect())
}

/// Ensure `name` is a column of `df`.
pub fn require_column(df: &DataFrame, name: &str) -> crate::error::Result<()> {
    if df.get_column_names().iter().any(|c| c.as_str() == name) {
        Ok(())
    } else {
        Err(crate::error::MissingError::ColumnNotFound(name.to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================
