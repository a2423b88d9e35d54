//! Column type gate.
//!
//! The analyzers only accept tables whose columns are numeric or categorical.
//! Classification is pluggable through [`ColumnClassifier`]; the default
//! [`DtypeClassifier`] decides from the polars dtype alone and never reads
//! row data.

use crate::error::{MissingError, Result};
use crate::utils::{is_label_dtype, is_numeric_dtype};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Coarse type tag for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Numeric,
    Categorical,
}

/// Maps a column to a [`ColumnType`].
///
/// Implementations return [`MissingError::UnclassifiableColumn`] for columns
/// that are neither numeric nor categorical.
pub trait ColumnClassifier: Send + Sync {
    fn classify(&self, column: &Column) -> Result<ColumnType>;
}

/// Classifies columns by dtype: integers and floats are numeric; strings,
/// categoricals and booleans are categorical.
#[derive(Debug, Clone, Copy, Default)]
pub struct DtypeClassifier;

impl ColumnClassifier for DtypeClassifier {
    fn classify(&self, column: &Column) -> Result<ColumnType> {
        let dtype = column.dtype();
        if is_numeric_dtype(dtype) {
            Ok(ColumnType::Numeric)
        } else if is_label_dtype(dtype) {
            Ok(ColumnType::Categorical)
        } else {
            Err(MissingError::UnclassifiableColumn {
                column: column.name().to_string(),
                dtype: format!("{:?}", dtype),
            })
        }
    }
}

/// Classify every column of `df`, stopping at the first one the classifier rejects.
///
/// Returns the column types in table order.
pub fn validate_column_types(
    df: &DataFrame,
    classifier: &dyn ColumnClassifier,
) -> Result<Vec<ColumnType>> {
    let types = df
        .get_columns()
        .iter()
        .map(|column| {
            classifier
                .classify(column)
                .map_err(|err| MissingError::UnsupportedColumnType {
                    column: column.name().to_string(),
                    dtype: match err {
                        MissingError::UnclassifiableColumn { dtype, .. } => dtype,
                        _ => format!("{:?}", column.dtype()),
                    },
                })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!("All {} columns passed the type gate", types.len());
    Ok(types)
}
