//! Result container shared by the analyzers and renderers.

use crate::analysis::PresenceMatrix;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// Intermediate Result
// ============================================================================

/// Which analyzer produced an [`Intermediate`].
///
/// Renderers branch on this to pick a chart type; analyzers never read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntermediateKind {
    /// Whole-table presence matrix and row densities.
    Spectrum,
    /// Impact of one column's missingness on every other column.
    Impact,
    /// Impact of one column's missingness on one other column.
    ImpactPair,
}

impl IntermediateKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Spectrum => "Missing Spectrum",
            Self::Impact => "Missing Impact",
            Self::ImpactPair => "Missing Impact (pair)",
        }
    }
}

/// Kind-specific computed data.
#[derive(Debug, Clone)]
pub enum Payload {
    Spectrum {
        /// Presence matrix, truncated to the requested caps.
        distribution: PresenceMatrix,
        /// Per-row fraction of present cells over the full table.
        density: Vec<f64>,
        /// Per-column fraction of missing rows over the full table.
        column_missing_rates: Vec<f64>,
    },
    Impact {
        /// Rows of the (possibly narrowed) table where the designated column is present.
        dropped: DataFrame,
        /// Remaining columns to characterize, in table order.
        columns: Vec<String>,
    },
}

/// The table and arguments that produced an [`Intermediate`].
#[derive(Debug, Clone)]
pub struct Source {
    pub df: DataFrame,
    pub x: Option<String>,
    pub y: Option<String>,
    pub num_bins: Option<usize>,
    pub num_rows: Option<usize>,
    pub num_cols: Option<usize>,
}

impl Source {
    pub(crate) fn new(df: &DataFrame) -> Self {
        Self {
            df: df.clone(),
            x: None,
            y: None,
            num_bins: None,
            num_rows: None,
            num_cols: None,
        }
    }
}

/// Computed-but-not-rendered statistics from one analyzer call.
///
/// Immutable once returned: fields are only reachable through accessors.
#[derive(Debug, Clone)]
pub struct Intermediate {
    payload: Payload,
    source: Source,
    kind: IntermediateKind,
}

impl Intermediate {
    pub(crate) fn new(payload: Payload, source: Source, kind: IntermediateKind) -> Self {
        Self {
            payload,
            source,
            kind,
        }
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn kind(&self) -> IntermediateKind {
        self.kind
    }

    /// Filtered table and remaining column names, for impact results.
    pub fn impact(&self) -> Option<(&DataFrame, &[String])> {
        match &self.payload {
            Payload::Impact { dropped, columns } => Some((dropped, columns.as_slice())),
            Payload::Spectrum { .. } => None,
        }
    }

    /// Presence matrix and row densities, for spectrum results.
    pub fn spectrum(&self) -> Option<(&PresenceMatrix, &[f64])> {
        match &self.payload {
            Payload::Spectrum {
                distribution,
                density,
                ..
            } => Some((distribution, density.as_slice())),
            Payload::Impact { .. } => None,
        }
    }

    /// Serializable overview of this result.
    pub fn summary(&self) -> IntermediateSummary {
        let (payload_shape, columns) = match &self.payload {
            Payload::Spectrum { distribution, .. } => (
                distribution.shape(),
                distribution.column_names().to_vec(),
            ),
            Payload::Impact { dropped, columns } => {
                ((dropped.width(), dropped.height()), columns.clone())
            }
        };

        IntermediateSummary {
            kind: self.kind,
            source_shape: (self.source.df.width(), self.source.df.height()),
            payload_shape,
            columns,
            x: self.source.x.clone(),
            y: self.source.y.clone(),
            num_bins: self.source.num_bins,
            num_rows: self.source.num_rows,
            num_cols: self.source.num_cols,
        }
    }
}

/// Overview of an [`Intermediate`] for logs and JSON output.
///
/// Shapes are reported as (columns, rows).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntermediateSummary {
    pub kind: IntermediateKind,
    pub source_shape: (usize, usize),
    pub payload_shape: (usize, usize),
    pub columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_bins: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_cols: Option<usize>,
}

// ============================================================================
// Tests
// ============================================================================
