//! Missing-value analyzers.
//!
//! - [`compute_missing_spectrum`]: presence matrix and per-row density for the whole table
//! - [`compute_missing_impact`]: drop rows missing in one column, keep every other column
//! - [`compute_missing_impact_pair`]: the same, narrowed to one other column
//!
//! Each analyzer validates its arguments before reading row data and returns a
//! fresh [`crate::types::Intermediate`].

mod impact;
mod presence;
mod spectrum;

pub use impact::{
    DEFAULT_NUM_BINS, MAX_NUM_BINS, compute_missing_impact, compute_missing_impact_pair,
};
pub use presence::PresenceMatrix;
pub use spectrum::compute_missing_spectrum;
