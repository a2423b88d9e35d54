//! Presence matrix: one missing flag per (column, row) cell.

use crate::parallel::rayon_pool;
use crate::utils::missing_mask;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;

/// Boolean matrix of logical shape (columns × rows); a cell is `true` when
/// the value is missing.
///
/// Cells are stored row-major, so each row's flags form one contiguous slice
/// that a density task can read on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresenceMatrix {
    column_names: Vec<String>,
    n_rows: usize,
    cells: Vec<bool>,
}

impl PresenceMatrix {
    /// Build the full matrix for `df`.
    pub fn from_dataframe(df: &DataFrame) -> PolarsResult<Self> {
        let column_names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let n_rows = df.height();
        let n_cols = column_names.len();

        let masks = df
            .get_columns()
            .iter()
            .map(missing_mask)
            .collect::<PolarsResult<Vec<_>>>()?;

        let mut cells = vec![false; n_rows * n_cols];
        for (c, mask) in masks.iter().enumerate() {
            for (r, &missing) in mask.iter().enumerate() {
                cells[r * n_cols + c] = missing;
            }
        }

        Ok(Self {
            column_names,
            n_rows,
            cells,
        })
    }

    pub fn n_columns(&self) -> usize {
        self.column_names.len()
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Shape as (columns, rows).
    pub fn shape(&self) -> (usize, usize) {
        (self.n_columns(), self.n_rows)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Whether the cell at (`column`, `row`) is missing. Out-of-range positions return `None`.
    pub fn is_missing(&self, column: usize, row: usize) -> Option<bool> {
        if column >= self.n_columns() || row >= self.n_rows {
            return None;
        }
        Some(self.cells[row * self.n_columns() + column])
    }

    /// Missing flags of one row, in column order. Out-of-range rows return `None`.
    pub fn row(&self, row: usize) -> Option<&[bool]> {
        if row >= self.n_rows {
            return None;
        }
        let width = self.n_columns();
        self.cells.get(row * width..(row + 1) * width)
    }

    /// Fraction of present cells per row, in row order.
    ///
    /// Rows are processed independently on the crate pool; the indexed collect
    /// keeps the output aligned with row indices. A table without columns has
    /// no present cells, so every row scores 0.0.
    pub fn row_densities(&self) -> Vec<f64> {
        let width = self.n_columns();
        if width == 0 {
            return vec![0.0; self.n_rows];
        }

        match rayon_pool() {
            Some(pool) => pool.install(|| {
                self.cells
                    .par_chunks(width)
                    .map(row_density)
                    .collect()
            }),
            None => self.row_densities_sequential(),
        }
    }

    /// Sequential variant of [`Self::row_densities`].
    pub fn row_densities_sequential(&self) -> Vec<f64> {
        let width = self.n_columns();
        if width == 0 {
            return vec![0.0; self.n_rows];
        }
        self.cells.chunks(width).map(row_density).collect()
    }

    /// Fraction of missing rows per column, in column order. Empty tables score 0.0.
    pub fn column_missing_rates(&self) -> Vec<f64> {
        let width = self.n_columns();
        if self.n_rows == 0 || width == 0 {
            return vec![0.0; width];
        }

        let mut counts = vec![0usize; width];
        for row in self.cells.chunks(width) {
            for (count, &missing) in counts.iter_mut().zip(row) {
                if missing {
                    *count += 1;
                }
            }
        }

        counts
            .into_iter()
            .map(|count| count as f64 / self.n_rows as f64)
            .collect()
    }

    /// Keep at most the first `num_cols` columns and `num_rows` rows.
    ///
    /// Caps larger than the matrix clamp to its bounds; `None` keeps the full extent.
    pub fn truncate(&self, num_rows: Option<usize>, num_cols: Option<usize>) -> Self {
        let width = self.n_columns();
        let keep_cols = num_cols.map_or(width, |n| n.min(width));
        let keep_rows = num_rows.map_or(self.n_rows, |n| n.min(self.n_rows));

        if keep_cols == width && keep_rows == self.n_rows {
            return self.clone();
        }

        let mut cells = Vec::with_capacity(keep_rows * keep_cols);
        if width > 0 {
            for row in self.cells.chunks(width).take(keep_rows) {
                cells.extend_from_slice(&row[..keep_cols]);
            }
        }

        Self {
            column_names: self.column_names[..keep_cols].to_vec(),
            n_rows: keep_rows,
            cells,
        }
    }

    /// 0/1 indicator matrix with one inner vector per column.
    pub fn to_indicator_rows(&self) -> Vec<Vec<u8>> {
        (0..self.n_columns())
            .map(|c| {
                (0..self.n_rows)
                    .map(|r| u8::from(self.cells[r * self.n_columns() + c]))
                    .collect()
            })
            .collect()
    }
}

fn row_density(row: &[bool]) -> f64 {
    let missing = row.iter().filter(|&&m| m).count();
    1.0 - missing as f64 / row.len() as f64
}
