//! Row-major numeric table: rows are time samples, columns are depth cells.

use crate::error::{Result, YieldError};

/// Immutable 2D array of `f64` values.
///
/// Rows are time samples at a fixed interval; columns are 1 m depth cells
/// counted upwards from the seabed.
///
/// # Examples
///
/// ```
/// use tidal_yield::table::Table;
///
/// let t = Table::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
/// assert_eq!(t.shape(), (2, 2));
/// assert_eq!(t.row(1), &[3.0, 4.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Table {
    /// Builds a table from row vectors.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if any row differs in length from the first.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let n = rows.len();
        let mut data = Vec::with_capacity(n * cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(YieldError::shape("ragged table row", (i, cols), (i, row.len())));
            }
            data.extend(row);
        }
        Ok(Self {
            rows: n,
            cols,
            data,
        })
    }

    /// Builds a table by evaluating `f(row, col)` for every cell.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Self { rows, cols, data }
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrows one time sample across all depth cells.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.rows()`.
    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on zero, and a zero-column table has no cells anyway
        self.data.chunks_exact(self.cols.max(1))
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, col: usize) -> Option<Vec<f64>> {
        (col < self.cols).then(|| self.iter_rows().map(|r| r[col]).collect())
    }

    /// Applies `f` to every cell, keeping the shape.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ragged_rows_rejected() {
        let err = Table::from_rows(vec![vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(err, Err(YieldError::DimensionMismatch { .. })));
    }

    #[test]
    fn empty_table_has_zero_shape() {
        let t = Table::from_rows(Vec::new()).unwrap();
        assert_eq!(t.shape(), (0, 0));
        assert!(t.is_empty());
        assert_eq!(t.iter_rows().count(), 0);
    }

    #[test]
    fn column_extracts_in_row_order() {
        let t = Table::from_fn(3, 2, |r, c| (r * 10 + c) as f64);
        assert_eq!(t.column(1), Some(vec![1.0, 11.0, 21.0]));
        assert_eq!(t.column(2), None);
    }

    #[test]
    fn map_preserves_shape() {
        let t = Table::from_fn(2, 3, |_, _| 2.0).map(|v| v * v);
        assert_eq!(t.shape(), (2, 3));
        assert!(t.iter_rows().flatten().all(|&v| v == 4.0));
    }
}
