//! Row-major dense matrix with a fixed allocation.
//!
//! The constraint solver sizes its buffers once for the largest system a
//! guide can produce and then only shrinks the number of active rows as
//! colliding vertices leave the surface. Storage is never reallocated
//! after construction.

use serde::{Deserialize, Serialize};

/// Row-major dense matrix with `capacity_rows × cols` storage.
///
/// Only the first `rows` rows are logically part of the matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    capacity_rows: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    /// Creates a zero matrix with `rows` active rows and room for exactly that many.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::with_capacity(rows, rows, cols)
    }

    /// Creates a zero matrix with `rows` active rows and `capacity_rows` allocated.
    ///
    /// `rows` is clamped to `capacity_rows`.
    pub fn with_capacity(rows: usize, capacity_rows: usize, cols: usize) -> Self {
        Self {
            rows: rows.min(capacity_rows),
            cols,
            capacity_rows,
            data: vec![0.0; capacity_rows * cols],
        }
    }

    /// Builds a matrix from row slices. All rows must have the same length.
    pub fn from_rows(rows: &[&[f64]]) -> Self {
        let cols = rows.first().map_or(0, |r| r.len());
        let mut m = Self::zeros(rows.len(), cols);
        for (r, row) in rows.iter().enumerate() {
            debug_assert_eq!(row.len(), cols);
            m.row_mut(r).copy_from_slice(row);
        }
        m
    }

    /// Number of active rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows the allocation can hold.
    #[inline]
    pub fn capacity_rows(&self) -> usize {
        self.capacity_rows
    }

    /// Changes the active row count without touching the allocation.
    ///
    /// Returns `false` (and leaves the matrix unchanged) if `rows`
    /// exceeds the allocated capacity.
    pub fn set_rows(&mut self, rows: usize) -> bool {
        if rows > self.capacity_rows {
            return false;
        }
        self.rows = rows;
        true
    }

    /// Reads element `(r, c)`.
    #[inline]
    pub fn get(&self, r: usize, c: usize) -> f64 {
        self.data[r * self.cols + c]
    }

    /// Writes element `(r, c)`.
    #[inline]
    pub fn set(&mut self, r: usize, c: usize, value: f64) {
        self.data[r * self.cols + c] = value;
    }

    /// Active row `r` as a slice.
    #[inline]
    pub fn row(&self, r: usize) -> &[f64] {
        let start = r * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Active row `r` as a mutable slice.
    #[inline]
    pub fn row_mut(&mut self, r: usize) -> &mut [f64] {
        let start = r * self.cols;
        &mut self.data[start..start + self.cols]
    }

    /// Zeroes the active rows.
    pub fn clear(&mut self) {
        let end = self.rows * self.cols;
        self.data[..end].fill(0.0);
    }

    /// Computes `self · selfᵗ` into `out`, over the active rows.
    ///
    /// `out` is set to `rows × rows`; it must have been allocated with at
    /// least that many rows and columns.
    pub fn gram_into(&self, out: &mut DenseMatrix) {
        let m = self.rows;
        debug_assert!(out.capacity_rows >= m && out.cols >= m);
        out.rows = m;
        for i in 0..m {
            let ri = self.row(i);
            for j in i..m {
                let rj = self.row(j);
                let dot: f64 = ri.iter().zip(rj).map(|(a, b)| a * b).sum();
                out.data[i * out.cols + j] = dot;
                out.data[j * out.cols + i] = dot;
            }
        }
    }

    /// Computes `selfᵗ · x` into `out` (length `cols`), over the active rows.
    pub fn transpose_mul_into(&self, x: &[f64], out: &mut [f64]) {
        debug_assert!(x.len() >= self.rows && out.len() >= self.cols);
        out[..self.cols].fill(0.0);
        for r in 0..self.rows {
            let scale = x[r];
            if scale == 0.0 {
                continue;
            }
            for (o, &a) in out.iter_mut().zip(self.row(r)) {
                *o += a * scale;
            }
        }
    }

    /// Largest absolute diagonal entry of the active square block.
    pub fn max_abs_diagonal(&self) -> f64 {
        (0..self.rows.min(self.cols))
            .map(|i| self.get(i, i).abs())
            .fold(0.0, f64::max)
    }
}
