//! Constraint vector, Jacobian and Gram buffers for one guide solve.
//!
//! Row layout:
//!
//! ```text
//! rows 0 .. n−1         inextensibility  C_i = |v_{i+1} − v_i|² − 1
//! rows n−1 .. n−1+k     interpenetration C_j = (v_j − p_j) · d_j
//! ```
//!
//! Columns are the 3 coordinates of every non-root vertex, vertex `v`
//! occupying `3(v−1) .. 3(v−1)+3`. All buffers are sized for the worst
//! case (every non-root vertex colliding) up front; the active row count
//! only ever shrinks while a solve runs.

use strand_math::{DenseMatrix, GramSolver, SolveOutcome, Vec3};

/// One active interpenetration constraint, in unit-length space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionRow {
    /// Index of the colliding vertex (never the root).
    pub vertex: usize,
    /// Closest surface point.
    pub point: Vec3,
    /// Unit direction towards the surface.
    pub direction: Vec3,
}

impl CollisionRow {
    /// Constraint value at `v`: negative while behind the surface.
    #[inline]
    pub fn value(&self, v: Vec3) -> f64 {
        (v - self.point).dot(self.direction)
    }
}

/// Fixed-capacity constraint buffers.
#[derive(Debug, Clone)]
pub struct ConstraintSet {
    segments: usize,
    collisions: Vec<CollisionRow>,
    values: Vec<f64>,
    jacobian: DenseMatrix,
    gram: DenseMatrix,
    multipliers: Vec<f64>,
    correction: Vec<f64>,
}

impl ConstraintSet {
    /// Allocates buffers for a guide of `vertex_count` vertices.
    pub fn new(vertex_count: usize) -> Self {
        let segments = vertex_count.saturating_sub(1);
        let capacity = 2 * segments;
        let dofs = 3 * segments;
        Self {
            segments,
            collisions: Vec::with_capacity(segments),
            values: vec![0.0; capacity],
            jacobian: DenseMatrix::with_capacity(segments, capacity, dofs),
            gram: DenseMatrix::with_capacity(segments, capacity, capacity),
            multipliers: vec![0.0; capacity],
            correction: vec![0.0; dofs],
        }
    }

    /// Replaces the interpenetration block.
    ///
    /// Rows for the root or for vertices beyond the guide are ignored,
    /// as are rows past the allocated capacity.
    pub fn set_collisions(&mut self, rows: impl IntoIterator<Item = CollisionRow>) {
        self.collisions.clear();
        let segments = self.segments;
        self.collisions.extend(
            rows.into_iter()
                .filter(|r| r.vertex >= 1 && r.vertex <= segments)
                .take(segments),
        );
        self.jacobian.set_rows(self.active_rows());
    }

    /// Number of inextensibility rows.
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.segments
    }

    /// Number of interpenetration rows.
    #[inline]
    pub fn colliding_count(&self) -> usize {
        self.collisions.len()
    }

    /// Active interpenetration rows.
    pub fn collisions(&self) -> &[CollisionRow] {
        &self.collisions
    }

    /// Active constraint rows.
    #[inline]
    pub fn active_rows(&self) -> usize {
        self.segments + self.collisions.len()
    }

    /// Allocated constraint rows (`2(n−1)`).
    #[inline]
    pub fn capacity_rows(&self) -> usize {
        self.jacobian.capacity_rows()
    }

    /// Current constraint values (active rows).
    pub fn values(&self) -> &[f64] {
        &self.values[..self.active_rows()]
    }

    /// Evaluates C at `vertices` and returns `max |C_i|`.
    pub fn evaluate(&mut self, vertices: &[Vec3]) -> f64 {
        for i in 0..self.segments {
            self.values[i] = vertices[i + 1].distance_squared(vertices[i]) - 1.0;
        }
        for (r, row) in self.collisions.iter().enumerate() {
            self.values[self.segments + r] = row.value(vertices[row.vertex]);
        }
        self.values()
            .iter()
            .fold(0.0, |acc: f64, c| acc.max(c.abs()))
    }

    /// Evaluates the Jacobian of the active rows at `vertices`.
    pub fn evaluate_jacobian(&mut self, vertices: &[Vec3]) {
        self.jacobian.set_rows(self.active_rows());
        self.jacobian.clear();

        for i in 0..self.segments {
            let grad = (vertices[i + 1] - vertices[i]) * 2.0;
            let row = self.jacobian.row_mut(i);
            write_block(row, i + 1, grad);
            if i >= 1 {
                write_block(row, i, -grad);
            }
        }
        for (r, c) in self.collisions.iter().enumerate() {
            write_block(self.jacobian.row_mut(self.segments + r), c.vertex, c.direction);
        }
    }

    /// Solves `(NC·NCᵗ)·λ = C` for the multipliers.
    pub fn solve_multipliers(&mut self) -> SolveOutcome {
        self.jacobian.gram_into(&mut self.gram);
        let rows = self.active_rows();
        GramSolver::solve(&self.gram, &self.values[..rows], &mut self.multipliers[..rows])
    }

    /// Computes `dX = −NCᵗ·λ` and adds it to every non-root vertex.
    ///
    /// Returns `false` without touching `vertices` if the correction is
    /// not finite.
    pub fn apply_correction(&mut self, vertices: &mut [Vec3]) -> bool {
        let rows = self.active_rows();
        self.jacobian
            .transpose_mul_into(&self.multipliers[..rows], &mut self.correction);
        if self.correction.iter().any(|d| !d.is_finite()) {
            return false;
        }
        for (k, v) in vertices.iter_mut().enumerate().skip(1).take(self.segments) {
            let c = 3 * (k - 1);
            *v -= Vec3::new(self.correction[c], self.correction[c + 1], self.correction[c + 2]);
        }
        true
    }

    /// Drops interpenetration rows whose vertex no longer satisfies
    /// `keep` and shrinks the active size. Returns the removed vertices.
    pub fn retain_collisions(&mut self, mut keep: impl FnMut(&CollisionRow) -> bool) -> Vec<usize> {
        let mut removed = Vec::new();
        self.collisions.retain(|row| {
            let kept = keep(row);
            if !kept {
                removed.push(row.vertex);
            }
            kept
        });
        self.jacobian.set_rows(self.active_rows());
        removed
    }
}

#[inline]
fn write_block(row: &mut [f64], vertex: usize, value: Vec3) {
    let c = 3 * (vertex - 1);
    row[c] = value.x;
    row[c + 1] = value.y;
    row[c + 2] = value.z;
}
