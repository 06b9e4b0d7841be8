//! Dense Cholesky solve of the constraint Gram system, backed by `faer`.
//!
//! The Gram matrix `S = J·Jᵗ` is symmetric positive semi-definite. When the
//! constraint Jacobian has full row rank it is positive definite and LLᵀ
//! succeeds; a rank-deficient Jacobian (coincident vertices, parallel
//! constraint gradients) makes it singular. Singularity is detected up
//! front with a relative diagonal check, by LLᵀ failure, by a vanishing
//! Cholesky pivot, or by a non-finite solution, and reported as
//! [`SolveOutcome::Singular`].

use faer::linalg::solvers::Solve;
use faer::{Mat, Side};

use crate::dense::DenseMatrix;

/// Diagonal entries smaller than this fraction of the largest diagonal
/// entry mark the system as singular.
pub const PIVOT_TOLERANCE: f64 = 1e-12;

/// Outcome of a Gram system solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveOutcome {
    /// The solution buffer holds finite multipliers.
    Solved,
    /// The system is singular; the solution buffer is unspecified.
    Singular,
}

impl SolveOutcome {
    /// Returns true for [`SolveOutcome::Solved`].
    pub fn is_solved(self) -> bool {
        matches!(self, SolveOutcome::Solved)
    }
}

/// Solver for `S·λ = C` with symmetric `S`.
pub struct GramSolver;

impl GramSolver {
    /// Solves `gram · solution = rhs` over the active `rows × rows` block.
    pub fn solve(gram: &DenseMatrix, rhs: &[f64], solution: &mut [f64]) -> SolveOutcome {
        let n = gram.rows();
        if n == 0 || gram.cols() < n || rhs.len() < n || solution.len() < n {
            return SolveOutcome::Singular;
        }

        // Pivot check: a (near-)zero diagonal means a (near-)zero Jacobian row.
        let max_diag = gram.max_abs_diagonal();
        if !max_diag.is_finite() || max_diag == 0.0 {
            return SolveOutcome::Singular;
        }
        let floor = max_diag * PIVOT_TOLERANCE;
        if (0..n).any(|i| gram.get(i, i) <= floor) {
            return SolveOutcome::Singular;
        }

        let a: Mat<f64> = Mat::from_fn(n, n, |i, j| gram.get(i, j));
        let llt = match a.as_ref().llt(Side::Lower) {
            Ok(llt) => llt,
            Err(_) => return SolveOutcome::Singular,
        };

        // LLᵀ can succeed with a vanishing last pivot on rank-deficient input.
        let l = llt.L();
        let pivot_floor = max_diag * PIVOT_TOLERANCE;
        if (0..n).any(|i| {
            let p = l[(i, i)];
            !(p * p > pivot_floor)
        }) {
            return SolveOutcome::Singular;
        }

        let b: Mat<f64> = Mat::from_fn(n, 1, |i, _| rhs[i]);
        let x = llt.solve(&b);

        for (i, slot) in solution.iter_mut().take(n).enumerate() {
            let v = x[(i, 0)];
            if !v.is_finite() {
                return SolveOutcome::Singular;
            }
            *slot = v;
        }

        SolveOutcome::Solved
    }
}
