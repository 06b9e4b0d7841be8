//! Integration tests for strand-math.

use strand_math::{DenseMatrix, GramSolver, SolveOutcome};

// ─── DenseMatrix Tests ────────────────────────────────────────

#[test]
fn gram_of_identity_rows() {
    let j = DenseMatrix::from_rows(&[&[1.0, 0.0, 0.0], &[0.0, 2.0, 0.0]]);
    let mut s = DenseMatrix::zeros(2, 2);
    j.gram_into(&mut s);
    assert_eq!(s.get(0, 0), 1.0);
    assert_eq!(s.get(1, 1), 4.0);
    assert_eq!(s.get(0, 1), 0.0);
    assert_eq!(s.get(1, 0), 0.0);
}

#[test]
fn transpose_mul() {
    let j = DenseMatrix::from_rows(&[&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]]);
    let mut out = [0.0; 2];
    j.transpose_mul_into(&[1.0, 0.0, -1.0], &mut out);
    assert_eq!(out, [-4.0, -4.0]);
}

#[test]
fn shrinking_rows_keeps_allocation() {
    let mut m = DenseMatrix::with_capacity(4, 4, 3);
    assert!(m.set_rows(2));
    assert_eq!(m.rows(), 2);
    assert_eq!(m.capacity_rows(), 4);
    assert!(!m.set_rows(5));
    assert_eq!(m.rows(), 2);
    assert!(m.set_rows(4));
}

#[test]
fn shrunk_rows_are_ignored_by_products() {
    let mut j = DenseMatrix::from_rows(&[&[1.0, 0.0], &[0.0, 1.0], &[7.0, 7.0]]);
    j.set_rows(2);
    let mut out = [0.0; 2];
    j.transpose_mul_into(&[1.0, 1.0, 100.0], &mut out);
    assert_eq!(out, [1.0, 1.0]);
}

// ─── GramSolver Tests ─────────────────────────────────────────

#[test]
fn solves_spd_system() {
    let s = DenseMatrix::from_rows(&[&[4.0, 1.0], &[1.0, 3.0]]);
    let mut x = [0.0; 2];
    let outcome = GramSolver::solve(&s, &[1.0, 2.0], &mut x);
    assert_eq!(outcome, SolveOutcome::Solved);
    // 4x + y = 1, x + 3y = 2 → x = 1/11, y = 7/11
    assert!((x[0] - 1.0 / 11.0).abs() < 1e-12);
    assert!((x[1] - 7.0 / 11.0).abs() < 1e-12);
}

#[test]
fn zero_row_is_singular() {
    let j = DenseMatrix::from_rows(&[&[1.0, 0.0, 0.0], &[0.0, 0.0, 0.0]]);
    let mut s = DenseMatrix::zeros(2, 2);
    j.gram_into(&mut s);
    let mut x = [0.0; 2];
    assert_eq!(GramSolver::solve(&s, &[1.0, 1.0], &mut x), SolveOutcome::Singular);
}

#[test]
fn dependent_rows_are_singular() {
    let j = DenseMatrix::from_rows(&[&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]]);
    let mut s = DenseMatrix::zeros(2, 2);
    j.gram_into(&mut s);
    let mut x = [0.0; 2];
    assert!(!GramSolver::solve(&s, &[1.0, 1.0], &mut x).is_solved());
}

#[test]
fn empty_system_is_singular() {
    let s = DenseMatrix::zeros(0, 0);
    let mut x: [f64; 0] = [];
    assert_eq!(GramSolver::solve(&s, &[], &mut x), SolveOutcome::Singular);
}
