//! Kernel ridge regression solvers
//!
//! This module implements exact Input-Output Kernel Regression (IOKR) and its
//! three randomized-sketch accelerations: SIOKR (output-side sketch), ISOKR
//! (input-side sketch, a Nystrom-style reduced system) and SISOKR (both sides
//! sketched independently). All four share the [`Regressor`](crate::core::Regressor)
//! contract and differ only in internal linear-algebra shortcuts.

pub mod iokr;
pub mod isokr;
pub mod siokr;
pub mod sisokr;

pub use self::iokr::*;
pub use self::isokr::*;
pub use self::siokr::*;
pub use self::sisokr::*;

use crate::core::{IokrError, Result};
use nalgebra::DMatrix;

/// Relative cutoff for singular values in pseudo-inverses of sketched Grams
const PINV_EPS: f64 = 1e-10;

/// Assemble the ridge-regularized system `K + n * l * I`
pub(crate) fn ridge_system(k: &DMatrix<f64>, l: f64) -> DMatrix<f64> {
    let n = k.nrows();
    k + DMatrix::identity(n, n) * (n as f64 * l)
}

/// Invert a symmetric positive-definite matrix via Cholesky
pub(crate) fn spd_inverse(m: DMatrix<f64>) -> Result<DMatrix<f64>> {
    let n = m.nrows();
    m.cholesky()
        .map(|chol| chol.inverse())
        .ok_or_else(|| singular(n))
}

/// Solve `M X = Rhs` for symmetric positive-definite `M` via Cholesky
pub(crate) fn spd_solve(m: DMatrix<f64>, rhs: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    let n = m.nrows();
    m.cholesky()
        .map(|chol| chol.solve(rhs))
        .ok_or_else(|| singular(n))
}

/// Moore-Penrose pseudo-inverse via SVD.
///
/// Sketched output Grams `R K_y R^T` are PSD but can be numerically
/// rank-deficient, so a plain inverse is not safe here.
pub(crate) fn pseudo_inverse(m: DMatrix<f64>) -> Result<DMatrix<f64>> {
    m.pseudo_inverse(PINV_EPS)
        .map_err(|e| IokrError::SingularSystem(format!("SVD failed: {e}")))
}

fn singular(n: usize) -> IokrError {
    IokrError::SingularSystem(format!(
        "Cholesky factorization of the {n} x {n} ridge system failed; increase the regularization L"
    ))
}

/// Decode continuous scores to discrete label vectors.
///
/// For each row of `scores` (`p x c`), picks the candidate column with the
/// highest score and copies the corresponding row of `y_c` (`c x dy`) into
/// the output. Ties resolve to the lowest candidate index (strict `>`
/// comparison), keeping results deterministic.
pub(crate) fn decode(scores: &DMatrix<f64>, y_c: &DMatrix<f64>) -> DMatrix<f64> {
    let mut decoded = DMatrix::zeros(scores.nrows(), y_c.ncols());
    for i in 0..scores.nrows() {
        let mut best = 0;
        let mut best_score = scores[(i, 0)];
        for j in 1..scores.ncols() {
            if scores[(i, j)] > best_score {
                best = j;
                best_score = scores[(i, j)];
            }
        }
        decoded.set_row(i, &y_c.row(best));
    }
    decoded
}

/// Validate a training pair: matching row counts, no empty matrices
pub(crate) fn check_training_pair(x: &DMatrix<f64>, y: &DMatrix<f64>) -> Result<()> {
    if x.nrows() == 0 || x.ncols() == 0 || y.ncols() == 0 {
        return Err(IokrError::EmptyDataset);
    }
    if y.nrows() != x.nrows() {
        return Err(IokrError::DimensionMismatch {
            expected: x.nrows(),
            actual: y.nrows(),
        });
    }
    Ok(())
}

/// Validate a sketch matrix against the training sample count
pub(crate) fn check_sketch_width(r: &DMatrix<f64>, n: usize) -> Result<()> {
    if r.ncols() != n {
        return Err(IokrError::DimensionMismatch {
            expected: n,
            actual: r.ncols(),
        });
    }
    Ok(())
}

/// Validate prediction inputs against the stored training data
pub(crate) fn check_predict_pair(
    x_te: &DMatrix<f64>,
    y_c: &DMatrix<f64>,
    dx: usize,
    dy: usize,
) -> Result<()> {
    if x_te.nrows() == 0 || y_c.nrows() == 0 {
        return Err(IokrError::EmptyDataset);
    }
    if x_te.ncols() != dx {
        return Err(IokrError::DimensionMismatch {
            expected: dx,
            actual: x_te.ncols(),
        });
    }
    if y_c.ncols() != dy {
        return Err(IokrError::DimensionMismatch {
            expected: dy,
            actual: y_c.ncols(),
        });
    }
    Ok(())
}

/// Validate a regularization parameter
pub(crate) fn check_regularization(l: f64) -> Result<()> {
    if !l.is_finite() || l < 0.0 {
        return Err(IokrError::InvalidParameter(format!(
            "regularization L must be finite and non-negative, got {l}"
        )));
    }
    Ok(())
}
