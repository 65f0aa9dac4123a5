//! Core traits for kernel regression solvers

use crate::core::Result;
use nalgebra::DMatrix;

/// Common contract shared by the exact and sketched IOKR solvers.
///
/// All four variants (IOKR, SIOKR, ISOKR, SISOKR) are interchangeable at the
/// call site: `fit` learns the dual coefficients from training inputs and
/// label vectors, `predict` regresses test inputs onto a finite candidate set
/// and decodes each row to the best-scoring candidate. The timing accessors
/// report wall-clock seconds for the most recent `fit`/`predict` call and are
/// meant purely for benchmarking.
pub trait Regressor {
    /// Learn the dual coefficients from training data.
    ///
    /// `x_tr` is `n x dx` (rows are input vectors), `y_tr` is `n x dy`
    /// (rows are label vectors). Refitting overwrites any previous state.
    fn fit(&mut self, x_tr: &DMatrix<f64>, y_tr: &DMatrix<f64>) -> Result<()>;

    /// Predict label vectors for test inputs by decoding against candidates.
    ///
    /// `x_te` is `p x dx`, `y_c` is `c x dy`. Every row of the returned
    /// `p x dy` matrix is an exact row of `y_c`. Fails with
    /// [`IokrError::ModelNotFitted`](crate::core::IokrError::ModelNotFitted)
    /// if called before `fit`.
    fn predict(&mut self, x_te: &DMatrix<f64>, y_c: &DMatrix<f64>) -> Result<DMatrix<f64>>;

    /// Wall-clock seconds spent in the last `fit` call.
    fn fit_time(&self) -> f64;

    /// Wall-clock seconds spent scoring and decoding in the last `predict`.
    fn decode_time(&self) -> f64;
}
