//! Exact Input-Output Kernel Regression

use crate::core::{IokrError, Regressor, Result};
use crate::kernel::KernelFunction;
use crate::solver::{
    check_predict_pair, check_regularization, check_training_pair, decode, ridge_system,
    spd_inverse,
};
use log::debug;
use nalgebra::DMatrix;
use std::time::Instant;

/// Exact IOKR: kernel ridge regression from an input RKHS to an output RKHS
/// through a decomposable operator-valued kernel.
///
/// Fitting solves the closed-form system `(K_x + n L I) Omega = I` over the
/// full `n x n` input Gram, an `O(n^3)` factorization. Prediction scores
/// every test point against a finite candidate set through
/// `S = K_x(X_te, X_tr) * Omega * K_y(Y_tr, Y_c)` and decodes each row to the
/// best-scoring candidate, the finite pre-image step that maps the continuous
/// RKHS prediction back to a valid label vector.
pub struct Iokr<Kx, Ky> {
    l: f64,
    input_kernel: Kx,
    output_kernel: Ky,
    fitted: Option<FittedIokr>,
    fit_time: f64,
    decode_time: f64,
}

pub(crate) struct FittedIokr {
    pub(crate) x_tr: DMatrix<f64>,
    pub(crate) y_tr: DMatrix<f64>,
    /// Dual coefficients `(K_x + n L I)^{-1}`, `n x n`
    pub(crate) omega: DMatrix<f64>,
}

impl<Kx: KernelFunction, Ky: KernelFunction> Iokr<Kx, Ky> {
    /// Create an exact IOKR solver with ridge penalty `l`
    pub fn new(l: f64, input_kernel: Kx, output_kernel: Ky) -> Result<Self> {
        check_regularization(l)?;
        Ok(Self {
            l,
            input_kernel,
            output_kernel,
            fitted: None,
            fit_time: 0.0,
            decode_time: 0.0,
        })
    }

    /// Ridge penalty `L`
    pub fn regularization(&self) -> f64 {
        self.l
    }

    /// Dual coefficient matrix, available after `fit`
    pub fn coefficients(&self) -> Option<&DMatrix<f64>> {
        self.fitted.as_ref().map(|f| &f.omega)
    }

    /// Input kernel used for Gram computations
    pub fn input_kernel(&self) -> &Kx {
        &self.input_kernel
    }

    /// Output kernel used for Gram computations
    pub fn output_kernel(&self) -> &Ky {
        &self.output_kernel
    }

    pub(crate) fn restore_fitted(
        &mut self,
        x_tr: DMatrix<f64>,
        y_tr: DMatrix<f64>,
        omega: DMatrix<f64>,
    ) {
        self.fitted = Some(FittedIokr { x_tr, y_tr, omega });
    }

    pub(crate) fn fitted_state(&self) -> Option<&FittedIokr> {
        self.fitted.as_ref()
    }
}

impl<Kx: KernelFunction, Ky: KernelFunction> Regressor for Iokr<Kx, Ky> {
    fn fit(&mut self, x_tr: &DMatrix<f64>, y_tr: &DMatrix<f64>) -> Result<()> {
        check_training_pair(x_tr, y_tr)?;
        let n = x_tr.nrows();

        let start = Instant::now();
        let k_x = self.input_kernel.compute_gram(x_tr, x_tr);
        debug!("IOKR fit: inverting {n} x {n} ridge system");
        let omega = spd_inverse(ridge_system(&k_x, self.l))?;
        self.fit_time = start.elapsed().as_secs_f64();

        self.fitted = Some(FittedIokr {
            x_tr: x_tr.clone(),
            y_tr: y_tr.clone(),
            omega,
        });
        Ok(())
    }

    fn predict(&mut self, x_te: &DMatrix<f64>, y_c: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        let fitted = self.fitted.as_ref().ok_or(IokrError::ModelNotFitted)?;
        check_predict_pair(x_te, y_c, fitted.x_tr.ncols(), fitted.y_tr.ncols())?;

        let k_x_te = self.input_kernel.compute_gram(x_te, &fitted.x_tr);

        let start = Instant::now();
        let k_y_c = self.output_kernel.compute_gram(&fitted.y_tr, y_c);
        let scores = &k_x_te * &fitted.omega * k_y_c;
        let decoded = decode(&scores, y_c);
        self.decode_time = start.elapsed().as_secs_f64();

        Ok(decoded)
    }

    fn fit_time(&self) -> f64 {
        self.fit_time
    }

    fn decode_time(&self) -> f64 {
        self.decode_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{GaussianKernel, LinearKernel};

    fn toy_data() -> (DMatrix<f64>, DMatrix<f64>, DMatrix<f64>) {
        // 4 orthonormal training points, 2 binary labels, 3 distinct label
        // vectors. With a linear input kernel the Gram is the identity, so
        // decoding a training point scores its own label row exactly.
        let x = DMatrix::identity(4, 4);
        let y = DMatrix::from_row_slice(4, 2, &[1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        let y_c = DMatrix::from_row_slice(3, 2, &[0.0, 1.0, 1.0, 0.0, 1.0, 1.0]);
        (x, y, y_c)
    }

    #[test]
    fn test_iokr_rejects_negative_regularization() {
        assert!(Iokr::new(-1.0, LinearKernel::new(), LinearKernel::new()).is_err());
    }

    #[test]
    fn test_iokr_predict_before_fit_fails() {
        let (x, _, y_c) = toy_data();
        let mut solver =
            Iokr::new(1e-6, LinearKernel::new(), LinearKernel::new()).expect("valid L");
        assert!(matches!(
            solver.predict(&x, &y_c),
            Err(IokrError::ModelNotFitted)
        ));
    }

    #[test]
    fn test_iokr_fit_rejects_row_mismatch() {
        let (x, _, _) = toy_data();
        let y_bad = DMatrix::zeros(3, 2);
        let mut solver =
            Iokr::new(1e-6, LinearKernel::new(), LinearKernel::new()).expect("valid L");
        assert!(matches!(
            solver.fit(&x, &y_bad),
            Err(IokrError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_iokr_recovers_training_labels_on_toy_set() {
        let (x, y, y_c) = toy_data();
        let mut solver =
            Iokr::new(1e-6, LinearKernel::new(), LinearKernel::new()).expect("valid L");
        solver.fit(&x, &y).expect("fit succeeds");

        // Predicting the training points themselves recovers their own labels
        let predicted = solver.predict(&x, &y_c).expect("predict succeeds");
        assert_eq!(predicted, y);
    }

    #[test]
    fn test_iokr_predictions_are_candidate_rows() {
        let (x, y, y_c) = toy_data();
        let mut solver =
            Iokr::new(1e-3, GaussianKernel::new(0.5), GaussianKernel::new(1.0)).expect("valid L");
        solver.fit(&x, &y).expect("fit succeeds");

        let x_te = DMatrix::from_row_slice(2, 4, &[0.5, 0.5, 0.0, 0.1, 0.0, 0.2, 0.9, 0.0]);
        let predicted = solver.predict(&x_te, &y_c).expect("predict succeeds");

        for i in 0..predicted.nrows() {
            let is_candidate = (0..y_c.nrows()).any(|j| predicted.row(i) == y_c.row(j));
            assert!(is_candidate, "row {i} is not a candidate row");
        }
    }

    #[test]
    fn test_iokr_populates_timing_fields() {
        let (x, y, y_c) = toy_data();
        let mut solver =
            Iokr::new(1e-6, LinearKernel::new(), LinearKernel::new()).expect("valid L");
        assert_eq!(solver.fit_time(), 0.0);

        solver.fit(&x, &y).expect("fit succeeds");
        solver.predict(&x, &y_c).expect("predict succeeds");
        assert!(solver.fit_time() >= 0.0);
        assert!(solver.decode_time() >= 0.0);
    }

    #[test]
    fn test_iokr_refit_overwrites_coefficients() {
        let (x, y, _) = toy_data();
        let mut solver =
            Iokr::new(1e-6, GaussianKernel::new(1.0), LinearKernel::new()).expect("valid L");

        solver.fit(&x, &y).expect("first fit");
        let first = solver.coefficients().expect("fitted").clone();

        let x_small = DMatrix::from_row_slice(2, 4, &[1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        let y_small = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 1.0]);
        solver.fit(&x_small, &y_small).expect("second fit");
        let second = solver.coefficients().expect("fitted");

        assert_ne!(first.nrows(), second.nrows());
    }
}
