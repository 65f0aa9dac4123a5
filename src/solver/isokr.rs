//! Input-sketched Input-Output Kernel Regression

use crate::core::{IokrError, Regressor, Result};
use crate::kernel::KernelFunction;
use crate::solver::{
    check_predict_pair, check_regularization, check_sketch_width, check_training_pair, decode,
    spd_solve,
};
use log::debug;
use nalgebra::DMatrix;
use std::time::Instant;

/// ISOKR: Nystrom-style input-side sketching with exact output decoding.
///
/// The dual coefficients are constrained to the sketched subspace,
/// `Omega = R^T B`, and `B` solves the `m x m` reduced system
/// `(R K_x^2 R^T + n L R K_x R^T) B = R K_x`, so the fit-time factorization
/// costs `O(m^3)` instead of `O(n^3)`. This is the lever for scaling the
/// training-set size. Prediction keeps the exact output kernel against the
/// full candidate set: `S = (K_x(X_te, X_tr) R^T) * B * K_y(Y_tr, Y_c)`, so
/// decoding quality is governed only by the input sketch's fidelity. With a
/// sub-sampling sketch at `m = n` the reduced system collapses back to the
/// exact one.
pub struct Isokr<Kx, Ky> {
    l: f64,
    input_kernel: Kx,
    output_kernel: Ky,
    /// Input sketch, `m x n`
    r: DMatrix<f64>,
    fitted: Option<FittedIsokr>,
    fit_time: f64,
    decode_time: f64,
}

struct FittedIsokr {
    x_tr: DMatrix<f64>,
    y_tr: DMatrix<f64>,
    /// Reduced dual coefficients, `m x n`
    b: DMatrix<f64>,
}

impl<Kx: KernelFunction, Ky: KernelFunction> Isokr<Kx, Ky> {
    /// Create an ISOKR solver with ridge penalty `l` and a pre-drawn input
    /// sketch `r`
    pub fn new(l: f64, input_kernel: Kx, output_kernel: Ky, r: DMatrix<f64>) -> Result<Self> {
        check_regularization(l)?;
        if r.nrows() == 0 || r.nrows() > r.ncols() {
            return Err(IokrError::InvalidSketch(format!(
                "input sketch must be m x n with 0 < m <= n, got {} x {}",
                r.nrows(),
                r.ncols()
            )));
        }
        Ok(Self {
            l,
            input_kernel,
            output_kernel,
            r,
            fitted: None,
            fit_time: 0.0,
            decode_time: 0.0,
        })
    }

    /// Sketch dimension `m` of the input side
    pub fn sketch_size(&self) -> usize {
        self.r.nrows()
    }
}

impl<Kx: KernelFunction, Ky: KernelFunction> Regressor for Isokr<Kx, Ky> {
    fn fit(&mut self, x_tr: &DMatrix<f64>, y_tr: &DMatrix<f64>) -> Result<()> {
        check_training_pair(x_tr, y_tr)?;
        let n = x_tr.nrows();
        check_sketch_width(&self.r, n)?;
        let m = self.r.nrows();

        let start = Instant::now();
        let k_x = self.input_kernel.compute_gram(x_tr, x_tr);
        // R K_x^2 R^T = (K_x R^T)^T (K_x R^T) since K_x is symmetric
        let kr_t = k_x * self.r.transpose();
        let rkr_t = &self.r * &kr_t;
        let reduced = kr_t.transpose() * &kr_t + rkr_t * (n as f64 * self.l);
        debug!("ISOKR fit: reduced {m} x {m} system for n = {n}");
        let b = spd_solve(reduced, &kr_t.transpose())?;
        self.fit_time = start.elapsed().as_secs_f64();

        self.fitted = Some(FittedIsokr {
            x_tr: x_tr.clone(),
            y_tr: y_tr.clone(),
            b,
        });
        Ok(())
    }

    fn predict(&mut self, x_te: &DMatrix<f64>, y_c: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        let fitted = self.fitted.as_ref().ok_or(IokrError::ModelNotFitted)?;
        check_predict_pair(x_te, y_c, fitted.x_tr.ncols(), fitted.y_tr.ncols())?;

        let k_x_te_sketched =
            self.input_kernel.compute_gram(x_te, &fitted.x_tr) * self.r.transpose();

        let start = Instant::now();
        let k_y_c = self.output_kernel.compute_gram(&fitted.y_tr, y_c);
        let scores = &k_x_te_sketched * &fitted.b * k_y_c;
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
    use crate::kernel::GaussianKernel;
    use crate::sketch::{Sketch, SubSample};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn clustered_data() -> (DMatrix<f64>, DMatrix<f64>, DMatrix<f64>) {
        let x = DMatrix::from_row_slice(
            6,
            2,
            &[
                1.0, 1.1, 0.9, 1.0, 1.1, 0.9, -1.0, -1.1, -0.9, -1.0, -1.1, -0.9,
            ],
        );
        let y = DMatrix::from_row_slice(
            6,
            2,
            &[
                1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0,
            ],
        );
        let y_c = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 1.0, 0.0]);
        (x, y, y_c)
    }

    #[test]
    fn test_isokr_rejects_wide_sketch() {
        let r = DMatrix::zeros(4, 3);
        assert!(Isokr::new(1e-3, GaussianKernel::unit_gamma(), GaussianKernel::unit_gamma(), r)
            .is_err());
    }

    #[test]
    fn test_isokr_matches_iokr_with_full_subsample() {
        use crate::solver::Iokr;

        let (x, y, y_c) = clustered_data();
        let r = SubSample::new(6, 6)
            .expect("valid shape")
            .draw(&mut ChaCha8Rng::seed_from_u64(4));

        let mut exact = Iokr::new(1e-4, GaussianKernel::new(0.5), GaussianKernel::new(1.0))
            .expect("valid solver");
        let mut sketched =
            Isokr::new(1e-4, GaussianKernel::new(0.5), GaussianKernel::new(1.0), r)
                .expect("valid solver");

        exact.fit(&x, &y).expect("exact fit");
        sketched.fit(&x, &y).expect("sketched fit");

        let x_te = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, -1.0, -1.0]);
        let exact_pred = exact.predict(&x_te, &y_c).expect("exact predict");
        let sketched_pred = sketched.predict(&x_te, &y_c).expect("sketched predict");
        assert_eq!(exact_pred, sketched_pred);
    }

    #[test]
    fn test_isokr_reduced_coefficients_shape() {
        let (x, y, _) = clustered_data();
        let r = SubSample::new(3, 6)
            .expect("valid shape")
            .draw(&mut ChaCha8Rng::seed_from_u64(8));

        let mut solver =
            Isokr::new(1e-4, GaussianKernel::new(0.5), GaussianKernel::new(1.0), r)
                .expect("valid solver");
        solver.fit(&x, &y).expect("fit succeeds");

        let fitted = solver.fitted.as_ref().expect("fitted");
        assert_eq!((fitted.b.nrows(), fitted.b.ncols()), (3, 6));
    }

    #[test]
    fn test_isokr_separates_clusters_with_partial_subsample() {
        let (x, y, y_c) = clustered_data();
        // Sub-sampling 4 of 6 points keeps at least one point per cluster
        // regardless of the draw
        let r = SubSample::new(4, 6)
            .expect("valid shape")
            .draw(&mut ChaCha8Rng::seed_from_u64(13));

        let mut solver =
            Isokr::new(1e-4, GaussianKernel::new(0.5), GaussianKernel::new(1.0), r)
                .expect("valid solver");
        solver.fit(&x, &y).expect("fit succeeds");

        let x_te = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, -1.0, -1.0]);
        let predicted = solver.predict(&x_te, &y_c).expect("predict succeeds");
        assert_eq!(predicted.row(0), y_c.row(1));
        assert_eq!(predicted.row(1), y_c.row(0));
    }

    #[test]
    fn test_isokr_predict_before_fit_fails() {
        let (x, _, y_c) = clustered_data();
        let r = SubSample::new(3, 6)
            .expect("valid shape")
            .draw(&mut ChaCha8Rng::seed_from_u64(5));
        let mut solver =
            Isokr::new(1e-3, GaussianKernel::unit_gamma(), GaussianKernel::unit_gamma(), r)
                .expect("valid solver");
        assert!(matches!(
            solver.predict(&x, &y_c),
            Err(IokrError::ModelNotFitted)
        ));
    }
}
