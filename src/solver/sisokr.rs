//! Doubly-sketched Input-Output Kernel Regression

use crate::core::{IokrError, Regressor, Result};
use crate::kernel::KernelFunction;
use crate::solver::{
    check_predict_pair, check_regularization, check_sketch_width, check_training_pair, decode,
    pseudo_inverse, spd_solve,
};
use log::debug;
use nalgebra::DMatrix;
use std::time::Instant;

/// SISOKR: independent sketches on both sides.
///
/// The input sketch `R_in` (`m_in x n`) compresses the fit-time solve exactly
/// as in ISOKR, and the output sketch `R_out` (`m_out x n`) compresses
/// candidate scoring exactly as in SIOKR; the two are drawn independently
/// (different kinds and dimensions are fine) and composed without
/// interaction, so their approximation errors add. The fitted state is the
/// `m_in x m_out` matrix
/// `A = B * K_y R_out^T * (R_out K_y R_out^T)^+` and prediction scores
/// `S = (K_x(X_te, X_tr) R_in^T) * A * (R_out K_y(Y_tr, Y_c))`.
pub struct Sisokr<Kx, Ky> {
    l: f64,
    input_kernel: Kx,
    output_kernel: Ky,
    /// Input sketch, `m_in x n`
    r_in: DMatrix<f64>,
    /// Output sketch, `m_out x n`
    r_out: DMatrix<f64>,
    fitted: Option<FittedSisokr>,
    fit_time: f64,
    decode_time: f64,
}

struct FittedSisokr {
    x_tr: DMatrix<f64>,
    y_tr: DMatrix<f64>,
    /// Doubly-reduced coefficients, `m_in x m_out`
    a: DMatrix<f64>,
}

impl<Kx: KernelFunction, Ky: KernelFunction> Sisokr<Kx, Ky> {
    /// Create a SISOKR solver with ridge penalty `l` and pre-drawn input and
    /// output sketches
    pub fn new(
        l: f64,
        input_kernel: Kx,
        output_kernel: Ky,
        r_in: DMatrix<f64>,
        r_out: DMatrix<f64>,
    ) -> Result<Self> {
        check_regularization(l)?;
        for (side, r) in [("input", &r_in), ("output", &r_out)] {
            if r.nrows() == 0 || r.nrows() > r.ncols() {
                return Err(IokrError::InvalidSketch(format!(
                    "{side} sketch must be m x n with 0 < m <= n, got {} x {}",
                    r.nrows(),
                    r.ncols()
                )));
            }
        }
        if r_in.ncols() != r_out.ncols() {
            return Err(IokrError::DimensionMismatch {
                expected: r_in.ncols(),
                actual: r_out.ncols(),
            });
        }
        Ok(Self {
            l,
            input_kernel,
            output_kernel,
            r_in,
            r_out,
            fitted: None,
            fit_time: 0.0,
            decode_time: 0.0,
        })
    }

    /// Sketch dimensions `(m_in, m_out)`
    pub fn sketch_sizes(&self) -> (usize, usize) {
        (self.r_in.nrows(), self.r_out.nrows())
    }
}

impl<Kx: KernelFunction, Ky: KernelFunction> Regressor for Sisokr<Kx, Ky> {
    fn fit(&mut self, x_tr: &DMatrix<f64>, y_tr: &DMatrix<f64>) -> Result<()> {
        check_training_pair(x_tr, y_tr)?;
        let n = x_tr.nrows();
        check_sketch_width(&self.r_in, n)?;
        check_sketch_width(&self.r_out, n)?;

        let start = Instant::now();
        // Input side: the ISOKR reduced system
        let k_x = self.input_kernel.compute_gram(x_tr, x_tr);
        let kr_t = k_x * self.r_in.transpose();
        let rkr_t = &self.r_in * &kr_t;
        let reduced = kr_t.transpose() * &kr_t + rkr_t * (n as f64 * self.l);
        debug!(
            "SISOKR fit: reduced {} x {} system, output sketch m = {}",
            self.r_in.nrows(),
            self.r_in.nrows(),
            self.r_out.nrows()
        );
        let b = spd_solve(reduced, &kr_t.transpose())?;

        // Output side: the SIOKR sketched projection
        let k_y = self.output_kernel.compute_gram(y_tr, y_tr);
        let kr_t_out = k_y * self.r_out.transpose();
        let rkr_t_out = &self.r_out * &kr_t_out;
        let a = b * kr_t_out * pseudo_inverse(rkr_t_out)?;
        self.fit_time = start.elapsed().as_secs_f64();

        self.fitted = Some(FittedSisokr {
            x_tr: x_tr.clone(),
            y_tr: y_tr.clone(),
            a,
        });
        Ok(())
    }

    fn predict(&mut self, x_te: &DMatrix<f64>, y_c: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        let fitted = self.fitted.as_ref().ok_or(IokrError::ModelNotFitted)?;
        check_predict_pair(x_te, y_c, fitted.x_tr.ncols(), fitted.y_tr.ncols())?;

        let k_x_te_sketched =
            self.input_kernel.compute_gram(x_te, &fitted.x_tr) * self.r_in.transpose();

        let start = Instant::now();
        let sketched_k_y_c = &self.r_out * self.output_kernel.compute_gram(&fitted.y_tr, y_c);
        let scores = &k_x_te_sketched * &fitted.a * sketched_k_y_c;
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
