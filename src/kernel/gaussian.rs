//! Gaussian (RBF) kernel implementation
//!
//! The Gaussian kernel is defined as: K(x, y) = exp(-γ * ||x - y||²)
//! where γ (gamma) is a hyperparameter that controls the kernel width.

use crate::kernel::KernelFunction;
use nalgebra::DMatrix;

/// Gaussian kernel: K(x, y) = exp(-γ * ||x - y||²)
///
/// The gamma parameter controls the "reach" of each sample:
/// - High gamma: only close points are similar (potential overfitting)
/// - Low gamma: distant points stay similar (potential underfitting)
///
/// The squared distances are computed from Gram-level quantities through
/// ||x - y||² = ||x||² + ||y||² - 2 x^T y, clamped at zero against
/// floating-point cancellation.
#[derive(Debug, Clone, Copy)]
pub struct GaussianKernel {
    gamma: f64,
}

impl GaussianKernel {
    /// Create a new Gaussian kernel with specified gamma parameter
    ///
    /// # Panics
    /// Panics if gamma is not positive
    pub fn new(gamma: f64) -> Self {
        assert!(gamma > 0.0, "Gamma must be positive, got: {}", gamma);
        Self { gamma }
    }

    /// Create a Gaussian kernel with gamma = 1 / (2 * sigma)
    ///
    /// This is the width parameterization used when tuning over a bandwidth
    /// `sigma` rather than over gamma directly.
    ///
    /// # Panics
    /// Panics if sigma is not positive
    pub fn with_bandwidth(sigma: f64) -> Self {
        assert!(sigma > 0.0, "Bandwidth must be positive, got: {}", sigma);
        Self::new(1.0 / (2.0 * sigma))
    }

    /// Create a Gaussian kernel with gamma = 1.0 (unit gamma)
    pub fn unit_gamma() -> Self {
        Self::new(1.0)
    }

    /// Get the gamma parameter
    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl Default for GaussianKernel {
    /// Default Gaussian kernel with gamma = 1.0
    fn default() -> Self {
        Self::unit_gamma()
    }
}

impl KernelFunction for GaussianKernel {
    fn compute_gram(&self, a: &DMatrix<f64>, b: &DMatrix<f64>) -> DMatrix<f64> {
        let a_norms: Vec<f64> = (0..a.nrows()).map(|i| a.row(i).norm_squared()).collect();
        let b_norms: Vec<f64> = (0..b.nrows()).map(|j| b.row(j).norm_squared()).collect();
        let cross = a * b.transpose();

        DMatrix::from_fn(a.nrows(), b.nrows(), |i, j| {
            let dist_sq = (a_norms[i] + b_norms[j] - 2.0 * cross[(i, j)]).max(0.0);
            (-self.gamma * dist_sq).exp()
        })
    }
}
