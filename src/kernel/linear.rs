//! Linear kernel implementation

use crate::kernel::KernelFunction;
use nalgebra::DMatrix;

/// Linear kernel: K(x, y) = x^T * y
///
/// The simplest kernel function. At Gram-matrix granularity this is a single
/// matrix product `A * B^T`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearKernel;

impl LinearKernel {
    /// Create a new linear kernel
    pub fn new() -> Self {
        Self
    }
}

impl KernelFunction for LinearKernel {
    fn compute_gram(&self, a: &DMatrix<f64>, b: &DMatrix<f64>) -> DMatrix<f64> {
        a * b.transpose()
    }
}
