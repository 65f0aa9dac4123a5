//! Kernel function trait definition

use nalgebra::DMatrix;

/// Pairwise similarity over two sets of vectors.
///
/// A kernel function K(x, y) must be positive semi-definite to induce a valid
/// reproducing-kernel Hilbert space. Implementations work at Gram-matrix
/// granularity: given two matrices whose rows are samples, `compute_gram`
/// returns the `a.nrows() x b.nrows()` matrix of pairwise kernel values.
/// The result is symmetric PSD when `a` and `b` hold the same data.
pub trait KernelFunction: Send + Sync {
    /// Compute the Gram matrix `G[i, j] = K(a_i, b_j)` over the rows of `a` and `b`
    fn compute_gram(&self, a: &DMatrix<f64>, b: &DMatrix<f64>) -> DMatrix<f64>;
}
