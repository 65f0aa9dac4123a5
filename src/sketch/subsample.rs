//! Sub-sampling sketch implementation

use crate::core::{IokrError, Result};
use crate::sketch::Sketch;
use nalgebra::DMatrix;
use rand::Rng;

/// Sub-sampling sketch: `m` standard basis rows chosen without replacement.
///
/// Each draw selects `m` of the `n` column indices uniformly without
/// replacement and sets the corresponding basis rows, scaled by `sqrt(n / m)`
/// so that `E[R^T R] = I` and the induced Gram approximation is unbiased.
/// With `m = n` every index is selected and the drawn matrix is exactly the
/// identity, which makes sketched solvers reproduce their exact counterparts.
#[derive(Debug, Clone, Copy)]
pub struct SubSample {
    m: usize,
    n: usize,
}

impl SubSample {
    /// Create a sub-sampling sketch of shape `(m, n)`
    pub fn new(m: usize, n: usize) -> Result<Self> {
        if m == 0 || n == 0 {
            return Err(IokrError::InvalidSketch(format!(
                "sketch shape must be non-zero, got ({m}, {n})"
            )));
        }
        if m > n {
            return Err(IokrError::InvalidSketch(format!(
                "sketch dimension m = {m} exceeds sample count n = {n}"
            )));
        }
        Ok(Self { m, n })
    }
}

impl Sketch for SubSample {
    fn rows(&self) -> usize {
        self.m
    }

    fn cols(&self) -> usize {
        self.n
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> DMatrix<f64> {
        let mut indices = rand::seq::index::sample(rng, self.n, self.m).into_vec();
        indices.sort_unstable();

        let scale = (self.n as f64 / self.m as f64).sqrt();
        let mut r = DMatrix::zeros(self.m, self.n);
        for (row, &col) in indices.iter().enumerate() {
            r[(row, col)] = scale;
        }
        r
    }
}
