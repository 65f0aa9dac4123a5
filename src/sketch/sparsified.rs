//! p-sparsified sign-projection sketch implementation

use crate::core::{IokrError, Result};
use crate::sketch::Sketch;
use nalgebra::DMatrix;
use rand::Rng;

/// p-sparsified random sign projection.
///
/// Each entry is drawn i.i.d.: zero with probability `1 - p`, and
/// `+1/sqrt(m p)` or `-1/sqrt(m p)` each with probability `p / 2`. The
/// normalization makes `E[R^T R] = I`, and the approximation quality improves
/// with both `m` and the expected number `p * n` of non-zeros per row.
/// `p = 1` degenerates to a dense Rademacher sign projection.
#[derive(Debug, Clone, Copy)]
pub struct PSparsified {
    m: usize,
    n: usize,
    p: f64,
}

impl PSparsified {
    /// Create a p-sparsified sketch of shape `(m, n)` with density `p`
    pub fn new(m: usize, n: usize, p: f64) -> Result<Self> {
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
        if !(p > 0.0 && p <= 1.0) {
            return Err(IokrError::InvalidSketch(format!(
                "density p must lie in (0, 1], got {p}"
            )));
        }
        Ok(Self { m, n, p })
    }

    /// Density parameter `p`
    pub fn density(&self) -> f64 {
        self.p
    }
}

impl Sketch for PSparsified {
    fn rows(&self) -> usize {
        self.m
    }

    fn cols(&self) -> usize {
        self.n
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> DMatrix<f64> {
        let magnitude = 1.0 / (self.m as f64 * self.p).sqrt();
        let mut r = DMatrix::zeros(self.m, self.n);
        // Row-major traversal keeps the draw order independent of the
        // matrix storage layout.
        for i in 0..self.m {
            for j in 0..self.n {
                if rng.gen::<f64>() < self.p {
                    r[(i, j)] = if rng.gen_bool(0.5) {
                        magnitude
                    } else {
                        -magnitude
                    };
                }
            }
        }
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_psparsified_rejects_invalid_density() {
        assert!(PSparsified::new(2, 10, 0.0).is_err());
        assert!(PSparsified::new(2, 10, -0.5).is_err());
        assert!(PSparsified::new(2, 10, 1.5).is_err());
        assert!(PSparsified::new(2, 10, f64::NAN).is_err());
    }

    #[test]
    fn test_psparsified_rejects_oversized_m() {
        assert!(matches!(
            PSparsified::new(11, 10, 0.5),
            Err(IokrError::InvalidSketch(_))
        ));
    }

    #[test]
    fn test_psparsified_accepts_full_density() {
        let sketch = PSparsified::new(3, 10, 1.0).expect("p = 1 is valid");
        assert_eq!(sketch.density(), 1.0);
    }

    #[test]
    fn test_psparsified_entry_magnitudes() {
        let sketch = PSparsified::new(4, 12, 0.5).expect("valid shape");
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let r = sketch.draw(&mut rng);

        let magnitude = 1.0 / (4.0_f64 * 0.5).sqrt();
        for value in r.iter() {
            if *value != 0.0 {
                assert_relative_eq!(value.abs(), magnitude);
            }
        }
    }

    #[test]
    fn test_psparsified_full_density_is_dense() {
        let sketch = PSparsified::new(5, 30, 1.0).expect("valid shape");
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let r = sketch.draw(&mut rng);

        // p = 1 degenerates to a dense sign projection: no structural zeros
        let magnitude = 1.0 / (5.0_f64).sqrt();
        for value in r.iter() {
            assert_relative_eq!(value.abs(), magnitude);
        }
    }

    #[test]
    fn test_psparsified_sparsity_tracks_density() {
        let sketch = PSparsified::new(20, 200, 0.1).expect("valid shape");
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let r = sketch.draw(&mut rng);

        let nnz = r.iter().filter(|v| **v != 0.0).count();
        let expected = 0.1 * (20 * 200) as f64;
        // Loose band: 4000 Bernoulli(0.1) draws stay well inside +-50%
        assert!((nnz as f64) > 0.5 * expected);
        assert!((nnz as f64) < 1.5 * expected);
    }

    #[test]
    fn test_psparsified_draw_is_reproducible() {
        let sketch = PSparsified::new(6, 40, 0.25).expect("valid shape");
        let r1 = sketch.draw(&mut ChaCha8Rng::seed_from_u64(123));
        let r2 = sketch.draw(&mut ChaCha8Rng::seed_from_u64(123));
        assert_eq!(r1, r2);
    }
}
