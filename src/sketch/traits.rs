//! Sketch operator trait definition

use nalgebra::DMatrix;
use rand::Rng;

/// A randomized `m x n` linear compressor.
///
/// Implementations validate their dimensions at construction time and draw a
/// concrete sketch matrix from an explicit random source. Repeated trials
/// redraw from a per-trial seeded generator, so a fixed seed sequence makes
/// an entire replicated benchmark reproducible without any global RNG state.
pub trait Sketch {
    /// Sketch dimension `m` (number of rows of the drawn matrix)
    fn rows(&self) -> usize;

    /// Compressed index-space size `n` (number of columns)
    fn cols(&self) -> usize;

    /// Draw a concrete sketch matrix from `rng`.
    ///
    /// The returned matrix is immutable once drawn; draw again for the next
    /// trial rather than mutating it.
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> DMatrix<f64>;
}
