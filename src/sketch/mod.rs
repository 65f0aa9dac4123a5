//! Randomized sketching operators
//!
//! A sketch is a random `m x n` linear map that compresses an `n`-dimensional
//! sample index space down to `m` dimensions. Sketched solvers trade
//! approximation error for large reductions in fit or decode cost, with `m`
//! as the accuracy/cost lever.

pub mod sparsified;
pub mod subsample;
pub mod traits;

pub use self::sparsified::*;
pub use self::subsample::*;
pub use self::traits::*;
