//! Rust implementation of sketched Input-Output Kernel Regression (IOKR)
//!
//! Based on "Fast Kernel Methods for Generic Lipschitz Losses via p-Sparsified
//! Sketches" and the sketched structured-prediction line of work: kernel ridge
//! regression from an input RKHS to an output RKHS, accelerated by randomized
//! sketching on either side, with nearest-candidate decoding back to discrete
//! label vectors.

pub mod api;
pub mod core;
pub mod kernel;
pub mod persistence;
pub mod sketch;
pub mod solver;
pub mod utils;

// Re-export main types for convenience
pub use crate::api::{quick, BenchmarkReport, Experiment, SketchSpec, SolverSpec};
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::kernel::{GaussianKernel, KernelFunction, LinearKernel};
pub use crate::sketch::{PSparsified, Sketch, SubSample};
pub use crate::solver::{Iokr, Isokr, Siokr, Sisokr};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
