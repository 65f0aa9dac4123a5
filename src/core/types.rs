//! Core type definitions for kernel regression

use crate::core::{IokrError, Result};
use nalgebra::DMatrix;

/// Outcome of a single benchmark trial
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialOutcome {
    /// Sample-averaged F1 score on the test split
    pub f1: f64,
    /// Wall-clock seconds spent fitting
    pub fit_time: f64,
    /// Wall-clock seconds spent scoring and decoding
    pub decode_time: f64,
}

impl TrialOutcome {
    /// Create a new trial outcome
    pub fn new(f1: f64, fit_time: f64, decode_time: f64) -> Self {
        Self {
            f1,
            fit_time,
            decode_time,
        }
    }
}

/// A train/test split of a multi-label dataset.
///
/// Rows of the `x` matrices are input vectors, rows of the `y` matrices are
/// binary label vectors. The core never mutates these; solvers clone what
/// they need to keep.
#[derive(Debug, Clone)]
pub struct SplitDataset {
    pub x_train: DMatrix<f64>,
    pub y_train: DMatrix<f64>,
    pub x_test: DMatrix<f64>,
    pub y_test: DMatrix<f64>,
}

impl SplitDataset {
    /// Create a split, validating that the four matrices agree on shapes
    pub fn new(
        x_train: DMatrix<f64>,
        y_train: DMatrix<f64>,
        x_test: DMatrix<f64>,
        y_test: DMatrix<f64>,
    ) -> Result<Self> {
        if x_train.nrows() == 0 || x_test.nrows() == 0 {
            return Err(IokrError::EmptyDataset);
        }
        if y_train.nrows() != x_train.nrows() {
            return Err(IokrError::DimensionMismatch {
                expected: x_train.nrows(),
                actual: y_train.nrows(),
            });
        }
        if y_test.nrows() != x_test.nrows() {
            return Err(IokrError::DimensionMismatch {
                expected: x_test.nrows(),
                actual: y_test.nrows(),
            });
        }
        if x_test.ncols() != x_train.ncols() {
            return Err(IokrError::DimensionMismatch {
                expected: x_train.ncols(),
                actual: x_test.ncols(),
            });
        }
        if y_test.ncols() != y_train.ncols() {
            return Err(IokrError::DimensionMismatch {
                expected: y_train.ncols(),
                actual: y_test.ncols(),
            });
        }
        Ok(Self {
            x_train,
            y_train,
            x_test,
            y_test,
        })
    }

    /// Number of training samples
    pub fn n_train(&self) -> usize {
        self.x_train.nrows()
    }

    /// Number of test samples
    pub fn n_test(&self) -> usize {
        self.x_test.nrows()
    }

    /// Input dimensionality
    pub fn n_features(&self) -> usize {
        self.x_train.ncols()
    }

    /// Number of labels per sample
    pub fn n_labels(&self) -> usize {
        self.y_train.ncols()
    }
}
