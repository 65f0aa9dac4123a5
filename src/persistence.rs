//! Model serialization and persistence
//!
//! Saves and reloads a fitted exact IOKR model so an expensive `O(n^3)` fit
//! can be reused across runs. Sketched solvers are deliberately not covered:
//! their sketches are redrawn per trial, so persisting one snapshot would
//! freeze the randomness the replicated benchmarks rely on.

use crate::core::{IokrError, Result};
use crate::kernel::GaussianKernel;
use crate::solver::Iokr;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Serializable representation of a fitted exact IOKR model
#[derive(Serialize, Deserialize)]
pub struct SerializableModel {
    /// Training inputs, row-major
    pub x_train: SerializableMatrix,
    /// Training labels, row-major
    pub y_train: SerializableMatrix,
    /// Dual coefficient matrix `(K_x + n L I)^{-1}`
    pub coefficients: SerializableMatrix,
    /// Ridge penalty used for the fit
    pub regularization: f64,
    /// Gamma of the input Gaussian kernel
    pub input_gamma: f64,
    /// Gamma of the output Gaussian kernel
    pub output_gamma: f64,
    /// Kernel family identifier
    pub kernel_type: String,
    /// Model metadata
    pub metadata: ModelMetadata,
}

/// Dense matrix in row-major order
#[derive(Serialize, Deserialize, Clone)]
pub struct SerializableMatrix {
    pub nrows: usize,
    pub ncols: usize,
    pub data: Vec<f64>,
}

impl SerializableMatrix {
    fn from_matrix(m: &nalgebra::DMatrix<f64>) -> Self {
        let mut data = Vec::with_capacity(m.nrows() * m.ncols());
        for i in 0..m.nrows() {
            for j in 0..m.ncols() {
                data.push(m[(i, j)]);
            }
        }
        Self {
            nrows: m.nrows(),
            ncols: m.ncols(),
            data,
        }
    }

    fn to_matrix(&self) -> Result<nalgebra::DMatrix<f64>> {
        if self.data.len() != self.nrows * self.ncols {
            return Err(IokrError::SerializationError(format!(
                "matrix payload holds {} values for a {} x {} shape",
                self.data.len(),
                self.nrows,
                self.ncols
            )));
        }
        Ok(nalgebra::DMatrix::from_row_slice(
            self.nrows, self.ncols, &self.data,
        ))
    }
}

/// Model metadata for tracking and validation
#[derive(Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Library version used to create the model
    pub library_version: String,
    /// Number of training samples
    pub n_train: usize,
    /// Number of labels per sample
    pub n_labels: usize,
    /// Creation timestamp
    pub created_at: String,
}

impl SerializableModel {
    /// Capture a fitted exact IOKR model.
    ///
    /// Fails with `ModelNotFitted` when called before `fit`.
    pub fn from_fitted(model: &Iokr<GaussianKernel, GaussianKernel>) -> Result<Self> {
        let fitted = model.fitted_state().ok_or(IokrError::ModelNotFitted)?;

        Ok(Self {
            x_train: SerializableMatrix::from_matrix(&fitted.x_tr),
            y_train: SerializableMatrix::from_matrix(&fitted.y_tr),
            coefficients: SerializableMatrix::from_matrix(&fitted.omega),
            regularization: model.regularization(),
            input_gamma: model.input_kernel().gamma(),
            output_gamma: model.output_kernel().gamma(),
            kernel_type: "gaussian".to_string(),
            metadata: ModelMetadata {
                library_version: crate::VERSION.to_string(),
                n_train: fitted.x_tr.nrows(),
                n_labels: fitted.y_tr.ncols(),
                created_at: chrono::Utc::now().to_rfc3339(),
            },
        })
    }

    /// Save model to file as pretty JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(IokrError::IoError)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| IokrError::SerializationError(e.to_string()))?;
        Ok(())
    }

    /// Load model from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(IokrError::IoError)?;
        let reader = BufReader::new(file);
        let model = serde_json::from_reader(reader)
            .map_err(|e| IokrError::SerializationError(e.to_string()))?;
        Ok(model)
    }

    /// Reconstruct a fitted solver ready for `predict`
    pub fn to_solver(&self) -> Result<Iokr<GaussianKernel, GaussianKernel>> {
        if self.kernel_type != "gaussian" {
            return Err(IokrError::InvalidParameter(format!(
                "unsupported kernel type '{}'",
                self.kernel_type
            )));
        }
        if !(self.input_gamma > 0.0) || !(self.output_gamma > 0.0) {
            return Err(IokrError::InvalidParameter(
                "kernel gamma values must be positive".to_string(),
            ));
        }

        let x_tr = self.x_train.to_matrix()?;
        let y_tr = self.y_train.to_matrix()?;
        let omega = self.coefficients.to_matrix()?;
        if omega.nrows() != x_tr.nrows() || omega.ncols() != x_tr.nrows() {
            return Err(IokrError::SerializationError(format!(
                "coefficient matrix is {} x {} for {} training samples",
                omega.nrows(),
                omega.ncols(),
                x_tr.nrows()
            )));
        }

        let mut solver = Iokr::new(
            self.regularization,
            GaussianKernel::new(self.input_gamma),
            GaussianKernel::new(self.output_gamma),
        )?;
        solver.restore_fitted(x_tr, y_tr, omega);
        Ok(solver)
    }
}
