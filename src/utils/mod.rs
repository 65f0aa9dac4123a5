//! Utility functions for multi-label kernel regression

use nalgebra::DMatrix;
use std::cmp::Ordering;

/// Build the decoding candidate set from training labels.
///
/// Returns the distinct rows of `y`, sorted lexicographically, so candidate
/// indices (and therefore argmax tie-breaks) do not depend on training-row
/// order. Every row of the result is unique and the row count is at most
/// `y.nrows()`.
pub fn candidate_set(y: &DMatrix<f64>) -> DMatrix<f64> {
    let mut rows: Vec<Vec<f64>> = (0..y.nrows())
        .map(|i| y.row(i).iter().copied().collect())
        .collect();
    rows.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    rows.dedup();

    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    DMatrix::from_row_slice(rows.len(), y.ncols(), &flat)
}

/// Evaluation metrics for multi-label predictions
pub mod metrics {
    use crate::core::{IokrError, Result};
    use nalgebra::DMatrix;

    /// Threshold separating positive from negative label values
    const POSITIVE: f64 = 0.5;

    /// Sample-averaged F1 score between two binary label matrices.
    ///
    /// For each row, F1 = 2 * TP / (2 * TP + FP + FN) with entries above 0.5
    /// counted as positive; a row with no positives in either matrix scores
    /// zero. The result is the mean over rows.
    pub fn f1_samples(predicted: &DMatrix<f64>, truth: &DMatrix<f64>) -> Result<f64> {
        if predicted.nrows() != truth.nrows() {
            return Err(IokrError::DimensionMismatch {
                expected: truth.nrows(),
                actual: predicted.nrows(),
            });
        }
        if predicted.ncols() != truth.ncols() {
            return Err(IokrError::DimensionMismatch {
                expected: truth.ncols(),
                actual: predicted.ncols(),
            });
        }
        if predicted.nrows() == 0 {
            return Err(IokrError::EmptyDataset);
        }

        let mut total = 0.0;
        for i in 0..predicted.nrows() {
            let mut tp = 0;
            let mut fp = 0;
            let mut fn_ = 0;
            for j in 0..predicted.ncols() {
                match (predicted[(i, j)] > POSITIVE, truth[(i, j)] > POSITIVE) {
                    (true, true) => tp += 1,
                    (true, false) => fp += 1,
                    (false, true) => fn_ += 1,
                    (false, false) => {}
                }
            }
            let denominator = 2 * tp + fp + fn_;
            if denominator > 0 {
                total += 2.0 * tp as f64 / denominator as f64;
            }
        }
        Ok(total / predicted.nrows() as f64)
    }

}

/// Aggregation of replicated-trial statistics
pub mod aggregate {
    /// Mean and half standard deviation of a set of trial values
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Summary {
        pub mean: f64,
        /// Half the population standard deviation, the spread convention
        /// used when reporting replicated sketch trials
        pub half_std: f64,
    }

    /// Summarize trial values; an empty slice yields zeros
    pub fn summarize(values: &[f64]) -> Summary {
        if values.is_empty() {
            return Summary {
                mean: 0.0,
                half_std: 0.0,
            };
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
        Summary {
            mean,
            half_std: 0.5 * variance.sqrt(),
        }
    }

}

/// Seeded synthetic multi-label data for benchmarks and examples
pub mod synthetic {
    use crate::core::{IokrError, Result, SplitDataset};
    use nalgebra::DMatrix;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rand_distr::{Distribution, Normal, StandardNormal};

    /// Generate a clustered multi-label dataset.
    ///
    /// Inputs are Gaussian clusters, one per label; each sample activates its
    /// own cluster's label and, with small probability, the next one, so
    /// label vectors overlap the way multi-label data does. The same seed
    /// always produces the same split.
    pub fn multilabel(
        n_train: usize,
        n_test: usize,
        n_features: usize,
        n_labels: usize,
        seed: u64,
    ) -> Result<SplitDataset> {
        if n_train == 0 || n_test == 0 {
            return Err(IokrError::EmptyDataset);
        }
        if n_features == 0 || n_labels < 2 {
            return Err(IokrError::InvalidParameter(format!(
                "need n_features >= 1 and n_labels >= 2, got {n_features} and {n_labels}"
            )));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let noise = Normal::new(0.0, 0.3).map_err(|e| {
            IokrError::InvalidParameter(format!("noise distribution: {e}"))
        })?;

        let mut centers = vec![vec![0.0; n_features]; n_labels];
        for center in centers.iter_mut() {
            for value in center.iter_mut() {
                let draw: f64 = rng.sample(StandardNormal);
                *value = 3.0 * draw;
            }
        }

        let mut draw_split = |count: usize| -> (DMatrix<f64>, DMatrix<f64>) {
            let mut x = DMatrix::zeros(count, n_features);
            let mut y = DMatrix::zeros(count, n_labels);
            for i in 0..count {
                let cluster = rng.gen_range(0..n_labels);
                for j in 0..n_features {
                    x[(i, j)] = centers[cluster][j] + noise.sample(&mut rng);
                }
                y[(i, cluster)] = 1.0;
                if rng.gen::<f64>() < 0.3 {
                    y[(i, (cluster + 1) % n_labels)] = 1.0;
                }
            }
            (x, y)
        };

        let (x_train, y_train) = draw_split(n_train);
        let (x_test, y_test) = draw_split(n_test);
        SplitDataset::new(x_train, y_train, x_test, y_test)
    }

}
