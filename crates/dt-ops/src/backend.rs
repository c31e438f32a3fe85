use std::fmt::Debug;

use crate::error::Result;

/// Trait for pluggable compute backends.
///
/// Kernels work on flat row-major f64 slices whose shapes have already been
/// validated by [`crate::Operation`]. Data is passed in as slices and
/// returned as owned vectors sized exactly to the result.
pub trait ComputeBackend: Send + Sync + Debug {
    /// Returns the name of this backend (e.g., "cpu").
    fn name(&self) -> &str;

    /// Matrix multiplication: C = A @ B.
    ///
    /// - `a`: row-major data of shape [m, k]
    /// - `b`: row-major data of shape [k, n]
    /// - Returns: row-major data of shape [m, n]
    fn matmul(&self, a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Result<Vec<f64>>;

    /// Element-wise addition: result[i] = a[i] + b[i].
    fn add(&self, a: &[f64], b: &[f64]) -> Result<Vec<f64>>;

    /// Element-wise subtraction: result[i] = a[i] - b[i].
    fn sub(&self, a: &[f64], b: &[f64]) -> Result<Vec<f64>>;

    /// Element-wise multiplication: result[i] = a[i] * b[i].
    fn mul(&self, a: &[f64], b: &[f64]) -> Result<Vec<f64>>;

    /// ReLU activation: result[i] = max(0, x[i]).
    fn relu(&self, x: &[f64]) -> Result<Vec<f64>>;

    /// Sigmoid activation: result[i] = 1 / (1 + exp(-x[i])).
    fn sigmoid(&self, x: &[f64]) -> Result<Vec<f64>>;

    /// Softmax over consecutive rows of `row_len` elements.
    ///
    /// For each row: result[i] = exp(x[i] - max(x)) / sum(exp(x[j] - max(x)))
    fn softmax(&self, x: &[f64], row_len: usize) -> Result<Vec<f64>>;
}
