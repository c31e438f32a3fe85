pub mod matmul;
pub mod unary;

use crate::backend::ComputeBackend;
use crate::error::{OpError, Result};

/// Pure-Rust CPU compute backend.
///
/// Implements all operations with straightforward loops optimized for
/// correctness rather than peak performance. Used as the default backend.
#[derive(Debug, Clone)]
pub struct CpuBackend;

impl CpuBackend {
    pub fn new() -> Self {
        CpuBackend
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn zip_with(a: &[f64], b: &[f64], f: impl Fn(f64, f64) -> f64) -> Result<Vec<f64>> {
    if a.len() != b.len() {
        return Err(OpError::Other(format!(
            "elementwise: a.len()={} but b.len()={}",
            a.len(),
            b.len()
        )));
    }
    Ok(a.iter().zip(b.iter()).map(|(&x, &y)| f(x, y)).collect())
}

impl ComputeBackend for CpuBackend {
    fn name(&self) -> &str {
        "cpu"
    }

    fn matmul(&self, a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Result<Vec<f64>> {
        matmul::matmul(a, b, m, k, n)
    }

    fn add(&self, a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
        zip_with(a, b, |x, y| x + y)
    }

    fn sub(&self, a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
        zip_with(a, b, |x, y| x - y)
    }

    fn mul(&self, a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
        zip_with(a, b, |x, y| x * y)
    }

    fn relu(&self, x: &[f64]) -> Result<Vec<f64>> {
        Ok(unary::relu(x))
    }

    fn sigmoid(&self, x: &[f64]) -> Result<Vec<f64>> {
        Ok(unary::sigmoid(x))
    }

    fn softmax(&self, x: &[f64], row_len: usize) -> Result<Vec<f64>> {
        unary::softmax(x, row_len)
    }
}
