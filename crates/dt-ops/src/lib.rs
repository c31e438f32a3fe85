//! `dt-ops` - Tensor operations for dense-tensor.
//!
//! This crate provides:
//! - A `ComputeBackend` trait for pluggable flat-slice kernels
//! - A reference `CpuBackend` implementation
//! - `Operation`, which validates operand shapes and dispatches to a backend
//! - Free functions using the default CPU backend
//!
//! ```
//! use dt_tensor::Tensor;
//!
//! let a = Tensor::from_vec([2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
//! let b = Tensor::from_vec([2, 2], vec![5.0, 6.0, 7.0, 8.0]).unwrap();
//! let c = dt_ops::dot(&a, &b).unwrap();
//! assert_eq!(c.data(), &[19.0, 22.0, 43.0, 50.0]);
//! ```

pub mod backend;
pub mod cpu;
pub mod error;
pub mod ops;

use dt_tensor::Tensor;

// Re-export primary types at the crate root for convenience.
pub use backend::ComputeBackend;
pub use cpu::CpuBackend;
pub use error::{OpError, Result};
pub use ops::Operation;

pub fn add(a: &Tensor, b: &Tensor) -> Result<Tensor> {
    Operation::cpu().add(a, b)
}

pub fn sub(a: &Tensor, b: &Tensor) -> Result<Tensor> {
    Operation::cpu().sub(a, b)
}

pub fn mul(a: &Tensor, b: &Tensor) -> Result<Tensor> {
    Operation::cpu().mul(a, b)
}

/// See [`Operation::dot`] for the supported rank combinations.
pub fn dot(a: &Tensor, b: &Tensor) -> Result<Tensor> {
    Operation::cpu().dot(a, b)
}

pub fn relu(t: &Tensor) -> Result<Tensor> {
    Operation::cpu().relu(t)
}

pub fn sigmoid(t: &Tensor) -> Result<Tensor> {
    Operation::cpu().sigmoid(t)
}

pub fn softmax(t: &Tensor) -> Result<Tensor> {
    Operation::cpu().softmax(t)
}
