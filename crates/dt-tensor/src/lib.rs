//! `dt-tensor` - Dense row-major tensor type for dense-tensor.
//!
//! This crate provides:
//! - A `Tensor` type owning a contiguous f64 buffer
//! - Shape and stride arithmetic with bounds-checked coordinate flattening
//! - Copying `reshape` and `slice`
//! - Row-major coordinate enumeration (`CoordIter`)
//! - Deterministic diagnostic rendering (`PrintOptions`)

pub mod display;
pub mod error;
pub mod index;
pub mod shape;
pub mod storage;
pub mod tensor;

// Re-export primary types at the crate root for convenience.
pub use display::{PrintOptions, TensorDisplay};
pub use error::{Result, TensorError};
pub use index::CoordIter;
pub use shape::Shape;
pub use storage::CpuStorage;
pub use tensor::Tensor;
