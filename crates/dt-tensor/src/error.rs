use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TensorError {
    #[error("{what}: expected {expected}, got {got}")]
    ArgumentMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("index {index} out of bounds for dimension {dim} with size {size}")]
    OutOfRange { dim: usize, index: isize, size: usize },
    #[error("tensor with shape {dims:?} has no elements")]
    NoElements { dims: Vec<usize> },
    #[error("invalid slice range {start}..{end} for dimension {dim} with size {size}")]
    InvalidSlice {
        dim: usize,
        start: isize,
        end: isize,
        size: usize,
    },
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch { expected: Vec<usize>, got: Vec<usize> },
}

impl TensorError {
    /// True for both coordinate and slice-bound violations.
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            TensorError::OutOfRange { .. }
                | TensorError::NoElements { .. }
                | TensorError::InvalidSlice { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, TensorError>;
