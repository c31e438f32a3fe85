use dt_tensor::TensorError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpError {
    #[error("{op}: shape mismatch between {lhs:?} and {rhs:?}")]
    ShapeMismatch {
        op: &'static str,
        lhs: Vec<usize>,
        rhs: Vec<usize>,
    },
    #[error("dot: batch dimension {dim} differs ({lhs} vs {rhs})")]
    BatchMismatch { dim: usize, lhs: usize, rhs: usize },
    #[error("matmul dimension mismatch: [{m}x{k}] @ [{k2}x{n}]")]
    MatmulMismatch {
        m: usize,
        k: usize,
        k2: usize,
        n: usize,
    },
    #[error("{op}: unsupported shapes {lhs:?} and {rhs:?}")]
    UnsupportedShape {
        op: &'static str,
        lhs: Vec<usize>,
        rhs: Vec<usize>,
    },
    #[error("{op}: invalid shape {shape:?}")]
    InvalidShape { op: &'static str, shape: Vec<usize> },
    #[error("tensor error: {0}")]
    Tensor(#[from] TensorError),
    #[error("{0}")]
    Other(String),
}

impl OpError {
    /// True for every way two operand shapes can fail to line up.
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(
            self,
            OpError::ShapeMismatch { .. }
                | OpError::BatchMismatch { .. }
                | OpError::MatmulMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, OpError>;
