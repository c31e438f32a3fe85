use crate::error::{Result, TensorError};
use std::fmt;

/// A tensor shape, wrapping a vector of dimension sizes together with its
/// row-major strides.
///
/// The element count of a shape is the product of its dimensions, except
/// that an empty shape holds zero elements rather than one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: Vec<usize>,
    strides: Vec<usize>,
    numel: usize,
}

impl Shape {
    /// Create a new shape from a vector of dimensions.
    pub fn new(dims: Vec<usize>) -> Self {
        let strides = contiguous_strides(&dims);
        let numel = total_size(&dims);
        Shape {
            dims,
            strides,
            numel,
        }
    }

    /// Create a shape from a slice of dimensions.
    pub fn from_slice(dims: &[usize]) -> Self {
        Shape::new(dims.to_vec())
    }

    /// Number of dimensions (rank).
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Total number of elements.
    ///
    /// Zero when the shape is empty or any dimension is zero.
    pub fn numel(&self) -> usize {
        self.numel
    }

    /// Returns the size of dimension `i`.
    ///
    /// # Panics
    /// Panics if `i >= ndim()`.
    pub fn dim(&self, i: usize) -> usize {
        self.dims[i]
    }

    /// Returns a reference to the underlying dimension sizes.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Row-major contiguous strides for this shape.
    ///
    /// For a shape [d0, d1, d2], the strides are [d1*d2, d2, 1].
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Translates a coordinate vector into an offset in the flat buffer.
    ///
    /// Dimensions are checked in order and the first failing one is reported.
    /// A rank-0 shape has no valid coordinate, not even the empty one.
    pub fn flatten_index(&self, coords: &[isize]) -> Result<usize> {
        if coords.len() != self.dims.len() {
            return Err(TensorError::ArgumentMismatch {
                what: "coordinate count",
                expected: self.dims.len(),
                got: coords.len(),
            });
        }

        let mut offset = 0usize;
        for (dim, ((&index, &size), &stride)) in coords
            .iter()
            .zip(self.dims.iter())
            .zip(self.strides.iter())
            .enumerate()
        {
            if index < 0 || index as usize >= size {
                return Err(TensorError::OutOfRange { dim, index, size });
            }
            offset += index as usize * stride;
        }
        if self.numel == 0 {
            return Err(TensorError::NoElements {
                dims: self.dims.clone(),
            });
        }
        Ok(offset)
    }

    /// Flat offset of an unsigned coordinate that is already known to be in
    /// bounds, e.g. one produced by [`crate::CoordIter`] over this shape.
    pub(crate) fn offset_of(&self, coords: &[usize]) -> usize {
        coords
            .iter()
            .zip(self.strides.iter())
            .map(|(c, s)| c * s)
            .sum()
    }
}

fn total_size(dims: &[usize]) -> usize {
    if dims.is_empty() || dims.contains(&0) {
        return 0;
    }
    dims.iter().product()
}

// Saturates so that a zero-sized shape with huge sibling dimensions can
// still be constructed; such strides are never used for an access.
fn contiguous_strides(dims: &[usize]) -> Vec<usize> {
    if dims.is_empty() {
        return vec![];
    }
    let mut strides = vec![0usize; dims.len()];
    strides[dims.len() - 1] = 1;
    for i in (0..dims.len() - 1).rev() {
        strides[i] = strides[i + 1].saturating_mul(dims[i + 1]);
    }
    strides
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", d)?;
        }
        write!(f, "]")
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Shape::new(dims)
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Shape::from_slice(dims)
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Shape::new(dims.to_vec())
    }
}
