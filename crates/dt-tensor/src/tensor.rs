use std::ops::{Index, IndexMut};

use crate::error::{Result, TensorError};
use crate::index::CoordIter;
use crate::shape::Shape;
use crate::storage::CpuStorage;

/// A dense tensor backed by CPU storage.
///
/// Holds contiguous, row-major f64 data with an associated shape. The shape
/// is fixed for the lifetime of the tensor; `reshape` and `slice` always
/// produce a new tensor with its own copy of the data.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    storage: CpuStorage,
    shape: Shape,
}

impl Tensor {
    /// Create a zero-filled tensor with the given shape.
    pub fn new(shape: impl Into<Shape>) -> Self {
        let shape = shape.into();
        Tensor {
            storage: CpuStorage::zeros(shape.numel()),
            shape,
        }
    }

    /// Create a tensor from a shape and its row-major values.
    ///
    /// # Errors
    /// Returns `ArgumentMismatch` if `values.len()` differs from the element
    /// count of `shape`.
    pub fn from_vec(shape: impl Into<Shape>, values: Vec<f64>) -> Result<Self> {
        let shape = shape.into();
        if values.len() != shape.numel() {
            return Err(TensorError::ArgumentMismatch {
                what: "value count",
                expected: shape.numel(),
                got: values.len(),
            });
        }
        Ok(Tensor {
            storage: CpuStorage::from_vec(values),
            shape,
        })
    }

    /// Create a zero-filled tensor with the given shape.
    pub fn zeros(shape: impl Into<Shape>) -> Self {
        Self::new(shape)
    }

    /// Create a tensor filled with ones with the given shape.
    pub fn ones(shape: impl Into<Shape>) -> Self {
        Self::full(shape, 1.0)
    }

    /// Create a tensor with every element set to `value`.
    pub fn full(shape: impl Into<Shape>, value: f64) -> Self {
        let shape = shape.into();
        Tensor {
            storage: CpuStorage::filled(shape.numel(), value),
            shape,
        }
    }

    /// Returns a reference to the tensor's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Dimension sizes, outermost first.
    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    pub fn strides(&self) -> &[usize] {
        self.shape.strides()
    }

    /// Total number of elements.
    pub fn size(&self) -> usize {
        self.shape.numel()
    }

    pub fn rank(&self) -> usize {
        self.shape.ndim()
    }

    /// True for an empty shape or a shape of exactly `[1]`.
    ///
    /// This is a loose "scalar-like" test: a `[]` tensor holds no elements
    /// while a `[1]` tensor holds one, yet both report true.
    pub fn is_scalar(&self) -> bool {
        let dims = self.shape.dims();
        dims.is_empty() || dims == [1]
    }

    /// True when the tensor holds no elements.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Offset into the flat buffer for a coordinate vector.
    pub fn flatten_index(&self, coords: &[isize]) -> Result<usize> {
        self.shape.flatten_index(coords)
    }

    /// Bounds-checked read of a single element.
    pub fn at(&self, coords: &[isize]) -> Result<f64> {
        let offset = self.shape.flatten_index(coords)?;
        Ok(self.storage.as_slice()[offset])
    }

    /// Bounds-checked mutable reference to a single element.
    pub fn at_mut(&mut self, coords: &[isize]) -> Result<&mut f64> {
        let offset = self.shape.flatten_index(coords)?;
        Ok(&mut self.storage.as_mut_slice()[offset])
    }

    /// Bounds-checked write of a single element.
    pub fn set(&mut self, coords: &[isize], value: f64) -> Result<()> {
        *self.at_mut(coords)? = value;
        Ok(())
    }

    /// Replaces every element `x` with `f(x)`, visiting each once in
    /// storage order.
    pub fn apply<F>(&mut self, mut f: F)
    where
        F: FnMut(f64) -> f64,
    {
        for x in self.storage.as_mut_slice() {
            *x = f(*x);
        }
    }

    /// Direct read access to the row-major buffer.
    ///
    /// This bypasses coordinate validation; prefer [`Tensor::at`] unless
    /// you are iterating the whole buffer.
    pub fn data(&self) -> &[f64] {
        self.storage.as_slice()
    }

    /// Direct write access to the row-major buffer.
    ///
    /// The buffer length cannot change through this slice, so the shape
    /// invariant holds, but no coordinate checks are performed.
    pub fn data_mut(&mut self) -> &mut [f64] {
        self.storage.as_mut_slice()
    }

    /// Consumes the tensor, returning its row-major values.
    pub fn into_vec(self) -> Vec<f64> {
        self.storage.into_vec()
    }

    /// Reshape the tensor, returning a new tensor with the same data but
    /// a different shape.
    ///
    /// The total number of elements must remain the same.
    pub fn reshape(&self, new_shape: impl Into<Shape>) -> Result<Tensor> {
        let new_shape = new_shape.into();
        if self.shape.numel() != new_shape.numel() {
            return Err(TensorError::ShapeMismatch {
                expected: self.shape.dims().to_vec(),
                got: new_shape.dims().to_vec(),
            });
        }
        Ok(Tensor {
            storage: self.storage.clone(),
            shape: new_shape,
        })
    }

    /// Copies out the sub-tensor covered by one `(start, end)` range per
    /// dimension.
    ///
    /// Negative bounds count from the end of their dimension. After that
    /// adjustment each range must satisfy `0 <= start < end <= size`.
    pub fn slice(&self, ranges: &[(isize, isize)]) -> Result<Tensor> {
        if ranges.len() != self.rank() {
            return Err(TensorError::ArgumentMismatch {
                what: "slice range count",
                expected: self.rank(),
                got: ranges.len(),
            });
        }

        let mut starts = Vec::with_capacity(ranges.len());
        let mut new_dims = Vec::with_capacity(ranges.len());
        for (dim, (&(start, end), &size)) in ranges.iter().zip(self.dims()).enumerate() {
            let (lo, hi) = normalize_range(start, end, size);
            if lo >= hi || lo < 0 || hi > size as isize {
                return Err(TensorError::InvalidSlice {
                    dim,
                    start,
                    end,
                    size,
                });
            }
            starts.push(lo as usize);
            new_dims.push((hi - lo) as usize);
        }

        let mut result = Tensor::new(new_dims);
        if result.is_empty() {
            return Ok(result);
        }

        let src = self.storage.as_slice();
        let mut src_coords = vec![0usize; starts.len()];
        let mut dst_offset = 0;
        let mut offsets = CoordIter::new(result.dims());
        let dst = result.storage.as_mut_slice();
        while let Some(offset) = offsets.next_coord() {
            for ((s, &o), &start) in src_coords.iter_mut().zip(offset).zip(&starts) {
                *s = start + o;
            }
            dst[dst_offset] = src[self.shape.offset_of(&src_coords)];
            dst_offset += 1;
        }
        Ok(result)
    }
}

fn normalize_range(start: isize, end: isize, size: usize) -> (isize, isize) {
    let size = size as isize;
    let lo = if start < 0 { start + size } else { start };
    let hi = if end < 0 { end + size } else { end };
    (lo, hi)
}

impl<const N: usize> Index<[isize; N]> for Tensor {
    type Output = f64;

    /// # Panics
    /// Panics if the coordinates are invalid for this tensor's shape.
    fn index(&self, coords: [isize; N]) -> &f64 {
        match self.shape.flatten_index(&coords) {
            Ok(offset) => &self.storage.as_slice()[offset],
            Err(e) => panic!("{}", e),
        }
    }
}

impl<const N: usize> IndexMut<[isize; N]> for Tensor {
    fn index_mut(&mut self, coords: [isize; N]) -> &mut f64 {
        match self.shape.flatten_index(&coords) {
            Ok(offset) => &mut self.storage.as_mut_slice()[offset],
            Err(e) => panic!("{}", e),
        }
    }
}
