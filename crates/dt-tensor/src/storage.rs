/// CPU-side tensor storage.
///
/// A contiguous, exclusively owned `f64` buffer. Its length is fixed when it
/// is created; nothing in this type grows or shrinks it afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuStorage {
    data: Vec<f64>,
}

impl CpuStorage {
    /// Create zero-filled storage holding `n` elements.
    pub fn zeros(n: usize) -> Self {
        Self::filled(n, 0.0)
    }

    /// Create storage holding `n` copies of `value`.
    pub fn filled(n: usize, value: f64) -> Self {
        CpuStorage {
            data: vec![value; n],
        }
    }

    /// Create storage from an owned vector.
    pub fn from_vec(data: Vec<f64>) -> Self {
        CpuStorage { data }
    }

    /// Number of elements in this storage.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the storage contains no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec() {
        let s = CpuStorage::from_vec(vec![1.0, 2.0, 3.0]);
        assert_eq!(s.len(), 3);
        assert!(!s.is_empty());
        assert_eq!(s.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_zeros() {
        let s = CpuStorage::zeros(5);
        assert_eq!(s.len(), 5);
        assert_eq!(s.as_slice(), &[0.0; 5]);
        assert!(CpuStorage::zeros(0).is_empty());
    }

    #[test]
    fn test_mut_slice() {
        let mut s = CpuStorage::filled(2, 1.5);
        let slice = s.as_mut_slice();
        slice[0] = 42.0;
        assert_eq!(s.into_vec(), vec![42.0, 1.5]);
    }
}
