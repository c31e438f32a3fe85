use dt_tensor::{CoordIter, Tensor};
use tracing::{debug, trace};

use crate::backend::ComputeBackend;
use crate::cpu::CpuBackend;
use crate::error::{OpError, Result};

/// Shape-checked tensor operations dispatched to a compute backend.
///
/// Every method borrows its operands and returns a freshly allocated
/// tensor. Inputs are never modified, including when validation fails.
#[derive(Debug, Clone, Default)]
pub struct Operation<B: ComputeBackend = CpuBackend> {
    backend: B,
}

impl Operation<CpuBackend> {
    /// Operations on the reference CPU backend.
    pub fn cpu() -> Self {
        Operation::new(CpuBackend::new())
    }
}

fn reject<T>(err: OpError) -> Result<T> {
    debug!(error = %err, "operation rejected");
    Err(err)
}

impl<B: ComputeBackend> Operation<B> {
    pub fn new(backend: B) -> Self {
        Operation { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Element-wise `a + b`. Shapes must match exactly.
    pub fn add(&self, a: &Tensor, b: &Tensor) -> Result<Tensor> {
        let data = self.backend.add(same_shape("add", a, b)?, b.data())?;
        Ok(Tensor::from_vec(a.shape().clone(), data)?)
    }

    /// Element-wise `a - b`. Shapes must match exactly.
    pub fn sub(&self, a: &Tensor, b: &Tensor) -> Result<Tensor> {
        let data = self.backend.sub(same_shape("sub", a, b)?, b.data())?;
        Ok(Tensor::from_vec(a.shape().clone(), data)?)
    }

    /// Element-wise `a * b`. Shapes must match exactly.
    pub fn mul(&self, a: &Tensor, b: &Tensor) -> Result<Tensor> {
        let data = self.backend.mul(same_shape("mul", a, b)?, b.data())?;
        Ok(Tensor::from_vec(a.shape().clone(), data)?)
    }

    /// Dot product, selected by operand rank.
    ///
    /// - 1D · 1D: inner product, returned as a `[1]` tensor.
    /// - 2D · 2D: matrix product `[m, k] @ [k, n] -> [m, n]`.
    /// - ND · ND (N > 2): one matrix product per combination of the leading
    ///   batch dimensions, which must match exactly.
    ///
    /// Any other rank pairing is rejected as unsupported.
    pub fn dot(&self, a: &Tensor, b: &Tensor) -> Result<Tensor> {
        match (a.rank(), b.rank()) {
            (1, 1) => self.dot_vectors(a, b),
            (2, 2) => self.matmul(a, b),
            (ra, rb) if ra > 2 && rb > 2 => self.batched_matmul(a, b),
            _ => reject(OpError::UnsupportedShape {
                op: "dot",
                lhs: a.dims().to_vec(),
                rhs: b.dims().to_vec(),
            }),
        }
    }

    fn dot_vectors(&self, a: &Tensor, b: &Tensor) -> Result<Tensor> {
        let k = a.size();
        if k != b.size() {
            return reject(OpError::ShapeMismatch {
                op: "dot",
                lhs: a.dims().to_vec(),
                rhs: b.dims().to_vec(),
            });
        }
        trace!(k, backend = self.backend.name(), "dot: vector inner product");

        let sum = self.backend.matmul(a.data(), b.data(), 1, k, 1)?;
        Ok(Tensor::from_vec([1], sum)?)
    }

    fn matmul(&self, a: &Tensor, b: &Tensor) -> Result<Tensor> {
        let (m, k) = (a.dims()[0], a.dims()[1]);
        let (k2, n) = (b.dims()[0], b.dims()[1]);
        if k != k2 {
            return reject(OpError::MatmulMismatch { m, k, k2, n });
        }
        trace!(m, k, n, backend = self.backend.name(), "dot: matrix product");

        let data = self.backend.matmul(a.data(), b.data(), m, k, n)?;
        Ok(Tensor::from_vec([m, n], data)?)
    }

    fn batched_matmul(&self, a: &Tensor, b: &Tensor) -> Result<Tensor> {
        let rank = a.rank();
        if rank != b.rank() {
            return reject(OpError::ShapeMismatch {
                op: "dot",
                lhs: a.dims().to_vec(),
                rhs: b.dims().to_vec(),
            });
        }

        let batch = &a.dims()[..rank - 2];
        for (dim, (&lhs, &rhs)) in batch.iter().zip(&b.dims()[..rank - 2]).enumerate() {
            if lhs != rhs {
                return reject(OpError::BatchMismatch { dim, lhs, rhs });
            }
        }

        let (m, k) = (a.dims()[rank - 2], a.dims()[rank - 1]);
        let (k2, n) = (b.dims()[rank - 2], b.dims()[rank - 1]);
        if k != k2 {
            return reject(OpError::MatmulMismatch { m, k, k2, n });
        }

        let mut out_dims = batch.to_vec();
        out_dims.extend([m, n]);
        let mut out = Tensor::new(out_dims);
        trace!(
            batch = ?batch,
            m,
            k,
            n,
            backend = self.backend.name(),
            "dot: batched matrix product"
        );

        let mut batches = CoordIter::new(batch);
        while let Some(coords) = batches.next_coord() {
            let a_off = batch_offset(coords, a.strides());
            let b_off = batch_offset(coords, b.strides());
            let o_off = batch_offset(coords, out.strides());

            let c = self.backend.matmul(
                &a.data()[a_off..a_off + m * k],
                &b.data()[b_off..b_off + k * n],
                m,
                k,
                n,
            )?;
            out.data_mut()[o_off..o_off + m * n].copy_from_slice(&c);
        }
        Ok(out)
    }

    /// Element-wise `max(0, x)`.
    pub fn relu(&self, t: &Tensor) -> Result<Tensor> {
        trace!(shape = ?t.dims(), "relu");
        let data = self.backend.relu(t.data())?;
        Ok(Tensor::from_vec(t.shape().clone(), data)?)
    }

    /// Element-wise `1 / (1 + exp(-x))`.
    pub fn sigmoid(&self, t: &Tensor) -> Result<Tensor> {
        trace!(shape = ?t.dims(), "sigmoid");
        let data = self.backend.sigmoid(t.data())?;
        Ok(Tensor::from_vec(t.shape().clone(), data)?)
    }

    /// Softmax along the last dimension, independently for every
    /// combination of the outer dimensions.
    ///
    /// A zero-length last dimension gives an empty result of the same shape.
    pub fn softmax(&self, t: &Tensor) -> Result<Tensor> {
        let Some(&row_len) = t.dims().last() else {
            return reject(OpError::InvalidShape {
                op: "softmax",
                shape: t.dims().to_vec(),
            });
        };
        trace!(shape = ?t.dims(), row_len, "softmax");

        let data = self.backend.softmax(t.data(), row_len)?;
        Ok(Tensor::from_vec(t.shape().clone(), data)?)
    }
}

/// Checks `a` and `b` have identical shapes and returns `a`'s data.
fn same_shape<'a>(op: &'static str, a: &'a Tensor, b: &Tensor) -> Result<&'a [f64]> {
    if a.dims() != b.dims() {
        return reject(OpError::ShapeMismatch {
            op,
            lhs: a.dims().to_vec(),
            rhs: b.dims().to_vec(),
        });
    }
    trace!(op, shape = ?a.dims(), "elementwise");
    Ok(a.data())
}

/// Offset of a batch coordinate; the trailing matrix dimensions are zero.
fn batch_offset(coords: &[usize], strides: &[usize]) -> usize {
    coords.iter().zip(strides).map(|(c, s)| c * s).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn op() -> Operation {
        Operation::cpu()
    }

    fn t(dims: &[usize], values: &[f64]) -> Tensor {
        Tensor::from_vec(dims, values.to_vec()).unwrap()
    }

    fn arange(dims: &[usize]) -> Tensor {
        let n: usize = dims.iter().product();
        t(dims, &(0..n).map(|v| v as f64).collect::<Vec<_>>())
    }

    #[test]
    fn test_add_sub_mul() {
        let a = t(&[2, 2], &[1.0, 2.0, 3.0, 4.0]);
        let b = t(&[2, 2], &[5.0, 6.0, 7.0, 8.0]);
        assert_eq!(op().add(&a, &b).unwrap().data(), &[6.0, 8.0, 10.0, 12.0]);
        assert_eq!(op().sub(&a, &b).unwrap().data(), &[-4.0; 4]);
        assert_eq!(op().mul(&a, &b).unwrap().data(), &[5.0, 12.0, 21.0, 32.0]);
        assert_eq!(op().add(&a, &b).unwrap().dims(), &[2, 2]);
    }

    #[test]
    fn test_elementwise_shape_mismatch() {
        let a = Tensor::new([2, 2]);
        let b = Tensor::new([3, 3]);
        let err = op().add(&a, &b).unwrap_err();
        assert_eq!(
            err,
            OpError::ShapeMismatch {
                op: "add",
                lhs: vec![2, 2],
                rhs: vec![3, 3]
            }
        );
        // Same element count, different layout.
        assert!(op().mul(&Tensor::new([4]), &Tensor::new([2, 2])).is_err());
    }

    #[test]
    fn test_dot_vectors() {
        let a = t(&[3], &[1.0, 2.0, 3.0]);
        let b = t(&[3], &[4.0, 5.0, 6.0]);
        let r = op().dot(&a, &b).unwrap();
        assert_eq!(r.dims(), &[1]);
        assert_eq!(r.data(), &[32.0]);

        let err = op().dot(&a, &t(&[2], &[1.0, 1.0])).unwrap_err();
        assert!(err.is_shape_mismatch());
    }

    #[test]
    fn test_dot_zero_length_vectors() {
        let a = Tensor::new([0]);
        let r = op().dot(&a, &a).unwrap();
        assert_eq!(r.dims(), &[1]);
        assert_eq!(r.data(), &[0.0]);
    }

    #[test]
    fn test_dot_matrices() {
        let a = t(&[2, 2], &[1.0, 2.0, 3.0, 4.0]);
        let b = t(&[2, 2], &[5.0, 6.0, 7.0, 8.0]);
        let r = op().dot(&a, &b).unwrap();
        assert_eq!(r.dims(), &[2, 2]);
        assert_eq!(r.data(), &[19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_dot_rectangular() {
        let a = arange(&[2, 3]);
        let b = arange(&[3, 4]);
        let r = op().dot(&a, &b).unwrap();
        assert_eq!(r.dims(), &[2, 4]);
        assert_eq!(r.data(), &[20.0, 23.0, 26.0, 29.0, 56.0, 68.0, 80.0, 92.0]);
    }

    #[test]
    fn test_dot_inner_mismatch() {
        let err = op().dot(&Tensor::new([2, 3]), &Tensor::new([2, 3])).unwrap_err();
        assert_eq!(
            err,
            OpError::MatmulMismatch {
                m: 2,
                k: 3,
                k2: 2,
                n: 3
            }
        );
    }

    #[test]
    fn test_dot_batched_matches_per_batch_matmul() {
        let a = arange(&[2, 3, 2, 3]);
        let b = arange(&[2, 3, 3, 2]);
        let r = op().dot(&a, &b).unwrap();
        assert_eq!(r.dims(), &[2, 3, 2, 2]);

        for i in 0..2isize {
            for j in 0..3isize {
                let lhs = a.slice(&[(i, i + 1), (j, j + 1), (0, 2), (0, 3)]).unwrap();
                let rhs = b.slice(&[(i, i + 1), (j, j + 1), (0, 3), (0, 2)]).unwrap();
                let expected = op()
                    .dot(&lhs.reshape([2, 3]).unwrap(), &rhs.reshape([3, 2]).unwrap())
                    .unwrap();
                let got = r.slice(&[(i, i + 1), (j, j + 1), (0, 2), (0, 2)]).unwrap();
                assert_eq!(got.data(), expected.data(), "batch ({}, {})", i, j);
            }
        }
    }

    #[test]
    fn test_dot_batched_concrete() {
        // Two stacked copies of the 2x2 scenario, second batch scaled by 2.
        let a = t(&[2, 2, 2], &[1.0, 2.0, 3.0, 4.0, 2.0, 4.0, 6.0, 8.0]);
        let b = t(&[2, 2, 2], &[5.0, 6.0, 7.0, 8.0, 5.0, 6.0, 7.0, 8.0]);
        let r = op().dot(&a, &b).unwrap();
        assert_eq!(
            r.data(),
            &[19.0, 22.0, 43.0, 50.0, 38.0, 44.0, 86.0, 100.0]
        );
    }

    #[test]
    fn test_dot_batch_mismatch_names_dimension() {
        let err = op()
            .dot(&Tensor::new([2, 3, 2, 2]), &Tensor::new([2, 4, 2, 2]))
            .unwrap_err();
        assert_eq!(
            err,
            OpError::BatchMismatch {
                dim: 1,
                lhs: 3,
                rhs: 4
            }
        );
        assert!(err.is_shape_mismatch());
    }

    #[test]
    fn test_dot_batched_rank_and_inner_mismatch() {
        let err = op()
            .dot(&Tensor::new([2, 2, 2]), &Tensor::new([1, 2, 2, 2]))
            .unwrap_err();
        assert!(matches!(err, OpError::ShapeMismatch { op: "dot", .. }));

        let err = op()
            .dot(&Tensor::new([2, 2, 3]), &Tensor::new([2, 2, 3]))
            .unwrap_err();
        assert!(matches!(err, OpError::MatmulMismatch { .. }));
    }

    #[test]
    fn test_dot_unsupported_ranks() {
        let cases: [(Vec<usize>, Vec<usize>); 4] = [
            (vec![3], vec![3, 1]),
            (vec![2, 3], vec![3]),
            (vec![2, 2], vec![1, 2, 2]),
            (vec![], vec![]),
        ];
        for (lhs, rhs) in cases {
            let err = op().dot(&Tensor::new(lhs.clone()), &Tensor::new(rhs.clone()));
            assert!(
                matches!(err, Err(OpError::UnsupportedShape { op: "dot", .. })),
                "{:?} . {:?}",
                lhs,
                rhs
            );
        }
    }

    #[test]
    fn test_default_backend_is_cpu() {
        assert_eq!(Operation::<CpuBackend>::default().backend().name(), "cpu");
    }

    #[test]
    fn test_relu() {
        let r = op().relu(&t(&[2], &[-1.0, 2.0])).unwrap();
        assert_eq!(r.data(), &[0.0, 2.0]);
        assert_eq!(r.dims(), &[2]);
    }

    #[test]
    fn test_sigmoid() {
        let r = op().sigmoid(&t(&[1, 3], &[0.0, 100.0, -100.0])).unwrap();
        assert_eq!(r.dims(), &[1, 3]);
        assert_abs_diff_eq!(r.data()[0], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(r.data()[1], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.data()[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_softmax_1d() {
        let r = op().softmax(&t(&[3], &[1.0, 2.0, 3.0])).unwrap();
        let e: Vec<f64> = [-2.0f64, -1.0, 0.0].iter().map(|v| v.exp()).collect();
        let total: f64 = e.iter().sum();
        for (got, want) in r.data().iter().zip(&e) {
            assert_abs_diff_eq!(*got, want / total, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_softmax_last_dimension() {
        let x = t(&[2, 2], &[0.0, 0.0, 1.0, 3.0]);
        let r = op().softmax(&x).unwrap();
        assert_abs_diff_eq!(r.at(&[0, 0]).unwrap(), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(r.at(&[0, 1]).unwrap(), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(
            r.at(&[1, 0]).unwrap() + r.at(&[1, 1]).unwrap(),
            1.0,
            epsilon = 1e-12
        );
        assert!(r.at(&[1, 1]).unwrap() > r.at(&[1, 0]).unwrap());
    }

    #[test]
    fn test_softmax_rank0_rejected() {
        let err = op().softmax(&Tensor::new(Vec::<usize>::new())).unwrap_err();
        assert!(matches!(err, OpError::InvalidShape { op: "softmax", .. }));
    }

    #[test]
    fn test_softmax_empty_last_dim() {
        let r = op().softmax(&Tensor::new([3, 0])).unwrap();
        assert_eq!(r.dims(), &[3, 0]);
        assert!(r.is_empty());
    }

    #[test]
    fn test_inputs_untouched() {
        let a = t(&[2], &[-1.0, 1.0]);
        let before = a.clone();
        let _ = op().relu(&a).unwrap();
        let _ = op().softmax(&a).unwrap();
        let _ = op().add(&a, &a).unwrap();
        assert_eq!(a, before);
    }
}
