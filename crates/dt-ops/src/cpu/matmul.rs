use crate::error::{OpError, Result};

/// Naive triple-loop matrix product of row-major `[m, k]` and `[k, n]`.
///
/// With `k == 0` the result is an all-zero `[m, n]` buffer.
pub fn matmul(a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Result<Vec<f64>> {
    if a.len() != m * k {
        return Err(OpError::Other(format!(
            "matmul: a.len()={} but expected m*k={}",
            a.len(),
            m * k
        )));
    }
    if b.len() != k * n {
        return Err(OpError::Other(format!(
            "matmul: b.len()={} but expected k*n={}",
            b.len(),
            k * n
        )));
    }

    let mut c = vec![0.0f64; m * n];
    for i in 0..m {
        for j in 0..n {
            let mut sum = 0.0f64;
            for p in 0..k {
                sum += a[i * k + p] * b[p * n + j];
            }
            c[i * n + j] = sum;
        }
    }
    Ok(c)
}
