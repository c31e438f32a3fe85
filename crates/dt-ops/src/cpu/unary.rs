use crate::error::{OpError, Result};

pub fn relu(x: &[f64]) -> Vec<f64> {
    x.iter().map(|&v| v.max(0.0)).collect()
}

pub fn sigmoid(x: &[f64]) -> Vec<f64> {
    x.iter().map(|&v| 1.0 / (1.0 + (-v).exp())).collect()
}

/// Row-wise softmax with max subtraction for numerical stability.
pub fn softmax(x: &[f64], row_len: usize) -> Result<Vec<f64>> {
    if row_len == 0 {
        if x.is_empty() {
            return Ok(Vec::new());
        }
        return Err(OpError::Other(
            "softmax: row_len must be > 0".to_string(),
        ));
    }
    if x.len() % row_len != 0 {
        return Err(OpError::Other(format!(
            "softmax: x.len()={} is not a multiple of row_len={}",
            x.len(),
            row_len
        )));
    }

    let mut result = vec![0.0f64; x.len()];
    for (row, out) in x.chunks_exact(row_len).zip(result.chunks_exact_mut(row_len)) {
        let max_val = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let mut sum = 0.0f64;
        for (o, &v) in out.iter_mut().zip(row) {
            let e = (v - max_val).exp();
            *o = e;
            sum += e;
        }

        for o in out.iter_mut() {
            *o /= sum;
        }
    }

    Ok(result)
}
