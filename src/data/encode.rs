use crate::error::{MlpError, Result};
use crate::math::matrix::Matrix;

/// Raw pixel bytes as a column vector with every value mapped from
/// `[0, 255]` to `[0.0, 1.0]`.
pub fn normalize(pixels: &[u8]) -> Matrix {
    Matrix::column(pixels.iter().map(|&p| p as f64 / 255.0).collect())
}

/// One-hot column of length `classes` with a `1.0` at `label`.
pub fn one_hot(label: usize, classes: usize) -> Result<Matrix> {
    if label >= classes {
        return Err(MlpError::Format(format!(
            "class index {} is out of range for {} classes",
            label, classes
        )));
    }
    let mut values = vec![0.0; classes];
    values[label] = 1.0;
    Ok(Matrix::column(values))
}
