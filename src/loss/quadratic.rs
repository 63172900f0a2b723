use crate::math::matrix::Matrix;

/// Quadratic cost `C = ½‖a − y‖²` used by backpropagation.
pub struct QuadraticCost;

impl QuadraticCost {
    /// Scalar cost for one output/target pair of equal shape.
    pub fn cost(output: &Matrix, target: &Matrix) -> f64 {
        0.5 * (output - target).norm_squared()
    }

    /// ∂C/∂a: `output - target`
    pub fn derivative(output: &Matrix, target: &Matrix) -> Matrix {
        output - target
    }
}
