use crate::math::matrix::Matrix;

/// Intermediate values of one forward pass.
///
/// `activations[0]` is the input and `activations[i + 1] = σ(weighted_sums[i])`,
/// so there is one more activation than weighted sum.
#[derive(Debug, Clone)]
pub struct ForwardTrace {
    pub activations: Vec<Matrix>,
    pub weighted_sums: Vec<Matrix>,
}

impl ForwardTrace {
    /// Final-layer activation.
    pub fn output(&self) -> &Matrix {
        &self.activations[self.activations.len() - 1]
    }

    pub fn into_output(mut self) -> Matrix {
        self.activations.pop().unwrap_or_default()
    }
}
