use crate::backprop::gradients::Gradients;
use crate::error::Result;
use crate::loss::quadratic::QuadraticCost;
use crate::math::matrix::Matrix;
use crate::network::network::Network;

impl Network {
    /// Gradients of `C = ½‖a[L] − y‖²` with respect to every weight and bias
    /// for a single sample, evaluated at the current parameters.
    ///
    /// Layers are visited back to front. With `δ[i] = ∂C/∂z[i]`:
    ///
    /// ```text
    /// δ[L-1] = (a[L] − y) ⊙ σ'(z[L-1])
    /// δ[i]   = (W[i+1]ᵗ · δ[i+1]) ⊙ σ'(z[i])
    /// dB[i]  = δ[i]
    /// dW[i]  = δ[i] · a[i]ᵗ
    /// ```
    ///
    /// The network is not modified.
    pub fn backward(&self, input: &Matrix, target: &Matrix) -> Result<Gradients> {
        self.check_target(target)?;
        let trace = self.forward(input)?;

        let layers = self.layer_count();
        let mut weight_grads = vec![Matrix::default(); layers];
        let mut bias_grads = vec![Matrix::default(); layers];

        let activation = self.activation();
        let error = QuadraticCost::derivative(trace.output(), target);
        let cost = QuadraticCost::cost(trace.output(), target);

        let mut delta = layer_delta(&error, &trace.weighted_sums[layers - 1], |x| {
            activation.derivative(x)
        });

        for i in (0..layers).rev() {
            weight_grads[i] = &delta * &trace.activations[i].transpose();

            let next_delta = if i > 0 {
                // Propagate δ[i] through W[i] to get ∂C/∂a[i]
                let upstream = &self.weights()[i].transpose() * &delta;
                Some(layer_delta(&upstream, &trace.weighted_sums[i - 1], |x| {
                    activation.derivative(x)
                }))
            } else {
                None
            };

            bias_grads[i] = delta;
            match next_delta {
                Some(d) => delta = d,
                None => break,
            }
        }

        Ok(Gradients {
            weights: weight_grads,
            biases: bias_grads,
            cost,
        })
    }
}

/// δ = error ⊙ σ'(z)
fn layer_delta<F>(error: &Matrix, weighted_sum: &Matrix, derivative: F) -> Matrix
where
    F: Fn(f64) -> f64,
{
    error.hadamard(&weighted_sum.map(derivative))
}
