use crate::math::matrix::Matrix;
use crate::network::network::Network;

/// Per-layer cost gradients, shaped like the network's parameters.
///
/// `cost` carries the quadratic cost of the sample(s) the gradients were
/// computed from, summed when bundles are accumulated.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub weights: Vec<Matrix>,
    pub biases: Vec<Matrix>,
    pub cost: f64,
}

impl Gradients {
    /// All-zero bundle matching `network`'s parameter shapes.
    pub fn zeros_like(network: &Network) -> Gradients {
        Gradients {
            weights: network.weights().iter().map(|w| Matrix::zeros(w.rows, w.cols)).collect(),
            biases: network.biases().iter().map(|b| Matrix::zeros(b.rows, b.cols)).collect(),
            cost: 0.0,
        }
    }

    /// Element-wise sum of `other` into `self`.
    pub fn accumulate(&mut self, other: &Gradients) {
        for (acc, g) in self.weights.iter_mut().zip(other.weights.iter()) {
            *acc += g;
        }
        for (acc, g) in self.biases.iter_mut().zip(other.biases.iter()) {
            *acc += g;
        }
        self.cost += other.cost;
    }

    /// Consuming sum, used as the reduction step of parallel accumulation.
    pub fn merged(mut self, other: Gradients) -> Gradients {
        self.accumulate(&other);
        self
    }

    /// Every gradient entry multiplied by `factor`; `cost` is left as is.
    pub fn scaled(&self, factor: f64) -> Gradients {
        Gradients {
            weights: self.weights.iter().map(|w| w.scale(factor)).collect(),
            biases: self.biases.iter().map(|b| b.scale(factor)).collect(),
            cost: self.cost,
        }
    }
}
