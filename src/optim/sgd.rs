use std::borrow::Borrow;

use rayon::prelude::*;
use tracing::trace;

use crate::backprop::gradients::Gradients;
use crate::error::{MlpError, Result};
use crate::math::matrix::Matrix;
use crate::network::network::Network;

/// Plain mini-batch gradient descent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub learning_rate: f64,
    /// Compute per-sample gradients of a batch on the rayon pool.
    pub parallel: bool,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate, parallel: false }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Sgd {
        self.parallel = parallel;
        self
    }

    /// Sum of the per-sample gradient bundles over one batch. Every sample is
    /// evaluated against the same, unmodified parameters.
    pub fn batch_gradients<M>(
        &self,
        network: &Network,
        inputs: &[M],
        targets: &[M],
    ) -> Result<Gradients>
    where
        M: Borrow<Matrix> + Sync,
    {
        if inputs.is_empty() {
            return Err(MlpError::EmptyDataSet("gradient descent"));
        }
        if inputs.len() != targets.len() {
            return Err(MlpError::LengthMismatch {
                inputs: inputs.len(),
                targets: targets.len(),
            });
        }

        if self.parallel {
            inputs
                .par_iter()
                .zip(targets.par_iter())
                .map(|(x, y)| network.backward(sample(x), sample(y)))
                .try_reduce(|| Gradients::zeros_like(network), |a, b| Ok(a.merged(b)))
        } else {
            let mut sum = Gradients::zeros_like(network);
            for (x, y) in inputs.iter().zip(targets.iter()) {
                sum.accumulate(&network.backward(sample(x), sample(y))?);
            }
            Ok(sum)
        }
    }

    /// One update over a batch: `θ ← θ − (learning_rate / n) · Σ ∇C`.
    ///
    /// All gradients are computed before any parameter changes, so a shape
    /// error in any sample leaves the network untouched. Returns the mean
    /// cost of the batch under the parameters before the update.
    pub fn step<M>(&self, network: &mut Network, inputs: &[M], targets: &[M]) -> Result<f64>
    where
        M: Borrow<Matrix> + Sync,
    {
        let sum = self.batch_gradients(network, inputs, targets)?;
        let n = inputs.len() as f64;
        let update = sum.scaled(self.learning_rate / n);

        network.apply_update(&update.weights, &update.biases);

        let mean_cost = sum.cost / n;
        trace!(batch = inputs.len(), mean_cost, "applied gradient step");
        Ok(mean_cost)
    }
}

fn sample<M: Borrow<Matrix>>(m: &M) -> &Matrix {
    m.borrow()
}
