use rand::Rng;
use tracing::debug;

use crate::activation::activation::ActivationFunction;
use crate::error::{MlpError, Result};
use crate::loss::quadratic::QuadraticCost;
use crate::math::matrix::Matrix;
use crate::network::trace::ForwardTrace;

/// A fully-connected feedforward network.
///
/// `weights[i]` has shape `(sizes[i+1], sizes[i])`, so `weights[i].data[j][k]` is
/// the weight from neuron `k` of layer `i` to neuron `j` of layer `i + 1`.
/// `biases[i]` is a `(sizes[i+1], 1)` column. The parameters are private:
/// the only code that changes them after construction is the gradient
/// descent step (`Sgd::step`).
#[derive(Debug, Clone)]
pub struct Network {
    sizes: Vec<usize>,
    weights: Vec<Matrix>,
    biases: Vec<Matrix>,
    activation: ActivationFunction,
}

impl Network {
    /// Builds a sigmoid network with layer widths `sizes` (input first).
    /// Every weight and bias is an independent N(0, 1) draw from `rng`.
    pub fn new<R: Rng + ?Sized>(sizes: &[usize], rng: &mut R) -> Result<Network> {
        validate_topology(sizes)?;

        let (weights, biases): (Vec<Matrix>, Vec<Matrix>) = sizes
            .windows(2)
            .map(|pair| {
                let (fan_in, width) = (pair[0], pair[1]);
                let w = Matrix::standard_normal(width, fan_in, &mut *rng);
                let b = Matrix::standard_normal(width, 1, &mut *rng);
                (w, b)
            })
            .unzip();

        debug!(?sizes, "initialized network");

        Ok(Network {
            sizes: sizes.to_vec(),
            weights,
            biases,
            activation: ActivationFunction::Sigmoid,
        })
    }

    /// Builds a network from explicit parameters. Layer sizes are derived
    /// from the weight shapes, which must chain.
    pub fn from_parameters(weights: Vec<Matrix>, biases: Vec<Matrix>) -> Result<Network> {
        if weights.is_empty() {
            return Err(MlpError::InvalidTopology(
                "a network needs at least one weight layer".to_owned(),
            ));
        }
        if weights.len() != biases.len() {
            return Err(MlpError::InvalidTopology(format!(
                "{} weight matrices but {} bias vectors",
                weights.len(),
                biases.len()
            )));
        }

        let mut sizes = vec![weights[0].cols];
        for (i, (w, b)) in weights.iter().zip(biases.iter()).enumerate() {
            let fan_in = sizes[i];
            if w.cols != fan_in {
                return Err(MlpError::ShapeMismatch {
                    context: "weight matrix",
                    expected: (w.rows, fan_in),
                    actual: w.shape(),
                });
            }
            if b.shape() != (w.rows, 1) {
                return Err(MlpError::ShapeMismatch {
                    context: "bias vector",
                    expected: (w.rows, 1),
                    actual: b.shape(),
                });
            }
            sizes.push(w.rows);
        }
        validate_topology(&sizes)?;

        Ok(Network {
            sizes,
            weights,
            biases,
            activation: ActivationFunction::Sigmoid,
        })
    }

    /// Replaces the activation used by every layer (sigmoid by default).
    pub fn with_activation(mut self, activation: ActivationFunction) -> Network {
        self.activation = activation;
        self
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn weights(&self) -> &[Matrix] {
        &self.weights
    }

    pub fn biases(&self) -> &[Matrix] {
        &self.biases
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activation
    }

    /// Number of weight/bias layers, `sizes.len() - 1`.
    pub fn layer_count(&self) -> usize {
        self.weights.len()
    }

    pub fn input_size(&self) -> usize {
        self.sizes[0]
    }

    pub fn output_size(&self) -> usize {
        self.sizes[self.sizes.len() - 1]
    }

    /// Runs `input` through every layer and returns the full activation and
    /// weighted-sum trace. Reads the parameters only.
    pub fn forward(&self, input: &Matrix) -> Result<ForwardTrace> {
        self.check_input(input)?;

        let mut activations = Vec::with_capacity(self.sizes.len());
        let mut weighted_sums = Vec::with_capacity(self.layer_count());
        activations.push(input.clone());

        for (w, b) in self.weights.iter().zip(self.biases.iter()) {
            let a = &activations[activations.len() - 1];
            let z = &(w * a) + b;
            let next = z.map(|x| self.activation.function(x));
            weighted_sums.push(z);
            activations.push(next);
        }

        Ok(ForwardTrace { activations, weighted_sums })
    }

    /// Output-layer activation for `input`, read as class scores.
    pub fn predict(&self, input: &Matrix) -> Result<Matrix> {
        Ok(self.forward(input)?.into_output())
    }

    /// Quadratic cost of the current parameters on one sample.
    pub fn cost(&self, input: &Matrix, target: &Matrix) -> Result<f64> {
        self.check_target(target)?;
        let output = self.predict(input)?;
        Ok(QuadraticCost::cost(&output, target))
    }

    pub(crate) fn check_input(&self, input: &Matrix) -> Result<()> {
        check_column("input vector", input, self.input_size())
    }

    pub(crate) fn check_target(&self, target: &Matrix) -> Result<()> {
        check_column("target vector", target, self.output_size())
    }

    /// Subtracts already-scaled gradients from every layer in place.
    pub(crate) fn apply_update(&mut self, weight_steps: &[Matrix], bias_steps: &[Matrix]) {
        debug_assert_eq!(weight_steps.len(), self.weights.len());
        debug_assert_eq!(bias_steps.len(), self.biases.len());

        for (w, step) in self.weights.iter_mut().zip(weight_steps.iter()) {
            *w -= step;
        }
        for (b, step) in self.biases.iter_mut().zip(bias_steps.iter()) {
            *b -= step;
        }
    }
}

fn validate_topology(sizes: &[usize]) -> Result<()> {
    if sizes.len() < 2 {
        return Err(MlpError::InvalidTopology(format!(
            "network must have at least two layers, got {}",
            sizes.len()
        )));
    }
    if let Some(i) = sizes.iter().position(|&s| s == 0) {
        return Err(MlpError::InvalidTopology(format!("layer {} has zero width", i)));
    }
    Ok(())
}

fn check_column(context: &'static str, m: &Matrix, rows: usize) -> Result<()> {
    if m.shape() != (rows, 1) {
        return Err(MlpError::ShapeMismatch {
            context,
            expected: (rows, 1),
            actual: m.shape(),
        });
    }
    Ok(())
}
