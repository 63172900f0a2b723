use serde::{Deserialize, Serialize};

use crate::data::dataset::DataSet;
use crate::error::{MlpError, Result};
use crate::network::network::Network;

/// Classification result over a labeled set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub correct: usize,
    pub total: usize,
}

impl Evaluation {
    /// Fraction correct in `[0, 1]`; zero for an empty count.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }
}

impl Network {
    /// Counts samples whose predicted class (argmax of the output) matches
    /// the true class (argmax of the target).
    pub fn evaluate_counts(&self, data: &DataSet) -> Result<Evaluation> {
        if data.is_empty() {
            return Err(MlpError::EmptyDataSet("evaluate"));
        }
        data.check_shapes(self.input_size(), self.output_size())?;

        let mut correct = 0;
        for (input, target) in data.iter() {
            let output = self.predict(input)?;
            // An all-NaN output or target has no class and never matches.
            if let (Some(predicted), Some(actual)) = (output.argmax(), target.argmax()) {
                if predicted == actual {
                    correct += 1;
                }
            }
        }

        Ok(Evaluation { correct, total: data.len() })
    }

    /// Classification accuracy over `data`, in `[0, 1]`.
    pub fn evaluate(&self, data: &DataSet) -> Result<f64> {
        Ok(self.evaluate_counts(data)?.accuracy())
    }
}
