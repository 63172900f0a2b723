use std::ops::Range;

use crate::error::{MlpError, Result};
use crate::math::matrix::Matrix;

/// Labeled samples stored as two parallel sequences: `inputs[i]` is paired
/// with `targets[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    inputs: Vec<Matrix>,
    targets: Vec<Matrix>,
}

impl DataSet {
    pub fn new(inputs: Vec<Matrix>, targets: Vec<Matrix>) -> Result<DataSet> {
        if inputs.len() != targets.len() {
            return Err(MlpError::LengthMismatch {
                inputs: inputs.len(),
                targets: targets.len(),
            });
        }
        Ok(DataSet { inputs, targets })
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn inputs(&self) -> &[Matrix] {
        &self.inputs
    }

    pub fn targets(&self) -> &[Matrix] {
        &self.targets
    }

    /// The `(input, target)` pair at `index`.
    pub fn get(&self, index: usize) -> Option<(&Matrix, &Matrix)> {
        Some((self.inputs.get(index)?, self.targets.get(index)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Matrix, &Matrix)> + '_ {
        self.inputs.iter().zip(self.targets.iter())
    }

    /// Copy of the samples in `range`, clamped to the set's length.
    pub fn slice(&self, range: Range<usize>) -> DataSet {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        DataSet {
            inputs: self.inputs[start..end].to_vec(),
            targets: self.targets[start..end].to_vec(),
        }
    }

    /// Splits into `[0, at)` and `[at, len)`.
    pub fn split_at(mut self, at: usize) -> (DataSet, DataSet) {
        let at = at.min(self.len());
        let inputs = self.inputs.split_off(at);
        let targets = self.targets.split_off(at);
        (self, DataSet { inputs, targets })
    }

    /// Checks that every input is an `(input_rows, 1)` column and every
    /// target an `(target_rows, 1)` column.
    pub fn check_shapes(&self, input_rows: usize, target_rows: usize) -> Result<()> {
        for (input, target) in self.iter() {
            if input.shape() != (input_rows, 1) {
                return Err(MlpError::ShapeMismatch {
                    context: "input vector",
                    expected: (input_rows, 1),
                    actual: input.shape(),
                });
            }
            if target.shape() != (target_rows, 1) {
                return Err(MlpError::ShapeMismatch {
                    context: "target vector",
                    expected: (target_rows, 1),
                    actual: target.shape(),
                });
            }
        }
        Ok(())
    }
}
