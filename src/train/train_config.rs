use std::fmt;
use std::str::FromStr;
use std::sync::mpsc;

use serde::{Deserialize, Serialize};

use crate::error::{MlpError, Result};
use crate::train::epoch_stats::EpochStats;

/// What to do with the trailing samples when the training set length is
/// not a multiple of the batch size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchRemainder {
    /// Only full batches are processed; up to `batch_size - 1` shuffled
    /// samples sit out each epoch.
    #[default]
    Drop,
    /// The shorter final batch is processed and averaged over its own length.
    Include,
}

impl fmt::Display for BatchRemainder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchRemainder::Drop => f.write_str("drop"),
            BatchRemainder::Include => f.write_str("include"),
        }
    }
}

impl FromStr for BatchRemainder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "drop" => Ok(BatchRemainder::Drop),
            "include" => Ok(BatchRemainder::Include),
            other => Err(format!("unknown remainder policy '{}' (expected drop or include)", other)),
        }
    }
}

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`        — total number of full passes over the training data
/// - `batch_size`    — samples per mini-batch; use `1` for online SGD
/// - `learning_rate` — multiplies the batch-averaged gradient
/// - `remainder`     — handling of the trailing partial batch
/// - `parallel`      — compute per-sample gradients of a batch on the rayon pool
/// - `progress_tx`   — optional channel sender; one `EpochStats` is sent per
///                     completed epoch. Not serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    #[serde(default)]
    pub remainder: BatchRemainder,
    #[serde(default)]
    pub parallel: bool,
    #[serde(skip)]
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
}

impl TrainConfig {
    /// Creates a minimal `TrainConfig`: remainder dropped, sequential
    /// gradients, no progress channel.
    pub fn new(epochs: usize, batch_size: usize, learning_rate: f64) -> Self {
        TrainConfig {
            epochs,
            batch_size,
            learning_rate,
            remainder: BatchRemainder::Drop,
            parallel: false,
            progress_tx: None,
        }
    }

    /// Checks the batch size against a training set of `samples` samples.
    pub fn validate(&self, samples: usize) -> Result<()> {
        if self.batch_size == 0 || self.batch_size > samples {
            return Err(MlpError::InvalidBatchConfiguration {
                batch_size: self.batch_size,
                samples,
            });
        }
        Ok(())
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `TrainConfig` from a JSON file.
    pub fn load_json(path: &str) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
