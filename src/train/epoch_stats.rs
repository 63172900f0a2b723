use serde::{Serialize, Deserialize};

use crate::eval::evaluate::Evaluation;

/// Per-epoch training statistics emitted by `train_loop`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, the training
/// loop sends one `EpochStats` value at the end of every completed epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Gradient steps taken this epoch.
    pub batches: usize,
    /// Samples left out by `BatchRemainder::Drop`.
    pub skipped: usize,
    /// Mean quadratic cost of the processed samples, each measured just
    /// before its batch's update.
    pub train_cost: f64,
    /// Validation result, if a non-empty validation set was provided.
    pub validation: Option<Evaluation>,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}
