use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::data::dataset::DataSet;
use crate::error::{MlpError, Result};
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::{BatchRemainder, TrainConfig};

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` with mini-batch SGD for `config.epochs` epochs and
/// returns the statistics of every completed epoch.
///
/// # Arguments
/// - `network`    — mutable reference to the network; modified in place
/// - `training`   — training samples
/// - `validation` — optional held-out set, evaluated after every epoch when
///                  non-empty; never affects the parameters
/// - `config`     — hyperparameters and optional progress channel
/// - `rng`        — drives the per-epoch shuffle
///
/// # Errors
/// Everything is checked before the first update: an empty training set,
/// a batch size of zero or larger than the training set, and any sample
/// whose shape does not fit the network.
pub fn train_loop<R: Rng + ?Sized>(
    network: &mut Network,
    training: &DataSet,
    validation: Option<&DataSet>,
    config: &TrainConfig,
    rng: &mut R,
) -> Result<Vec<EpochStats>> {
    if training.is_empty() {
        return Err(MlpError::EmptyDataSet("train"));
    }
    config.validate(training.len())?;
    training.check_shapes(network.input_size(), network.output_size())?;
    let validation = validation.filter(|v| !v.is_empty());
    if let Some(v) = validation {
        v.check_shapes(network.input_size(), network.output_size())?;
    }

    let optimizer = Sgd::new(config.learning_rate).with_parallel(config.parallel);
    let mut progress = config.progress_tx.as_ref();
    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        // ── One full pass over the training data ───────────────────────────
        let pass = run_one_epoch(network, training, &optimizer, config, &mut *rng)?;

        // ── Validation ────────────────────────────────────────────────────
        let validation_result = match validation {
            Some(v) => Some(network.evaluate_counts(v)?),
            None => None,
        };

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            batches: pass.batches,
            skipped: pass.skipped,
            train_cost: pass.mean_cost,
            validation: validation_result,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };

        match stats.validation {
            Some(v) => info!(
                epoch,
                total = config.epochs,
                train_cost = stats.train_cost,
                elapsed_ms = stats.elapsed_ms,
                "epoch {}: {} / {}",
                epoch,
                v.correct,
                v.total
            ),
            None => info!(
                epoch,
                total = config.epochs,
                train_cost = stats.train_cost,
                elapsed_ms = stats.elapsed_ms,
                "epoch {} complete",
                epoch
            ),
        }

        // ── Emit progress ─────────────────────────────────────────────────
        if let Some(tx) = progress {
            if tx.send(stats.clone()).is_err() {
                debug!("progress receiver dropped; no further epoch stats will be sent");
                progress = None;
            }
        }

        history.push(stats);
    }

    Ok(history)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

struct EpochPass {
    batches: usize,
    skipped: usize,
    mean_cost: f64,
}

/// Shuffles sample order, then runs one gradient step per contiguous batch.
fn run_one_epoch<R: Rng + ?Sized>(
    network: &mut Network,
    training: &DataSet,
    optimizer: &Sgd,
    config: &TrainConfig,
    rng: &mut R,
) -> Result<EpochPass> {
    let n = training.len();

    // One permutation for inputs and targets alike.
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);

    let mut batches = 0;
    let mut skipped = 0;
    let mut processed = 0;
    let mut total_cost = 0.0;

    for chunk in indices.chunks(config.batch_size) {
        if chunk.len() < config.batch_size && config.remainder == BatchRemainder::Drop {
            skipped = chunk.len();
            debug!(skipped, batch_size = config.batch_size, "dropped trailing partial batch");
            break;
        }

        let inputs: Vec<&Matrix> = chunk.iter().map(|&i| &training.inputs()[i]).collect();
        let targets: Vec<&Matrix> = chunk.iter().map(|&i| &training.targets()[i]).collect();

        let mean_cost = optimizer.step(network, &inputs, &targets)?;
        total_cost += mean_cost * chunk.len() as f64;
        processed += chunk.len();
        batches += 1;
    }

    Ok(EpochPass {
        batches,
        skipped,
        mean_cost: total_cost / processed as f64,
    })
}
