use rand::Rng;

use crate::data::dataset::DataSet;
use crate::error::Result;
use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::loop_fn::train_loop;
use crate::train::train_config::TrainConfig;

impl Network {
    /// Mini-batch SGD with the default settings: trailing partial batches
    /// are dropped, gradients are computed sequentially and progress is only
    /// logged. Use `train_loop` with a full `TrainConfig` for the rest.
    pub fn train<R: Rng + ?Sized>(
        &mut self,
        training: &DataSet,
        validation: Option<&DataSet>,
        batch_size: usize,
        epochs: usize,
        learning_rate: f64,
        rng: &mut R,
    ) -> Result<Vec<EpochStats>> {
        let config = TrainConfig::new(epochs, batch_size, learning_rate);
        train_loop(self, training, validation, &config, rng)
    }
}
