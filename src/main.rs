//! Trains a sigmoid MLP on MNIST and reports test-set accuracy.
//!
//! Expects the four uncompressed IDX files (`train-images-idx3-ubyte`,
//! `train-labels-idx1-ubyte`, `t10k-images-idx3-ubyte`,
//! `t10k-labels-idx1-ubyte`) in the data directory.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mlp_sgd::data::load_mnist;
use mlp_sgd::{train_loop, ActivationFunction, BatchRemainder, Network, TrainConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Parser)]
#[command(name = "mlp-sgd")]
#[command(about = "Train a multilayer perceptron on MNIST with mini-batch SGD", long_about = None)]
struct Cli {
    /// Directory holding the uncompressed MNIST IDX files
    #[arg(default_value = "data")]
    data_dir: PathBuf,

    /// Layer widths, input first
    #[arg(long, value_delimiter = ',', default_value = "784,20,20,10")]
    layers: Vec<usize>,

    /// Train on the first N images of the training file
    #[arg(long, default_value = "30000")]
    train_samples: usize,

    /// Validate on the last N images of the training file (0 disables)
    #[arg(long, default_value = "1000")]
    validation_samples: usize,

    /// Number of epochs
    #[arg(long, default_value = "10")]
    epochs: usize,

    /// Mini-batch size
    #[arg(long, default_value = "10")]
    batch_size: usize,

    /// Learning rate
    #[arg(long, default_value = "3.0")]
    learning_rate: f64,

    /// Trailing partial batch handling (drop, include)
    #[arg(long, default_value = "drop")]
    remainder: BatchRemainder,

    /// Compute per-sample gradients of each batch in parallel
    #[arg(long)]
    parallel: bool,

    /// Activation applied by every layer (sigmoid, relu, tanh)
    #[arg(long, default_value = "sigmoid")]
    activation: ActivationFunction,

    /// Seed for weight initialization and shuffling; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// JSON training config; replaces the hyperparameter flags above
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write per-epoch statistics as JSON to this file
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &cli.config {
        Some(path) => {
            let path = path.to_str().context("config path is not valid UTF-8")?;
            TrainConfig::load_json(path).with_context(|| format!("loading config {}", path))?
        }
        None => {
            let mut config = TrainConfig::new(cli.epochs, cli.batch_size, cli.learning_rate);
            config.remainder = cli.remainder;
            config.parallel = cli.parallel;
            config
        }
    };

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (full_training, test) = load_mnist(&cli.data_dir)
        .with_context(|| format!("loading MNIST from {}", cli.data_dir.display()))?;

    let training = full_training.slice(0..cli.train_samples);
    let validation = full_training.slice(
        full_training.len().saturating_sub(cli.validation_samples)..full_training.len(),
    );

    let mut network = Network::new(&cli.layers, &mut rng)?.with_activation(cli.activation);
    info!(
        layers = ?cli.layers,
        activation = %cli.activation,
        training = training.len(),
        validation = validation.len(),
        epochs = config.epochs,
        batch_size = config.batch_size,
        learning_rate = config.learning_rate,
        remainder = %config.remainder,
        "starting training"
    );

    let history = train_loop(&mut network, &training, Some(&validation), &config, &mut rng)?;

    if let Some(path) = &cli.stats {
        let writer = BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        );
        serde_json::to_writer_pretty(writer, &history)?;
        info!(path = %path.display(), "wrote epoch statistics");
    }

    let result = network.evaluate_counts(&test)?;
    info!(correct = result.correct, total = result.total, "test set evaluated");
    println!("Accuracy: {:.2}%", result.accuracy() * 100.0);

    Ok(())
}
