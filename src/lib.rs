pub mod math;
pub mod activation;
pub mod error;
pub mod network;
pub mod backprop;
pub mod loss;
pub mod optim;
pub mod eval;
pub mod train;
pub mod data;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use error::{MlpError, Result};
pub use network::network::Network;
pub use network::trace::ForwardTrace;
pub use backprop::gradients::Gradients;
pub use loss::quadratic::QuadraticCost;
pub use optim::sgd::Sgd;
pub use eval::evaluate::Evaluation;
pub use train::{train_loop, BatchRemainder, EpochStats, TrainConfig};
pub use data::dataset::DataSet;
