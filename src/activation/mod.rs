pub mod activation;

pub use activation::{sigmoid, sigmoid_prime, ActivationFunction};
