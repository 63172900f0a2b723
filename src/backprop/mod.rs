pub mod backward;
pub mod gradients;

pub use gradients::Gradients;
