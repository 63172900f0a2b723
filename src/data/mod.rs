pub mod dataset;
pub mod encode;
pub mod idx;

pub use dataset::DataSet;
pub use encode::{normalize, one_hot};
pub use idx::load_mnist;
