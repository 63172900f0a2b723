pub mod network;
pub mod trace;

pub use network::Network;
pub use trace::ForwardTrace;
