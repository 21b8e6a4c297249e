//! Feed-forward network on `ndarray`.
//!
//! Dense layers with Xavier initialization, inverted dropout during training,
//! backpropagation and a per-layer Adam optimizer.

pub mod activation;
pub mod layer;
pub mod network;
pub mod optimizer;

pub use activation::Activation;
pub use layer::DenseLayer;
pub use network::Network;
pub use optimizer::Adam;
