pub mod classifier;
pub mod convnet;
pub mod error;
pub mod layers;

pub use error::{MlErr, Result};
