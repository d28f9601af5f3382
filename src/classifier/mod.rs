mod linear;
mod softmax;
mod strategy;
mod svm;

pub use linear::{LinearClassifier, LinearSvm, SgdConfig, SoftmaxClassifier};
pub use softmax::SoftmaxCrossEntropy;
pub use strategy::LossStrategy;
pub use svm::Svm;
