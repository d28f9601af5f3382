use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used across the crate.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The crate's error type.
#[derive(Debug, PartialEq, Eq)]
pub enum MlErr {
    /// Two inputs that must agree in size do not.
    ShapeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },

    /// An input is invalid for semantic or domain reasons.
    InvalidInput(&'static str),

    /// `predict` was called before any `train` call initialized the weights.
    NotTrained,
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::ShapeMismatch {
                what,
                got,
                expected,
            } => {
                write!(f, "shape mismatch for {what}: got {got}, expected {expected}")
            }
            MlErr::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            MlErr::NotTrained => write!(f, "the classifier has not been trained yet"),
        }
    }
}

impl Error for MlErr {}
