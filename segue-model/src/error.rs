use std::fmt::{self, Display};

/// Errors produced by model constructors and value parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    InvalidAmount(String),
    NegativeAmount(i64),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidAmount(raw) => {
                write!(f, "invalid amount: {raw:?}")
            }
            ModelError::NegativeAmount(cents) => {
                write!(f, "amount must not be negative (got {cents} cents)")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
