use segue_model::VideoID;
use thiserror::Error;

/// Why a purchase did not go through.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PurchaseError {
    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Purchase rejected: {0}")]
    Rejected(String),
}

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("Video not found: {0}")]
    NotFound(VideoID),

    #[error("Purchase failed: {0}")]
    Purchase(#[from] PurchaseError),

    #[error("Backend error: {0}")]
    Collaborator(String),

    #[error("Cannot {intent} while session is {state}")]
    InvalidState {
        state: &'static str,
        intent: &'static str,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for PlaybackError {
    fn from(err: toml::de::Error) -> Self {
        PlaybackError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PlaybackError>;
