//! Error types for VipaniCart

use thiserror::Error;

/// VipaniCart error type
#[derive(Error, Debug)]
pub enum CartError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Malformed shopping list: {0}")]
    MalformedList(String),

    #[error("Navigation backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Navigation backend error: {0}")]
    Backend(String),

    #[error("Bridge channel closed: {0}")]
    ChannelClosed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for CartError {
    fn from(e: toml::de::Error) -> Self {
        CartError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for CartError {
    fn from(e: serde_json::Error) -> Self {
        CartError::MalformedList(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CartError>;
