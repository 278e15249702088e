//! Cart error types.
//!
//! Cart mutations never fail: bad input is coerced and storage trouble is
//! logged. These errors only surface from configuration loading and from the
//! internal persistence helpers whose callers swallow them.

use thiserror::Error;

/// Errors produced inside the cart engine.
#[derive(Error, Debug)]
pub enum CartError {
    /// Backing storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] turbo_kv::KvError),

    /// A value could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for CartError {
    fn from(e: serde_json::Error) -> Self {
        CartError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for CartError {
    fn from(e: toml::de::Error) -> Self {
        CartError::Config(e.to_string())
    }
}
