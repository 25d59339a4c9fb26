//! Engine error types
//!
//! Playback never fails; only loading configuration can.

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum AnimateError {
    /// Failed to read a config file
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for this schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config parsed but holds unusable values
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, AnimateError>;
