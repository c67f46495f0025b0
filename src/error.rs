//! Configuration errors
//!
//! Gameplay never produces errors: rejected actions are plain outcomes.
//! Only loading a match configuration can fail.

use thiserror::Error;

/// Errors that can occur while loading or validating a match configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// Config JSON was malformed or missing fields
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A fighter's stats cannot produce a playable match
    #[error("invalid stats for fighter {slot}: {reason}")]
    InvalidStats { slot: usize, reason: &'static str },
    /// Command-line seed was not an unsigned integer
    #[error("invalid seed '{0}'")]
    InvalidSeed(String),
}
