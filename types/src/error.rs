//! Top-level error type shared across crates.

use thiserror::Error;

/// Common error type for the Learnopoly workspace.
#[derive(Debug, Error)]
pub enum LearnopolyError {
    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("invalid record id: {0}")]
    InvalidId(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("{0}")]
    Other(String),
}
