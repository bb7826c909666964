//! Error types
//!
//! Only `EmptyDeck` ever reaches the caller of a round operation. Everything
//! else is absorbed by the controller and degrades the affected channel.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// A round was requested with nothing to play
    #[error("deck is empty: add at least one phrase before starting")]
    EmptyDeck,

    /// The platform refused motion sensor access
    #[error("motion permission denied")]
    PermissionDenied,

    /// Settings could not be (de)serialized
    #[error("settings storage error: {0}")]
    Storage(String),
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        GameError::Storage(err.to_string())
    }
}
