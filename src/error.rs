//! Error taxonomy for the game core.
//!
//! Configuration and state errors are caller bugs and are returned as `Err`.
//! Persistence and playback errors never leave `ScoreStore` / `SoundBoard`;
//! they are logged and dropped so the game keeps running offline or muted.

use thiserror::Error;

use crate::session::Phase;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("`{op}` is not allowed while the session is {phase:?}")]
    InvalidState { op: &'static str, phase: Phase },

    #[error("score persistence failed: {0}")]
    Persistence(String),

    #[error("audio playback failed: {0}")]
    Playback(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
