//! Error types for the terminal shell around the game.
//!
//! Game logic itself cannot fail; these cover the terminal, the config
//! file, the history database and log setup.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArenaError {
    /// Terminal/IO error
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("History error: {0}")]
    History(#[from] rusqlite::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Logging error: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, ArenaError>;
