//! Error types for dirsync.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Feed error: {0}")]
    Feed(String),

    #[error("API error: {0}")]
    Api(String),

    /// Identity creation failed on every attempt. Aborts the run.
    #[error("Cannot create identity {username} (last email tried: {email})")]
    Creation { username: String, email: String },
}

pub type Result<T> = std::result::Result<T, Error>;
