/// Error types for the persistence collaborators. The simulation itself is
/// infallible.

use std::path::PathBuf;

use thiserror::Error;

/// Errors reading or writing the level-progress file.
#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("failed to read progress file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write progress file '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed progress file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors from the score database.
#[derive(Debug, Error)]
pub enum ScoreStoreError {
    #[error("score database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("player name must not be empty")]
    EmptyPlayerName,

    #[error("level id {0} is out of range")]
    InvalidLevel(i32),
}
