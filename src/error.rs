//! Error types for the noughts crate

use thiserror::Error;

/// Main error type for the noughts crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid board size {size} (must be at least 1)")]
    InvalidBoardSize { size: usize },

    #[error("board string has {got} cells, which is not a square number, in '{context}'")]
    InvalidBoardLength { got: usize, context: String },

    #[error("invalid character '{character}' at position {position} in '{context}'")]
    InvalidCellCharacter {
        character: char,
        position: usize,
        context: String,
    },

    #[error("no valid moves available")]
    NoValidMoves,

    #[error("training step requires an empty cell but the board is finished:\n{board}")]
    BoardFinished { board: String },

    #[error("no Q-value stored for action {action} in state '{state}'")]
    MissingQEntry { state: String, action: String },

    #[error("stored action {action} is not playable in state '{state}'")]
    IllegalStoredAction { state: String, action: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("input stream closed while waiting for a move")]
    InputClosed,

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
