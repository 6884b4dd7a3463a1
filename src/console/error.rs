//! Console error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Only one console may exist per process
    #[error("a console instance is already active in this process")]
    AlreadyActive,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
