// error.rs — Error types for proposal operations.

use thiserror::Error;

/// Errors that can occur while proposing a patch.
#[derive(Debug, Error)]
pub enum ProposeError {
    /// An external backend command failed; carries the command line and
    /// its captured output.
    #[error("command failed ({command}): {output}")]
    CommandFailed { command: String, output: String },

    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },

    /// Configuration could not be read or parsed.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, ProposeError>;
