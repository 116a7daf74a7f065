// error.rs — Error types for the care-case subsystem.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while synthesizing or persisting care-cases.
#[derive(Debug, Error)]
pub enum CaseError {
    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },

    /// Failed to serialize/deserialize case data.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A persisted record could not be parsed. The cases directory holds
    /// only records this pipeline wrote, so this indicates corruption.
    #[error("unreadable case record at {path}: {message}")]
    CorruptRecord { path: String, message: String },

    /// A care-case carries no signal back-references, so its record
    /// location cannot be derived.
    #[error("care-case {0} has no contributing signals")]
    MissingSignalRef(Uuid),

    /// A freshly synthesized care-case failed its own schema contract.
    /// This is a synthesis defect, not a user input error.
    #[error("internal consistency failure: {0}")]
    Internal(String),
}
