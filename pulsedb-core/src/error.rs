//! Error types for PulseDB

use thiserror::Error;

/// Result type alias for PulseDB operations
pub type Result<T> = std::result::Result<T, PulseError>;

/// PulseDB error types
#[derive(Error, Debug)]
pub enum PulseError {
    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// WAL entry could not be serialized
    #[error("WAL entry encode failed: {0}")]
    EntryEncode(serde_json::Error),

    /// WAL entry could not be deserialized
    #[error("WAL entry decode failed: {0}")]
    EntryDecode(serde_json::Error),

    /// A WAL partition file holds a torn or malformed record
    #[error("WAL partition corrupt: {0}")]
    PartitionCorrupt(String),
}
