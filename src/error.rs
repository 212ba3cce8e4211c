//! Error types for the storage engine.

use crate::types::PageId;
use thiserror::Error;

/// Result type alias for storage operations
pub type Result<T> = std::result::Result<T, DbError>;

/// Errors that can occur in the storage engine
///
/// `TableFull` and `DuplicateKey` are domain conditions that callers are
/// expected to handle; everything else indicates an unusable database
/// file or a programming-level misuse.
#[derive(Error, Debug)]
pub enum DbError {
    /// I/O error from the underlying file system
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database file length is not a whole multiple of the page size
    #[error("Invalid database file: length {len} is not a multiple of the page size")]
    Misaligned { len: u64 },

    /// Requested page lies beyond the configured maximum
    #[error("Page {page} out of bounds (max: {max})")]
    PageOutOfBounds { page: PageId, max: usize },

    /// Cell index beyond the leaf's current cell count
    #[error("Cell index {index} out of bounds (count: {count})")]
    CellOutOfBounds { index: u32, count: u32 },

    /// Data corruption detected in a page
    #[error("Corruption detected: {0}")]
    Corruption(String),

    /// The root leaf has no room for another cell (splitting unsupported)
    #[error("Table full")]
    TableFull,

    /// Insert of a key that is already present
    #[error("Duplicate key: {0}")]
    DuplicateKey(u32),
}

impl DbError {
    /// Create a corruption error with a message
    pub fn corruption(msg: impl Into<String>) -> Self {
        Self::Corruption(msg.into())
    }

    /// Whether the error is a domain condition the caller can recover from
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::TableFull | Self::DuplicateKey(_))
    }
}
