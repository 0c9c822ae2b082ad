use std::error::Error;
use thiserror::Error;

use crate::dao::{models::MemberConflict, table_name::GameTable};

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The database could not be reached or failed unexpectedly.
    #[error("storage unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A new member collides with an existing name or nickname.
    #[error("{0}")]
    Conflict(MemberConflict),
    /// Nothing matched the requested player.
    #[error("player `{name}` not found in any game")]
    MemberNotFound { name: String },
    /// An import row could not be written; the whole import was rolled back.
    #[error("failed to insert row {row} (name `{name}`) into `{table}`: {message}")]
    RowRejected {
        row: usize,
        name: String,
        table: GameTable,
        message: String,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}
