mod config;
mod connection;
mod error;
mod models;
pub mod store;

pub use config::PostgresConfig;
pub use error::PgDaoError;
pub use store::PostgresPlayerStore;

use crate::dao::storage::StorageError;

impl From<PgDaoError> for StorageError {
    fn from(err: PgDaoError) -> Self {
        match err {
            PgDaoError::MemberConflict(conflict) => StorageError::Conflict(conflict),
            PgDaoError::MemberNotFound { name } => StorageError::MemberNotFound { name },
            PgDaoError::InsertImportRow {
                row,
                name,
                table,
                source,
            } => StorageError::RowRejected {
                row,
                name,
                table,
                message: source.to_string(),
            },
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}
