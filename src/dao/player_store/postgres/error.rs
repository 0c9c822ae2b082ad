use sqlx::Error as SqlxError;
use thiserror::Error;

use crate::dao::{models::MemberConflict, table_name::GameTable, table_name::IdentifierError};

pub type PgResult<T> = std::result::Result<T, PgDaoError>;

#[derive(Debug, Error)]
pub enum PgDaoError {
    #[error("failed to parse PostgreSQL connection URL")]
    InvalidUrl {
        #[source]
        source: SqlxError,
    },
    #[error("invalid value `{value}` for environment variable `{var}`")]
    InvalidEnvVar { var: &'static str, value: String },
    #[error("invalid PostgreSQL schema name")]
    InvalidSchema {
        #[source]
        source: IdentifierError,
    },
    #[error("PostgreSQL connection failed after {attempts} attempt(s)")]
    Connect {
        attempts: u32,
        #[source]
        source: SqlxError,
    },
    #[error("PostgreSQL ping health check failed")]
    HealthPing {
        #[source]
        source: SqlxError,
    },
    #[error("failed to acquire a PostgreSQL connection")]
    Acquire {
        #[source]
        source: SqlxError,
    },
    #[error("failed to begin transaction")]
    Begin {
        #[source]
        source: SqlxError,
    },
    #[error("failed to commit transaction")]
    Commit {
        #[source]
        source: SqlxError,
    },
    #[error("failed to create schema `{schema}`")]
    EnsureSchema {
        schema: String,
        #[source]
        source: SqlxError,
    },
    #[error("failed to create game table `{table}`")]
    EnsureTable {
        table: GameTable,
        #[source]
        source: SqlxError,
    },
    #[error("failed to list game tables")]
    DiscoverTables {
        #[source]
        source: SqlxError,
    },
    #[error("failed to check whether game table `{table}` exists")]
    TableExists {
        table: GameTable,
        #[source]
        source: SqlxError,
    },
    #[error("failed to truncate game table `{table}`")]
    Truncate {
        table: GameTable,
        #[source]
        source: SqlxError,
    },
    #[error("failed to insert row {row} (name `{name}`) into `{table}`")]
    InsertImportRow {
        row: usize,
        name: String,
        table: GameTable,
        #[source]
        source: SqlxError,
    },
    #[error("failed to check member uniqueness in `{table}`")]
    CheckConflict {
        table: GameTable,
        #[source]
        source: SqlxError,
    },
    #[error("member conflict in `{}`", .0.table)]
    MemberConflict(MemberConflict),
    #[error("failed to insert member into `{table}`")]
    InsertMember {
        table: GameTable,
        #[source]
        source: SqlxError,
    },
    #[error("failed to delete member from `{table}`")]
    DeleteMember {
        table: GameTable,
        #[source]
        source: SqlxError,
    },
    #[error("member `{name}` not found in any game table")]
    MemberNotFound { name: String },
    #[error("failed to load scores of `{table}`")]
    SearchScores {
        table: GameTable,
        #[source]
        source: SqlxError,
    },
    #[error("failed to rank players of `{table}`")]
    RankPlayers {
        table: GameTable,
        #[source]
        source: SqlxError,
    },
    #[error("failed to update score in `{table}`")]
    UpdateScore {
        table: GameTable,
        #[source]
        source: SqlxError,
    },
}
