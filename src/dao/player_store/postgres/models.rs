use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::dao::models::{PlayerEntity, PlayerScoreEntity, RankedPlayerEntity};

/// Column list returned by every statement producing full rows.
pub const PLAYER_COLUMNS: &str =
    "id, name, nickname, department, COALESCE(score, 0) AS score, created_at, updated_at";

#[derive(Debug, FromRow)]
pub struct PgPlayerRow {
    pub id: i32,
    pub name: String,
    pub nickname: Option<String>,
    pub department: Option<String>,
    pub score: i32,
    pub created_at: Option<PrimitiveDateTime>,
    pub updated_at: Option<PrimitiveDateTime>,
}

impl From<PgPlayerRow> for PlayerEntity {
    fn from(row: PgPlayerRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            nickname: row.nickname,
            department: row.department,
            score: row.score,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct PgScoreRow {
    pub name: String,
    pub score: i32,
    pub nickname: Option<String>,
    pub department: Option<String>,
}

impl From<PgScoreRow> for PlayerScoreEntity {
    fn from(row: PgScoreRow) -> Self {
        Self {
            name: row.name,
            score: row.score,
            nickname: row.nickname,
            department: row.department,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct PgRankedRow {
    pub dense_rank: i64,
    pub rank: i64,
    pub row_number: i64,
    pub name: String,
    pub score: i32,
    pub nickname: Option<String>,
    pub department: Option<String>,
}

impl From<PgRankedRow> for RankedPlayerEntity {
    fn from(row: PgRankedRow) -> Self {
        Self {
            dense_rank: row.dense_rank,
            rank: row.rank,
            row_number: row.row_number,
            name: row.name,
            score: row.score,
            nickname: row.nickname,
            department: row.department,
        }
    }
}

/// Outcome of the per-table uniqueness probe run before adding a member.
#[derive(Debug, FromRow)]
pub struct PgConflictProbe {
    pub name_taken: bool,
    pub nickname_taken: bool,
}
