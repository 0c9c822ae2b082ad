//! DTOs of the score search, ranking and score update routes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dao::models::{PlayerEntity, PlayerScoreEntity, RankedPlayerEntity, TopPlayersEntity},
    dto::{format_timestamp, validation::validate_game_name},
};

/// Full player row as stored in a game table.
#[derive(Debug, Serialize, ToSchema, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    pub id: i32,
    pub name: String,
    pub nickname: Option<String>,
    pub department: Option<String>,
    pub score: i32,
    /// RFC 3339 insertion time.
    pub created_at: Option<String>,
    /// RFC 3339 time of the last score update.
    pub updated_at: Option<String>,
}

impl From<PlayerEntity> for PlayerRecord {
    fn from(entity: PlayerEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            nickname: entity.nickname,
            department: entity.department,
            score: entity.score,
            created_at: entity.created_at.map(format_timestamp),
            updated_at: entity.updated_at.map(format_timestamp),
        }
    }
}

/// Body of `POST /api/players/search`.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchScoresRequest {
    #[validate(custom(function = "validate_game_name"))]
    pub game_name: String,
}

/// Leaderboard line of a single game.
#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
pub struct PlayerScore {
    pub name: String,
    pub score: i32,
    pub nickname: Option<String>,
    pub department: Option<String>,
}

impl From<PlayerScoreEntity> for PlayerScore {
    fn from(entity: PlayerScoreEntity) -> Self {
        Self {
            name: entity.name,
            score: entity.score,
            nickname: entity.nickname,
            department: entity.department,
        }
    }
}

/// Podium line carrying the three tie-handling ranks.
#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
pub struct RankedPlayer {
    /// Rank without gaps after ties.
    pub dense_rank: i64,
    /// Rank leaving gaps after ties.
    pub rank: i64,
    /// Unique position; ties are broken arbitrarily.
    pub row_number: i64,
    pub name: String,
    pub score: i32,
    pub nickname: Option<String>,
    pub department: Option<String>,
}

impl From<RankedPlayerEntity> for RankedPlayer {
    fn from(entity: RankedPlayerEntity) -> Self {
        Self {
            dense_rank: entity.dense_rank,
            rank: entity.rank,
            row_number: entity.row_number,
            name: entity.name,
            score: entity.score,
            nickname: entity.nickname,
            department: entity.department,
        }
    }
}

/// Podium of every game table, keyed by table name.
#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct TopPlayersResponse(pub IndexMap<String, Vec<RankedPlayer>>);

impl From<TopPlayersEntity> for TopPlayersResponse {
    fn from(entity: TopPlayersEntity) -> Self {
        Self(
            entity
                .into_iter()
                .map(|(table, rows)| (table.into(), rows.into_iter().map(Into::into).collect()))
                .collect(),
        )
    }
}

/// Body of `PUT /api/players/update-score`.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScoreRequest {
    #[validate(custom(function = "validate_game_name"))]
    pub game_name: String,
    /// Used as the search key unless `display_type` is 1.
    #[serde(default)]
    pub player_name: Option<String>,
    /// Used as the search key when `display_type` is 1.
    #[serde(default)]
    pub nickname: Option<String>,
    pub new_score: i32,
    /// 0 looks players up by name, 1 by nickname.
    #[serde(default)]
    pub display_type: i32,
}

/// Result of a score update.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScoreResponse {
    pub message: String,
    pub updated_player: PlayerRecord,
}
