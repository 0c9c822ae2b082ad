//! DTOs of the cross-game membership routes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{dao::models::TablePlayerEntity, dto::player::PlayerRecord};

/// Body of `POST /api/players/add-member`.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AddMemberRequest {
    /// Letters (Latin or CJK), digits and spaces, at most 50 characters.
    #[serde(default)]
    #[validate(length(max = 50))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub nickname: Option<String>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub department: Option<String>,
}

/// Row inserted into one game table.
#[derive(Debug, Serialize, ToSchema)]
pub struct MemberResult {
    pub game: String,
    pub player: PlayerRecord,
}

impl From<TablePlayerEntity> for MemberResult {
    fn from(entity: TablePlayerEntity) -> Self {
        Self {
            game: entity.table.into(),
            player: entity.player.into(),
        }
    }
}

/// Outcome of an add-member request.
#[derive(Debug, Serialize, ToSchema)]
pub struct AddMemberResponse {
    pub message: String,
    pub results: Vec<MemberResult>,
}

/// Body of `DELETE /api/players/delete-member`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteMemberRequest {
    #[serde(default)]
    pub name: String,
}

/// Row removed from one game table.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedMemberResult {
    pub game: String,
    pub deleted_player: PlayerRecord,
}

impl From<TablePlayerEntity> for DeletedMemberResult {
    fn from(entity: TablePlayerEntity) -> Self {
        Self {
            game: entity.table.into(),
            deleted_player: entity.player.into(),
        }
    }
}

/// Outcome of a delete-member request. Only tables that held the player are listed.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteMemberResponse {
    pub message: String,
    pub results: Vec<DeletedMemberResult>,
}
