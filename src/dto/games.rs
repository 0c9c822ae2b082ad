use serde::Serialize;
use utoipa::ToSchema;

use crate::config::GameDefinition;

/// Entry of the `/api/games` listing.
#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    /// Game identifier, also the name of its table.
    pub id: String,
    pub name: String,
    pub display_name: String,
}

impl From<&GameDefinition> for GameSummary {
    fn from(game: &GameDefinition) -> Self {
        Self {
            id: game.table.to_string(),
            name: game.table.to_string(),
            display_name: game.display_name.clone(),
        }
    }
}
