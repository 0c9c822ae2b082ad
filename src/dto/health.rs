use serde::Serialize;
use utoipa::ToSchema;

/// Health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Number of game tables currently discovered, absent when the database is unreachable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_tables: Option<usize>,
}

impl HealthResponse {
    /// The database answered and `game_tables` tables were discovered.
    pub fn ok(game_tables: usize) -> Self {
        Self {
            status: "ok".to_string(),
            game_tables: Some(game_tables),
        }
    }

    /// The database could not be reached.
    pub fn degraded() -> Self {
        Self {
            status: "degraded".to_string(),
            game_tables: None,
        }
    }
}
