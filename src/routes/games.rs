use axum::{Json, Router, extract::State, routing::get};

use crate::{dto::games::GameSummary, services::games_service, state::SharedState};

/// Configured games with their display names.
#[utoipa::path(
    get,
    path = "/api/games",
    tag = "games",
    responses((status = 200, description = "Configured games", body = [GameSummary]))
)]
pub async fn list_games(State(state): State<SharedState>) -> Json<Vec<GameSummary>> {
    Json(games_service::list_games(&state))
}

/// Configure the game listing subtree.
pub fn router() -> Router<SharedState> {
    Router::new().route("/api/games", get(list_games))
}
