use crate::{dto::games::GameSummary, state::SharedState};

/// Configured games, in configuration order.
pub fn list_games(state: &SharedState) -> Vec<GameSummary> {
    state
        .config()
        .registry()
        .games()
        .iter()
        .map(GameSummary::from)
        .collect()
}
