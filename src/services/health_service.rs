use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report whether the database answers and how many game tables it holds.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let store = state.store();
    if let Err(err) = store.health_check().await {
        warn!(error = %err, "storage health check failed");
        return HealthResponse::degraded();
    }

    match store.discover_tables().await {
        Ok(tables) => HealthResponse::ok(tables.len()),
        Err(err) => {
            warn!(error = %err, "game table discovery failed");
            HealthResponse::degraded()
        }
    }
}
