use tracing::info;

use crate::{config::GameRegistry, dao::player_store::PlayerStore, error::ServiceError};

/// Create the table of every configured game that does not exist yet.
///
/// Existing tables and their rows are left alone, so running this on every start is safe.
pub async fn initialize_schema(
    store: &dyn PlayerStore,
    registry: &GameRegistry,
) -> Result<(), ServiceError> {
    let tables = registry.tables();
    let count = tables.len();
    store.ensure_tables(tables).await?;
    info!(tables = count, "game tables ready");
    Ok(())
}
