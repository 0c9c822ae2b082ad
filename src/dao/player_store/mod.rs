#[cfg(test)]
pub mod memory;
pub mod postgres;

use futures::future::BoxFuture;

use crate::dao::models::{
    ImportRowEntity, NewMemberEntity, PlayerEntity, PlayerKey, PlayerScoreEntity,
    TablePlayerEntity, TopPlayersEntity,
};
use crate::dao::storage::StorageResult;
use crate::dao::table_name::GameTable;

/// Abstraction over the persistence layer holding one table per game.
///
/// Every multi-table operation is all-or-nothing: implementations either apply
/// the whole change or leave every table untouched.
pub trait PlayerStore: Send + Sync {
    /// Create the given game tables when absent. Idempotent.
    fn ensure_tables(&self, tables: Vec<GameTable>) -> BoxFuture<'static, StorageResult<()>>;
    /// Enumerate existing game tables, ordered by name. Never cached.
    fn discover_tables(&self) -> BoxFuture<'static, StorageResult<Vec<GameTable>>>;
    fn table_exists(&self, table: GameTable) -> BoxFuture<'static, StorageResult<bool>>;
    /// Wipe every game table and insert `rows` into each of them.
    fn replace_all(&self, rows: Vec<ImportRowEntity>) -> BoxFuture<'static, StorageResult<usize>>;
    /// Insert the member into every game table unless its name or nickname is taken anywhere.
    fn add_member(
        &self,
        member: NewMemberEntity,
    ) -> BoxFuture<'static, StorageResult<Vec<TablePlayerEntity>>>;
    /// Delete the member from every game table holding it.
    fn delete_member(
        &self,
        name: String,
    ) -> BoxFuture<'static, StorageResult<Vec<TablePlayerEntity>>>;
    fn search_scores(
        &self,
        table: GameTable,
    ) -> BoxFuture<'static, StorageResult<Vec<PlayerScoreEntity>>>;
    /// Best `limit` players of every game table with their dense rank, rank and row number.
    fn top_players(&self, limit: i64) -> BoxFuture<'static, StorageResult<TopPlayersEntity>>;
    /// Overwrite the score of the row matching `key`, returning it when one matched.
    fn update_score(
        &self,
        table: GameTable,
        key: PlayerKey,
        score: i32,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
