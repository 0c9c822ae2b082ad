//! In-process [`PlayerStore`] used by the service and route tests.
//!
//! Mirrors the width of the PostgreSQL `name` column and applies every
//! multi-table change to a scratch copy that only replaces the live tables
//! once it fully succeeds.

use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use futures::future::BoxFuture;
use thiserror::Error;
use time::{OffsetDateTime, PrimitiveDateTime};
use tokio::sync::RwLock;

use crate::dao::{
    models::{
        ConflictField, ImportRowEntity, MemberConflict, NewMemberEntity, PlayerEntity, PlayerKey,
        PlayerScoreEntity, RankedPlayerEntity, TablePlayerEntity, TopPlayersEntity,
    },
    player_store::PlayerStore,
    storage::{StorageError, StorageResult},
    table_name::GameTable,
};

/// Width of the `name` column; longer names are rejected like PostgreSQL would.
const NAME_LIMIT: usize = 100;

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("relation `{0}` does not exist")]
    MissingTable(GameTable),
    #[error("value too long for column `name`")]
    NameTooLong,
    #[error("store is offline")]
    Offline,
}

#[derive(Debug, Clone, Default)]
struct MemoryTable {
    rows: Vec<PlayerEntity>,
    next_id: i32,
}

impl MemoryTable {
    fn insert(
        &mut self,
        name: &str,
        nickname: Option<&str>,
        department: Option<&str>,
    ) -> Result<PlayerEntity, MemoryError> {
        if name.chars().count() > NAME_LIMIT {
            return Err(MemoryError::NameTooLong);
        }

        self.next_id += 1;
        let now = now();
        let player = PlayerEntity {
            id: self.next_id,
            name: name.to_owned(),
            nickname: nickname.map(str::to_owned),
            department: department.map(str::to_owned),
            score: 0,
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.rows.push(player.clone());
        Ok(player)
    }

    /// Rows by descending score; equal scores keep insertion order.
    fn ranked(&self) -> Vec<&PlayerEntity> {
        let mut rows = self.rows.iter().collect::<Vec<_>>();
        rows.sort_by(|a, b| b.score.cmp(&a.score));
        rows
    }
}

#[derive(Default)]
struct MemoryInner {
    tables: RwLock<BTreeMap<GameTable, MemoryTable>>,
    offline: AtomicBool,
}

/// Volatile store keeping every game table in a sorted map.
#[derive(Clone, Default)]
pub struct MemoryPlayerStore {
    inner: Arc<MemoryInner>,
}

impl MemoryPlayerStore {
    /// Store with the given tables already created.
    pub async fn with_tables(names: &[&str]) -> Self {
        let store = Self::default();
        {
            let mut tables = store.inner.tables.write().await;
            for name in names {
                let table = GameTable::parse(name).expect("valid game table name");
                tables.entry(table).or_default();
            }
        }
        store
    }

    /// Insert a row directly, bypassing every check. Returns the new row.
    pub async fn seed(&self, table: &str, name: &str, nickname: Option<&str>, score: i32) -> PlayerEntity {
        let table = GameTable::parse(table).expect("valid game table name");
        let mut tables = self.inner.tables.write().await;
        let entry = tables.entry(table).or_default();
        let mut player = entry
            .insert(name, nickname, None)
            .expect("seeded row fits the column limits");
        player.score = score;
        if let Some(row) = entry.rows.iter_mut().find(|row| row.id == player.id) {
            row.score = score;
        }
        player
    }

    /// Names stored in `table`, in insertion order.
    pub async fn names(&self, table: &str) -> Vec<String> {
        let table = GameTable::parse(table).expect("valid game table name");
        let tables = self.inner.tables.read().await;
        tables
            .get(&table)
            .map(|t| t.rows.iter().map(|row| row.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Full rows stored in `table`, in insertion order.
    pub async fn rows(&self, table: &str) -> Vec<PlayerEntity> {
        let table = GameTable::parse(table).expect("valid game table name");
        let tables = self.inner.tables.read().await;
        tables
            .get(&table)
            .map(|t| t.rows.clone())
            .unwrap_or_default()
    }

    /// Make every subsequent call fail as if the database went away.
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> StorageResult<()> {
        if self.inner.offline.load(Ordering::SeqCst) {
            return Err(unavailable(MemoryError::Offline));
        }
        Ok(())
    }

    async fn ensure_tables(&self, names: Vec<GameTable>) -> StorageResult<()> {
        self.check_online()?;
        let mut tables = self.inner.tables.write().await;
        for table in names {
            tables.entry(table).or_default();
        }
        Ok(())
    }

    async fn replace_all(&self, rows: Vec<ImportRowEntity>) -> StorageResult<usize> {
        self.check_online()?;
        let mut tables = self.inner.tables.write().await;
        let mut scratch = tables.clone();

        for table in scratch.values_mut() {
            *table = MemoryTable::default();
        }
        for row in &rows {
            for (name, table) in scratch.iter_mut() {
                table
                    .insert(&row.name, row.nickname.as_deref(), row.department.as_deref())
                    .map_err(|err| StorageError::RowRejected {
                        row: row.row,
                        name: row.name.clone(),
                        table: name.clone(),
                        message: err.to_string(),
                    })?;
            }
        }

        *tables = scratch;
        Ok(rows.len())
    }

    async fn add_member(&self, member: NewMemberEntity) -> StorageResult<Vec<TablePlayerEntity>> {
        self.check_online()?;
        let mut tables = self.inner.tables.write().await;

        for (table, content) in tables.iter() {
            if content.rows.iter().any(|row| row.name == member.name) {
                return Err(StorageError::Conflict(MemberConflict {
                    table: table.clone(),
                    field: ConflictField::Name,
                    value: member.name.clone(),
                }));
            }
            if let Some(nickname) = &member.nickname {
                if content
                    .rows
                    .iter()
                    .any(|row| row.nickname.as_ref() == Some(nickname))
                {
                    return Err(StorageError::Conflict(MemberConflict {
                        table: table.clone(),
                        field: ConflictField::Nickname,
                        value: nickname.clone(),
                    }));
                }
            }
        }

        let mut scratch = tables.clone();
        let mut inserted = Vec::with_capacity(scratch.len());
        for (table, content) in scratch.iter_mut() {
            let player = content
                .insert(
                    &member.name,
                    member.nickname.as_deref(),
                    member.department.as_deref(),
                )
                .map_err(unavailable)?;
            inserted.push(TablePlayerEntity {
                table: table.clone(),
                player,
            });
        }

        *tables = scratch;
        Ok(inserted)
    }

    async fn delete_member(&self, name: String) -> StorageResult<Vec<TablePlayerEntity>> {
        self.check_online()?;
        let mut tables = self.inner.tables.write().await;

        let mut deleted = Vec::new();
        for (table, content) in tables.iter_mut() {
            let (removed, kept): (Vec<_>, Vec<_>) =
                content.rows.drain(..).partition(|row| row.name == name);
            content.rows = kept;
            deleted.extend(removed.into_iter().map(|player| TablePlayerEntity {
                table: table.clone(),
                player,
            }));
        }

        if deleted.is_empty() {
            return Err(StorageError::MemberNotFound { name });
        }
        Ok(deleted)
    }

    async fn search_scores(&self, table: GameTable) -> StorageResult<Vec<PlayerScoreEntity>> {
        self.check_online()?;
        let tables = self.inner.tables.read().await;
        let content = tables
            .get(&table)
            .ok_or_else(|| unavailable(MemoryError::MissingTable(table.clone())))?;

        Ok(content
            .ranked()
            .into_iter()
            .map(|row| PlayerScoreEntity {
                name: row.name.clone(),
                score: row.score,
                nickname: row.nickname.clone(),
                department: row.department.clone(),
            })
            .collect())
    }

    async fn top_players(&self, limit: i64) -> StorageResult<TopPlayersEntity> {
        self.check_online()?;
        let tables = self.inner.tables.read().await;
        let limit = usize::try_from(limit).unwrap_or(0);

        let mut top = TopPlayersEntity::new();
        for (table, content) in tables.iter() {
            let ranked = content.ranked();
            let mut rows = Vec::new();
            let mut dense_rank = 0;
            let mut rank = 0;
            let mut previous = None;
            for (index, row) in ranked.into_iter().enumerate() {
                let row_number = index as i64 + 1;
                if previous != Some(row.score) {
                    dense_rank += 1;
                    rank = row_number;
                    previous = Some(row.score);
                }
                if index >= limit {
                    break;
                }
                rows.push(RankedPlayerEntity {
                    dense_rank,
                    rank,
                    row_number,
                    name: row.name.clone(),
                    score: row.score,
                    nickname: row.nickname.clone(),
                    department: row.department.clone(),
                });
            }
            top.insert(table.clone(), rows);
        }
        Ok(top)
    }

    async fn update_score(
        &self,
        table: GameTable,
        key: PlayerKey,
        score: i32,
    ) -> StorageResult<Option<PlayerEntity>> {
        self.check_online()?;
        let mut tables = self.inner.tables.write().await;
        let content = tables
            .get_mut(&table)
            .ok_or_else(|| unavailable(MemoryError::MissingTable(table.clone())))?;

        let mut updated = None;
        for row in content.rows.iter_mut() {
            let matches = match &key {
                PlayerKey::Name(name) => &row.name == name,
                PlayerKey::Nickname(nickname) => row.nickname.as_ref() == Some(nickname),
            };
            if matches {
                row.score = score;
                row.updated_at = Some(now());
                updated.get_or_insert_with(|| row.clone());
            }
        }
        Ok(updated)
    }
}

fn unavailable(err: MemoryError) -> StorageError {
    StorageError::unavailable(err.to_string(), err)
}

fn now() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

impl PlayerStore for MemoryPlayerStore {
    fn ensure_tables(&self, tables: Vec<GameTable>) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_tables(tables).await })
    }

    fn discover_tables(&self) -> BoxFuture<'static, StorageResult<Vec<GameTable>>> {
        let store = self.clone();
        Box::pin(async move {
            store.check_online()?;
            Ok(store.inner.tables.read().await.keys().cloned().collect())
        })
    }

    fn table_exists(&self, table: GameTable) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            store.check_online()?;
            Ok(store.inner.tables.read().await.contains_key(&table))
        })
    }

    fn replace_all(&self, rows: Vec<ImportRowEntity>) -> BoxFuture<'static, StorageResult<usize>> {
        let store = self.clone();
        Box::pin(async move { store.replace_all(rows).await })
    }

    fn add_member(
        &self,
        member: NewMemberEntity,
    ) -> BoxFuture<'static, StorageResult<Vec<TablePlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.add_member(member).await })
    }

    fn delete_member(
        &self,
        name: String,
    ) -> BoxFuture<'static, StorageResult<Vec<TablePlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.delete_member(name).await })
    }

    fn search_scores(
        &self,
        table: GameTable,
    ) -> BoxFuture<'static, StorageResult<Vec<PlayerScoreEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.search_scores(table).await })
    }

    fn top_players(&self, limit: i64) -> BoxFuture<'static, StorageResult<TopPlayersEntity>> {
        let store = self.clone();
        Box::pin(async move { store.top_players(limit).await })
    }

    fn update_score(
        &self,
        table: GameTable,
        key: PlayerKey,
        score: i32,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.update_score(table, key, score).await })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.check_online() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ranks_follow_window_function_semantics() {
        let store = MemoryPlayerStore::with_tables(&["game_a"]).await;
        store.seed("game_a", "Alice", None, 50).await;
        store.seed("game_a", "Bob", None, 50).await;
        store.seed("game_a", "Carl", None, 30).await;
        store.seed("game_a", "Dana", None, 10).await;

        let top = store.top_players(3).await.unwrap();
        let rows = &top[&GameTable::parse("game_a").unwrap()];

        assert_eq!(rows.iter().map(|r| r.dense_rank).collect::<Vec<_>>(), [1, 1, 2]);
        assert_eq!(rows.iter().map(|r| r.rank).collect::<Vec<_>>(), [1, 1, 3]);
        assert_eq!(rows.iter().map(|r| r.row_number).collect::<Vec<_>>(), [1, 2, 3]);
    }

    #[tokio::test]
    async fn failed_import_leaves_tables_untouched() {
        let store = MemoryPlayerStore::with_tables(&["game_a", "game_b"]).await;
        store.seed("game_a", "Zoe", None, 7).await;

        let rows = vec![
            ImportRowEntity {
                row: 2,
                name: "Alice".into(),
                nickname: None,
                department: None,
            },
            ImportRowEntity {
                row: 3,
                name: "x".repeat(NAME_LIMIT + 1),
                nickname: None,
                department: None,
            },
        ];

        let err = store.replace_all(rows).await.unwrap_err();
        assert!(matches!(err, StorageError::RowRejected { row: 3, .. }));
        assert_eq!(store.names("game_a").await, ["Zoe"]);
        assert!(store.names("game_b").await.is_empty());
    }
}
