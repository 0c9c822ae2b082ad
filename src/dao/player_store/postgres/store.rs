use std::sync::Arc;

use futures::future::BoxFuture;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tracing::{debug, warn};

use super::{
    config::PostgresConfig,
    connection::establish_pool,
    error::{PgDaoError, PgResult},
    models::{PLAYER_COLUMNS, PgConflictProbe, PgPlayerRow, PgRankedRow, PgScoreRow},
};
use crate::dao::{
    models::{
        ConflictField, ImportRowEntity, MemberConflict, NewMemberEntity, PlayerEntity, PlayerKey,
        PlayerScoreEntity, TablePlayerEntity, TopPlayersEntity,
    },
    player_store::PlayerStore,
    storage::StorageResult,
    table_name::{GAME_TABLE_PREFIX, GameTable},
};

/// [`PlayerStore`] backed by one PostgreSQL table per game.
#[derive(Clone)]
pub struct PostgresPlayerStore {
    inner: Arc<PgInner>,
}

struct PgInner {
    pool: PgPool,
    schema: String,
}

impl PostgresPlayerStore {
    /// Open the connection pool, retrying while the database comes up.
    pub async fn connect(config: PostgresConfig) -> PgResult<Self> {
        let pool = establish_pool(&config).await?;
        Ok(Self::from_pool(pool, config.schema))
    }

    /// Wrap an existing pool. `schema` must already be a validated identifier.
    pub fn from_pool(pool: PgPool, schema: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(PgInner {
                pool,
                schema: schema.into(),
            }),
        }
    }

    /// Underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    fn qualified(&self, table: &GameTable) -> String {
        format!("\"{}\".\"{}\"", self.inner.schema, table.as_str())
    }

    async fn begin(&self) -> PgResult<Transaction<'static, Postgres>> {
        self.inner
            .pool
            .begin()
            .await
            .map_err(|source| PgDaoError::Begin { source })
    }

    async fn ping(&self) -> PgResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.inner.pool)
            .await
            .map_err(|source| PgDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn ensure_tables(&self, tables: Vec<GameTable>) -> PgResult<()> {
        if self.inner.schema != "public" {
            sqlx::query(&format!(
                "CREATE SCHEMA IF NOT EXISTS \"{}\"",
                self.inner.schema
            ))
            .execute(&self.inner.pool)
            .await
            .map_err(|source| PgDaoError::EnsureSchema {
                schema: self.inner.schema.clone(),
                source,
            })?;
        }

        for table in tables {
            let statement = format!(
                r#"
                CREATE TABLE IF NOT EXISTS {} (
                    id SERIAL PRIMARY KEY,
                    name VARCHAR(100) NOT NULL,
                    nickname VARCHAR(100),
                    department VARCHAR(100),
                    score INTEGER DEFAULT 0,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )
                "#,
                self.qualified(&table)
            );
            sqlx::query(&statement)
                .execute(&self.inner.pool)
                .await
                .map_err(|source| PgDaoError::EnsureTable {
                    table: table.clone(),
                    source,
                })?;
            debug!(%table, "game table ready");
        }

        Ok(())
    }

    async fn discover_tables(&self) -> PgResult<Vec<GameTable>> {
        let mut conn = self
            .inner
            .pool
            .acquire()
            .await
            .map_err(|source| PgDaoError::Acquire { source })?;
        self.discover_in(&mut conn).await
    }

    async fn discover_in(&self, conn: &mut PgConnection) -> PgResult<Vec<GameTable>> {
        let names: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT table_name::text
            FROM information_schema.tables
            WHERE table_schema = $1
              AND table_type = 'BASE TABLE'
              AND table_name LIKE $2
            ORDER BY table_name
            "#,
        )
        .bind(&self.inner.schema)
        .bind(format!("{GAME_TABLE_PREFIX}%"))
        .fetch_all(&mut *conn)
        .await
        .map_err(|source| PgDaoError::DiscoverTables { source })?;

        Ok(names
            .into_iter()
            .filter_map(|name| match GameTable::parse(&name) {
                Ok(table) => Some(table),
                Err(err) => {
                    warn!(table = %name, error = %err, "ignoring table with unusable name");
                    None
                }
            })
            .collect())
    }

    async fn table_exists(&self, table: GameTable) -> PgResult<bool> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = $1 AND table_name = $2
            )
            "#,
        )
        .bind(&self.inner.schema)
        .bind(table.to_string())
        .fetch_one(&self.inner.pool)
        .await
        .map_err(|source| PgDaoError::TableExists { table, source })
    }

    async fn replace_all(&self, rows: Vec<ImportRowEntity>) -> PgResult<usize> {
        let mut tx = self.begin().await?;
        let outcome = self.replace_all_in(&mut tx, &rows).await;
        finish(tx, outcome).await
    }

    async fn replace_all_in(
        &self,
        conn: &mut PgConnection,
        rows: &[ImportRowEntity],
    ) -> PgResult<usize> {
        let tables = self.discover_in(conn).await?;

        for table in &tables {
            sqlx::query(&format!(
                "TRUNCATE TABLE {} RESTART IDENTITY",
                self.qualified(table)
            ))
            .execute(&mut *conn)
            .await
            .map_err(|source| PgDaoError::Truncate {
                table: table.clone(),
                source,
            })?;
        }
        debug!(tables = tables.len(), "cleared game tables");

        for row in rows {
            for table in &tables {
                sqlx::query(&format!(
                    "INSERT INTO {} (name, score, nickname, department) VALUES ($1, 0, $2, $3)",
                    self.qualified(table)
                ))
                .bind(&row.name)
                .bind(&row.nickname)
                .bind(&row.department)
                .execute(&mut *conn)
                .await
                .map_err(|source| PgDaoError::InsertImportRow {
                    row: row.row,
                    name: row.name.clone(),
                    table: table.clone(),
                    source,
                })?;
            }
        }

        Ok(rows.len())
    }

    async fn add_member(&self, member: NewMemberEntity) -> PgResult<Vec<TablePlayerEntity>> {
        let mut tx = self.begin().await?;
        let outcome = self.add_member_in(&mut tx, &member).await;
        finish(tx, outcome).await
    }

    async fn add_member_in(
        &self,
        conn: &mut PgConnection,
        member: &NewMemberEntity,
    ) -> PgResult<Vec<TablePlayerEntity>> {
        let tables = self.discover_in(conn).await?;

        for table in &tables {
            let target = self.qualified(table);
            let probe: PgConflictProbe = sqlx::query_as(&format!(
                r#"
                SELECT
                    EXISTS (SELECT 1 FROM {target} WHERE name = $1) AS name_taken,
                    ($2::text IS NOT NULL
                        AND EXISTS (SELECT 1 FROM {target} WHERE nickname = $2)) AS nickname_taken
                "#
            ))
            .bind(&member.name)
            .bind(&member.nickname)
            .fetch_one(&mut *conn)
            .await
            .map_err(|source| PgDaoError::CheckConflict {
                table: table.clone(),
                source,
            })?;

            if probe.name_taken {
                return Err(PgDaoError::MemberConflict(MemberConflict {
                    table: table.clone(),
                    field: ConflictField::Name,
                    value: member.name.clone(),
                }));
            }
            if probe.nickname_taken {
                return Err(PgDaoError::MemberConflict(MemberConflict {
                    table: table.clone(),
                    field: ConflictField::Nickname,
                    value: member.nickname.clone().unwrap_or_default(),
                }));
            }
        }

        let mut inserted = Vec::with_capacity(tables.len());
        for table in tables {
            let row: PgPlayerRow = sqlx::query_as(&format!(
                "INSERT INTO {} (name, score, nickname, department) VALUES ($1, 0, $2, $3) RETURNING {PLAYER_COLUMNS}",
                self.qualified(&table)
            ))
            .bind(&member.name)
            .bind(&member.nickname)
            .bind(&member.department)
            .fetch_one(&mut *conn)
            .await
            .map_err(|source| PgDaoError::InsertMember {
                table: table.clone(),
                source,
            })?;
            inserted.push(TablePlayerEntity {
                table,
                player: row.into(),
            });
        }

        Ok(inserted)
    }

    async fn delete_member(&self, name: String) -> PgResult<Vec<TablePlayerEntity>> {
        let mut tx = self.begin().await?;
        let outcome = self.delete_member_in(&mut tx, &name).await;
        finish(tx, outcome).await
    }

    async fn delete_member_in(
        &self,
        conn: &mut PgConnection,
        name: &str,
    ) -> PgResult<Vec<TablePlayerEntity>> {
        let tables = self.discover_in(conn).await?;

        let mut deleted = Vec::new();
        for table in tables {
            let rows: Vec<PgPlayerRow> = sqlx::query_as(&format!(
                "DELETE FROM {} WHERE name = $1 RETURNING {PLAYER_COLUMNS}",
                self.qualified(&table)
            ))
            .bind(name)
            .fetch_all(&mut *conn)
            .await
            .map_err(|source| PgDaoError::DeleteMember {
                table: table.clone(),
                source,
            })?;

            deleted.extend(rows.into_iter().map(|row| TablePlayerEntity {
                table: table.clone(),
                player: row.into(),
            }));
        }

        if deleted.is_empty() {
            return Err(PgDaoError::MemberNotFound {
                name: name.to_owned(),
            });
        }

        Ok(deleted)
    }

    async fn search_scores(&self, table: GameTable) -> PgResult<Vec<PlayerScoreEntity>> {
        let rows: Vec<PgScoreRow> = sqlx::query_as(&format!(
            "SELECT name, COALESCE(score, 0) AS score, nickname, department FROM {} ORDER BY score DESC",
            self.qualified(&table)
        ))
        .fetch_all(&self.inner.pool)
        .await
        .map_err(|source| PgDaoError::SearchScores { table, source })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn top_players(&self, limit: i64) -> PgResult<TopPlayersEntity> {
        let mut conn = self
            .inner
            .pool
            .acquire()
            .await
            .map_err(|source| PgDaoError::Acquire { source })?;
        let tables = self.discover_in(&mut conn).await?;

        let mut top = TopPlayersEntity::with_capacity(tables.len());
        for table in tables {
            let rows: Vec<PgRankedRow> = sqlx::query_as(&format!(
                r#"
                SELECT
                    DENSE_RANK() OVER w AS dense_rank,
                    RANK() OVER w AS rank,
                    ROW_NUMBER() OVER w AS row_number,
                    name,
                    COALESCE(score, 0) AS score,
                    nickname,
                    department
                FROM {}
                WINDOW w AS (ORDER BY COALESCE(score, 0) DESC)
                ORDER BY row_number
                LIMIT $1
                "#,
                self.qualified(&table)
            ))
            .bind(limit)
            .fetch_all(&mut *conn)
            .await
            .map_err(|source| PgDaoError::RankPlayers {
                table: table.clone(),
                source,
            })?;

            top.insert(table, rows.into_iter().map(Into::into).collect());
        }

        Ok(top)
    }

    async fn update_score(
        &self,
        table: GameTable,
        key: PlayerKey,
        score: i32,
    ) -> PgResult<Option<PlayerEntity>> {
        let column = match key {
            PlayerKey::Name(_) => "name",
            PlayerKey::Nickname(_) => "nickname",
        };
        let rows: Vec<PgPlayerRow> = sqlx::query_as(&format!(
            "UPDATE {} SET score = $1, updated_at = CURRENT_TIMESTAMP WHERE {column} = $2 RETURNING {PLAYER_COLUMNS}",
            self.qualified(&table)
        ))
        .bind(score)
        .bind(key.value())
        .fetch_all(&self.inner.pool)
        .await
        .map_err(|source| PgDaoError::UpdateScore { table, source })?;

        Ok(rows.into_iter().next().map(Into::into))
    }
}

/// Commit on success, roll back before surfacing any failure.
async fn finish<T>(tx: Transaction<'static, Postgres>, outcome: PgResult<T>) -> PgResult<T> {
    match outcome {
        Ok(value) => {
            tx.commit()
                .await
                .map_err(|source| PgDaoError::Commit { source })?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "transaction rollback failed");
            }
            Err(err)
        }
    }
}

impl PlayerStore for PostgresPlayerStore {
    fn ensure_tables(&self, tables: Vec<GameTable>) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_tables(tables).await.map_err(Into::into) })
    }

    fn discover_tables(&self) -> BoxFuture<'static, StorageResult<Vec<GameTable>>> {
        let store = self.clone();
        Box::pin(async move { store.discover_tables().await.map_err(Into::into) })
    }

    fn table_exists(&self, table: GameTable) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.table_exists(table).await.map_err(Into::into) })
    }

    fn replace_all(&self, rows: Vec<ImportRowEntity>) -> BoxFuture<'static, StorageResult<usize>> {
        let store = self.clone();
        Box::pin(async move { store.replace_all(rows).await.map_err(Into::into) })
    }

    fn add_member(
        &self,
        member: NewMemberEntity,
    ) -> BoxFuture<'static, StorageResult<Vec<TablePlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.add_member(member).await.map_err(Into::into) })
    }

    fn delete_member(
        &self,
        name: String,
    ) -> BoxFuture<'static, StorageResult<Vec<TablePlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.delete_member(name).await.map_err(Into::into) })
    }

    fn search_scores(
        &self,
        table: GameTable,
    ) -> BoxFuture<'static, StorageResult<Vec<PlayerScoreEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.search_scores(table).await.map_err(Into::into) })
    }

    fn top_players(&self, limit: i64) -> BoxFuture<'static, StorageResult<TopPlayersEntity>> {
        let store = self.clone();
        Box::pin(async move { store.top_players(limit).await.map_err(Into::into) })
    }

    fn update_score(
        &self,
        table: GameTable,
        key: PlayerKey,
        score: i32,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .update_score(table, key, score)
                .await
                .map_err(Into::into)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ping().await.map_err(Into::into) })
    }
}
