use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::{Context, Result};
use leaderboard_back::dao::{
    models::ImportRowEntity, player_store::postgres::PostgresPlayerStore, table_name::GameTable,
};
use sqlx::{Executor, PgPool, postgres::PgPoolOptions};

static SCHEMA_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Store bound to a throwaway schema, dropped by [`TestSchema::cleanup`].
pub struct TestSchema {
    pub name: String,
    pub store: PostgresPlayerStore,
    pool: PgPool,
}

impl TestSchema {
    /// `None` when `TEST_DATABASE_URL` is unset, so the suite can be skipped.
    pub async fn new() -> Result<Option<Self>> {
        let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
            eprintln!("TEST_DATABASE_URL not set, skipping PostgreSQL tests");
            return Ok(None);
        };

        let counter = SCHEMA_COUNTER.fetch_add(1, Ordering::SeqCst);
        let name = format!("test_{}_{}", std::process::id(), counter);

        let pool = PgPoolOptions::new()
            .max_connections(4)
            .connect(&url)
            .await
            .context("failed to connect to test database")?;
        pool.execute(format!("DROP SCHEMA IF EXISTS \"{name}\" CASCADE").as_str())
            .await
            .context("failed to reset test schema")?;

        let store = PostgresPlayerStore::from_pool(pool.clone(), name.clone());
        Ok(Some(Self { name, store, pool }))
    }

    pub async fn cleanup(self) -> Result<()> {
        self.pool
            .execute(format!("DROP SCHEMA IF EXISTS \"{}\" CASCADE", self.name).as_str())
            .await
            .context("failed to drop test schema")?;
        self.pool.close().await;
        Ok(())
    }
}

pub fn tables(names: &[&str]) -> Vec<GameTable> {
    names.iter().map(|name| GameTable::parse(name).unwrap()).collect()
}

pub fn row(row: usize, name: &str, nickname: Option<&str>) -> ImportRowEntity {
    ImportRowEntity {
        row,
        name: name.into(),
        nickname: nickname.map(Into::into),
        department: None,
    }
}
