use std::{env, time::Duration};

use sqlx::postgres::PgConnectOptions;

use super::error::{PgDaoError, PgResult};
use crate::dao::table_name::validate_identifier;

const DEFAULT_SCHEMA: &str = "public";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Runtime configuration describing how to reach PostgreSQL.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub options: PgConnectOptions,
    /// Schema holding the game tables.
    pub schema: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl PostgresConfig {
    /// Build a configuration from a `postgres://` URL.
    pub fn from_url(url: &str) -> PgResult<Self> {
        let options = url
            .parse::<PgConnectOptions>()
            .map_err(|source| PgDaoError::InvalidUrl { source })?;
        Ok(Self::new(options))
    }

    /// Wrap already parsed connection options with the default pool settings.
    pub fn new(options: PgConnectOptions) -> Self {
        Self {
            options,
            schema: DEFAULT_SCHEMA.to_owned(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }

    /// Place the game tables in another schema than `public`.
    pub fn with_schema(mut self, schema: impl Into<String>) -> PgResult<Self> {
        let schema = schema.into();
        validate_identifier(&schema).map_err(|source| PgDaoError::InvalidSchema { source })?;
        self.schema = schema;
        Ok(self)
    }

    /// Build a configuration from `DATABASE_URL`, or from the `DB_*` parts when it is unset.
    pub fn from_env() -> PgResult<Self> {
        let config = match env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => Self::from_url(&url)?,
            _ => Self::new(options_from_parts()?),
        };

        let mut config = match env::var("DB_SCHEMA") {
            Ok(schema) if !schema.trim().is_empty() => config.with_schema(schema.trim())?,
            _ => config,
        };

        if let Ok(value) = env::var("DB_MAX_CONNECTIONS") {
            config.max_connections = value
                .trim()
                .parse()
                .map_err(|_| PgDaoError::InvalidEnvVar {
                    var: "DB_MAX_CONNECTIONS",
                    value,
                })?;
        }

        Ok(config)
    }
}

fn options_from_parts() -> PgResult<PgConnectOptions> {
    let host = env::var("DB_HOST").unwrap_or_else(|_| "localhost".into());
    let port = match env::var("DB_PORT") {
        Ok(value) => value.trim().parse::<u16>().map_err(|_| PgDaoError::InvalidEnvVar {
            var: "DB_PORT",
            value,
        })?,
        Err(_) => 5432,
    };
    let user = env::var("DB_USER").unwrap_or_else(|_| "postgres".into());
    let database = env::var("DB_NAME").unwrap_or_else(|_| "postgres".into());

    let mut options = PgConnectOptions::new()
        .host(&host)
        .port(port)
        .username(&user)
        .database(&database);
    if let Ok(password) = env::var("DB_PASSWORD") {
        options = options.password(&password);
    }
    Ok(options)
}
