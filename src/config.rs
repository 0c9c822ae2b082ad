//! Application-level configuration loading, including the registry of configured games.

use std::{
    collections::HashSet,
    env,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::info;

use crate::dao::table_name::{GameTable, IdentifierError};

/// Environment variable listing the game identifiers.
const GAME_NAMES_ENV: &str = "GAME_NAMES";
/// Environment variable listing the display names, positionally matching [`GAME_NAMES_ENV`].
const GAME_DISPLAY_NAMES_ENV: &str = "GAME_DISPLAY_NAMES";
/// Environment variable that overrides [`DEFAULT_UPLOAD_DIR`].
const UPLOAD_DIR_ENV: &str = "UPLOAD_DIR";
const MAX_UPLOAD_BYTES_ENV: &str = "MAX_UPLOAD_BYTES";
/// Staging directory for CSV uploads, relative to the working directory.
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Reasons the process refuses to start with the current environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    /// Environment variable is present but unparseable.
    #[error("invalid value `{value}` for environment variable `{var}`")]
    InvalidEnvVar { var: &'static str, value: String },
    /// A configured identifier is not a usable game table name.
    #[error("invalid game identifier at position {position}")]
    InvalidGame {
        position: usize,
        #[source]
        source: IdentifierError,
    },
    /// The same identifier is listed twice.
    #[error("game `{0}` is configured more than once")]
    DuplicateGame(String),
}

/// A configured game: its table and the label shown to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameDefinition {
    pub table: GameTable,
    pub display_name: String,
}

/// Static list of games known at startup. Read-only at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRegistry {
    games: Vec<GameDefinition>,
}

impl GameRegistry {
    /// Parse the comma-separated identifier list and its parallel display names.
    ///
    /// A display name that is missing or blank falls back to
    /// [`GameTable::derived_label`].
    pub fn parse(names: &str, display_names: Option<&str>) -> Result<Self, ConfigError> {
        let labels = display_names
            .map(|value| value.split(',').map(str::trim).collect::<Vec<_>>())
            .unwrap_or_default();

        let mut seen = HashSet::new();
        let games = names
            .split(',')
            .map(str::trim)
            .enumerate()
            .map(|(position, name)| {
                let table = GameTable::parse(name)
                    .map_err(|source| ConfigError::InvalidGame { position, source })?;
                if !seen.insert(table.clone()) {
                    return Err(ConfigError::DuplicateGame(name.to_owned()));
                }
                let display_name = labels
                    .get(position)
                    .filter(|label| !label.is_empty())
                    .map(|label| (*label).to_owned())
                    .unwrap_or_else(|| table.derived_label());
                Ok(GameDefinition {
                    table,
                    display_name,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { games })
    }

    pub fn games(&self) -> &[GameDefinition] {
        &self.games
    }

    /// Table names in configuration order.
    pub fn tables(&self) -> Vec<GameTable> {
        self.games.iter().map(|game| game.table.clone()).collect()
    }
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    registry: GameRegistry,
    upload_dir: PathBuf,
    max_upload_bytes: usize,
}

impl AppConfig {
    /// Configuration with default upload settings.
    pub fn new(registry: GameRegistry, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            upload_dir: upload_dir.into(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Load the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let names = env::var(GAME_NAMES_ENV).map_err(|_| ConfigError::MissingEnvVar {
            var: GAME_NAMES_ENV,
        })?;
        let display_names = env::var(GAME_DISPLAY_NAMES_ENV).ok();
        let registry = GameRegistry::parse(&names, display_names.as_deref())?;

        let upload_dir = env::var_os(UPLOAD_DIR_ENV)
            .map(PathBuf::from)
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR));

        let mut config = Self::new(registry, upload_dir);
        if let Ok(value) = env::var(MAX_UPLOAD_BYTES_ENV) {
            config.max_upload_bytes =
                value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidEnvVar {
                        var: MAX_UPLOAD_BYTES_ENV,
                        value,
                    })?;
        }

        info!(
            games = config.registry.games().len(),
            upload_dir = %config.upload_dir.display(),
            "loaded configuration"
        );
        Ok(config)
    }

    pub fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    /// Directory where uploads are staged before import.
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Upper bound for multipart request bodies.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }
}
