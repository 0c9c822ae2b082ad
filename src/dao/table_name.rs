//! Validated identifiers for the dynamically named game tables.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix every game table name starts with. Discovery matches on it.
pub const GAME_TABLE_PREFIX: &str = "game";
/// PostgreSQL truncates identifiers longer than this.
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Reasons an identifier is refused before it gets anywhere near SQL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// Empty identifier.
    #[error("identifier must not be empty")]
    Empty,
    /// Longer than [`MAX_IDENTIFIER_LEN`].
    #[error("identifier `{0}` exceeds {MAX_IDENTIFIER_LEN} characters")]
    TooLong(String),
    /// Contains something other than lowercase ASCII letters, digits and `_`.
    #[error("identifier `{0}` may only contain lowercase letters, digits and `_`")]
    InvalidCharacters(String),
    /// Does not follow the game table naming convention.
    #[error("game identifier `{0}` must start with `{GAME_TABLE_PREFIX}`")]
    MissingPrefix(String),
}

/// Name of a game table, guaranteed safe to quote into SQL.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GameTable(String);

impl GameTable {
    /// Validate `value` as a game table name.
    pub fn parse(value: &str) -> Result<Self, IdentifierError> {
        validate_identifier(value)?;
        if !value.starts_with(GAME_TABLE_PREFIX) {
            return Err(IdentifierError::MissingPrefix(value.to_owned()));
        }
        Ok(Self(value.to_owned()))
    }

    /// Raw table name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human label used when no display name is configured (`game_a` -> `Game a`).
    pub fn derived_label(&self) -> String {
        let suffix = self
            .0
            .strip_prefix(GAME_TABLE_PREFIX)
            .unwrap_or(&self.0)
            .trim_start_matches('_');
        if suffix.is_empty() {
            "Game".to_owned()
        } else {
            format!("Game {suffix}")
        }
    }
}

impl fmt::Display for GameTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for GameTable {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for GameTable {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<GameTable> for String {
    fn from(value: GameTable) -> Self {
        value.0
    }
}

/// Check the character rules shared by table and schema identifiers.
pub fn validate_identifier(value: &str) -> Result<(), IdentifierError> {
    if value.is_empty() {
        return Err(IdentifierError::Empty);
    }
    if value.len() > MAX_IDENTIFIER_LEN {
        return Err(IdentifierError::TooLong(value.to_owned()));
    }
    if !value
        .chars()
        .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_'))
    {
        return Err(IdentifierError::InvalidCharacters(value.to_owned()));
    }
    Ok(())
}
