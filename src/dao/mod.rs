/// Database model definitions.
pub mod models;
/// Per-game player table storage and its backends.
pub mod player_store;
/// Storage abstraction layer for database operations.
pub mod storage;
/// Validated game table identifiers.
pub mod table_name;
