//! Validation helpers for DTOs.

use validator::ValidationError;

use crate::dao::table_name::GameTable;

/// Validates that a game name is a well-formed game table identifier.
///
/// # Examples
///
/// ```ignore
/// validate_game_name("game_a")          // Ok
/// validate_game_name("Game_A")          // Err - uppercase
/// validate_game_name("game_a; DROP ..") // Err - punctuation
/// ```
pub fn validate_game_name(name: &str) -> Result<(), ValidationError> {
    GameTable::parse(name).map(|_| ()).map_err(|source| {
        let mut err = ValidationError::new("game_name_format");
        err.message = Some(source.to_string().into());
        err
    })
}

/// Characters allowed in a member name: CJK ideographs, ASCII letters, digits and whitespace.
pub fn is_allowed_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_whitespace() || ('\u{4e00}'..='\u{9fa5}').contains(&c)
}
