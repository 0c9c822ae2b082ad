//! Cross-game membership: add a player to every game table, or remove them from all.

use tracing::info;
use validator::Validate;

use crate::{
    dao::models::NewMemberEntity,
    dto::{
        member::{AddMemberRequest, AddMemberResponse, DeleteMemberRequest, DeleteMemberResponse},
        validation::is_allowed_name_char,
    },
    error::ServiceError,
    state::SharedState,
};

/// Maximum number of characters accepted for name, nickname and department,
/// mirroring the `length` rules on [`AddMemberRequest`].
const MAX_FIELD_CHARS: usize = 50;
/// Fields carrying a length rule, in the order their failures are reported.
const LENGTH_CHECKED_FIELDS: [&str; 3] = ["name", "nickname", "department"];

/// Add the member to every discovered game table, or to none of them.
pub async fn add_member(
    state: &SharedState,
    request: AddMemberRequest,
) -> Result<AddMemberResponse, ServiceError> {
    let member = validate_new_member(request)?;
    let name = member.name.clone();

    let inserted = state.store().add_member(member).await?;
    info!(%name, games = inserted.len(), "member added");

    Ok(AddMemberResponse {
        message: "member added to all games".into(),
        results: inserted.into_iter().map(Into::into).collect(),
    })
}

/// Remove every row named exactly `request.name` from all game tables.
pub async fn delete_member(
    state: &SharedState,
    request: DeleteMemberRequest,
) -> Result<DeleteMemberResponse, ServiceError> {
    if request.name.trim().is_empty() {
        return Err(ServiceError::InvalidInput("name must not be empty".into()));
    }

    let deleted = state.store().delete_member(request.name.clone()).await?;
    info!(name = %request.name, games = deleted.len(), "member deleted");

    Ok(DeleteMemberResponse {
        message: "member removed from all games".into(),
        results: deleted.into_iter().map(Into::into).collect(),
    })
}

/// Check the request in a fixed order, reporting only the first failure, then trim it.
pub fn validate_new_member(request: AddMemberRequest) -> Result<NewMemberEntity, ServiceError> {
    if request.name.trim().is_empty() {
        return Err(ServiceError::InvalidInput("name must not be empty".into()));
    }
    if let Err(errors) = request.validate() {
        let fields = errors.field_errors();
        if let Some(field) = LENGTH_CHECKED_FIELDS
            .into_iter()
            .find(|field| fields.contains_key(*field))
        {
            return Err(ServiceError::InvalidInput(format!(
                "{field} must not exceed {MAX_FIELD_CHARS} characters"
            )));
        }
    }
    if !request.name.chars().all(is_allowed_name_char) {
        return Err(ServiceError::InvalidInput(
            "name may only contain letters, digits and spaces".into(),
        ));
    }

    let AddMemberRequest {
        name,
        nickname,
        department,
    } = request;
    Ok(NewMemberEntity {
        name: name.trim().to_owned(),
        nickname: trimmed(nickname),
        department: trimmed(department),
    })
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::{AppConfig, GameRegistry},
        dao::player_store::memory::MemoryPlayerStore,
        state::AppState,
    };

    fn request(name: &str, nickname: Option<&str>, department: Option<&str>) -> AddMemberRequest {
        AddMemberRequest {
            name: name.into(),
            nickname: nickname.map(Into::into),
            department: department.map(Into::into),
        }
    }

    fn invalid_message(result: Result<NewMemberEntity, ServiceError>) -> String {
        match result {
            Err(ServiceError::InvalidInput(message)) => message,
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    async fn state_with(store: &MemoryPlayerStore) -> SharedState {
        let registry = GameRegistry::parse("game_a,game_b", None).unwrap();
        AppState::new(
            AppConfig::new(registry, std::env::temp_dir()),
            Arc::new(store.clone()),
        )
    }

    #[test]
    fn validation_reports_first_failure_only() {
        assert_eq!(
            invalid_message(validate_new_member(request("   ", None, None))),
            "name must not be empty"
        );
        let long = "a".repeat(51);
        assert_eq!(
            invalid_message(validate_new_member(request(&long, Some(&long), None))),
            "name must not exceed 50 characters"
        );
        assert_eq!(
            invalid_message(validate_new_member(request("Bob!", Some(&long), None))),
            "nickname must not exceed 50 characters"
        );
        assert_eq!(
            invalid_message(validate_new_member(request("Bob!", None, Some(&long)))),
            "department must not exceed 50 characters"
        );
        assert_eq!(
            invalid_message(validate_new_member(request("Bob!", None, None))),
            "name may only contain letters, digits and spaces"
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let name = "王".repeat(50);
        assert!(validate_new_member(request(&name, None, None)).is_ok());
    }

    #[test]
    fn values_are_trimmed_and_blank_optionals_dropped() {
        let member =
            validate_new_member(request("  Carl  ", Some("  "), Some(" Physics "))).unwrap();
        assert_eq!(
            member,
            NewMemberEntity {
                name: "Carl".into(),
                nickname: None,
                department: Some("Physics".into()),
            }
        );
    }

    #[tokio::test]
    async fn add_inserts_into_every_table() {
        let store = MemoryPlayerStore::with_tables(&["game_a", "game_b"]).await;
        let state = state_with(&store).await;

        let response = add_member(&state, request("Carl", Some("CJ"), None))
            .await
            .unwrap();

        let games = response
            .results
            .iter()
            .map(|result| result.game.as_str())
            .collect::<Vec<_>>();
        assert_eq!(games, ["game_a", "game_b"]);
        assert!(response.results.iter().all(|r| r.player.score == 0));
        assert_eq!(store.names("game_a").await, ["Carl"]);
        assert_eq!(store.names("game_b").await, ["Carl"]);
    }

    #[tokio::test]
    async fn name_conflict_in_one_table_blocks_all_tables() {
        let store = MemoryPlayerStore::with_tables(&["game_a", "game_b"]).await;
        store.seed("game_b", "Alice", None, 12).await;
        let state = state_with(&store).await;

        let err = add_member(&state, request("Alice", None, None))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Conflict(message) if message.contains("game_b")));
        assert!(store.names("game_a").await.is_empty());
        assert_eq!(store.names("game_b").await, ["Alice"]);
    }

    #[tokio::test]
    async fn nickname_conflict_is_detected() {
        let store = MemoryPlayerStore::with_tables(&["game_a"]).await;
        store.seed("game_a", "Alice", Some("Ace"), 0).await;
        let state = state_with(&store).await;

        let err = add_member(&state, request("Bob", Some(" Ace "), None))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(message) if message.contains("nickname `Ace`")));
    }

    #[tokio::test]
    async fn delete_succeeds_with_partial_membership() {
        let store = MemoryPlayerStore::with_tables(&["game_a", "game_b"]).await;
        store.seed("game_a", "Bob", None, 3).await;
        store.seed("game_b", "Zoe", None, 9).await;
        let state = state_with(&store).await;

        let response = delete_member(&state, DeleteMemberRequest { name: "Bob".into() })
            .await
            .unwrap();

        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].game, "game_a");
        assert_eq!(response.results[0].deleted_player.name, "Bob");
        assert!(store.names("game_a").await.is_empty());
        assert_eq!(store.names("game_b").await, ["Zoe"]);
    }

    #[tokio::test]
    async fn delete_unknown_member_is_not_found() {
        let store = MemoryPlayerStore::with_tables(&["game_a"]).await;
        store.seed("game_a", "Zoe", None, 9).await;
        let state = state_with(&store).await;

        let err = delete_member(&state, DeleteMemberRequest { name: "Bob".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(store.names("game_a").await, ["Zoe"]);

        let err = delete_member(&state, DeleteMemberRequest { name: " ".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }
}
