//! Leaderboards: full per-game ranking, podiums of every game, score updates.

use tracing::info;

use crate::{
    dao::{models::PlayerKey, table_name::GameTable},
    dto::player::{
        PlayerScore, SearchScoresRequest, TopPlayersResponse, UpdateScoreRequest,
        UpdateScoreResponse,
    },
    error::ServiceError,
    state::SharedState,
};

/// Number of players listed per game on the podium.
pub const PODIUM_SIZE: i64 = 3;
/// `displayType` value selecting the nickname as lookup key.
const DISPLAY_BY_NICKNAME: i32 = 1;

/// Every player of a game, best score first.
///
/// The table is not checked beforehand: a missing table surfaces as a storage failure.
pub async fn search_scores(
    state: &SharedState,
    request: SearchScoresRequest,
) -> Result<Vec<PlayerScore>, ServiceError> {
    let table = parse_game(&request.game_name)?;
    let rows = state.store().search_scores(table).await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Top three players of every discovered game table.
pub async fn top_players(state: &SharedState) -> Result<TopPlayersResponse, ServiceError> {
    let top = state.store().top_players(PODIUM_SIZE).await?;
    Ok(top.into())
}

/// Overwrite the score of a player found by name or nickname.
pub async fn update_score(
    state: &SharedState,
    request: UpdateScoreRequest,
) -> Result<UpdateScoreResponse, ServiceError> {
    let table = parse_game(&request.game_name)?;
    let key = player_key(&request)?;

    let store = state.store();
    if !store.table_exists(table.clone()).await? {
        return Err(ServiceError::NotFound(format!("game `{table}` does not exist")));
    }

    let Some(player) = store
        .update_score(table.clone(), key.clone(), request.new_score)
        .await?
    else {
        let message = match key {
            PlayerKey::Name(name) => format!("no player named `{name}` in game `{table}`"),
            PlayerKey::Nickname(nickname) => {
                format!("no player nicknamed `{nickname}` in game `{table}`")
            }
        };
        return Err(ServiceError::NotFound(message));
    };

    info!(%table, player = %player.name, score = player.score, "score updated");
    Ok(UpdateScoreResponse {
        message: "score updated".into(),
        updated_player: player.into(),
    })
}

fn parse_game(name: &str) -> Result<GameTable, ServiceError> {
    GameTable::parse(name).map_err(|err| ServiceError::InvalidInput(err.to_string()))
}

fn player_key(request: &UpdateScoreRequest) -> Result<PlayerKey, ServiceError> {
    let by_nickname = request.display_type == DISPLAY_BY_NICKNAME;
    let (value, field) = if by_nickname {
        (&request.nickname, "nickname")
    } else {
        (&request.player_name, "playerName")
    };

    let Some(value) = value.as_deref().filter(|value| !value.is_empty()) else {
        return Err(ServiceError::InvalidInput(format!(
            "`{field}` is required when displayType is {}",
            request.display_type
        )));
    };

    Ok(if by_nickname {
        PlayerKey::Nickname(value.to_owned())
    } else {
        PlayerKey::Name(value.to_owned())
    })
}
