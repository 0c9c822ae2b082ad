use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use validator::Validate;

use crate::{
    dto::{
        member::{AddMemberRequest, AddMemberResponse, DeleteMemberRequest, DeleteMemberResponse},
        player::{
            PlayerScore, SearchScoresRequest, TopPlayersResponse, UpdateScoreRequest,
            UpdateScoreResponse,
        },
    },
    error::{AppError, ErrorBody},
    services::{member_service, ranking_service},
    state::SharedState,
};

/// Leaderboard and membership endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/players/search", post(search_scores))
        .route("/api/players/top3", get(top_players))
        .route("/api/players/update-score", put(update_score))
        .route("/api/players/add-member", post(add_member))
        .route("/api/players/delete-member", delete(delete_member))
}

/// List every player of a game, best score first.
#[utoipa::path(
    post,
    path = "/api/players/search",
    tag = "players",
    request_body = SearchScoresRequest,
    responses(
        (status = 200, description = "Players ordered by descending score", body = [PlayerScore]),
        (status = 400, description = "Invalid game name", body = ErrorBody),
        (status = 500, description = "Unknown table or database failure", body = ErrorBody)
    )
)]
pub async fn search_scores(
    State(state): State<SharedState>,
    payload: Result<Json<SearchScoresRequest>, JsonRejection>,
) -> Result<Json<Vec<PlayerScore>>, AppError> {
    let Json(request) = payload?;
    request.validate()?;
    Ok(Json(ranking_service::search_scores(&state, request).await?))
}

/// Top three players of every game table, with dense, standard and row ranks.
#[utoipa::path(
    get,
    path = "/api/players/top3",
    tag = "players",
    responses(
        (status = 200, description = "Podium per game table", body = TopPlayersResponse),
        (status = 500, description = "Database failure", body = ErrorBody)
    )
)]
pub async fn top_players(
    State(state): State<SharedState>,
) -> Result<Json<TopPlayersResponse>, AppError> {
    Ok(Json(ranking_service::top_players(&state).await?))
}

/// Overwrite the score of a player looked up by name or nickname.
#[utoipa::path(
    put,
    path = "/api/players/update-score",
    tag = "players",
    request_body = UpdateScoreRequest,
    responses(
        (status = 200, description = "Score updated", body = UpdateScoreResponse),
        (status = 400, description = "Invalid game name or missing lookup key", body = ErrorBody),
        (status = 404, description = "Game table or player not found", body = ErrorBody)
    )
)]
pub async fn update_score(
    State(state): State<SharedState>,
    payload: Result<Json<UpdateScoreRequest>, JsonRejection>,
) -> Result<Json<UpdateScoreResponse>, AppError> {
    let Json(request) = payload?;
    request.validate()?;
    Ok(Json(ranking_service::update_score(&state, request).await?))
}

/// Register a new member in every game table.
#[utoipa::path(
    post,
    path = "/api/players/add-member",
    tag = "players",
    request_body = AddMemberRequest,
    responses(
        (status = 201, description = "Member added to every game", body = AddMemberResponse),
        (status = 400, description = "Invalid member fields", body = ErrorBody),
        (status = 409, description = "Name or nickname already taken", body = ErrorBody)
    )
)]
pub async fn add_member(
    State(state): State<SharedState>,
    payload: Result<Json<AddMemberRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AddMemberResponse>), AppError> {
    let Json(request) = payload?;
    let response = member_service::add_member(&state, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Remove a member, by name, from every game table holding it.
#[utoipa::path(
    delete,
    path = "/api/players/delete-member",
    tag = "players",
    request_body = DeleteMemberRequest,
    responses(
        (status = 200, description = "Member removed", body = DeleteMemberResponse),
        (status = 400, description = "Missing name", body = ErrorBody),
        (status = 404, description = "No game holds this member", body = ErrorBody)
    )
)]
pub async fn delete_member(
    State(state): State<SharedState>,
    payload: Result<Json<DeleteMemberRequest>, JsonRejection>,
) -> Result<Json<DeleteMemberResponse>, AppError> {
    let Json(request) = payload?;
    Ok(Json(member_service::delete_member(&state, request).await?))
}
