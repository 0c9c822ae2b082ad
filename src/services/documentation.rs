use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the leaderboard backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::games::list_games,
        crate::routes::csv::import_csv,
        crate::routes::players::search_scores,
        crate::routes::players::top_players,
        crate::routes::players::update_score,
        crate::routes::players::add_member,
        crate::routes::players::delete_member,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::games::GameSummary,
            crate::dto::import::ImportUpload,
            crate::dto::player::PlayerRecord,
            crate::dto::player::SearchScoresRequest,
            crate::dto::player::PlayerScore,
            crate::dto::player::RankedPlayer,
            crate::dto::player::TopPlayersResponse,
            crate::dto::player::UpdateScoreRequest,
            crate::dto::player::UpdateScoreResponse,
            crate::dto::member::AddMemberRequest,
            crate::dto::member::AddMemberResponse,
            crate::dto::member::MemberResult,
            crate::dto::member::DeleteMemberRequest,
            crate::dto::member::DeleteMemberResponse,
            crate::dto::member::DeletedMemberResult,
            crate::error::ErrorBody,
            crate::error::ErrorKind,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "games", description = "Configured games"),
        (name = "csv", description = "Bulk import of members"),
        (name = "players", description = "Scores, rankings and membership"),
    )
)]
pub struct ApiDoc;
