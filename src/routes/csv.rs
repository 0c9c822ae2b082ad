use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartRejection},
    routing::post,
};

use crate::{
    dto::import::ImportUpload,
    error::{AppError, ErrorBody},
    services::import_service,
    state::SharedState,
};

/// Replace the players of every game table with the uploaded CSV.
#[utoipa::path(
    post,
    path = "/api/csv/import",
    tag = "csv",
    request_body(content = ImportUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Number of imported records", body = String, content_type = "text/plain"),
        (status = 400, description = "No file uploaded", body = ErrorBody),
        (status = 500, description = "Import rejected, nothing was written", body = ErrorBody)
    )
)]
pub async fn import_csv(
    State(state): State<SharedState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<String, AppError> {
    let imported = import_service::import_csv(&state, multipart?).await?;
    Ok(format!("{imported} records imported"))
}

/// Configure the CSV import subtree; `max_upload_bytes` caps the request body.
pub fn router(max_upload_bytes: usize) -> Router<SharedState> {
    Router::new()
        .route("/api/csv/import", post(import_csv))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
