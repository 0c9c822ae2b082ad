use utoipa::ToSchema;

/// Multipart form accepted by the CSV import route.
///
/// The file is a CSV whose first line is a header and whose columns are
/// `name, nickname, department`.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct ImportUpload {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}
