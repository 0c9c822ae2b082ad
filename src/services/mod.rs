/// OpenAPI documentation generation.
pub mod documentation;
/// Listing of the configured games.
pub mod games_service;
/// Health check service.
pub mod health_service;
/// CSV bulk import into every game table.
pub mod import_service;
/// Cross-table member additions and removals.
pub mod member_service;
/// Score listings, podiums and score updates.
pub mod ranking_service;
/// Startup creation of the configured game tables.
pub mod schema_service;
/// Staging directory for uploaded files.
pub mod upload_staging;
