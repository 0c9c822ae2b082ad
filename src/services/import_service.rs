//! CSV bulk import: replaces the content of every game table with the uploaded roster.

use axum::extract::Multipart;
use indexmap::IndexMap;
use tracing::{info, warn};

use crate::{
    dao::{models::ImportRowEntity, storage::StorageError},
    error::ServiceError,
    services::upload_staging::StagedUpload,
    state::SharedState,
};

/// Multipart field carrying the CSV file.
pub const FILE_FIELD: &str = "file";

/// Stage the uploaded file, validate it, then wipe and refill every game table.
///
/// The staged file is deleted on every exit path; a successful import also
/// clears any leftover file in the staging directory.
pub async fn import_csv(state: &SharedState, multipart: Multipart) -> Result<usize, ServiceError> {
    let mut staged = stage_file_field(state, multipart).await?;

    let outcome = import_staged(state, &mut staged).await;

    if outcome.is_ok() {
        match state.uploads().purge_except(&staged).await {
            Ok(0) => {}
            Ok(removed) => info!(removed, "deleted stale uploads"),
            Err(err) => warn!(error = %err, "failed to clean the upload directory"),
        }
    }
    staged.remove().await;

    outcome
}

async fn import_staged(state: &SharedState, staged: &mut StagedUpload) -> Result<usize, ServiceError> {
    let content = staged
        .read_all()
        .await
        .map_err(|err| staging_failure("failed to read staged upload", err))?;

    let rows = parse_rows(&content)?;
    let duplicates = duplicate_names(&rows);
    if !duplicates.is_empty() {
        return Err(ServiceError::Import(duplicate_message(&duplicates)));
    }

    let imported = state.store().replace_all(rows).await?;
    info!(imported, "CSV import committed");
    Ok(imported)
}

async fn stage_file_field(
    state: &SharedState,
    mut multipart: Multipart,
) -> Result<StagedUpload, ServiceError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|err| ServiceError::InvalidInput(format!("malformed multipart body: {err}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let mut staged = state
            .uploads()
            .create()
            .await
            .map_err(|err| staging_failure("failed to create staged upload", err))?;

        loop {
            let chunk = match field.chunk().await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(err) => {
                    staged.remove().await;
                    return Err(ServiceError::InvalidInput(format!(
                        "failed to read uploaded file: {err}"
                    )));
                }
            };
            if let Err(err) = staged.write_chunk(&chunk).await {
                staged.remove().await;
                return Err(staging_failure("failed to write staged upload", err));
            }
        }

        return Ok(staged);
    }

    Err(ServiceError::InvalidInput(format!(
        "no file uploaded in field `{FILE_FIELD}`"
    )))
}

/// Parse CSV content into import rows.
///
/// The first record is the header. Rows are numbered by the line they start
/// on, so the header is line 1 and skipped blank lines still count. Columns
/// are `name, nickname, department`; empty optional cells become `None`.
pub fn parse_rows(content: &[u8]) -> Result<Vec<ImportRowEntity>, ServiceError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content);

    reader
        .records()
        .map(|record| {
            let record = record.map_err(|err| {
                let line = err.position().map_or(0, |position| position.line());
                ServiceError::Import(format!("malformed CSV at row {line}: {err}"))
            })?;
            let row = record
                .position()
                .map_or(0, |position| position.line() as usize);
            let optional = |column: usize| {
                record
                    .get(column)
                    .filter(|value| !value.is_empty())
                    .map(str::to_owned)
            };
            Ok(ImportRowEntity {
                row,
                name: record.get(0).unwrap_or_default().to_owned(),
                nickname: optional(1),
                department: optional(2),
            })
        })
        .collect()
}

/// Names appearing more than once, with every row they appear on, in first-seen order.
pub fn duplicate_names(rows: &[ImportRowEntity]) -> Vec<(String, Vec<usize>)> {
    let mut seen: IndexMap<&str, Vec<usize>> = IndexMap::new();
    for row in rows {
        seen.entry(row.name.as_str()).or_default().push(row.row);
    }
    seen.into_iter()
        .filter(|(_, lines)| lines.len() > 1)
        .map(|(name, lines)| (name.to_owned(), lines))
        .collect()
}

fn duplicate_message(duplicates: &[(String, Vec<usize>)]) -> String {
    let details = duplicates
        .iter()
        .map(|(name, rows)| {
            let rows = rows
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            format!("{name} (rows {rows})")
        })
        .collect::<Vec<_>>()
        .join("; ");
    format!("duplicate names in CSV file, nothing was imported: {details}")
}

fn staging_failure(message: &str, err: std::io::Error) -> ServiceError {
    ServiceError::Unavailable(StorageError::unavailable(message.to_owned(), err))
}
