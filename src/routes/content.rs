//! Public content listings.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;

use crate::services::records::{self, Record, RecordError, Table};
use crate::state::AppState;

/// `GET /api/content/{table}` — list a content table. Submission tables are
/// not public and answer 404.
pub async fn list_content(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<Record>>, StatusCode> {
    let table = Table::from_slug(&slug).map_err(record_error_to_status)?;
    if table.is_submission() {
        return Err(StatusCode::NOT_FOUND);
    }
    let rows = records::list(&state.pool, table)
        .await
        .map_err(record_error_to_status)?;
    Ok(Json(rows))
}

pub(crate) fn record_error_to_status(err: RecordError) -> StatusCode {
    match err {
        RecordError::UnknownTable(_) | RecordError::NotFound => StatusCode::NOT_FOUND,
        RecordError::InvalidId { .. } => StatusCode::BAD_REQUEST,
        RecordError::InvalidBody { .. } | RecordError::InvalidReference(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RecordError::Duplicate(_) => StatusCode::CONFLICT,
        RecordError::Database(e) => {
            tracing::error!(error = %e, "record store failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[cfg(test)]
#[path = "content_test.rs"]
mod tests;
