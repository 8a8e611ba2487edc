//! Upload and preview handlers.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use mobclean::{DataTable, SourceMetadata};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::server::error::ApiError;
use crate::server::state::{AppState, Upload};

/// Rows shown when a preview request gives no count.
const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Maximum number of rows to return in preview.
const MAX_PREVIEW_ROWS: usize = 100;

/// Multipart field carrying a file.
const FILE_FIELD: &str = "file";

/// The first rows of a table, aligned to its columns.
#[derive(Debug, Serialize)]
pub struct TablePreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl TablePreview {
    pub fn of(table: &DataTable, rows: usize) -> Self {
        let head = table.head(rows);
        Self {
            columns: head.headers,
            rows: head.rows,
        }
    }
}

/// Preview of one uploaded file.
#[derive(Debug, Serialize)]
pub struct UploadPreview {
    /// Id for the follow-up preview, process and download requests.
    pub id: String,
    pub file: String,
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    pub columns: Vec<String>,
    /// First rows, aligned to `columns`.
    pub preview: Vec<Vec<Option<String>>>,
    pub total_rows: usize,
}

impl UploadPreview {
    fn new(id: String, table: &DataTable, source: &SourceMetadata, rows: usize) -> Self {
        let head = TablePreview::of(table, rows);
        Self {
            id,
            file: source.file.clone(),
            format: source.format.clone(),
            sheet: source.sheet.clone(),
            columns: head.columns,
            preview: head.rows,
            total_rows: table.row_count(),
        }
    }
}

/// Outcome for one file of an upload request.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum UploadEntry {
    Ready(UploadPreview),
    Failed { file: String, error: String },
}

/// Response for the upload endpoint.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub files: Vec<UploadEntry>,
}

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub rows: Option<usize>,
}

/// Accept one or more files and return a preview of each.
///
/// A file that cannot be read is reported in its own entry and does not
/// affect the others.
pub async fn upload_files(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .filter(|name| !name.is_empty())
            .unwrap_or("upload")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        let cleaner = state.cleaner();
        let name = file_name.clone();
        let parsed = tokio::task::spawn_blocking(move || cleaner.read_bytes(&name, &bytes))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        match parsed {
            Ok((table, source)) => {
                debug!(file = %file_name, rows = table.row_count(), "upload parsed");
                let upload = Upload {
                    file_name,
                    table,
                    source,
                    processed: None,
                };
                let id = state.insert(upload).await;
                let uploads = state.uploads.read().await;
                if let Some(upload) = uploads.get(&id) {
                    files.push(UploadEntry::Ready(UploadPreview::new(
                        id.clone(),
                        &upload.table,
                        &upload.source,
                        DEFAULT_PREVIEW_ROWS,
                    )));
                }
            }
            Err(e) => {
                warn!(file = %file_name, error = %e, "upload rejected");
                files.push(UploadEntry::Failed {
                    file: file_name,
                    error: e.to_string(),
                });
            }
        }
    }

    if files.is_empty() {
        return Err(ApiError::BadRequest(format!(
            "No '{}' field in the upload",
            FILE_FIELD
        )));
    }

    Ok(Json(UploadResponse { files }))
}

/// Forget an upload and its processed workbook.
pub async fn delete_upload(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .remove(&id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| ApiError::NotFound(format!("Upload {} not found", id)))
}

/// Return the preview of an earlier upload again.
pub async fn get_preview(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<UploadPreview>, ApiError> {
    let rows = query
        .rows
        .unwrap_or(DEFAULT_PREVIEW_ROWS)
        .min(MAX_PREVIEW_ROWS);

    let uploads = state.uploads.read().await;
    let upload = uploads
        .get(&id)
        .ok_or_else(|| ApiError::NotFound(format!("Upload {} not found", id)))?;

    Ok(Json(UploadPreview::new(
        id.clone(),
        &upload.table,
        &upload.source,
        rows,
    )))
}
