//! Process and download handlers.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use mobclean::output::XLSX_MIME;
use mobclean::{processed_file_name, ProcessSummary, WorkbookWriter};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::uploads::TablePreview;
use crate::server::error::ApiError;
use crate::server::state::{AppState, ProcessedFile};

/// Bytes left unescaped in an RFC 5987 `filename*` value.
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Annotated rows returned with a process response.
const SAMPLE_ROWS: usize = 5;

#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    /// Column holding the phone numbers.
    pub column: String,
}

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub id: String,
    pub column: String,
    pub summary: ProcessSummary,
    /// First annotated rows.
    pub sample: TablePreview,
    /// URL of the processed workbook.
    pub download: String,
    /// File name the download is saved under.
    pub file_name: String,
}

/// Run the pipeline over an upload and keep the resulting workbook.
pub async fn process_upload(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ProcessRequest>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let column = request.column.trim().to_string();
    if column.is_empty() {
        return Err(ApiError::BadRequest("No column selected".to_string()));
    }

    let (table, source) = {
        let uploads = state.uploads.read().await;
        let upload = uploads
            .get(&id)
            .ok_or_else(|| ApiError::NotFound(format!("Upload {} not found", id)))?;
        (upload.table.clone(), upload.source.clone())
    };

    let cleaner = state.cleaner();
    let selected = column.clone();
    let (result, bytes) = tokio::task::spawn_blocking(move || -> mobclean::Result<_> {
        let result = cleaner.process_table(table, source, &selected)?;
        let bytes = WorkbookWriter::new().to_buffer(&result.output)?;
        Ok((result, bytes))
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    let mut uploads = state.uploads.write().await;
    let upload = uploads
        .get_mut(&id)
        .ok_or_else(|| ApiError::NotFound(format!("Upload {} not found", id)))?;

    let file_name = processed_file_name(&upload.file_name, "xlsx");
    let sample = TablePreview::of(&result.output.annotated, SAMPLE_ROWS);
    let summary = result.output.summary;
    info!(
        file = %upload.file_name,
        column = %column,
        valid = summary.rows_with_valid,
        invalid = summary.rows_invalid_only,
        "upload processed"
    );

    upload.processed = Some(ProcessedFile {
        file_name: file_name.clone(),
        bytes,
    });

    Ok(Json(ProcessResponse {
        download: format!("/api/uploads/{}/download", id),
        id,
        column,
        summary,
        sample,
        file_name,
    }))
}

/// Send the processed workbook as an attachment.
pub async fn download_processed(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let uploads = state.uploads.read().await;
    let upload = uploads
        .get(&id)
        .ok_or_else(|| ApiError::NotFound(format!("Upload {} not found", id)))?;
    let processed = upload.processed.as_ref().ok_or_else(|| {
        ApiError::Conflict(format!("Upload {} has not been processed yet", id))
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(&processed.file_name),
            ),
        ],
        processed.bytes.clone(),
    )
        .into_response())
}

/// `attachment` disposition with an ASCII fallback name and the UTF-8 name.
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if fallback == file_name {
        return format!("attachment; filename=\"{}\"", file_name);
    }

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        utf8_percent_encode(file_name, ATTR_CHAR)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_escapes_quotes_and_spaces() {
        assert_eq!(
            content_disposition("my \"list\"_processed.xlsx"),
            "attachment; filename=\"my _list__processed.xlsx\"; \
             filename*=UTF-8''my%20%22list%22_processed.xlsx"
        );
    }

    #[test]
    fn test_content_disposition_ascii() {
        assert_eq!(
            content_disposition("contacts_processed.xlsx"),
            "attachment; filename=\"contacts_processed.xlsx\""
        );
    }

    #[test]
    fn test_content_disposition_non_ascii() {
        let value = content_disposition("যোগাযোগ_processed.xlsx");
        assert!(value.starts_with("attachment; filename=\""));
        assert!(value.contains("filename*=UTF-8''%E0%A6"));
        assert!(value.ends_with("_processed.xlsx"));
        assert!(value.is_ascii());
    }
}
