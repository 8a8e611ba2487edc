//! Application state for the web server.

use std::sync::Arc;
use tokio::sync::RwLock;

use indexmap::IndexMap;
use mobclean::{Cleaner, CleanerConfig, DataTable, SourceMetadata};
use tracing::debug;

/// Uploads kept in memory before the oldest is evicted.
pub const DEFAULT_MAX_UPLOADS: usize = 32;

/// Hex characters of the content hash used as an upload id.
const UPLOAD_ID_LEN: usize = 16;

/// A file received through the upload form.
#[derive(Debug, Clone)]
pub struct Upload {
    /// File name as sent by the browser.
    pub file_name: String,
    /// Parsed table.
    pub table: DataTable,
    /// Source metadata.
    pub source: SourceMetadata,
    /// Result of the last process request, if any.
    pub processed: Option<ProcessedFile>,
}

/// The workbook produced for an upload.
#[derive(Debug, Clone)]
pub struct ProcessedFile {
    /// `<stem>_processed.xlsx`
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Uploads by id, oldest first.
    pub uploads: Arc<RwLock<IndexMap<String, Upload>>>,
    /// Reader and pipeline settings for every upload.
    pub config: CleanerConfig,
    /// Largest accepted request body.
    pub max_upload_bytes: usize,
    /// Uploads kept at once; inserting past this evicts the oldest.
    pub max_uploads: usize,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: CleanerConfig, max_upload_bytes: usize) -> Self {
        Self {
            uploads: Arc::new(RwLock::new(IndexMap::new())),
            config,
            max_upload_bytes,
            max_uploads: DEFAULT_MAX_UPLOADS,
        }
    }

    /// Limit how many uploads are kept in memory.
    pub fn with_max_uploads(mut self, max_uploads: usize) -> Self {
        self.max_uploads = max_uploads.max(1);
        self
    }

    /// A cleaner built from the server configuration.
    pub fn cleaner(&self) -> Cleaner {
        Cleaner::with_config(self.config.clone())
    }

    /// Store an upload and return its id.
    ///
    /// Ids come from the file contents, so re-uploading the same file
    /// replaces the earlier entry and makes it the newest.
    pub async fn insert(&self, upload: Upload) -> String {
        let id = upload_id(&upload.source.hash);
        let mut uploads = self.uploads.write().await;
        uploads.shift_remove(&id);

        while uploads.len() >= self.max_uploads {
            match uploads.shift_remove_index(0) {
                Some((evicted, _)) => debug!(id = %evicted, "evicted oldest upload"),
                None => break,
            }
        }

        uploads.insert(id.clone(), upload);
        id
    }

    /// Drop an upload and its processed workbook.
    pub async fn remove(&self, id: &str) -> Option<Upload> {
        self.uploads.write().await.shift_remove(id)
    }
}

fn upload_id(hash: &str) -> String {
    hash.trim_start_matches("sha256:")
        .chars()
        .take(UPLOAD_ID_LEN)
        .collect()
}
