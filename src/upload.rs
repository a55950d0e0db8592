//! Temporary storage for uploaded photos
//!
//! Uploads live on disk only for the duration of one request. [`StoredUpload`]
//! owns the file and removes it when dropped, so every exit path out of the
//! request handler cleans up.

use crate::Result;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const FALLBACK_NAME: &str = "upload";

pub struct StoredUpload {
    path: PathBuf,
    mime_type: &'static str,
}

impl StoredUpload {
    /// Write the uploaded bytes under `upload_dir`, keyed by a fresh UUID plus
    /// the sanitized original filename so concurrent same-named uploads never
    /// share a path.
    pub async fn persist(upload_dir: &Path, original_filename: &str, bytes: &[u8]) -> Result<Self> {
        let mime_type = crate::ai::mime::mime_for_filename(original_filename);
        let key = format!("{}_{}", Uuid::new_v4(), sanitize_filename(original_filename));
        let path = upload_dir.join(key);

        tokio::fs::write(&path, bytes).await?;
        tracing::debug!("Stored upload at {}", path.display());

        Ok(Self { path, mime_type })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }
}

impl Drop for StoredUpload {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove upload {}: {}", self.path.display(), e);
            }
        }
    }
}

/// Strip path components and any character outside `[A-Za-z0-9._-]`.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}
