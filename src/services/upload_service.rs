//! src/services/upload_service.rs
//!
//! UploadService — local-disk file uploads with a dual-name strategy: a
//! generated storage name goes to the filesystem, the original name is
//! kept as the display name in an in-process registry. The registry is
//! mutex-guarded and lives only for the process lifetime.

use bytes::Bytes;
use chrono::Utc;
use std::{
    collections::HashMap,
    io,
    path::PathBuf,
    sync::{Arc, Mutex},
};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("file exceeds the {limit} byte upload limit")]
    TooLarge { limit: usize },
    #[error("unsupported file format `{0}`; allowed: jpg, jpeg, png, bmp")]
    UnsupportedFormat(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type UploadResult<T> = Result<T, UploadError>;

#[derive(Clone)]
pub struct UploadService {
    /// Directory uploaded files are written to; created on demand.
    pub dir: PathBuf,
    max_bytes: usize,
    names: Arc<Mutex<HashMap<String, String>>>,
}

impl UploadService {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_limit(dir, MAX_UPLOAD_BYTES)
    }

    pub fn with_limit(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
            names: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Validate and persist an uploaded file, returning its storage name.
    ///
    /// The storage name is `{userId}_{timestamp}_{uuid}.{ext}` with both
    /// the user id and the original name sanitized, so caller input never
    /// reaches the filesystem as a path. The display-name mapping is
    /// registered before the write and rolled back if the write fails.
    pub async fn save(
        &self,
        user_id: &str,
        original_name: &str,
        data: Bytes,
    ) -> UploadResult<String> {
        if data.len() > self.max_bytes {
            return Err(UploadError::TooLarge {
                limit: self.max_bytes,
            });
        }

        let safe_name = sanitize_file_name(original_name);
        let extension = file_extension(&safe_name)
            .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
            .ok_or_else(|| UploadError::UnsupportedFormat(safe_name.clone()))?;

        let storage_name = format!(
            "{}_{}_{}.{}",
            sanitize_file_name(user_id),
            Utc::now().format("%Y%m%d%H%M%S"),
            Uuid::new_v4(),
            extension
        );

        self.register(&storage_name, original_name);

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(&storage_name);
        if let Err(err) = tokio::fs::write(&path, &data).await {
            self.unregister(&storage_name);
            return Err(UploadError::Io(err));
        }

        info!(
            "stored upload `{}` as `{}` ({} bytes)",
            original_name,
            storage_name,
            data.len()
        );
        Ok(storage_name)
    }

    /// Look up the original display name for a storage name.
    pub fn display_name(&self, storage_name: &str) -> Option<String> {
        self.lock_names().get(storage_name).cloned()
    }

    fn register(&self, storage_name: &str, display_name: &str) {
        self.lock_names()
            .insert(storage_name.to_string(), display_name.to_string());
    }

    fn unregister(&self, storage_name: &str) {
        self.lock_names().remove(storage_name);
    }

    fn lock_names(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.names.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Replace anything outside `[A-Za-z0-9_.-]` with `_`.
fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Lowercased text after the last dot, if any.
fn file_extension(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}
