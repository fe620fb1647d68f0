//! src/services/storage_service.rs
//!
//! StorageService — the preview-URL and metadata workflow over the remote
//! bucket. Every operation is a stateless round trip through the
//! `ObjectStore` capability; nothing is cached or retried here, and object
//! content is never touched — only metadata, via copy-in-place.

use crate::services::content_type;
use crate::storage::client::{ObjectStore, ObjectStoreError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{sync::Arc, time::Duration};
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_MAX_KEYS: usize = 1000;
pub const DEFAULT_EXPIRATION_SECONDS: u64 = 3600;
const INLINE: &str = "inline";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to list objects: {source}")]
    List { source: ObjectStoreError },
    #[error("failed to update metadata for object `{key}`: {source}")]
    SetDisposition {
        key: String,
        source: ObjectStoreError,
    },
    #[error("failed to generate preview url for object `{key}`: {source}")]
    Presign {
        key: String,
        source: ObjectStoreError,
    },
    #[error("failed to fetch info for object `{key}`: {source}")]
    FileInfo {
        key: String,
        source: ObjectStoreError,
    },
}

impl StorageError {
    /// Whether the underlying provider failure was a missing object.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::List {
                source: ObjectStoreError::NotFound(_)
            } | Self::SetDisposition {
                source: ObjectStoreError::NotFound(_),
                ..
            } | Self::Presign {
                source: ObjectStoreError::NotFound(_),
                ..
            } | Self::FileInfo {
                source: ObjectStoreError::NotFound(_),
                ..
            }
        )
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Metadata record returned for a single object.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub key: String,
    pub size: i64,
    pub content_type: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
    pub etag: Option<String>,
    pub content_disposition: Option<String>,
    pub url: String,
}

/// Orchestrates listing, metadata inspection, disposition rewriting and
/// presigned-URL generation against one configured bucket. Holds only the
/// read-only bucket/endpoint pair next to the store handle, so any number
/// of callers may share a clone.
#[derive(Clone)]
pub struct StorageService {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    endpoint: String,
}

impl StorageService {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        bucket: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Public (unsigned) URL of an object, by plain concatenation.
    fn public_url(&self, key: &str) -> String {
        format!("https://{}.{}/{}", self.bucket, self.endpoint, key)
    }

    /// List objects under an optional prefix, truncated to `max_keys`
    /// (1000 when unset), each mapped to its absolute URL. Ordering is
    /// whatever the provider returned.
    pub async fn list_files(
        &self,
        prefix: Option<&str>,
        max_keys: Option<usize>,
    ) -> StorageResult<Vec<String>> {
        let max_keys = max_keys.unwrap_or(DEFAULT_MAX_KEYS);
        let summaries = self
            .store
            .list_objects(prefix, max_keys as i32)
            .await
            .map_err(|source| StorageError::List { source })?;

        let urls: Vec<String> = summaries
            .iter()
            .take(max_keys)
            .map(|summary| self.public_url(&summary.key))
            .collect();

        info!("listed {} objects with prefix {:?}", urls.len(), prefix);
        Ok(urls)
    }

    pub async fn list_all_files(&self) -> StorageResult<Vec<String>> {
        self.list_files(None, None).await
    }

    pub async fn list_files_by_prefix(&self, prefix: &str) -> StorageResult<Vec<String>> {
        self.list_files(Some(prefix), None).await
    }

    /// Rewrite an object's metadata so browsers render it instead of
    /// downloading it: disposition becomes `inline`, and the content type
    /// is corrected when the resolver knows the extension.
    ///
    /// This is a read-modify-write against the remote store with no local
    /// transaction; the copy itself is atomic at the provider's layer, and
    /// no compensation is attempted if it fails.
    pub async fn set_inline_content_disposition(&self, key: &str) -> StorageResult<()> {
        let mut metadata =
            self.store
                .head_object(key)
                .await
                .map_err(|source| StorageError::SetDisposition {
                    key: key.to_string(),
                    source,
                })?;

        metadata.content_disposition = Some(INLINE.to_string());
        if let Some(content_type) = content_type::resolve(key) {
            metadata.content_type = Some(content_type.to_string());
        }

        self.store
            .rewrite_metadata(key, &metadata)
            .await
            .map_err(|source| StorageError::SetDisposition {
                key: key.to_string(),
                source,
            })?;

        info!("set content-disposition of `{}` to inline", key);
        Ok(())
    }

    /// Generate a presigned GET URL forcing inline disposition, valid for
    /// `expiration_seconds` (3600 when unset). Purely a signing operation
    /// delegated to the store client; nothing is persisted or revocable.
    pub async fn generate_preview_url(
        &self,
        key: &str,
        expiration_seconds: Option<u64>,
    ) -> StorageResult<String> {
        let expiration_seconds = expiration_seconds.unwrap_or(DEFAULT_EXPIRATION_SECONDS);
        let url = self
            .store
            .presign_get(key, Duration::from_secs(expiration_seconds), INLINE)
            .await
            .map_err(|source| StorageError::Presign {
                key: key.to_string(),
                source,
            })?;

        info!(
            "generated preview url for `{}`, expires in {}s",
            key, expiration_seconds
        );
        Ok(url)
    }

    /// Generate preview URLs for a batch of keys, in input order.
    ///
    /// A per-key signing failure does not abort the batch: the entry
    /// degrades to the unsigned public URL (useless on a private bucket,
    /// and recognizable only by the missing disposition override). The
    /// result always has the same length as the input.
    pub async fn batch_generate_preview_urls(
        &self,
        keys: &[String],
        expiration_seconds: Option<u64>,
    ) -> Vec<String> {
        let mut urls = Vec::with_capacity(keys.len());
        for key in keys {
            match self.generate_preview_url(key, expiration_seconds).await {
                Ok(url) => urls.push(url),
                Err(err) => {
                    warn!("preview url for `{}` degraded to public url: {}", key, err);
                    urls.push(self.public_url(key));
                }
            }
        }
        urls
    }

    /// Fetch the metadata snapshot of one object. Every call is a live
    /// round trip; nothing is cached.
    pub async fn get_file_info(&self, key: &str) -> StorageResult<FileInfo> {
        let metadata =
            self.store
                .head_object(key)
                .await
                .map_err(|source| StorageError::FileInfo {
                    key: key.to_string(),
                    source,
                })?;

        Ok(FileInfo {
            key: key.to_string(),
            size: metadata.content_length,
            content_type: metadata.content_type,
            last_modified: metadata.last_modified,
            etag: metadata.etag,
            content_disposition: metadata.content_disposition,
            url: self.public_url(key),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::client::{
        ObjectMetadata, ObjectStore, ObjectStoreError, ObjectStoreResult, ObjectSummary,
    };
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// In-memory stand-in for the remote bucket. Presigned URLs embed the
    /// requested expiry and disposition so tests can assert what the
    /// workflow passed through.
    #[derive(Default)]
    struct FakeStore {
        objects: Mutex<BTreeMap<String, ObjectMetadata>>,
        failing_keys: Vec<String>,
    }

    impl FakeStore {
        fn with_objects(keys: &[&str]) -> Self {
            let store = Self::default();
            {
                let mut objects = store.objects.lock().unwrap();
                for key in keys {
                    objects.insert(key.to_string(), ObjectMetadata::default());
                }
            }
            store
        }

        fn insert(&self, key: &str, metadata: ObjectMetadata) {
            self.objects
                .lock()
                .unwrap()
                .insert(key.to_string(), metadata);
        }
    }

    #[async_trait]
    impl ObjectStore for FakeStore {
        async fn list_objects(
            &self,
            prefix: Option<&str>,
            max_keys: i32,
        ) -> ObjectStoreResult<Vec<ObjectSummary>> {
            let objects = self.objects.lock().unwrap();
            Ok(objects
                .iter()
                .filter(|(key, _)| prefix.is_none_or(|p| key.starts_with(p)))
                .take(max_keys as usize)
                .map(|(key, metadata)| ObjectSummary {
                    key: key.clone(),
                    size: metadata.content_length,
                    last_modified: metadata.last_modified,
                    etag: metadata.etag.clone(),
                })
                .collect())
        }

        async fn head_object(&self, key: &str) -> ObjectStoreResult<ObjectMetadata> {
            self.objects
                .lock()
                .unwrap()
                .get(key)
                .cloned()
                .ok_or_else(|| ObjectStoreError::NotFound(key.to_string()))
        }

        async fn rewrite_metadata(
            &self,
            key: &str,
            metadata: &ObjectMetadata,
        ) -> ObjectStoreResult<()> {
            let mut objects = self.objects.lock().unwrap();
            if !objects.contains_key(key) {
                return Err(ObjectStoreError::NotFound(key.to_string()));
            }
            objects.insert(key.to_string(), metadata.clone());
            Ok(())
        }

        async fn presign_get(
            &self,
            key: &str,
            expires_in: Duration,
            response_content_disposition: &str,
        ) -> ObjectStoreResult<String> {
            if self.failing_keys.iter().any(|k| k == key) {
                return Err(ObjectStoreError::Provider("signing unavailable".into()));
            }
            Ok(format!(
                "https://demo.oss-cn-x.aliyuncs.com/{}?x-oss-expires={}&response-content-disposition={}&x-oss-signature=fixture",
                key,
                expires_in.as_secs(),
                response_content_disposition
            ))
        }
    }

    fn service(store: FakeStore) -> StorageService {
        StorageService::new(Arc::new(store), "demo", "oss-cn-x.aliyuncs.com")
    }

    #[tokio::test]
    async fn list_maps_keys_to_absolute_urls() {
        let svc = service(FakeStore::with_objects(&["images/a.png", "images/b.png"]));
        let urls = svc.list_all_files().await.unwrap();
        assert_eq!(
            urls,
            vec![
                "https://demo.oss-cn-x.aliyuncs.com/images/a.png",
                "https://demo.oss-cn-x.aliyuncs.com/images/b.png",
            ]
        );
    }

    #[tokio::test]
    async fn list_honors_prefix_and_max_keys() {
        let svc = service(FakeStore::with_objects(&[
            "docs/a.pdf",
            "images/a.png",
            "images/b.png",
            "images/c.png",
        ]));

        let by_prefix = svc.list_files_by_prefix("images/").await.unwrap();
        assert_eq!(by_prefix.len(), 3);
        assert!(by_prefix.iter().all(|url| url.contains("/images/")));

        let capped = svc.list_files(Some("images/"), Some(2)).await.unwrap();
        assert_eq!(capped.len(), 2);
    }

    #[tokio::test]
    async fn list_of_empty_bucket_is_empty_not_an_error() {
        let svc = service(FakeStore::default());
        assert!(svc.list_files(None, Some(1000)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn preview_url_carries_inline_override_and_expiry() {
        let svc = service(FakeStore::with_objects(&["images/a.png"]));
        let url = svc
            .generate_preview_url("images/a.png", Some(600))
            .await
            .unwrap();
        assert!(url.contains("response-content-disposition=inline"));
        assert!(url.contains("x-oss-expires=600"));
    }

    #[tokio::test]
    async fn preview_url_defaults_to_one_hour() {
        let svc = service(FakeStore::with_objects(&["images/a.png"]));
        let defaulted = svc
            .generate_preview_url("images/a.png", None)
            .await
            .unwrap();
        let explicit = svc
            .generate_preview_url("images/a.png", Some(3600))
            .await
            .unwrap();
        assert_eq!(defaulted, explicit);
        assert!(defaulted.contains("x-oss-expires=3600"));
    }

    #[tokio::test]
    async fn batch_preserves_length_and_order_and_degrades_per_key() {
        let store = FakeStore {
            failing_keys: vec!["broken.png".to_string()],
            ..FakeStore::with_objects(&["a.png", "broken.png", "b.png"])
        };
        let svc = service(store);

        let keys = vec![
            "a.png".to_string(),
            "broken.png".to_string(),
            "b.png".to_string(),
        ];
        let urls = svc.batch_generate_preview_urls(&keys, Some(120)).await;

        assert_eq!(urls.len(), keys.len());
        assert!(urls[0].contains("response-content-disposition=inline"));
        assert_eq!(urls[1], "https://demo.oss-cn-x.aliyuncs.com/broken.png");
        assert!(!urls[1].contains("response-content-disposition"));
        assert!(urls[2].contains("response-content-disposition=inline"));
    }

    #[tokio::test]
    async fn set_inline_rewrites_disposition_and_known_content_type() {
        let store = FakeStore::default();
        store.insert(
            "images/a.png",
            ObjectMetadata {
                content_length: 42,
                content_type: Some("application/octet-stream".into()),
                ..ObjectMetadata::default()
            },
        );
        let svc = service(store);

        svc.set_inline_content_disposition("images/a.png")
            .await
            .unwrap();

        let info = svc.get_file_info("images/a.png").await.unwrap();
        assert_eq!(info.content_disposition.as_deref(), Some("inline"));
        assert_eq!(info.content_type.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn set_inline_leaves_unmapped_content_type_alone() {
        let store = FakeStore::default();
        store.insert(
            "archive.zip",
            ObjectMetadata {
                content_type: Some("application/zip".into()),
                ..ObjectMetadata::default()
            },
        );
        let svc = service(store);

        svc.set_inline_content_disposition("archive.zip")
            .await
            .unwrap();

        let info = svc.get_file_info("archive.zip").await.unwrap();
        assert_eq!(info.content_disposition.as_deref(), Some("inline"));
        assert_eq!(info.content_type.as_deref(), Some("application/zip"));
    }

    #[tokio::test]
    async fn file_info_maps_metadata_and_builds_url() {
        let store = FakeStore::default();
        store.insert(
            "images/a.png",
            ObjectMetadata {
                content_length: 1024,
                content_type: Some("image/png".into()),
                content_disposition: Some("inline".into()),
                last_modified: None,
                etag: Some("\"abc123\"".into()),
            },
        );
        let svc = service(store);

        let info = svc.get_file_info("images/a.png").await.unwrap();
        assert_eq!(info.key, "images/a.png");
        assert_eq!(info.size, 1024);
        assert_eq!(info.etag.as_deref(), Some("\"abc123\""));
        assert_eq!(info.url, "https://demo.oss-cn-x.aliyuncs.com/images/a.png");
    }

    #[tokio::test]
    async fn missing_object_surfaces_with_key_context() {
        let svc = service(FakeStore::default());
        let err = svc.get_file_info("gone.png").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("gone.png"));

        let err = svc
            .set_inline_content_disposition("gone.png")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
