//! Capability interface for the remote object store.
//!
//! The workflow layer only needs four operations: list, head, a
//! metadata-only rewrite, and presigned GET generation. Everything else the
//! provider SDK offers stays behind this seam.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("object `{0}` does not exist")]
    NotFound(String),
    #[error("{0}")]
    Provider(String),
}

pub type ObjectStoreResult<T> = Result<T, ObjectStoreError>;

/// Summary entry returned by a list call.
#[derive(Debug, Clone)]
pub struct ObjectSummary {
    pub key: String,
    pub size: i64,
    pub last_modified: Option<DateTime<Utc>>,
    pub etag: Option<String>,
}

/// Metadata snapshot of a single object, as returned by a head call and as
/// accepted by a metadata rewrite.
#[derive(Debug, Clone, Default)]
pub struct ObjectMetadata {
    pub content_length: i64,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
    pub etag: Option<String>,
}

/// Operations the gateway requires from the remote bucket.
///
/// Implementations must be safe to call from any number of concurrent
/// tasks; every method is a single independent round trip with no local
/// state.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List object summaries, optionally under `prefix`, returning at most
    /// `max_keys` entries in provider order.
    async fn list_objects(
        &self,
        prefix: Option<&str>,
        max_keys: i32,
    ) -> ObjectStoreResult<Vec<ObjectSummary>>;

    /// Fetch the current metadata of `key`.
    async fn head_object(&self, key: &str) -> ObjectStoreResult<ObjectMetadata>;

    /// Replace the metadata of `key` without touching its content. The
    /// provider has no metadata PATCH; this is a copy-object-to-self with a
    /// REPLACE directive, atomic at the provider's layer.
    async fn rewrite_metadata(
        &self,
        key: &str,
        metadata: &ObjectMetadata,
    ) -> ObjectStoreResult<()>;

    /// Generate a signed GET URL for `key`, valid for `expires_in`, with a
    /// `response-content-disposition` override baked into the query string.
    async fn presign_get(
        &self,
        key: &str,
        expires_in: Duration,
        response_content_disposition: &str,
    ) -> ObjectStoreResult<String>;
}
