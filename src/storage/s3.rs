//! Production `ObjectStore` backed by the S3-compatible provider SDK.
//!
//! The SDK owns request canonicalization and HMAC signing; presigned URLs
//! come out of `PresigningConfig` and are never assembled by hand. The
//! client is configured for virtual-hosted addressing so generated URLs
//! take the `https://{bucket}.{endpoint}/{key}` form.

use crate::config::OssConfig;
use crate::storage::client::{
    ObjectMetadata, ObjectStore, ObjectStoreError, ObjectStoreResult, ObjectSummary,
};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::types::MetadataDirective;
use chrono::{DateTime, Utc};
use std::time::Duration;

#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Build a client for the configured endpoint with static credentials.
    pub fn new(cfg: &OssConfig) -> Self {
        let credentials = Credentials::new(
            cfg.access_key_id.clone(),
            cfg.access_key_secret.clone(),
            None,
            None,
            "oss-gateway-config",
        );
        let conf = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()))
            .endpoint_url(format!("https://{}", cfg.endpoint))
            .credentials_provider(credentials)
            .build();

        Self {
            client: Client::from_conf(conf),
            bucket: cfg.bucket_name.clone(),
        }
    }

    fn provider_err(err: impl std::fmt::Display) -> ObjectStoreError {
        ObjectStoreError::Provider(err.to_string())
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn list_objects(
        &self,
        prefix: Option<&str>,
        max_keys: i32,
    ) -> ObjectStoreResult<Vec<ObjectSummary>> {
        let resp = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .set_prefix(prefix.map(str::to_string))
            .max_keys(max_keys)
            .send()
            .await
            .map_err(Self::provider_err)?;

        let summaries = resp
            .contents()
            .iter()
            .filter_map(|obj| {
                let key = obj.key()?.to_string();
                Some(ObjectSummary {
                    key,
                    size: obj.size().unwrap_or(0),
                    last_modified: obj.last_modified().and_then(to_chrono),
                    etag: obj.e_tag().map(str::to_string),
                })
            })
            .collect();

        Ok(summaries)
    }

    async fn head_object(&self, key: &str) -> ObjectStoreResult<ObjectMetadata> {
        let resp = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                if let SdkError::ServiceError(ref service_err) = err {
                    if matches!(service_err.err(), HeadObjectError::NotFound(_)) {
                        return ObjectStoreError::NotFound(key.to_string());
                    }
                }
                Self::provider_err(err)
            })?;

        Ok(ObjectMetadata {
            content_length: resp.content_length().unwrap_or(0),
            content_type: resp.content_type().map(str::to_string),
            content_disposition: resp.content_disposition().map(str::to_string),
            last_modified: resp.last_modified().and_then(to_chrono),
            etag: resp.e_tag().map(str::to_string),
        })
    }

    async fn rewrite_metadata(
        &self,
        key: &str,
        metadata: &ObjectMetadata,
    ) -> ObjectStoreResult<()> {
        // Copy-to-self: the source key must be URL-encoded inside the
        // copy-source header, the destination key must not.
        let copy_source = format!("{}/{}", self.bucket, urlencoding::encode(key));

        self.client
            .copy_object()
            .bucket(&self.bucket)
            .key(key)
            .copy_source(copy_source)
            .metadata_directive(MetadataDirective::Replace)
            .set_content_type(metadata.content_type.clone())
            .set_content_disposition(metadata.content_disposition.clone())
            .send()
            .await
            .map_err(Self::provider_err)?;

        Ok(())
    }

    async fn presign_get(
        &self,
        key: &str,
        expires_in: Duration,
        response_content_disposition: &str,
    ) -> ObjectStoreResult<String> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|err| ObjectStoreError::Provider(format!("invalid expiry: {err}")))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .response_content_disposition(response_content_disposition)
            .presigned(presigning)
            .await
            .map_err(Self::provider_err)?;

        Ok(presigned.uri().to_string())
    }
}

/// Convert the SDK's timestamp type into `chrono`.
fn to_chrono(dt: &aws_sdk_s3::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())
}
