//! HTTP handlers for the object-storage façade under `/v1/osss`.
//! Thin request/response mapping; all storage concerns live in
//! `StorageService`.

use crate::{
    errors::AppError,
    models::response::ApiResponse,
    services::storage_service::FileInfo,
    state::AppState,
};
use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PrefixQuery {
    pub prefix: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectKeyQuery {
    pub object_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewUrlQuery {
    pub object_key: String,
    pub expiration_seconds: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpirationQuery {
    pub expiration_seconds: Option<u64>,
}

fn require_key(object_key: &str) -> Result<(), AppError> {
    if object_key.is_empty() {
        return Err(AppError::bad_request("objectKey must not be empty"));
    }
    Ok(())
}

/// GET `/v1/osss/getAllOsss` — absolute URLs of every object.
pub async fn get_all_osss(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<String>>>, AppError> {
    let files = state.storage.list_all_files().await?;
    Ok(Json(ApiResponse::success(files)))
}

/// GET `/v1/osss/getOsssByPrefix?prefix=` — absolute URLs under a prefix.
pub async fn get_osss_by_prefix(
    State(state): State<AppState>,
    Query(q): Query<PrefixQuery>,
) -> Result<Json<ApiResponse<Vec<String>>>, AppError> {
    let files = state.storage.list_files_by_prefix(&q.prefix).await?;
    Ok(Json(ApiResponse::success(files)))
}

/// GET `/v1/osss/generatePreviewUrl?objectKey=&expirationSeconds=`
pub async fn generate_preview_url(
    State(state): State<AppState>,
    Query(q): Query<PreviewUrlQuery>,
) -> Result<Json<ApiResponse<String>>, AppError> {
    require_key(&q.object_key)?;
    let url = state
        .storage
        .generate_preview_url(&q.object_key, q.expiration_seconds)
        .await?;
    Ok(Json(ApiResponse::success(url)))
}

/// GET `/v1/osss/generateDefaultPreviewUrl?objectKey=` — one-hour expiry.
pub async fn generate_default_preview_url(
    State(state): State<AppState>,
    Query(q): Query<ObjectKeyQuery>,
) -> Result<Json<ApiResponse<String>>, AppError> {
    require_key(&q.object_key)?;
    let url = state
        .storage
        .generate_preview_url(&q.object_key, None)
        .await?;
    Ok(Json(ApiResponse::success(url)))
}

/// POST `/v1/osss/batchGeneratePreviewUrls?expirationSeconds=`
///
/// Body is a JSON array of object keys; the response list has the same
/// length and order, with unsigned public URLs standing in for entries
/// whose signing failed.
pub async fn batch_generate_preview_urls(
    State(state): State<AppState>,
    Query(q): Query<ExpirationQuery>,
    Json(object_keys): Json<Vec<String>>,
) -> Result<Json<ApiResponse<Vec<String>>>, AppError> {
    let urls = state
        .storage
        .batch_generate_preview_urls(&object_keys, q.expiration_seconds)
        .await;
    Ok(Json(ApiResponse::success(urls)))
}

/// POST `/v1/osss/setInlineContentDisposition?objectKey=`
pub async fn set_inline_content_disposition(
    State(state): State<AppState>,
    Query(q): Query<ObjectKeyQuery>,
) -> Result<Json<ApiResponse<String>>, AppError> {
    require_key(&q.object_key)?;
    state
        .storage
        .set_inline_content_disposition(&q.object_key)
        .await?;
    Ok(Json(ApiResponse::success(format!(
        "object `{}` is now served inline",
        q.object_key
    ))))
}

/// GET `/v1/osss/getOssInfoByKey?objectKey=`
pub async fn get_oss_info_by_key(
    State(state): State<AppState>,
    Query(q): Query<ObjectKeyQuery>,
) -> Result<Json<ApiResponse<FileInfo>>, AppError> {
    require_key(&q.object_key)?;
    let info = state.storage.get_file_info(&q.object_key).await?;
    Ok(Json(ApiResponse::success(info)))
}
