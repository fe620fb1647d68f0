//! HTTP handlers for local file upload under `/v1/fileUpload`.

use crate::{errors::AppError, models::response::ApiResponse, state::AppState};
use axum::{
    Json,
    extract::{Multipart, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayNameQuery {
    pub storage_name: String,
}

/// POST `/v1/fileUpload/upload` — multipart form with a `file` part and a
/// `userId` part. Returns the generated storage name; the original file
/// name stays retrievable via `getDisplayName`.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<String>>, AppError> {
    let mut file: Option<(String, bytes::Bytes)> = None;
    let mut user_id: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::bad_request(format!("malformed multipart body: {err}")))?
    {
        match field.name() {
            Some("file") => {
                let original_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::bad_request("file part is missing a file name"))?;
                let data = field.bytes().await.map_err(|err| {
                    AppError::new(
                        StatusCode::PAYLOAD_TOO_LARGE,
                        format!("could not read file part: {err}"),
                    )
                })?;
                file = Some((original_name, data));
            }
            Some("userId") => {
                let value = field
                    .text()
                    .await
                    .map_err(|err| AppError::bad_request(format!("invalid userId part: {err}")))?;
                user_id = Some(value);
            }
            _ => {}
        }
    }

    let (original_name, data) =
        file.ok_or_else(|| AppError::bad_request("missing `file` part"))?;
    let user_id = user_id.ok_or_else(|| AppError::bad_request("missing `userId` part"))?;
    if user_id.is_empty() {
        return Err(AppError::bad_request("userId must not be empty"));
    }

    let storage_name = state.uploads.save(&user_id, &original_name, data).await?;
    Ok(Json(ApiResponse::success_with_message(
        "file uploaded successfully",
        storage_name,
    )))
}

/// GET `/v1/fileUpload/getDisplayName?storageName=`
pub async fn get_display_name(
    State(state): State<AppState>,
    Query(q): Query<DisplayNameQuery>,
) -> Result<Json<ApiResponse<String>>, AppError> {
    match state.uploads.display_name(&q.storage_name) {
        Some(display_name) => Ok(Json(ApiResponse::success(display_name))),
        None => Err(AppError::not_found(format!(
            "no display name recorded for `{}`",
            q.storage_name
        ))),
    }
}
