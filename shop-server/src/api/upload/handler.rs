//! Image Upload Handler

use axum::extract::{Multipart, Query, State};
use serde::Deserialize;

use crate::core::ServerState;
use crate::services::image::UploadFile;
use crate::utils::{ApiResponse, AppError, AppResult};
use shared::models::ImageDto;

/// POST /api/images - 上传图片 (multipart, 仅 JPEG)
///
/// Rejected files are reported in the response message; accepted ones are
/// stored regardless.
pub async fn upload(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<Vec<ImageDto>>> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::invalid_request(format!("Malformed multipart body: {e}")))?
    {
        let Some(file_name) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::invalid_request(format!("Failed to read {file_name}: {e}")))?
            .to_vec();
        files.push(UploadFile { file_name, data });
    }

    if files.is_empty() {
        return Err(AppError::validation("No files in the request"));
    }

    let (images, message) = state.images.upload_images(&files).await?;
    if message.is_empty() {
        Ok(ApiResponse::success(images))
    } else {
        Ok(ApiResponse::success_with_message(message, images))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteQuery {
    pub file_path: String,
}

/// DELETE /api/images?filePath=... - 删除图片
pub async fn delete(
    State(state): State<ServerState>,
    Query(query): Query<DeleteQuery>,
) -> AppResult<ApiResponse<()>> {
    state.images.delete_image(&query.file_path)?;
    Ok(ApiResponse::ok())
}
