// src/handlers/upload.rs

use std::path::Path as FsPath;

use axum::{Extension, Json, extract::Multipart, extract::State, response::IntoResponse};
use serde_json::json;
use uuid::Uuid;

use crate::{config::Config, error::AppError, utils::jwt::Claims};

/// 5MB cap, matching the route's body limit.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Accepts a multipart question-image upload from a teacher and stores it
/// under the configured upload directory. Returns a relative URL that the
/// static /uploads service resolves.
pub async fn upload_image(
    State(config): State<Config>,
    Extension(claims): Extension<Claims>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    if claims.role != "teacher" {
        return Err(AppError::Forbidden(
            "Only teachers can upload images".to_string(),
        ));
    }

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!("Multipart error: {:?}", e);
        AppError::BadRequest("File size too large. Maximum size is 5MB.".to_string())
    })? {
        if field.name() != Some("image") {
            continue;
        }

        let content_type = field.content_type().unwrap_or("").to_string();
        if !content_type.starts_with("image/") {
            return Err(AppError::BadRequest(
                "Only image files are allowed".to_string(),
            ));
        }

        let extension = field
            .file_name()
            .and_then(|name| FsPath::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();

        let data = field.bytes().await.map_err(|_| {
            AppError::BadRequest("File size too large. Maximum size is 5MB.".to_string())
        })?;

        if data.len() > MAX_IMAGE_BYTES {
            return Err(AppError::BadRequest(
                "File size too large. Maximum size is 5MB.".to_string(),
            ));
        }

        tokio::fs::create_dir_all(&config.upload_dir)
            .await
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

        let filename = format!("question-{}{}", Uuid::new_v4(), extension);
        let destination = FsPath::new(&config.upload_dir).join(&filename);

        tokio::fs::write(&destination, &data).await.map_err(|e| {
            tracing::error!("Failed to store upload: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        return Ok(Json(json!({ "url": format!("/uploads/{}", filename) })));
    }

    Err(AppError::BadRequest(
        "No image file provided".to_string(),
    ))
}
