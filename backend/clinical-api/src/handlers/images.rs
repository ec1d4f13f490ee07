use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::db::{image_repo, study_repo};
use crate::error::{AppError, Result};
use crate::handlers::{read_file_field, STAFF};
use crate::middleware::CurrentUser;
use crate::AppState;

const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct ImageFilter {
    pub study_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Anything outside a conservative character set becomes '_'; the stored
/// name is uuid-prefixed anyway so collisions are not a concern.
fn sanitize_file_name(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// POST /studies/{id}/images — multipart upload.
pub async fn upload_image(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> Result<HttpResponse> {
    STAFF.authorize(user.0.role)?;

    let study_id = path.into_inner();
    if study_repo::get(&state.db, study_id).await?.is_none() {
        return Err(AppError::BadRequest("unknown study_id".to_string()));
    }

    let upload = read_file_field(payload, MAX_IMAGE_BYTES).await?;

    let original = upload.file_name.as_deref().unwrap_or("upload.bin");
    let stored_name = format!("{}_{}", Uuid::new_v4(), sanitize_file_name(original));

    let dir = PathBuf::from(&state.config.media_root);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::Internal(format!("failed to create media directory: {e}")))?;
    tokio::fs::write(dir.join(&stored_name), &upload.data)
        .await
        .map_err(|e| AppError::Internal(format!("failed to store file: {e}")))?;

    let url = format!("/media/{stored_name}");
    let record = image_repo::insert(
        &state.db,
        study_id,
        &stored_name,
        Some(&url),
        upload.mime_type.as_deref(),
        upload.data.len() as i64,
    )
    .await?;

    tracing::info!(study_id = %study_id, file = %stored_name, "image stored");
    Ok(HttpResponse::Created().json(record))
}

/// GET /images[?study_id=&limit=&offset=]
pub async fn list_images(
    state: web::Data<AppState>,
    user: CurrentUser,
    filter: web::Query<ImageFilter>,
) -> Result<HttpResponse> {
    STAFF.authorize(user.0.role)?;

    let limit = filter.limit.unwrap_or(50).clamp(1, 200);
    let offset = filter.offset.unwrap_or(0).max(0);

    let images = image_repo::list(&state.db, filter.study_id, limit, offset).await?;
    Ok(HttpResponse::Ok().json(images))
}

/// GET /images/{id}
pub async fn get_image(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    STAFF.authorize(user.0.role)?;

    let image = image_repo::get(&state.db, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("image not found".to_string()))?;

    Ok(HttpResponse::Ok().json(image))
}

/// DELETE /images/{id} — removes the row, then the file best-effort.
pub async fn delete_image(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    STAFF.authorize(user.0.role)?;

    let id = path.into_inner();
    let image = image_repo::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("image not found".to_string()))?;

    image_repo::delete(&state.db, id).await?;

    let file_path = Path::new(&state.config.media_root).join(&image.file_name);
    if let Err(err) = tokio::fs::remove_file(&file_path).await {
        // A missing file is not an error; the row is gone either way.
        tracing::warn!(file = %file_path.display(), error = %err, "stored file removal failed");
    }

    Ok(HttpResponse::NoContent().finish())
}
