use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use serde::Serialize;
use serde_json::json;

use crate::error::{AppError, Result};
use crate::handlers::{read_file_field, STAFF};
use crate::middleware::CurrentUser;
use crate::AppState;

const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Serialize)]
struct Prediction {
    label: &'static str,
    score: f32,
}

/// POST /analysis/predict — score one chest X-ray against the classifier.
pub async fn predict(
    state: web::Data<AppState>,
    user: CurrentUser,
    payload: Multipart,
) -> Result<HttpResponse> {
    STAFF.authorize(user.0.role)?;

    let upload = read_file_field(payload, MAX_IMAGE_BYTES).await?;

    // Decode up front so the classifier only ever sees a real image.
    image::load_from_memory(&upload.data)
        .map_err(|e| AppError::BadRequest(format!("invalid image: {e}")))?;

    let mime = upload
        .mime_type
        .clone()
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let scores = state
        .scorer
        .score(upload.data, &mime)
        .await
        .map_err(|e| AppError::Internal(format!("scoring failed: {e}")))?;

    Ok(HttpResponse::Ok().json(json!({
        "normal": scores.normal,
        "tuberculosis": scores.tuberculosis,
        "predictions": [
            Prediction { label: "Normal", score: scores.normal },
            Prediction { label: "Tuberculosis", score: scores.tuberculosis },
        ],
    })))
}

/// GET /analysis/ping — scorer mode and reachability flags.
pub async fn ping(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "mode": state.scorer.mode(),
    })))
}
