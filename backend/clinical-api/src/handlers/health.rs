use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::Result;
use crate::AppState;

/// GET /health — liveness.
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// GET /health/ready — readiness, including a database round trip.
pub async fn readiness_check(state: web::Data<AppState>) -> Result<HttpResponse> {
    match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => Ok(HttpResponse::Ok().json(json!({ "status": "ready" }))),
        Err(err) => {
            tracing::error!(error = %err, "readiness probe failed");
            Ok(HttpResponse::ServiceUnavailable().json(json!({ "status": "degraded" })))
        }
    }
}
