use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::db::{report_repo, study_repo};
use crate::error::{AppError, Result};
use crate::handlers::{ADMIN_ONLY, STAFF};
use crate::middleware::CurrentUser;
use crate::models::{ReportCreate, ReportStatus, ReportUpdate};
use crate::AppState;

/// GET /reports
pub async fn list_reports(state: web::Data<AppState>, user: CurrentUser) -> Result<HttpResponse> {
    STAFF.authorize(user.0.role)?;

    let reports = report_repo::list(&state.db).await?;
    Ok(HttpResponse::Ok().json(reports))
}

/// POST /reports
pub async fn create_report(
    state: web::Data<AppState>,
    user: CurrentUser,
    payload: web::Json<ReportCreate>,
) -> Result<HttpResponse> {
    STAFF.authorize(user.0.role)?;
    payload.validate()?;

    if study_repo::get(&state.db, payload.study_id).await?.is_none() {
        return Err(AppError::NotFound("study does not exist".to_string()));
    }
    if report_repo::get_by_study(&state.db, payload.study_id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "this study already has a report; use PATCH to update it".to_string(),
        ));
    }

    let status = payload.status.unwrap_or(ReportStatus::Draft);
    let report = report_repo::insert(
        &state.db,
        payload.study_id,
        status,
        &payload.content,
        payload.notes.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Created().json(report))
}

/// GET /reports/{id}
pub async fn get_report(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    STAFF.authorize(user.0.role)?;

    let report = report_repo::get(&state.db, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("report not found".to_string()))?;

    Ok(HttpResponse::Ok().json(report))
}

/// PATCH /reports/{id}
pub async fn update_report(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
    payload: web::Json<ReportUpdate>,
) -> Result<HttpResponse> {
    STAFF.authorize(user.0.role)?;
    payload.validate()?;

    let id = path.into_inner();
    let current = report_repo::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("report not found".to_string()))?;

    if let Some(next) = payload.status {
        if !current.status.can_transition(next) {
            return Err(AppError::Conflict(format!(
                "invalid status transition {} -> {}",
                current.status, next
            )));
        }
    }

    let report = report_repo::update(
        &state.db,
        id,
        payload.status,
        payload.content.as_deref(),
        payload.notes.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(report))
}

/// DELETE /reports/{id}
pub async fn delete_report(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    ADMIN_ONLY.authorize(user.0.role)?;

    if !report_repo::delete(&state.db, path.into_inner()).await? {
        return Err(AppError::NotFound("report not found".to_string()));
    }

    Ok(HttpResponse::NoContent().finish())
}
