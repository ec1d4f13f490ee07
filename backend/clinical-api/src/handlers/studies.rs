use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::db::{doctor_repo, patient_repo, study_repo};
use crate::error::{AppError, Result};
use crate::handlers::STAFF;
use crate::middleware::CurrentUser;
use crate::models::{StudyCreate, StudyUpdate};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct StudyFilter {
    pub patient_id: Option<Uuid>,
}

/// Referential checks performed before the insert; the database foreign
/// keys remain the backstop.
async fn check_references(
    state: &AppState,
    patient_id: Option<Uuid>,
    doctor_id: Option<Uuid>,
) -> Result<()> {
    if let Some(patient_id) = patient_id {
        if patient_repo::get(&state.db, patient_id).await?.is_none() {
            return Err(AppError::BadRequest("unknown patient_id".to_string()));
        }
    }
    if let Some(doctor_id) = doctor_id {
        if doctor_repo::get(&state.db, doctor_id).await?.is_none() {
            return Err(AppError::BadRequest("unknown doctor_id".to_string()));
        }
    }
    Ok(())
}

/// GET /studies[?patient_id=]
pub async fn list_studies(
    state: web::Data<AppState>,
    user: CurrentUser,
    filter: web::Query<StudyFilter>,
) -> Result<HttpResponse> {
    STAFF.authorize(user.0.role)?;

    let studies = study_repo::list(&state.db, filter.patient_id).await?;
    Ok(HttpResponse::Ok().json(studies))
}

/// POST /studies
pub async fn create_study(
    state: web::Data<AppState>,
    user: CurrentUser,
    payload: web::Json<StudyCreate>,
) -> Result<HttpResponse> {
    STAFF.authorize(user.0.role)?;
    payload.validate()?;

    check_references(&state, Some(payload.patient_id), payload.doctor_id).await?;

    let study_date = payload
        .study_date
        .unwrap_or_else(|| Utc::now().date_naive());
    let study = study_repo::insert(
        &state.db,
        payload.patient_id,
        payload.doctor_id,
        payload.title.trim(),
        payload.description.as_deref(),
        study_date,
    )
    .await?;

    Ok(HttpResponse::Created().json(study))
}

/// GET /studies/{id}
pub async fn get_study(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    STAFF.authorize(user.0.role)?;

    let study = study_repo::get(&state.db, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("study not found".to_string()))?;

    Ok(HttpResponse::Ok().json(study))
}

/// PATCH /studies/{id}
pub async fn update_study(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
    payload: web::Json<StudyUpdate>,
) -> Result<HttpResponse> {
    STAFF.authorize(user.0.role)?;
    payload.validate()?;

    let id = path.into_inner();
    if study_repo::get(&state.db, id).await?.is_none() {
        return Err(AppError::NotFound("study not found".to_string()));
    }

    check_references(&state, None, payload.doctor_id).await?;

    let study = study_repo::update(
        &state.db,
        id,
        payload.doctor_id,
        payload.title.as_deref().map(str::trim),
        payload.description.as_deref(),
        payload.study_date,
    )
    .await?;

    Ok(HttpResponse::Ok().json(study))
}

/// DELETE /studies/{id}
pub async fn delete_study(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    STAFF.authorize(user.0.role)?;

    if !study_repo::delete(&state.db, path.into_inner()).await? {
        return Err(AppError::NotFound("study not found".to_string()));
    }

    Ok(HttpResponse::NoContent().finish())
}
