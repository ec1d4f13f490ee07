use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::db::patient_repo;
use crate::error::{AppError, Result};
use crate::handlers::STAFF;
use crate::middleware::CurrentUser;
use crate::models::{PatientCreate, PatientUpdate};
use crate::validators;
use crate::AppState;

/// Normalize and validate the optional document/phone/birth-date triple.
/// Returns the normalized document to store.
fn check_demographics(
    document: Option<&str>,
    phone: Option<&str>,
    birth_date: Option<&chrono::NaiveDate>,
) -> Result<Option<String>> {
    let document = match document {
        Some(raw) => {
            if !validators::validate_document(raw) {
                return Err(AppError::Validation(
                    "invalid document; use the 12345678-9 or 12345678-K format".to_string(),
                ));
            }
            Some(validators::normalize_document(raw))
        }
        None => None,
    };

    if let Some(phone) = phone {
        if !validators::validate_phone(phone) {
            return Err(AppError::Validation("invalid phone number".to_string()));
        }
    }
    if let Some(date) = birth_date {
        if !validators::validate_birth_date(date) {
            return Err(AppError::Validation(
                "birth date cannot be in the future".to_string(),
            ));
        }
    }

    Ok(document)
}

/// GET /patients
pub async fn list_patients(state: web::Data<AppState>, user: CurrentUser) -> Result<HttpResponse> {
    STAFF.authorize(user.0.role)?;

    let patients = patient_repo::list(&state.db).await?;
    Ok(HttpResponse::Ok().json(patients))
}

/// POST /patients
pub async fn create_patient(
    state: web::Data<AppState>,
    user: CurrentUser,
    payload: web::Json<PatientCreate>,
) -> Result<HttpResponse> {
    STAFF.authorize(user.0.role)?;
    payload.validate()?;

    let document = check_demographics(
        payload.document.as_deref(),
        payload.phone.as_deref(),
        payload.birth_date.as_ref(),
    )?;

    let patient = patient_repo::insert(
        &state.db,
        payload.first_names.trim(),
        payload.last_names.trim(),
        document.as_deref(),
        payload.phone.as_deref(),
        payload.email.as_deref().map(str::trim),
        payload.birth_date,
    )
    .await?;

    Ok(HttpResponse::Created().json(patient))
}

/// GET /patients/{id}
pub async fn get_patient(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    STAFF.authorize(user.0.role)?;

    let patient = patient_repo::get(&state.db, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("patient not found".to_string()))?;

    Ok(HttpResponse::Ok().json(patient))
}

/// PATCH /patients/{id}
pub async fn update_patient(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
    payload: web::Json<PatientUpdate>,
) -> Result<HttpResponse> {
    STAFF.authorize(user.0.role)?;
    payload.validate()?;

    let id = path.into_inner();
    if patient_repo::get(&state.db, id).await?.is_none() {
        return Err(AppError::NotFound("patient not found".to_string()));
    }

    let document = check_demographics(
        payload.document.as_deref(),
        payload.phone.as_deref(),
        payload.birth_date.as_ref(),
    )?;

    let patient = patient_repo::update(
        &state.db,
        id,
        payload.first_names.as_deref().map(str::trim),
        payload.last_names.as_deref().map(str::trim),
        document.as_deref(),
        payload.phone.as_deref(),
        payload.email.as_deref().map(str::trim),
        payload.birth_date,
    )
    .await?;

    Ok(HttpResponse::Ok().json(patient))
}

/// DELETE /patients/{id}
pub async fn delete_patient(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    STAFF.authorize(user.0.role)?;

    if !patient_repo::delete(&state.db, path.into_inner()).await? {
        return Err(AppError::NotFound("patient not found".to_string()));
    }

    Ok(HttpResponse::NoContent().finish())
}
