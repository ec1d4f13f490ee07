use actix_web::{web, HttpResponse};
use auth_core::{hash_password, Role};
use uuid::Uuid;
use validator::Validate;

use crate::db::{doctor_repo, user_repo};
use crate::error::{AppError, Result};
use crate::handlers::ADMIN_ONLY;
use crate::middleware::CurrentUser;
use crate::models::{DoctorCreate, DoctorOut, DoctorUpdate, ScheduleItem};
use crate::validators::{self, normalize_email};
use crate::AppState;

fn check_schedules(schedules: &[ScheduleItem]) -> Result<()> {
    for item in schedules {
        if !validators::validate_time(&item.start_time) || !validators::validate_time(&item.end_time)
        {
            return Err(AppError::Validation(
                "schedule times must be HH:MM".to_string(),
            ));
        }
        // Zero-padded HH:MM compares correctly as a string.
        if item.start_time >= item.end_time {
            return Err(AppError::Validation(
                "schedule start must be before end".to_string(),
            ));
        }
    }
    Ok(())
}

/// GET /doctors — any authenticated account can browse the directory.
pub async fn list_doctors(state: web::Data<AppState>, _user: CurrentUser) -> Result<HttpResponse> {
    let doctors = doctor_repo::list(&state.db).await?;

    let mut out = Vec::with_capacity(doctors.len());
    for doctor in doctors {
        let schedules = doctor_repo::schedules_for(&state.db, doctor.id).await?;
        out.push(DoctorOut { doctor, schedules });
    }

    Ok(HttpResponse::Ok().json(out))
}

/// POST /doctors
///
/// When email and password are both present, a clinician login account is
/// provisioned (or an existing clinician account reused) and linked to the
/// doctor row. An existing account with a different role is a conflict.
pub async fn create_doctor(
    state: web::Data<AppState>,
    user: CurrentUser,
    payload: web::Json<DoctorCreate>,
) -> Result<HttpResponse> {
    ADMIN_ONLY.authorize(user.0.role)?;
    payload.validate()?;
    check_schedules(&payload.schedules)?;

    let mut user_id = None;
    if let (Some(email), Some(password)) = (payload.email.as_deref(), payload.password.as_deref()) {
        let email = normalize_email(email);
        match user_repo::find_by_email(&state.db, &email).await? {
            Some(existing) if existing.role != Role::Clinician => {
                return Err(AppError::Conflict(
                    "email already registered with a different role".to_string(),
                ));
            }
            Some(existing) => user_id = Some(existing.id),
            None => {
                let digest = hash_password(password, state.config.pbkdf2_rounds)?;
                let account = user_repo::create_user(
                    &state.db,
                    &email,
                    Some(payload.name.trim()),
                    &digest,
                    Role::Clinician,
                )
                .await?;
                user_id = Some(account.id);
            }
        }
    }

    let doctor = doctor_repo::insert(
        &state.db,
        payload.name.trim(),
        payload.email.as_deref().map(normalize_email).as_deref(),
        payload.specialty.as_deref(),
        payload.license_number.as_deref(),
        user_id,
    )
    .await?;

    let schedules = doctor_repo::replace_schedules(&state.db, doctor.id, &payload.schedules).await?;

    Ok(HttpResponse::Created().json(DoctorOut { doctor, schedules }))
}

/// GET /doctors/{id}
pub async fn get_doctor(
    state: web::Data<AppState>,
    _user: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let doctor = doctor_repo::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("doctor not found".to_string()))?;
    let schedules = doctor_repo::schedules_for(&state.db, id).await?;

    Ok(HttpResponse::Ok().json(DoctorOut { doctor, schedules }))
}

/// PATCH /doctors/{id}
pub async fn update_doctor(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
    payload: web::Json<DoctorUpdate>,
) -> Result<HttpResponse> {
    ADMIN_ONLY.authorize(user.0.role)?;
    payload.validate()?;
    if let Some(schedules) = &payload.schedules {
        check_schedules(schedules)?;
    }

    let id = path.into_inner();
    if doctor_repo::get(&state.db, id).await?.is_none() {
        return Err(AppError::NotFound("doctor not found".to_string()));
    }

    let doctor = doctor_repo::update(
        &state.db,
        id,
        payload.name.as_deref().map(str::trim),
        payload.email.as_deref().map(normalize_email).as_deref(),
        payload.specialty.as_deref(),
        payload.license_number.as_deref(),
    )
    .await?;

    let schedules = match &payload.schedules {
        Some(items) => doctor_repo::replace_schedules(&state.db, id, items).await?,
        None => doctor_repo::schedules_for(&state.db, id).await?,
    };

    Ok(HttpResponse::Ok().json(DoctorOut { doctor, schedules }))
}

/// DELETE /doctors/{id}
pub async fn delete_doctor(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    ADMIN_ONLY.authorize(user.0.role)?;

    if !doctor_repo::delete(&state.db, path.into_inner()).await? {
        return Err(AppError::NotFound("doctor not found".to_string()));
    }

    Ok(HttpResponse::NoContent().finish())
}
