use actix_web::{web, HttpResponse};
use rand::distributions::Alphanumeric;
use rand::Rng;
use uuid::Uuid;
use validator::Validate;

use crate::db::appointment_repo;
use crate::error::{AppError, Result};
use crate::handlers::STAFF;
use crate::middleware::CurrentUser;
use crate::models::AppointmentCreate;
use crate::validators;
use crate::AppState;

fn reservation_code() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect::<String>()
        .to_ascii_uppercase();
    format!("BK-{suffix}")
}

/// POST /appointments — public, patient-facing booking.
///
/// The confirmation email is sent from a detached task: transport failure
/// is logged and never affects the booking outcome.
pub async fn create_appointment(
    state: web::Data<AppState>,
    payload: web::Json<AppointmentCreate>,
) -> Result<HttpResponse> {
    payload.validate()?;

    if !matches!(payload.modality.as_str(), "in_person" | "online") {
        return Err(AppError::Validation(
            "modality must be in_person or online".to_string(),
        ));
    }
    if !validators::validate_time(&payload.time) {
        return Err(AppError::Validation("time must be HH:MM".to_string()));
    }
    if !validators::validate_phone(&payload.patient_phone) {
        return Err(AppError::Validation("invalid phone number".to_string()));
    }
    if let Some(document) = payload.patient_document.as_deref() {
        if !validators::validate_document(document) {
            return Err(AppError::Validation("invalid document".to_string()));
        }
    }

    if appointment_repo::slot_taken(&state.db, &payload.doctor_name, payload.date, &payload.time)
        .await?
    {
        return Err(AppError::Conflict(
            "slot already booked for this doctor".to_string(),
        ));
    }

    let appointment =
        appointment_repo::insert(&state.db, &payload, &reservation_code()).await?;

    if state.mailer.is_configured() {
        let mailer = state.mailer.clone();
        let confirmation = appointment.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(err) = mailer.send_appointment_confirmation(&confirmation) {
                tracing::warn!(error = %err, "confirmation mail delivery failed");
            }
        });
    }

    tracing::info!(code = %appointment.reservation_code, "appointment booked");
    Ok(HttpResponse::Created().json(appointment))
}

/// GET /appointments
pub async fn list_appointments(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<HttpResponse> {
    STAFF.authorize(user.0.role)?;

    let appointments = appointment_repo::list(&state.db).await?;
    Ok(HttpResponse::Ok().json(appointments))
}

/// GET /appointments/{id}
pub async fn get_appointment(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    STAFF.authorize(user.0.role)?;

    let appointment = appointment_repo::get(&state.db, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("appointment not found".to_string()))?;

    Ok(HttpResponse::Ok().json(appointment))
}
