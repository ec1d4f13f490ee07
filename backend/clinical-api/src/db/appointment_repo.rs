use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{is_unique_violation, AppError, Result};
use crate::models::{Appointment, AppointmentCreate};

/// Whether the doctor already has a booking at this exact slot.
pub async fn slot_taken(
    pool: &PgPool,
    doctor_name: &str,
    date: NaiveDate,
    time: &str,
) -> Result<bool> {
    let row: Option<(Uuid,)> = sqlx::query_as(
        "SELECT id FROM appointments WHERE doctor_name = $1 AND date = $2 AND time = $3",
    )
    .bind(doctor_name)
    .bind(date)
    .bind(time)
    .fetch_optional(pool)
    .await?;

    Ok(row.is_some())
}

pub async fn insert(
    pool: &PgPool,
    payload: &AppointmentCreate,
    reservation_code: &str,
) -> Result<Appointment> {
    sqlx::query_as::<_, Appointment>(
        r#"
        INSERT INTO appointments
            (id, patient_name, patient_document, patient_email, patient_phone,
             specialty, doctor_name, modality, reason, date, time, reservation_code, created_at)
        VALUES (gen_random_uuid(), $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW())
        RETURNING *
        "#,
    )
    .bind(&payload.patient_name)
    .bind(&payload.patient_document)
    .bind(&payload.patient_email)
    .bind(&payload.patient_phone)
    .bind(&payload.specialty)
    .bind(&payload.doctor_name)
    .bind(&payload.modality)
    .bind(&payload.reason)
    .bind(payload.date)
    .bind(&payload.time)
    .bind(reservation_code)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        // The (doctor, date, time) unique index closes the check-then-insert race.
        if is_unique_violation(&e) {
            AppError::Conflict("slot already booked for this doctor".to_string())
        } else {
            e.into()
        }
    })
}

pub async fn list(pool: &PgPool) -> Result<Vec<Appointment>> {
    let appointments = sqlx::query_as::<_, Appointment>(
        "SELECT * FROM appointments ORDER BY date DESC, time DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Appointment>> {
    let appointment = sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(appointment)
}
