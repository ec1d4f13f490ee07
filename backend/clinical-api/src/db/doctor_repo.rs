use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{is_unique_violation, AppError, Result};
use crate::models::{Doctor, DoctorSchedule, ScheduleItem};

pub async fn list(pool: &PgPool) -> Result<Vec<Doctor>> {
    let doctors = sqlx::query_as::<_, Doctor>("SELECT * FROM doctors ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;

    Ok(doctors)
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Doctor>> {
    let doctor = sqlx::query_as::<_, Doctor>("SELECT * FROM doctors WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(doctor)
}

pub async fn insert(
    pool: &PgPool,
    name: &str,
    email: Option<&str>,
    specialty: Option<&str>,
    license_number: Option<&str>,
    user_id: Option<Uuid>,
) -> Result<Doctor> {
    sqlx::query_as::<_, Doctor>(
        r#"
        INSERT INTO doctors (id, name, email, specialty, license_number, user_id, created_at)
        VALUES (gen_random_uuid(), $1, $2, $3, $4, $5, NOW())
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(specialty)
    .bind(license_number)
    .bind(user_id)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("email and license number already registered".to_string())
        } else {
            e.into()
        }
    })
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    name: Option<&str>,
    email: Option<&str>,
    specialty: Option<&str>,
    license_number: Option<&str>,
) -> Result<Doctor> {
    sqlx::query_as::<_, Doctor>(
        r#"
        UPDATE doctors
        SET name = COALESCE($2, name),
            email = COALESCE($3, email),
            specialty = COALESCE($4, specialty),
            license_number = COALESCE($5, license_number)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(specialty)
    .bind(license_number)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("email and license number already registered".to_string())
        } else {
            e.into()
        }
    })
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM doctors WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn schedules_for(pool: &PgPool, doctor_id: Uuid) -> Result<Vec<DoctorSchedule>> {
    let schedules = sqlx::query_as::<_, DoctorSchedule>(
        "SELECT * FROM doctor_schedules WHERE doctor_id = $1 ORDER BY weekday, start_time",
    )
    .bind(doctor_id)
    .fetch_all(pool)
    .await?;

    Ok(schedules)
}

/// Replace the doctor's whole weekly schedule in one transaction.
pub async fn replace_schedules(
    pool: &PgPool,
    doctor_id: Uuid,
    schedules: &[ScheduleItem],
) -> Result<Vec<DoctorSchedule>> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM doctor_schedules WHERE doctor_id = $1")
        .bind(doctor_id)
        .execute(&mut *tx)
        .await?;

    for item in schedules {
        sqlx::query(
            r#"
            INSERT INTO doctor_schedules (id, doctor_id, weekday, start_time, end_time)
            VALUES (gen_random_uuid(), $1, $2, $3, $4)
            "#,
        )
        .bind(doctor_id)
        .bind(&item.weekday)
        .bind(&item.start_time)
        .bind(&item.end_time)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    schedules_for(pool, doctor_id).await
}
