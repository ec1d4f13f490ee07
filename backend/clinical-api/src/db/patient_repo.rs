use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{is_unique_violation, AppError, Result};
use crate::models::Patient;

pub async fn list(pool: &PgPool) -> Result<Vec<Patient>> {
    let patients = sqlx::query_as::<_, Patient>("SELECT * FROM patients ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;

    Ok(patients)
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Patient>> {
    let patient = sqlx::query_as::<_, Patient>("SELECT * FROM patients WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(patient)
}

#[allow(clippy::too_many_arguments)]
pub async fn insert(
    pool: &PgPool,
    first_names: &str,
    last_names: &str,
    document: Option<&str>,
    phone: Option<&str>,
    email: Option<&str>,
    birth_date: Option<NaiveDate>,
) -> Result<Patient> {
    sqlx::query_as::<_, Patient>(
        r#"
        INSERT INTO patients (id, first_names, last_names, document, phone, email, birth_date, created_at)
        VALUES (gen_random_uuid(), $1, $2, $3, $4, $5, $6, NOW())
        RETURNING *
        "#,
    )
    .bind(first_names)
    .bind(last_names)
    .bind(document)
    .bind(phone)
    .bind(email)
    .bind(birth_date)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("document already registered".to_string())
        } else {
            e.into()
        }
    })
}

#[allow(clippy::too_many_arguments)]
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    first_names: Option<&str>,
    last_names: Option<&str>,
    document: Option<&str>,
    phone: Option<&str>,
    email: Option<&str>,
    birth_date: Option<NaiveDate>,
) -> Result<Patient> {
    sqlx::query_as::<_, Patient>(
        r#"
        UPDATE patients
        SET first_names = COALESCE($2, first_names),
            last_names = COALESCE($3, last_names),
            document = COALESCE($4, document),
            phone = COALESCE($5, phone),
            email = COALESCE($6, email),
            birth_date = COALESCE($7, birth_date)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(first_names)
    .bind(last_names)
    .bind(document)
    .bind(phone)
    .bind(email)
    .bind(birth_date)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("document already registered".to_string())
        } else {
            e.into()
        }
    })
}

/// Returns whether a row was actually deleted.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM patients WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
