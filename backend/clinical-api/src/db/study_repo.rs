use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::Study;

/// List studies, newest first, optionally restricted to one patient.
pub async fn list(pool: &PgPool, patient_id: Option<Uuid>) -> Result<Vec<Study>> {
    let studies = sqlx::query_as::<_, Study>(
        r#"
        SELECT * FROM studies
        WHERE ($1::uuid IS NULL OR patient_id = $1)
        ORDER BY study_date DESC, created_at DESC
        "#,
    )
    .bind(patient_id)
    .fetch_all(pool)
    .await?;

    Ok(studies)
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Study>> {
    let study = sqlx::query_as::<_, Study>("SELECT * FROM studies WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(study)
}

pub async fn insert(
    pool: &PgPool,
    patient_id: Uuid,
    doctor_id: Option<Uuid>,
    title: &str,
    description: Option<&str>,
    study_date: NaiveDate,
) -> Result<Study> {
    let study = sqlx::query_as::<_, Study>(
        r#"
        INSERT INTO studies (id, patient_id, doctor_id, title, description, study_date, created_at)
        VALUES (gen_random_uuid(), $1, $2, $3, $4, $5, NOW())
        RETURNING *
        "#,
    )
    .bind(patient_id)
    .bind(doctor_id)
    .bind(title)
    .bind(description)
    .bind(study_date)
    .fetch_one(pool)
    .await?;

    Ok(study)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    doctor_id: Option<Uuid>,
    title: Option<&str>,
    description: Option<&str>,
    study_date: Option<NaiveDate>,
) -> Result<Study> {
    let study = sqlx::query_as::<_, Study>(
        r#"
        UPDATE studies
        SET doctor_id = COALESCE($2, doctor_id),
            title = COALESCE($3, title),
            description = COALESCE($4, description),
            study_date = COALESCE($5, study_date)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(doctor_id)
    .bind(title)
    .bind(description)
    .bind(study_date)
    .fetch_one(pool)
    .await?;

    Ok(study)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM studies WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
