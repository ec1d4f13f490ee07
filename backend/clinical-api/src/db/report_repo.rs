use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{is_unique_violation, AppError, Result};
use crate::models::{Report, ReportStatus};

pub async fn list(pool: &PgPool) -> Result<Vec<Report>> {
    let reports = sqlx::query_as::<_, Report>("SELECT * FROM reports ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;

    Ok(reports)
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Report>> {
    let report = sqlx::query_as::<_, Report>("SELECT * FROM reports WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(report)
}

pub async fn get_by_study(pool: &PgPool, study_id: Uuid) -> Result<Option<Report>> {
    let report = sqlx::query_as::<_, Report>("SELECT * FROM reports WHERE study_id = $1")
        .bind(study_id)
        .fetch_optional(pool)
        .await?;

    Ok(report)
}

/// One report per study; the unique study_id constraint backs the
/// handler-level pre-check against the create/create race.
pub async fn insert(
    pool: &PgPool,
    study_id: Uuid,
    status: ReportStatus,
    content: &str,
    notes: Option<&str>,
) -> Result<Report> {
    sqlx::query_as::<_, Report>(
        r#"
        INSERT INTO reports (id, study_id, status, content, notes, created_at, updated_at)
        VALUES (gen_random_uuid(), $1, $2, $3, $4, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(study_id)
    .bind(status.as_str())
    .bind(content)
    .bind(notes)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("this study already has a report".to_string())
        } else {
            e.into()
        }
    })
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    status: Option<ReportStatus>,
    content: Option<&str>,
    notes: Option<&str>,
) -> Result<Report> {
    let report = sqlx::query_as::<_, Report>(
        r#"
        UPDATE reports
        SET status = COALESCE($2, status),
            content = COALESCE($3, content),
            notes = COALESCE($4, notes),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(status.map(|s| s.as_str()))
    .bind(content)
    .bind(notes)
    .fetch_one(pool)
    .await?;

    Ok(report)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM reports WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
