use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::ImageRecord;

pub async fn insert(
    pool: &PgPool,
    study_id: Uuid,
    file_name: &str,
    url: Option<&str>,
    mime_type: Option<&str>,
    size_bytes: i64,
) -> Result<ImageRecord> {
    let image = sqlx::query_as::<_, ImageRecord>(
        r#"
        INSERT INTO images (id, study_id, file_name, url, mime_type, size_bytes, created_at)
        VALUES (gen_random_uuid(), $1, $2, $3, $4, $5, NOW())
        RETURNING *
        "#,
    )
    .bind(study_id)
    .bind(file_name)
    .bind(url)
    .bind(mime_type)
    .bind(size_bytes)
    .fetch_one(pool)
    .await?;

    Ok(image)
}

pub async fn list(
    pool: &PgPool,
    study_id: Option<Uuid>,
    limit: i64,
    offset: i64,
) -> Result<Vec<ImageRecord>> {
    let images = sqlx::query_as::<_, ImageRecord>(
        r#"
        SELECT * FROM images
        WHERE ($1::uuid IS NULL OR study_id = $1)
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(study_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(images)
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<ImageRecord>> {
    let image = sqlx::query_as::<_, ImageRecord>("SELECT * FROM images WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(image)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM images WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
