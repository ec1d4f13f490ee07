use auth_core::Role;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{is_unique_violation, AppError, Result};
use crate::models::User;

/// Create a new account. The unique email constraint is the backstop for
/// the handler-level duplicate pre-check; both surface the same conflict.
pub async fn create_user(
    pool: &PgPool,
    email: &str,
    full_name: Option<&str>,
    password_hash: &str,
    role: Role,
) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, full_name, password_hash, role, is_active, created_at)
        VALUES (gen_random_uuid(), $1, $2, $3, $4, TRUE, NOW())
        RETURNING *
        "#,
    )
    .bind(email)
    .bind(full_name)
    .bind(password_hash)
    .bind(role.as_str())
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::DuplicateAccount
        } else {
            e.into()
        }
    })
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

/// Lookup for token resolution: both id and email must match the same row,
/// so a token whose email went stale (or was forged independently of the
/// id) resolves to nothing.
pub async fn find_by_id_and_email(pool: &PgPool, id: Uuid, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND email = $2")
        .bind(id)
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn update_password(pool: &PgPool, user_id: Uuid, password_hash: &str) -> Result<()> {
    sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
        .bind(password_hash)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    full_name: Option<&str>,
    email: Option<&str>,
) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET full_name = COALESCE($2, full_name),
            email = COALESCE($3, email)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(full_name)
    .bind(email)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("email already in use".to_string())
        } else {
            e.into()
        }
    })
}
