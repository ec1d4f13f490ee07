/// Authentication handlers
use actix_web::{web, HttpResponse};
use auth_core::{hash_password, verify_password, Role};
use serde::Deserialize;
use validator::Validate;

use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{
    ChangePasswordRequest, LoginRequest, RegisterRequest, RequestSetPasswordRequest,
    SetPasswordRequest, TokenResponse, UpdateMeRequest, UserOut, ValidateTokenResponse,
};
use crate::validators::normalize_email;
use crate::AppState;

/// POST /auth/register
pub async fn register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let role: Role = payload
        .role
        .parse()
        .map_err(|_| AppError::Validation("unknown role; use admin|clinician|patient".to_string()))?;
    let email = normalize_email(&payload.email);

    if user_repo::find_by_email(&state.db, &email).await?.is_some() {
        return Err(AppError::DuplicateAccount);
    }

    let digest = hash_password(&payload.password, state.config.pbkdf2_rounds)?;
    let user = user_repo::create_user(
        &state.db,
        &email,
        payload.full_name.as_deref().map(str::trim),
        &digest,
        role,
    )
    .await?;

    tracing::info!(email = %user.email, role = %user.role, "account registered");
    Ok(HttpResponse::Created().json(UserOut::from(user)))
}

/// POST /auth/login
pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;
    let email = normalize_email(&payload.email);

    // Unknown email and wrong password take the same exit.
    let user = user_repo::find_by_email(&state.db, &email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&payload.password, &user.password_hash) {
        return Err(AppError::InvalidCredentials);
    }

    let token = state.tokens.issue_access(
        user.id,
        &user.email,
        user.role,
        state.config.access_token_expire_minutes,
    )?;

    tracing::info!(email = %user.email, "login");
    Ok(HttpResponse::Ok().json(TokenResponse::bearer(token)))
}

/// GET /auth/me
pub async fn me(user: CurrentUser) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(UserOut::from(user.0)))
}

/// PATCH /auth/me
pub async fn update_me(
    state: web::Data<AppState>,
    user: CurrentUser,
    payload: web::Json<UpdateMeRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;
    let current = user.0;

    let new_email = match payload.email.as_deref() {
        Some(raw) => {
            let email = normalize_email(raw);
            if email != current.email
                && user_repo::find_by_email(&state.db, &email).await?.is_some()
            {
                return Err(AppError::Conflict("email already in use".to_string()));
            }
            Some(email)
        }
        None => None,
    };

    let updated = user_repo::update_profile(
        &state.db,
        current.id,
        payload.full_name.as_deref().map(str::trim),
        new_email.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(UserOut::from(updated)))
}

/// POST /auth/change-password
pub async fn change_password(
    state: web::Data<AppState>,
    user: CurrentUser,
    payload: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;
    let current = user.0;

    if !verify_password(&payload.current_password, &current.password_hash) {
        return Err(AppError::BadRequest(
            "current password is not valid".to_string(),
        ));
    }
    if payload.current_password == payload.new_password {
        return Err(AppError::BadRequest(
            "new password must differ from the current one".to_string(),
        ));
    }

    let digest = hash_password(&payload.new_password, state.config.pbkdf2_rounds)?;
    user_repo::update_password(&state.db, current.id, &digest).await?;

    tracing::info!(email = %current.email, "password changed");
    Ok(HttpResponse::NoContent().finish())
}

/// POST /auth/request-set-password
///
/// Always answers 204: neither account existence nor mail transport state
/// is revealed. When the account exists and is active, a short-lived link
/// goes out by email; delivery runs detached and failures are only logged.
pub async fn request_set_password(
    state: web::Data<AppState>,
    payload: web::Json<RequestSetPasswordRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;
    let email = normalize_email(&payload.email);

    if let Some(user) = user_repo::find_by_email(&state.db, &email).await? {
        if user.is_active {
            let ttl = state.config.setpwd_token_expire_minutes;
            match state.tokens.issue_set_password(&user.email, ttl) {
                Ok(token) => {
                    let link = format!(
                        "{}/set-password?token={}",
                        state.config.frontend_base_url, token
                    );
                    let mailer = state.mailer.clone();
                    let to = user.email.clone();
                    tokio::task::spawn_blocking(move || {
                        if let Err(err) = mailer.send_set_password_link(&to, &link, ttl) {
                            tracing::warn!(error = %err, "set-password mail delivery failed");
                        }
                    });
                }
                Err(err) => {
                    tracing::warn!(error = %err, "set-password token issuance failed");
                }
            }
        }
    }

    Ok(HttpResponse::NoContent().finish())
}

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub token: String,
}

/// GET /auth/validate-set-password?token=...
pub async fn validate_set_password(
    state: web::Data<AppState>,
    query: web::Query<TokenQuery>,
) -> Result<HttpResponse> {
    let response = match state.tokens.parse_set_password(&query.token) {
        None => ValidateTokenResponse {
            email: None,
            valid: false,
        },
        Some(email) => {
            let user = user_repo::find_by_email(&state.db, &email).await?;
            let valid = user.map(|u| u.is_active).unwrap_or(false);
            ValidateTokenResponse {
                email: Some(email),
                valid,
            }
        }
    };

    Ok(HttpResponse::Ok().json(response))
}

/// POST /auth/set-password
pub async fn set_password(
    state: web::Data<AppState>,
    payload: web::Json<SetPasswordRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let email = state
        .tokens
        .parse_set_password(&payload.token)
        .ok_or(AppError::InvalidOrExpiredToken)?;

    let user = user_repo::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| AppError::NotFound("account not found or inactive".to_string()))?;
    if !user.is_active {
        return Err(AppError::NotFound(
            "account not found or inactive".to_string(),
        ));
    }

    let digest = hash_password(&payload.new_password, state.config.pbkdf2_rounds)?;
    user_repo::update_password(&state.db, user.id, &digest).await?;

    tracing::info!(email = %user.email, "password set via reset link");
    Ok(HttpResponse::NoContent().finish())
}
