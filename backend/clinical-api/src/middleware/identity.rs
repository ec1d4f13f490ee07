//! Identity resolution: bearer token in, persisted account out.

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::db::user_repo;
use crate::error::AppError;
use crate::models::User;
use crate::AppState;

/// The authenticated account behind the request.
///
/// Extraction parses the `Authorization: Bearer` access token, then loads
/// the account matching **both** the token's account id and its subject
/// email — a token whose email claim went stale (or was forged
/// independently of the id) resolves to nothing. Inactive accounts never
/// resolve, regardless of token validity. Resolution is read-only.
///
/// Every failure mode collapses into `Unauthenticated`; role checks come
/// after this extractor and fail with `Forbidden` instead.
pub struct CurrentUser(pub User);

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::Internal("application state missing".to_string()))?;

            let header_value = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .ok_or(AppError::Unauthenticated)?;

            let token = header_value
                .strip_prefix("Bearer ")
                .ok_or(AppError::Unauthenticated)?;

            let claims = state
                .tokens
                .parse_access(token)
                .map_err(|_| AppError::Unauthenticated)?;

            let user = user_repo::find_by_id_and_email(&state.db, claims.uid, &claims.sub)
                .await?
                .ok_or(AppError::Unauthenticated)?;

            if !user.is_active {
                return Err(AppError::Unauthenticated);
            }

            Ok(CurrentUser(user))
        })
    }
}
