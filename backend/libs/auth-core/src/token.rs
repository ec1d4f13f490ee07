//! Signed, time-bounded tokens.
//!
//! Two token classes share one signing secret and one fixed algorithm but
//! are never interchangeable:
//!
//! - **access tokens** carry `{sub, role, uid}` and no scope claim;
//! - **set-password tokens** carry `{sub, scope: "set_password"}`.
//!
//! [`TokenService::parse_access`] rejects anything bearing a scope claim,
//! and [`TokenService::parse_set_password`] rejects anything without the
//! exact set-password scope, so a token of one class presented where the
//! other is required fails even though its signature is valid.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::role::Role;

/// Scope claim value restricting a token to the set-password flow.
pub const SET_PASSWORD_SCOPE: &str = "set_password";

/// Signing algorithm for every token this service issues or accepts.
const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Error)]
pub enum TokenError {
    /// Bad signature, wrong algorithm, expired, malformed claims, or an
    /// unexpected scope. Callers are not told which.
    #[error("invalid token")]
    InvalidToken,

    #[error("token issuance failed: {0}")]
    Issuance(#[source] jsonwebtoken::errors::Error),
}

/// Claim set of an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: the account email at issuance time.
    pub sub: String,
    pub role: Role,
    /// Account id; resolution requires this to match `sub` on the same row.
    pub uid: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// Wire shape for decoding: picks up a scope claim if one was smuggled in.
#[derive(Deserialize)]
struct WireAccessClaims {
    #[serde(flatten)]
    claims: AccessClaims,
    scope: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SetPasswordClaims {
    sub: String,
    scope: String,
    iat: i64,
    exp: i64,
}

/// Issues and parses both token classes.
///
/// Holds the process-wide signing secret, loaded once at startup and
/// immutable thereafter. Issuance and parsing are pure functions of the
/// inputs and the clock.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue an access token expiring `ttl_minutes` from now.
    pub fn issue_access(
        &self,
        uid: Uuid,
        email: &str,
        role: Role,
        ttl_minutes: i64,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: email.to_string(),
            role,
            uid,
            iat: now.timestamp(),
            exp: (now + Duration::minutes(ttl_minutes)).timestamp(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding_key)
            .map_err(TokenError::Issuance)
    }

    /// Validate an access token and return its claims.
    ///
    /// Fails on a bad signature, an algorithm mismatch, an expiry at or
    /// before now, missing claims, or a present scope claim (a
    /// set-password token is never a valid access token).
    pub fn parse_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let data = decode::<WireAccessClaims>(token, &self.decoding_key, &validation())
            .map_err(|_| TokenError::InvalidToken)?;

        if data.claims.scope.is_some() {
            return Err(TokenError::InvalidToken);
        }

        let claims = data.claims.claims;
        // Zero-ttl tokens must already be dead; `exp == now` is expired.
        if claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::InvalidToken);
        }

        Ok(claims)
    }

    /// Issue a single-purpose set-password token for `email`.
    pub fn issue_set_password(&self, email: &str, ttl_minutes: i64) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = SetPasswordClaims {
            sub: email.to_string(),
            scope: SET_PASSWORD_SCOPE.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(ttl_minutes)).timestamp(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding_key)
            .map_err(TokenError::Issuance)
    }

    /// Validate a set-password token and return the subject email.
    ///
    /// Returns `None` for an expired, tampered, wrong-scope, or garbage
    /// token — uniformly, so the unauthenticated reset flow never leaks
    /// why a link was rejected.
    pub fn parse_set_password(&self, token: &str) -> Option<String> {
        let data = decode::<SetPasswordClaims>(token, &self.decoding_key, &validation()).ok()?;

        if data.claims.scope != SET_PASSWORD_SCOPE {
            return None;
        }
        if data.claims.exp <= Utc::now().timestamp() {
            return None;
        }

        Some(data.claims.sub)
    }
}

fn validation() -> Validation {
    let mut validation = Validation::new(JWT_ALGORITHM);
    validation.leeway = 0;
    validation
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret")
    }

    #[test]
    fn test_access_round_trip() {
        let svc = service();
        let uid = Uuid::new_v4();
        let token = svc
            .issue_access(uid, "a@x.com", Role::Patient, 120)
            .unwrap();

        let claims = svc.parse_access(&token).unwrap();
        assert_eq!(claims.sub, "a@x.com");
        assert_eq!(claims.uid, uid);
        assert_eq!(claims.role, Role::Patient);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_zero_ttl_access_token_is_already_expired() {
        let svc = service();
        let token = svc
            .issue_access(Uuid::new_v4(), "a@x.com", Role::Patient, 0)
            .unwrap();
        assert!(matches!(
            svc.parse_access(&token),
            Err(TokenError::InvalidToken)
        ));
    }

    #[test]
    fn test_past_expiry_access_token_rejected() {
        let svc = service();
        let token = svc
            .issue_access(Uuid::new_v4(), "a@x.com", Role::Clinician, -5)
            .unwrap();
        assert!(svc.parse_access(&token).is_err());
    }

    #[test]
    fn test_tampered_access_token_rejected() {
        let svc = service();
        let token = svc
            .issue_access(Uuid::new_v4(), "a@x.com", Role::Admin, 120)
            .unwrap();
        let tampered = format!("{}x", token);
        assert!(svc.parse_access(&tampered).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service()
            .issue_access(Uuid::new_v4(), "a@x.com", Role::Admin, 120)
            .unwrap();
        let other = TokenService::new("another-secret");
        assert!(other.parse_access(&token).is_err());
    }

    #[test]
    fn test_set_password_token_is_not_an_access_token() {
        let svc = service();
        let token = svc.issue_set_password("a@x.com", 60).unwrap();
        assert!(svc.parse_access(&token).is_err());
    }

    #[test]
    fn test_access_token_is_not_a_set_password_token() {
        let svc = service();
        let token = svc
            .issue_access(Uuid::new_v4(), "a@x.com", Role::Patient, 120)
            .unwrap();
        assert_eq!(svc.parse_set_password(&token), None);
    }

    #[test]
    fn test_set_password_round_trip() {
        let svc = service();
        let token = svc.issue_set_password("reset@x.com", 60).unwrap();
        assert_eq!(svc.parse_set_password(&token).as_deref(), Some("reset@x.com"));
    }

    // The four rejection causes are indistinguishable: all come back None.
    #[test]
    fn test_set_password_failures_are_uniform() {
        let svc = service();

        let expired = svc.issue_set_password("a@x.com", 0).unwrap();
        assert_eq!(svc.parse_set_password(&expired), None);

        let tampered = format!("{}x", svc.issue_set_password("a@x.com", 60).unwrap());
        assert_eq!(svc.parse_set_password(&tampered), None);

        let wrong_scope = svc
            .issue_access(Uuid::new_v4(), "a@x.com", Role::Patient, 60)
            .unwrap();
        assert_eq!(svc.parse_set_password(&wrong_scope), None);

        assert_eq!(svc.parse_set_password("garbage"), None);
        assert_eq!(svc.parse_set_password(""), None);
    }
}
