//! Shared authentication primitives for the clinical backend.
//!
//! Three concerns live here, deliberately free of any web or database
//! dependency so every service binary can reuse them:
//!
//! - [`password`]: salted PBKDF2-SHA256 digests (hash / verify)
//! - [`token`]: signed, time-bounded access and set-password tokens
//! - [`role`]: the closed role set and the role-membership gate

pub mod password;
pub mod role;
pub mod token;

pub use password::{hash_password, verify_password, HashError};
pub use role::{require, Forbidden, Role, RoleGate, UnknownRole};
pub use token::{AccessClaims, TokenError, TokenService, SET_PASSWORD_SCOPE};
