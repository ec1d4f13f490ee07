//! The closed role set and the role-membership gate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the fixed permission classes attached to an account.
///
/// Wire representation is the lowercase string ("admin", "clinician",
/// "patient"); parsing is case-insensitive but the set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Clinician,
    Patient,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Clinician => "clinician",
            Role::Patient => "patient",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown role; use admin|clinician|patient")]
pub struct UnknownRole;

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "clinician" => Ok(Role::Clinician),
            "patient" => Ok(Role::Patient),
            _ => Err(UnknownRole),
        }
    }
}

/// The account is authenticated but lacks a required role.
#[derive(Debug, Error)]
#[error("insufficient permissions")]
pub struct Forbidden;

/// A reusable role-membership check built by [`require`].
///
/// An empty gate admits any authenticated account; a non-empty gate admits
/// only the listed roles. Authentication is always the caller's problem
/// first — a gate only ever sees an already-resolved account's role.
#[derive(Debug, Clone, Copy)]
pub struct RoleGate {
    allowed: &'static [Role],
}

/// Build a gate admitting `allowed` (or everyone, when empty).
pub const fn require(allowed: &'static [Role]) -> RoleGate {
    RoleGate { allowed }
}

impl RoleGate {
    pub fn authorize(&self, role: Role) -> Result<(), Forbidden> {
        if self.allowed.is_empty() || self.allowed.contains(&role) {
            Ok(())
        } else {
            Err(Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_gate_rejects_patient() {
        let gate = require(&[Role::Admin]);
        assert!(gate.authorize(Role::Patient).is_err());
        assert!(gate.authorize(Role::Admin).is_ok());
    }

    #[test]
    fn test_empty_gate_admits_everyone() {
        let gate = require(&[]);
        assert!(gate.authorize(Role::Admin).is_ok());
        assert!(gate.authorize(Role::Clinician).is_ok());
        assert!(gate.authorize(Role::Patient).is_ok());
    }

    #[test]
    fn test_multi_role_gate() {
        let staff = require(&[Role::Admin, Role::Clinician]);
        assert!(staff.authorize(Role::Clinician).is_ok());
        assert!(staff.authorize(Role::Patient).is_err());
    }

    #[test]
    fn test_role_parsing_is_case_insensitive_but_closed() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" CLINICIAN ".parse::<Role>().unwrap(), Role::Clinician);
        assert_eq!("patient".parse::<Role>().unwrap(), Role::Patient);
        assert!("doctor".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_wire_strings() {
        assert_eq!(Role::Admin.to_string(), "admin");
        assert_eq!(Role::Clinician.as_str(), "clinician");
    }
}
