/// Integration tests exercising the auth primitives together the way the
/// service uses them: hash at registration, verify at login, issue a
/// token, parse it, gate the role.
use auth_core::{hash_password, require, verify_password, Role, TokenService};
use uuid::Uuid;

const ROUNDS: u32 = 1_000;

#[test]
fn test_login_shaped_flow() {
    let tokens = TokenService::new("integration-secret");
    let uid = Uuid::new_v4();

    // register
    let digest = hash_password("secret1", ROUNDS).expect("hashing never fails on plain input");

    // login
    assert!(verify_password("secret1", &digest));
    assert!(!verify_password("secret2", &digest));
    let token = tokens
        .issue_access(uid, "a@x.com", Role::Patient, 120)
        .unwrap();

    // authenticated request
    let claims = tokens.parse_access(&token).unwrap();
    assert_eq!(claims.uid, uid);
    assert_eq!(claims.sub, "a@x.com");

    // authorization
    let staff = require(&[Role::Admin, Role::Clinician]);
    assert!(staff.authorize(claims.role).is_err());
    assert!(require(&[]).authorize(claims.role).is_ok());
}

#[test]
fn test_reset_link_shaped_flow() {
    let tokens = TokenService::new("integration-secret");

    let link_token = tokens.issue_set_password("a@x.com", 60).unwrap();
    assert_eq!(
        tokens.parse_set_password(&link_token).as_deref(),
        Some("a@x.com")
    );

    // The same token must never authenticate a request.
    assert!(tokens.parse_access(&link_token).is_err());

    // And an access token must never drive the reset flow.
    let access = tokens
        .issue_access(Uuid::new_v4(), "a@x.com", Role::Admin, 60)
        .unwrap();
    assert_eq!(tokens.parse_set_password(&access), None);
}

#[test]
fn test_cross_service_secret_mismatch() {
    let issuer = TokenService::new("secret-a");
    let other = TokenService::new("secret-b");

    let token = issuer
        .issue_access(Uuid::new_v4(), "a@x.com", Role::Clinician, 60)
        .unwrap();

    assert!(other.parse_access(&token).is_err());
    assert_eq!(other.parse_set_password(&token), None);
}
