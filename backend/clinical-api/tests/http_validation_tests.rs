/// Unit tests for the request validation layer
///
/// These run without a database: they cover payload deserialization,
/// validator-derive constraints, role parsing, and the hand-rolled
/// document/phone/time validators.
use auth_core::Role;
use clinical_api::models::{
    AppointmentCreate, PatientCreate, RegisterRequest, SetPasswordRequest,
};
use clinical_api::validators::{
    normalize_document, normalize_email, validate_document, validate_phone, validate_time,
};
use validator::Validate;

// ============================================================================
// Register payload
// ============================================================================

#[test]
fn test_register_payload_happy_path() {
    let payload: RegisterRequest = serde_json::from_value(serde_json::json!({
        "email": "a@x.com",
        "password": "secret1",
        "role": "patient"
    }))
    .unwrap();

    assert!(payload.validate().is_ok());
    assert_eq!(payload.role.parse::<Role>().unwrap(), Role::Patient);
}

#[test]
fn test_register_payload_rejects_bad_email() {
    let payload: RegisterRequest = serde_json::from_value(serde_json::json!({
        "email": "not-an-email",
        "password": "secret1",
        "role": "patient"
    }))
    .unwrap();

    assert!(payload.validate().is_err());
}

#[test]
fn test_register_payload_rejects_short_password() {
    let payload: RegisterRequest = serde_json::from_value(serde_json::json!({
        "email": "a@x.com",
        "password": "abc",
        "role": "patient"
    }))
    .unwrap();

    assert!(payload.validate().is_err());
}

#[test]
fn test_register_payload_requires_all_fields() {
    let result: Result<RegisterRequest, _> =
        serde_json::from_value(serde_json::json!({ "email": "a@x.com" }));
    assert!(result.is_err());
}

#[test]
fn test_role_strings_stay_in_the_closed_set() {
    assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
    assert_eq!("clinician".parse::<Role>().unwrap(), Role::Clinician);
    assert!("superuser".parse::<Role>().is_err());
}

// ============================================================================
// Patient payload
// ============================================================================

#[test]
fn test_patient_payload_email_is_optional_but_checked() {
    let payload: PatientCreate = serde_json::from_value(serde_json::json!({
        "first_names": "Ana",
        "last_names": "Rojas"
    }))
    .unwrap();
    assert!(payload.validate().is_ok());

    let payload: PatientCreate = serde_json::from_value(serde_json::json!({
        "first_names": "Ana",
        "last_names": "Rojas",
        "email": "broken"
    }))
    .unwrap();
    assert!(payload.validate().is_err());
}

#[test]
fn test_patient_payload_rejects_empty_names() {
    let payload: PatientCreate = serde_json::from_value(serde_json::json!({
        "first_names": "",
        "last_names": "Rojas"
    }))
    .unwrap();
    assert!(payload.validate().is_err());
}

// ============================================================================
// Appointment payload
// ============================================================================

#[test]
fn test_appointment_payload_happy_path() {
    let payload: AppointmentCreate = serde_json::from_value(serde_json::json!({
        "patient_name": "Ana Rojas",
        "patient_email": "ana@x.com",
        "patient_phone": "+56912345678",
        "specialty": "Radiology",
        "doctor_name": "Dr. Soto",
        "modality": "online",
        "date": "2026-09-01",
        "time": "10:30"
    }))
    .unwrap();

    assert!(payload.validate().is_ok());
    assert!(validate_time(&payload.time));
}

#[test]
fn test_appointment_payload_rejects_bad_email() {
    let payload: AppointmentCreate = serde_json::from_value(serde_json::json!({
        "patient_name": "Ana Rojas",
        "patient_email": "nope",
        "patient_phone": "+56912345678",
        "specialty": "Radiology",
        "doctor_name": "Dr. Soto",
        "modality": "online",
        "date": "2026-09-01",
        "time": "10:30"
    }))
    .unwrap();

    assert!(payload.validate().is_err());
}

// ============================================================================
// Set-password payload
// ============================================================================

#[test]
fn test_set_password_payload_enforces_password_length() {
    let payload: SetPasswordRequest = serde_json::from_value(serde_json::json!({
        "token": "whatever",
        "new_password": "abc"
    }))
    .unwrap();
    assert!(payload.validate().is_err());

    let payload: SetPasswordRequest = serde_json::from_value(serde_json::json!({
        "token": "whatever",
        "new_password": "longenough"
    }))
    .unwrap();
    assert!(payload.validate().is_ok());
}

// ============================================================================
// Hand-rolled validators, exercised from outside the crate
// ============================================================================

#[test]
fn test_document_check_digit_from_the_outside() {
    assert!(validate_document("12345678-5"));
    assert!(validate_document("12.345.678-5"));
    assert!(!validate_document("12345678-6"));
    assert_eq!(normalize_document("12.345.678-5"), "12345678-5");
}

#[test]
fn test_phone_shapes() {
    assert!(validate_phone("+56 9 1234 5678"));
    assert!(!validate_phone("call me"));
}

#[test]
fn test_email_normalization_contract() {
    assert_eq!(normalize_email(" A@X.Com "), "a@x.com");
}
