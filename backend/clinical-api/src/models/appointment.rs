use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A patient-facing booking. Denormalized on purpose: the public booking
/// form takes free-text doctor/specialty, not internal ids.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_name: String,
    pub patient_document: Option<String>,
    pub patient_email: String,
    pub patient_phone: String,
    pub specialty: String,
    pub doctor_name: String,
    /// "in_person" or "online".
    pub modality: String,
    pub reason: Option<String>,
    pub date: NaiveDate,
    /// "HH:MM" slot start.
    pub time: String,
    pub reservation_code: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AppointmentCreate {
    #[validate(length(min = 1, max = 200))]
    pub patient_name: String,
    pub patient_document: Option<String>,
    #[validate(email)]
    pub patient_email: String,
    #[validate(length(min = 1, max = 30))]
    pub patient_phone: String,
    #[validate(length(min = 1, max = 120))]
    pub specialty: String,
    #[validate(length(min = 1, max = 200))]
    pub doctor_name: String,
    pub modality: String,
    pub reason: Option<String>,
    pub date: NaiveDate,
    pub time: String,
}
