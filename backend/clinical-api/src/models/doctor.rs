use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub specialty: Option<String>,
    pub license_number: Option<String>,
    /// Login account provisioned for the doctor, when one exists.
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// One weekly availability row; times are "HH:MM".
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DoctorSchedule {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub weekday: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ScheduleItem {
    #[validate(length(min = 1, max = 20))]
    pub weekday: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DoctorCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub specialty: Option<String>,
    pub license_number: Option<String>,
    /// When both email and password are present, a clinician login account
    /// is created (or an existing clinician account reused).
    #[validate(length(min = 6, max = 72))]
    pub password: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub schedules: Vec<ScheduleItem>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DoctorUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub specialty: Option<String>,
    pub license_number: Option<String>,
    /// When present, replaces the whole schedule.
    #[validate(nested)]
    pub schedules: Option<Vec<ScheduleItem>>,
}

#[derive(Debug, Serialize)]
pub struct DoctorOut {
    #[serde(flatten)]
    pub doctor: Doctor,
    pub schedules: Vec<DoctorSchedule>,
}
