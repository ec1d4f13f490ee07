use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A clinical study ordered for a patient, e.g. "knee MRI".
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Study {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub study_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StudyCreate {
    pub patient_id: Uuid,
    pub doctor_id: Option<Uuid>,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    /// Defaults to today when absent.
    pub study_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StudyUpdate {
    pub doctor_id: Option<Uuid>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub study_date: Option<NaiveDate>,
}
