use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Patient {
    pub id: Uuid,
    pub first_names: String,
    pub last_names: String,
    /// National-ID document, stored normalized (see validators).
    pub document: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
    /// Optional 1:1 link to a login account.
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PatientCreate {
    #[validate(length(min = 1, max = 120))]
    pub first_names: String,
    #[validate(length(min = 1, max = 120))]
    pub last_names: String,
    pub document: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

/// Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct PatientUpdate {
    #[validate(length(min = 1, max = 120))]
    pub first_names: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub last_names: Option<String>,
    pub document: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
}
