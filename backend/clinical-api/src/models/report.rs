use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Report workflow state. `draft -> in_review -> {draft, final}`; a final
/// report never changes state again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Draft,
    InReview,
    Final,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Draft => "draft",
            ReportStatus::InReview => "in_review",
            ReportStatus::Final => "final",
        }
    }

    /// Whether moving from `self` to `next` is a legal workflow step.
    /// Re-asserting the current state is always allowed.
    pub fn can_transition(&self, next: ReportStatus) -> bool {
        if *self == next {
            return true;
        }
        matches!(
            (self, next),
            (ReportStatus::Draft, ReportStatus::InReview)
                | (ReportStatus::InReview, ReportStatus::Draft)
                | (ReportStatus::InReview, ReportStatus::Final)
        )
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown report status; use draft|in_review|final")]
pub struct UnknownStatus;

impl FromStr for ReportStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ReportStatus::Draft),
            "in_review" => Ok(ReportStatus::InReview),
            "final" => Ok(ReportStatus::Final),
            _ => Err(UnknownStatus),
        }
    }
}

/// The single report attached to a study (1:1).
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub id: Uuid,
    pub study_id: Uuid,
    pub status: ReportStatus,
    pub content: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// status is TEXT in the database; decode through the enum.
impl<'r> FromRow<'r, PgRow> for Report {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        let status = status
            .parse::<ReportStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Report {
            id: row.try_get("id")?,
            study_id: row.try_get("study_id")?,
            status,
            content: row.try_get("content")?,
            notes: row.try_get("notes")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReportCreate {
    pub study_id: Uuid,
    #[validate(length(min = 1))]
    pub content: String,
    pub notes: Option<String>,
    /// Defaults to draft.
    pub status: Option<ReportStatus>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReportUpdate {
    #[validate(length(min = 1))]
    pub content: Option<String>,
    pub notes: Option<String>,
    pub status: Option<ReportStatus>,
}
