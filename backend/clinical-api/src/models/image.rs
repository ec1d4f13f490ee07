use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// An uploaded study image; the bytes live under MEDIA_ROOT, this row is
/// the metadata.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ImageRecord {
    pub id: Uuid,
    pub study_id: Uuid,
    /// File name on disk (uuid-prefixed, sanitized).
    pub file_name: String,
    pub url: Option<String>,
    pub mime_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub created_at: DateTime<Utc>,
}
