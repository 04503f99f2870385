use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a report photo attachment
#[derive(Debug, Clone, FromRow)]
pub struct ReportMedia {
    pub id: Uuid,
    pub report_id: Uuid,
    pub filename: String,
    pub mime_type: String,
    pub path: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Data for one attachment row, inserted inside the report's creation
/// transaction after the file has landed in the attachment sink.
#[derive(Debug, Clone)]
pub struct CreateReportMedia {
    pub filename: String,
    pub mime_type: String,
    pub path: String,
}
