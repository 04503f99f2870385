use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for an inspection report
#[derive(Debug, Clone, FromRow)]
pub struct Report {
    pub id: Uuid,
    pub site_name: String,
    pub report_date: NaiveDate,
    pub weather: Option<String>,
    pub tonnage: Option<f64>,
    pub cover_material: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    /// Caller-supplied JSON, stored opaquely
    pub extras: serde_json::Value,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// A report row joined with the creating user's email (when resolvable)
#[derive(Debug, Clone, FromRow)]
pub struct ReportWithCreator {
    pub id: Uuid,
    pub site_name: String,
    pub report_date: NaiveDate,
    pub weather: Option<String>,
    pub tonnage: Option<f64>,
    pub cover_material: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub extras: serde_json::Value,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub created_by_email: Option<String>,
}

/// Summary row returned by the list endpoint
#[derive(Debug, Clone, FromRow)]
pub struct ReportSummaryRow {
    pub id: Uuid,
    pub site_name: String,
    pub report_date: NaiveDate,
    pub status: Option<String>,
    pub tonnage: Option<f64>,
    pub weather: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by_email: Option<String>,
}

/// Validated data for creating a new report
#[derive(Debug)]
pub struct CreateReport {
    pub site_name: String,
    pub report_date: NaiveDate,
    pub weather: Option<String>,
    pub tonnage: Option<f64>,
    pub cover_material: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub extras: serde_json::Value,
    /// Nullable by schema even though the route is guarded; see DESIGN.md
    pub created_by: Option<Uuid>,
}

/// Conjunctive filters for the list endpoint. Any subset may be set.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    /// Case-insensitive substring match on site_name
    pub site_name: Option<String>,
    /// Inclusive lower bound on report_date
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on report_date
    pub date_to: Option<NaiveDate>,
}
