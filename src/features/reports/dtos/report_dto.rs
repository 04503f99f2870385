use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{
    CreateReport, Report, ReportFilter, ReportMedia, ReportSummaryRow, ReportWithCreator,
};

/// Multipart form fields for report creation, collected before validation.
/// Every field arrives as text; `into_create` turns them into typed data.
#[derive(Debug, Default)]
pub struct CreateReportDto {
    pub site_name: Option<String>,
    pub report_date: Option<String>,
    pub weather: Option<String>,
    pub tonnage: Option<String>,
    pub cover_material: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub extras: Option<String>,
}

/// Empty form values count as absent, not as empty strings
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl CreateReportDto {
    /// Validate every field before any side effect. Field errors are
    /// collected into one `Validation` failure; a malformed `extras`
    /// payload is its own single-message rejection.
    pub fn into_create(self, created_by: Option<Uuid>) -> Result<CreateReport> {
        let mut errors: Vec<String> = Vec::new();

        let site_name = self.site_name.unwrap_or_default();
        if site_name.is_empty() {
            errors.push("siteName is required".to_string());
        }

        let report_date = match self.report_date.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => match raw.parse::<NaiveDate>() {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.push("reportDate must be ISO8601 date".to_string());
                    None
                }
            },
            None => {
                errors.push("reportDate must be ISO8601 date".to_string());
                None
            }
        };

        let tonnage = match self.tonnage.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => match raw.parse::<f64>() {
                Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
                _ => {
                    errors.push("tonnage must be a non-negative number".to_string());
                    None
                }
            },
            None => None,
        };

        if let Some(status) = &self.status {
            if status.chars().count() > 120 {
                errors.push("status must be at most 120 characters".to_string());
            }
        }

        let extras = match self.extras.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => match serde_json::from_str(raw) {
                Ok(value) => value,
                Err(_) => {
                    return Err(AppError::BadRequest("extras must be valid JSON".to_string()))
                }
            },
            None => serde_json::json!({}),
        };

        match (errors.is_empty(), report_date) {
            (true, Some(report_date)) => Ok(CreateReport {
                site_name,
                report_date,
                weather: non_empty(self.weather),
                tonnage,
                cover_material: non_empty(self.cover_material),
                status: non_empty(self.status),
                notes: non_empty(self.notes),
                extras,
                created_by,
            }),
            _ => Err(AppError::Validation(errors)),
        }
    }
}

/// Multipart form schema for report creation.
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct CreateReportFormDto {
    #[schema(example = "North Yard")]
    pub site_name: String,
    /// ISO-8601 date
    #[schema(example = "2024-03-01")]
    pub report_date: String,
    pub weather: Option<String>,
    /// Non-negative number
    #[schema(example = "12.5")]
    pub tonnage: Option<String>,
    pub cover_material: Option<String>,
    /// At most 120 characters
    pub status: Option<String>,
    pub notes: Option<String>,
    /// Arbitrary JSON stored with the report
    pub extras: Option<String>,
    /// Up to 5 photos, 5MB each
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub photos: Option<String>,
}

/// Query parameters for the list endpoint
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ReportListQuery {
    /// Case-insensitive substring filter on site name
    #[serde(rename = "siteName")]
    pub site_name: Option<String>,

    /// Inclusive lower bound on report date (ISO-8601)
    #[serde(rename = "dateFrom")]
    pub date_from: Option<NaiveDate>,

    /// Inclusive upper bound on report date (ISO-8601)
    #[serde(rename = "dateTo")]
    pub date_to: Option<NaiveDate>,
}

impl From<ReportListQuery> for ReportFilter {
    fn from(query: ReportListQuery) -> Self {
        Self {
            site_name: query.site_name,
            date_from: query.date_from,
            date_to: query.date_to,
        }
    }
}

/// Response DTO for a created report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
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
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            site_name: r.site_name,
            report_date: r.report_date,
            weather: r.weather,
            tonnage: r.tonnage,
            cover_material: r.cover_material,
            status: r.status,
            notes: r.notes,
            extras: r.extras,
            created_by: r.created_by,
            created_at: r.created_at,
        }
    }
}

/// Full report row joined with the creating user's email
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportWithCreatorDto {
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

impl From<ReportWithCreator> for ReportWithCreatorDto {
    fn from(r: ReportWithCreator) -> Self {
        Self {
            id: r.id,
            site_name: r.site_name,
            report_date: r.report_date,
            weather: r.weather,
            tonnage: r.tonnage,
            cover_material: r.cover_material,
            status: r.status,
            notes: r.notes,
            extras: r.extras,
            created_by: r.created_by,
            created_at: r.created_at,
            created_by_email: r.created_by_email,
        }
    }
}

/// Response DTO for one attachment record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttachmentResponseDto {
    pub id: Uuid,
    pub filename: String,
    pub mime_type: String,
    pub path: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<ReportMedia> for AttachmentResponseDto {
    fn from(m: ReportMedia) -> Self {
        Self {
            id: m.id,
            filename: m.filename,
            mime_type: m.mime_type,
            path: m.path,
            uploaded_at: m.uploaded_at,
        }
    }
}

/// Response for report creation: the report plus its persisted attachments
/// in submission order
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateReportResponseDto {
    pub report: ReportResponseDto,
    pub attachments: Vec<AttachmentResponseDto>,
}

/// Response for report retrieval by id
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReportDetailResponseDto {
    pub report: ReportWithCreatorDto,
    pub attachments: Vec<AttachmentResponseDto>,
}

/// Summary item in the list response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportSummaryDto {
    pub id: Uuid,
    pub site_name: String,
    pub report_date: NaiveDate,
    pub status: Option<String>,
    pub tonnage: Option<f64>,
    pub weather: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by_email: Option<String>,
}

impl From<ReportSummaryRow> for ReportSummaryDto {
    fn from(r: ReportSummaryRow) -> Self {
        Self {
            id: r.id,
            site_name: r.site_name,
            report_date: r.report_date,
            status: r.status,
            tonnage: r.tonnage,
            weather: r.weather,
            created_at: r.created_at,
            created_by_email: r.created_by_email,
        }
    }
}

/// Response for the list endpoint: one page plus the effective paging values
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListReportsResponseDto {
    pub items: Vec<ReportSummaryDto>,
    pub limit: i64,
    pub offset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_dto() -> CreateReportDto {
        CreateReportDto {
            site_name: Some("North Yard".to_string()),
            report_date: Some("2024-03-01".to_string()),
            weather: Some("overcast".to_string()),
            tonnage: Some("12.5".to_string()),
            cover_material: Some("clay".to_string()),
            status: Some("active".to_string()),
            notes: Some("cell 4 nearly at grade".to_string()),
            extras: Some(r#"{"compactor_hours": 6}"#.to_string()),
        }
    }

    #[test]
    fn full_form_converts() {
        let user = Uuid::now_v7();
        let create = full_dto().into_create(Some(user)).unwrap();
        assert_eq!(create.site_name, "North Yard");
        assert_eq!(create.report_date, "2024-03-01".parse::<NaiveDate>().unwrap());
        assert_eq!(create.tonnage, Some(12.5));
        assert_eq!(create.extras["compactor_hours"], 6);
        assert_eq!(create.created_by, Some(user));
    }

    #[test]
    fn missing_required_fields_collects_all_errors() {
        let err = CreateReportDto::default().into_create(None).unwrap_err();
        match err {
            AppError::Validation(errors) => {
                assert!(errors.iter().any(|e| e.contains("siteName")));
                assert!(errors.iter().any(|e| e.contains("reportDate")));
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn bad_date_is_rejected() {
        let mut dto = full_dto();
        dto.report_date = Some("March 1st".to_string());
        assert!(matches!(
            dto.into_create(None),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn negative_tonnage_is_rejected() {
        let mut dto = full_dto();
        dto.tonnage = Some("-3".to_string());
        assert!(matches!(
            dto.into_create(None),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn unparseable_tonnage_is_rejected() {
        let mut dto = full_dto();
        dto.tonnage = Some("heavy".to_string());
        assert!(matches!(
            dto.into_create(None),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn oversized_status_is_rejected() {
        let mut dto = full_dto();
        dto.status = Some("s".repeat(121));
        assert!(matches!(
            dto.into_create(None),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn malformed_extras_is_single_message_rejection() {
        let mut dto = full_dto();
        dto.extras = Some("{not json".to_string());
        match dto.into_create(None).unwrap_err() {
            AppError::BadRequest(msg) => assert_eq!(msg, "extras must be valid JSON"),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn absent_extras_defaults_to_empty_object() {
        let mut dto = full_dto();
        dto.extras = None;
        let create = dto.into_create(None).unwrap();
        assert_eq!(create.extras, serde_json::json!({}));
    }

    #[test]
    fn empty_optional_fields_become_null() {
        let mut dto = full_dto();
        dto.weather = Some(String::new());
        dto.notes = Some(String::new());
        dto.tonnage = Some(String::new());
        let create = dto.into_create(None).unwrap();
        assert_eq!(create.weather, None);
        assert_eq!(create.notes, None);
        assert_eq!(create.tonnage, None);
    }
}
