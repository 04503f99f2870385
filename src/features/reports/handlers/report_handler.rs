use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::dtos::{
    CreateReportDto, CreateReportFormDto, CreateReportResponseDto, ListReportsResponseDto,
    ReportDetailResponseDto, ReportListQuery,
};
use crate::features::reports::models::CreateReportMedia;
use crate::features::reports::services::ReportService;
use crate::modules::storage::LocalDiskStorage;
use crate::shared::constants::{MAX_PHOTOS_PER_REPORT, MAX_PHOTO_SIZE};
use crate::shared::types::PageQuery;

/// State for report handlers
#[derive(Clone)]
pub struct ReportState {
    pub report_service: Arc<ReportService>,
    pub storage: Arc<LocalDiskStorage>,
}

/// One uploaded photo, read out of the multipart stream
struct PendingUpload {
    original_name: String,
    mime_type: String,
    data: Vec<u8>,
}

/// Create a report with up to five photo attachments
///
/// Accepts multipart/form-data with text fields {siteName, reportDate,
/// weather?, tonnage?, coverMaterial?, status?, notes?, extras?} and up to
/// five files under the field "photos".
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body(
        content = CreateReportFormDto,
        content_type = "multipart/form-data",
        description = "Report fields plus up to 5 photos under the field \"photos\""
    ),
    responses(
        (status = 201, description = "Report created", body = CreateReportResponseDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn create_report(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CreateReportResponseDto>)> {
    let mut dto = CreateReportDto::default();
    let mut uploads: Vec<PendingUpload> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart data: {}", e)))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "photos" => {
                if uploads.len() >= MAX_PHOTOS_PER_REPORT {
                    return Err(AppError::Validation(vec![format!(
                        "At most {} photos are allowed",
                        MAX_PHOTOS_PER_REPORT
                    )]));
                }

                let original_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unnamed".to_string());
                let mime_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                let data = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;

                if data.len() > MAX_PHOTO_SIZE {
                    return Err(AppError::Validation(vec![format!(
                        "Each photo must be at most {} MB",
                        MAX_PHOTO_SIZE / 1024 / 1024
                    )]));
                }

                uploads.push(PendingUpload {
                    original_name,
                    mime_type,
                    data: data.to_vec(),
                });
            }
            name => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read field {}: {}", name, e))
                })?;
                match name {
                    "siteName" => dto.site_name = Some(text),
                    "reportDate" => dto.report_date = Some(text),
                    "weather" => dto.weather = Some(text),
                    "tonnage" => dto.tonnage = Some(text),
                    "coverMaterial" => dto.cover_material = Some(text),
                    "status" => dto.status = Some(text),
                    "notes" => dto.notes = Some(text),
                    "extras" => dto.extras = Some(text),
                    _ => {}
                }
            }
        }
    }

    // All field validation happens before any file or row is written
    let data = dto.into_create(Some(user.id))?;

    // Materialize files in the attachment sink, in submission order
    let mut stored_files = Vec::with_capacity(uploads.len());
    let mut media = Vec::with_capacity(uploads.len());
    for upload in &uploads {
        let stored = state
            .storage
            .save(&upload.original_name, &upload.data)
            .await?;
        media.push(CreateReportMedia {
            filename: stored.filename.clone(),
            mime_type: upload.mime_type.clone(),
            path: stored.path.clone(),
        });
        stored_files.push(stored);
    }

    match state.report_service.create(&data, &media).await {
        Ok((report, attachments)) => Ok((
            StatusCode::CREATED,
            Json(CreateReportResponseDto {
                report: report.into(),
                attachments: attachments.into_iter().map(Into::into).collect(),
            }),
        )),
        Err(e) => {
            // The transaction rolled back; do not leave its files behind
            for stored in &stored_files {
                state.storage.remove(stored).await;
            }
            Err(e)
        }
    }
}

/// List reports with optional filters and pagination
#[utoipa::path(
    get,
    path = "/api/reports",
    params(ReportListQuery, PageQuery),
    responses(
        (status = 200, description = "One page of report summaries", body = ListReportsResponseDto),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_reports(
    _user: AuthenticatedUser,
    State(state): State<ReportState>,
    Query(filter): Query<ReportListQuery>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ListReportsResponseDto>> {
    let limit = page.limit();
    let offset = page.offset();

    let rows = state
        .report_service
        .list(&filter.into(), limit, offset)
        .await?;

    Ok(Json(ListReportsResponseDto {
        items: rows.into_iter().map(Into::into).collect(),
        limit,
        offset,
    }))
}

/// Get a report by id, with its attachments
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report found", body = ReportDetailResponseDto),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn get_report(
    _user: AuthenticatedUser,
    State(state): State<ReportState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReportDetailResponseDto>> {
    let (report, attachments) = state.report_service.get_by_id(id).await?;

    Ok(Json(ReportDetailResponseDto {
        report: report.into(),
        attachments: attachments.into_iter().map(Into::into).collect(),
    }))
}
