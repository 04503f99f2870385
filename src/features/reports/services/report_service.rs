use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{
    CreateReport, CreateReportMedia, Report, ReportFilter, ReportMedia, ReportSummaryRow,
    ReportWithCreator,
};

const REPORT_COLUMNS: &str =
    "id, site_name, report_date, weather, tonnage, cover_material, status, notes, extras, \
     created_by, created_at";

const MEDIA_COLUMNS: &str = "id, report_id, filename, mime_type, path, uploaded_at";

/// Service for report operations
pub struct ReportService {
    pool: PgPool,
}

impl ReportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a report together with its attachment rows in one
    /// transaction. Either every insert commits or none do; an early
    /// return drops the transaction, which rolls it back.
    pub async fn create(
        &self,
        data: &CreateReport,
        files: &[CreateReportMedia],
    ) -> Result<(Report, Vec<ReportMedia>)> {
        let mut tx = self.pool.begin().await?;

        let report = sqlx::query_as::<_, Report>(&format!(
            r#"
            INSERT INTO reports (id, site_name, report_date, weather, tonnage, cover_material, status, notes, extras, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {REPORT_COLUMNS}
            "#
        ))
        .bind(Uuid::now_v7())
        .bind(&data.site_name)
        .bind(data.report_date)
        .bind(&data.weather)
        .bind(data.tonnage)
        .bind(&data.cover_material)
        .bind(&data.status)
        .bind(&data.notes)
        .bind(&data.extras)
        .bind(data.created_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert report: {:?}", e);
            AppError::Database(e)
        })?;

        let mut attachments = Vec::with_capacity(files.len());
        for file in files {
            let media = sqlx::query_as::<_, ReportMedia>(&format!(
                r#"
                INSERT INTO report_media (id, report_id, filename, mime_type, path)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING {MEDIA_COLUMNS}
                "#
            ))
            .bind(Uuid::now_v7())
            .bind(report.id)
            .bind(&file.filename)
            .bind(&file.mime_type)
            .bind(&file.path)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert attachment for report {}: {:?}", report.id, e);
                AppError::Database(e)
            })?;
            attachments.push(media);
        }

        tx.commit().await?;

        tracing::info!(
            "Created report {} with {} attachment(s)",
            report.id,
            attachments.len()
        );

        Ok((report, attachments))
    }

    /// List report summaries matching the filter, newest report date first.
    pub async fn list(
        &self,
        filter: &ReportFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ReportSummaryRow>> {
        let mut query = build_list_query(filter, limit, offset);
        let rows = query
            .build_query_as::<ReportSummaryRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Fetch one report (joined with its creator's email) and its
    /// attachments in upload order.
    pub async fn get_by_id(&self, id: Uuid) -> Result<(ReportWithCreator, Vec<ReportMedia>)> {
        let report = sqlx::query_as::<_, ReportWithCreator>(
            r#"
            SELECT r.id, r.site_name, r.report_date, r.weather, r.tonnage, r.cover_material,
                   r.status, r.notes, r.extras, r.created_by, r.created_at,
                   u.email AS created_by_email
            FROM reports r
            LEFT JOIN users u ON r.created_by = u.id
            WHERE r.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Report not found".to_string()))?;

        let attachments = sqlx::query_as::<_, ReportMedia>(&format!(
            r#"
            SELECT {MEDIA_COLUMNS}
            FROM report_media
            WHERE report_id = $1
            ORDER BY uploaded_at ASC, id ASC
            "#
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok((report, attachments))
    }
}

/// Assemble the filtered list query. Filters are conjunctive; ordering is
/// report_date DESC with id DESC as the tie-break.
fn build_list_query(
    filter: &ReportFilter,
    limit: i64,
    offset: i64,
) -> QueryBuilder<'static, Postgres> {
    let mut qb: QueryBuilder<'static, Postgres> = QueryBuilder::new(
        "SELECT r.id, r.site_name, r.report_date, r.status, r.tonnage, r.weather, r.created_at, \
         u.email AS created_by_email \
         FROM reports r LEFT JOIN users u ON r.created_by = u.id",
    );

    let mut sep = " WHERE ";
    if let Some(site_name) = &filter.site_name {
        qb.push(sep);
        sep = " AND ";
        qb.push("r.site_name ILIKE ");
        qb.push_bind(format!("%{}%", site_name));
    }
    if let Some(date_from) = filter.date_from {
        qb.push(sep);
        sep = " AND ";
        qb.push("r.report_date >= ");
        qb.push_bind(date_from);
    }
    if let Some(date_to) = filter.date_to {
        qb.push(sep);
        qb.push("r.report_date <= ");
        qb.push_bind(date_to);
    }

    qb.push(" ORDER BY r.report_date DESC, r.id DESC LIMIT ");
    qb.push_bind(limit);
    qb.push(" OFFSET ");
    qb.push_bind(offset);

    qb
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn unfiltered_query_has_no_where_clause() {
        let mut query = build_list_query(&ReportFilter::default(), 20, 0);
        let sql = query.sql();
        assert!(!sql.contains("WHERE"));
        assert!(sql.contains("ORDER BY r.report_date DESC, r.id DESC"));
        assert!(sql.contains("LIMIT $1"));
        assert!(sql.contains("OFFSET $2"));
    }

    #[test]
    fn all_filters_compose_conjunctively() {
        let filter = ReportFilter {
            site_name: Some("yard".to_string()),
            date_from: Some(date("2024-01-01")),
            date_to: Some(date("2024-12-31")),
        };
        let mut query = build_list_query(&filter, 50, 10);
        let sql = query.sql();
        assert!(sql.contains("WHERE r.site_name ILIKE $1"));
        assert!(sql.contains(" AND r.report_date >= $2"));
        assert!(sql.contains(" AND r.report_date <= $3"));
        assert!(sql.contains("LIMIT $4"));
        assert!(sql.contains("OFFSET $5"));
    }

    #[test]
    fn single_date_filter_starts_its_own_where() {
        let filter = ReportFilter {
            site_name: None,
            date_from: None,
            date_to: Some(date("2024-06-30")),
        };
        let mut query = build_list_query(&filter, 20, 0);
        let sql = query.sql();
        assert!(sql.contains("WHERE r.report_date <= $1"));
        assert!(!sql.contains("AND"));
    }
}
