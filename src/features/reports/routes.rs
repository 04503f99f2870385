use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::reports::handlers::{self, ReportState};
use crate::features::reports::services::ReportService;
use crate::modules::storage::LocalDiskStorage;

/// Create routes for the reports feature. The caller applies the auth
/// middleware; every route here expects an authenticated identity.
pub fn routes(report_service: Arc<ReportService>, storage: Arc<LocalDiskStorage>) -> Router {
    let state = ReportState {
        report_service,
        storage,
    };

    Router::new()
        .route(
            "/api/reports",
            post(handlers::create_report).get(handlers::list_reports),
        )
        .route("/api/reports/{id}", get(handlers::get_report))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{AuthConfig, StorageConfig};
    use crate::core::{database, middleware};
    use crate::features::auth::models::User;
    use crate::features::auth::services::TokenService;
    use crate::shared::test_helpers::with_test_auth;
    use axum::body::Bytes;
    use axum::http::{header, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use uuid::Uuid;

    async fn test_storage() -> Arc<LocalDiskStorage> {
        let upload_dir = std::env::temp_dir().join(format!("sitelog-routes-{}", Uuid::new_v4()));
        Arc::new(
            LocalDiskStorage::init(&StorageConfig { upload_dir })
                .await
                .unwrap(),
        )
    }

    fn token_service() -> Arc<TokenService> {
        Arc::new(TokenService::new(&AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_expiry_hours: 12,
        }))
    }

    async fn report_routes() -> Router {
        routes(
            Arc::new(ReportService::new(database::create_lazy_pool())),
            test_storage().await,
        )
    }

    /// Routes behind the real bearer token guard
    async fn guarded_server() -> TestServer {
        let app = report_routes()
            .await
            .route_layer(axum::middleware::from_fn_with_state(
                token_service(),
                middleware::auth_middleware,
            ));
        TestServer::new(app).unwrap()
    }

    /// Routes with an identity injected directly, bypassing the guard
    async fn authed_server() -> TestServer {
        TestServer::new(with_test_auth(report_routes().await)).unwrap()
    }

    fn multipart_body(fields: &[(&str, &str)]) -> (String, Bytes) {
        let boundary = "sitelog-test-boundary";
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                boundary, name, value
            ));
        }
        body.push_str(&format!("--{}--\r\n", boundary));
        (
            format!("multipart/form-data; boundary={}", boundary),
            Bytes::from(body),
        )
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let server = guarded_server().await;
        let response = server.get("/api/reports").await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_token_is_unauthorized() {
        let server = guarded_server().await;
        let response = server
            .get("/api/reports")
            .add_header(
                header::AUTHORIZATION,
                HeaderValue::from_static("Bearer garbage"),
            )
            .await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_unauthorized() {
        let server = guarded_server().await;
        let response = server
            .get("/api/reports")
            .add_header(
                header::AUTHORIZATION,
                HeaderValue::from_static("Basic dXNlcjpwYXNz"),
            )
            .await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn issued_token_passes_the_guard() {
        let tokens = token_service();
        let app = report_routes()
            .await
            .route_layer(axum::middleware::from_fn_with_state(
                tokens.clone(),
                middleware::auth_middleware,
            ));
        let server = TestServer::new(app).unwrap();

        let token = tokens
            .issue(&User {
                id: Uuid::now_v7(),
                email: "ops@northyard.example".to_string(),
                password_hash: String::new(),
                role: "reporter".to_string(),
                display_name: None,
                created_at: chrono::Utc::now(),
            })
            .unwrap();

        // Invalid form data: past the guard, rejected by validation (400,
        // not 401), before any query runs.
        let (content_type, body) = multipart_body(&[("weather", "overcast")]);
        let response = server
            .post("/api/reports")
            .add_header(
                header::AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
            )
            .content_type(&content_type)
            .bytes(body)
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_report_rejects_missing_required_fields() {
        let server = authed_server().await;
        let (content_type, body) = multipart_body(&[("weather", "overcast")]);
        let response = server
            .post("/api/reports")
            .content_type(&content_type)
            .bytes(body)
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let text = response.text();
        assert!(text.contains("siteName"));
        assert!(text.contains("reportDate"));
    }

    #[tokio::test]
    async fn create_report_rejects_malformed_extras() {
        let server = authed_server().await;
        let (content_type, body) = multipart_body(&[
            ("siteName", "North Yard"),
            ("reportDate", "2024-03-01"),
            ("extras", "{not json"),
        ]);
        let response = server
            .post("/api/reports")
            .content_type(&content_type)
            .bytes(body)
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert!(response.text().contains("extras must be valid JSON"));
    }

    #[tokio::test]
    async fn get_report_rejects_non_uuid_id() {
        let server = authed_server().await;
        let response = server.get("/api/reports/not-a-uuid").await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }
}
