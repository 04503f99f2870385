use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers};
use crate::features::reports::{dtos as report_dtos, handlers as report_handlers};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::auth_handler::register,
        auth_handlers::auth_handler::login,
        // Reports
        report_handlers::report_handler::create_report,
        report_handlers::report_handler::list_reports,
        report_handlers::report_handler::get_report,
    ),
    components(schemas(
        auth_dtos::RegisterRequestDto,
        auth_dtos::LoginRequestDto,
        auth_dtos::AuthResponseDto,
        auth_dtos::AuthUserDto,
        report_dtos::CreateReportFormDto,
        report_dtos::CreateReportResponseDto,
        report_dtos::ReportDetailResponseDto,
        report_dtos::ListReportsResponseDto,
        report_dtos::ReportResponseDto,
        report_dtos::ReportWithCreatorDto,
        report_dtos::ReportSummaryDto,
        report_dtos::AttachmentResponseDto,
    )),
    tags(
        (name = "auth", description = "User registration and login"),
        (name = "reports", description = "Site inspection reports and photo attachments"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Sitelog API",
        version = "0.1.0",
        description = "Landfill site inspection report API",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
