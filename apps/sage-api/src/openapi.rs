//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sage API",
        version = "0.1.0",
        description = "Questions and answers with comments and stars, backed by MongoDB"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/questions", api = domain_questions::ApiDoc),
        (path = "/auth", api = domain_users::ApiDoc)
    )
)]
pub struct ApiDoc;
