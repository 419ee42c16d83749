//! # Axum Helpers
//!
//! Shared building blocks for the HTTP services in this workspace.
//!
//! ## Modules
//!
//! - **[`auth`]**: stateless JWT issuing/verification and the optional auth middleware
//! - **[`server`]**: router assembly with API docs, health checks, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`errors`]**: JSON error responses with error codes
//! - **[`extractors`]**: validated JSON, typed path ids, authenticated caller
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum_helpers::server::{ShutdownCoordinator, create_production_app, create_router, health_router};
//! use core_config::{app_info, server::ServerConfig};
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! let router = create_router::<ApiDoc>(api_routes, health_router(app_info!()))?;
//! let (coordinator, _rx) = ShutdownCoordinator::new();
//! create_production_app(router, &ServerConfig::default(), coordinator, async {}).await?;
//! ```

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use auth::{
    ACCESS_TOKEN_COOKIE, ACCESS_TOKEN_TTL, JwtAuth, JwtClaims, JwtConfig, SESSION_TOKEN_TTL,
    optional_jwt_auth_middleware,
};

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

pub use http::{create_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{AuthUser, IdsPath, ValidatedJson};
