//! Server infrastructure: router assembly with API docs, health endpoints
//! and graceful shutdown.
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::server::{ShutdownCoordinator, create_production_app, create_router, health_router};
//! use core_config::{app_info, server::ServerConfig};
//!
//! let router = create_router::<ApiDoc>(api_routes, health_router(app_info!()))?;
//! let (coordinator, _rx) = ShutdownCoordinator::new();
//! create_production_app(router, &ServerConfig::default(), coordinator, async {}).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_production_app, create_router};
pub use health::{HealthCheckFuture, HealthResponse, health_router, run_health_checks};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
