//! MongoDB connector
//!
//! Connection setup, per-environment configuration and health probing.

mod config;
mod connector;
mod health;

pub use config::MongoConfig;
pub use connector::{connect_from_config, connect_from_config_with_retry};
pub use health::{HealthStatus, check_health, check_health_detailed};

// Re-export driver types so callers don't need a direct dependency for wiring
pub use mongodb::{Client, Collection, Database};
