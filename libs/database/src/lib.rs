//! Database connectors for the document store
//!
//! Owns connection setup, pool configuration and health probing. Query
//! construction lives in the domain crates that own the documents.
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB support
//! - `config` - environment loading via `core_config::FromEnv`
//!
//! # Example
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, connect_from_config_with_retry};
//!
//! let config = MongoConfig::with_database("mongodb://localhost:27017", "sage-dev");
//! let client = connect_from_config_with_retry(&config, None).await?;
//! let db = client.database(config.database());
//! ```

// Always available modules
pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult};
