//! Stateless JWT authentication.
//!
//! - [`JwtAuth`] signs and verifies HS256 tokens
//! - [`optional_jwt_auth_middleware`] attaches verified [`JwtClaims`] to requests
//! - [`AuthUser`](crate::extractors::AuthUser) turns those claims into the caller identity
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig, optional_jwt_auth_middleware};
//! use core_config::FromEnv;
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//!
//! let app = Router::new()
//!     .merge(routes)
//!     .layer(axum::middleware::from_fn_with_state(auth, optional_jwt_auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::JwtConfig;
pub use jwt::{ACCESS_TOKEN_TTL, JwtAuth, JwtClaims, SESSION_TOKEN_TTL};
pub use middleware::{ACCESS_TOKEN_COOKIE, optional_jwt_auth_middleware};
