//! Custom extractors for Axum handlers.
//!
//! All of them reject with an [`AppError`](crate::errors::AppError) so
//! failures share the JSON error format.

pub mod auth_user;
pub mod ids_path;
pub mod validated_json;

pub use auth_user::AuthUser;
pub use ids_path::IdsPath;
pub use validated_json::ValidatedJson;
