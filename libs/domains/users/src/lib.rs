//! Users Domain
//!
//! Accounts are created on first Twitter login and looked up by Twitter id
//! afterwards. The session is a JWT in the `access_token` cookie.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use domain_users::{handlers, AuthState, InMemoryUserRepository, OAuthStateStore,
//!     TwitterConfig, TwitterProvider, UserService};
//!
//! let config = TwitterConfig::from_env()?;
//! let service = UserService::new(InMemoryUserRepository::new());
//! let router = handlers::twitter_router(AuthState {
//!     service: service.clone(),
//!     provider: Arc::new(TwitterProvider::new(&config)?),
//!     states: OAuthStateStore::new(),
//!     jwt_auth,
//!     frontend_url: config.frontend_url,
//!     secure_cookies: true,
//! });
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod oauth;
pub mod repository;
pub mod service;

pub use config::TwitterConfig;
pub use error::{UserError, UserResult};
pub use handlers::{ApiDoc, AuthState, SessionState};
pub use models::{Role, TwitterAccount, User, UserResponse};
pub use mongodb::MongoUserRepository;
pub use oauth::{AuthorizationRequest, OAuthProvider, OAuthStateStore, TwitterProvider};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
