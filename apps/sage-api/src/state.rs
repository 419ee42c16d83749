//! Shared application state

use axum_helpers::JwtAuth;
use domain_questions::QuestionEvents;
use mongodb::{Client, Database};

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// Shares the underlying connection pool across clones
    pub mongo_client: Client,
    pub db: Database,
    pub jwt_auth: JwtAuth,
    pub question_events: QuestionEvents,
}
