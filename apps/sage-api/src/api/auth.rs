//! Session and Twitter login routes

use std::sync::Arc;

use axum::Router;
use domain_users::{
    AuthState, MongoUserRepository, OAuthStateStore, TwitterProvider, UserResult, UserService,
    handlers,
};
use mongodb::Database;
use tracing::{info, warn};

use crate::state::AppState;

/// Create the unique index on the Twitter account id
pub async fn init_indexes(db: &Database) -> UserResult<()> {
    MongoUserRepository::new(db.clone()).ensure_indexes().await
}

/// `/me` and `/logout` always; `/twitter` and `/twitter/callback` only when
/// Twitter credentials are configured
pub fn router(state: &AppState) -> UserResult<Router> {
    let service = UserService::new(MongoUserRepository::new(state.db.clone()));
    let secure_cookies = state.config.environment.use_https();

    let router = handlers::session_router(service.clone(), secure_cookies);

    let Some(twitter) = &state.config.twitter else {
        warn!("TWITTER_CLIENT_ID not set, Twitter login routes are disabled");
        return Ok(router);
    };

    info!(callback_url = %twitter.callback_url, "Twitter login enabled");
    let login = handlers::twitter_router(AuthState {
        service,
        provider: Arc::new(TwitterProvider::new(twitter)?),
        states: OAuthStateStore::new(),
        jwt_auth: state.jwt_auth.clone(),
        frontend_url: twitter.frontend_url.clone(),
        secure_cookies,
    });

    Ok(router.merge(login))
}
