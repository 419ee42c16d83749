use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_helpers::{
    ACCESS_TOKEN_COOKIE, AuthUser, JwtAuth, SESSION_TOKEN_TTL,
    errors::responses::{InternalServerErrorResponse, UnauthorizedResponse},
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi};

use crate::error::UserError;
use crate::models::{Role, UserResponse};
use crate::oauth::{OAuthProvider, OAuthState, OAuthStateStore};
use crate::repository::UserRepository;
use crate::service::UserService;

/// OpenAPI documentation for the auth endpoints
#[derive(OpenApi)]
#[openapi(
    paths(me, logout, twitter_login, twitter_callback),
    components(
        schemas(UserResponse, Role),
        responses(UnauthorizedResponse, InternalServerErrorResponse)
    ),
    tags((name = "Auth", description = "Twitter login and session"))
)]
pub struct ApiDoc;

/// Shared state for the Twitter login routes
pub struct AuthState<R: UserRepository> {
    pub service: UserService<R>,
    pub provider: Arc<dyn OAuthProvider>,
    pub states: OAuthStateStore,
    pub jwt_auth: JwtAuth,
    /// Where the browser lands after a successful login
    pub frontend_url: String,
    /// Add `Secure` to the session cookie
    pub secure_cookies: bool,
}

impl<R: UserRepository> Clone for AuthState<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            provider: Arc::clone(&self.provider),
            states: self.states.clone(),
            jwt_auth: self.jwt_auth.clone(),
            frontend_url: self.frontend_url.clone(),
            secure_cookies: self.secure_cookies,
        }
    }
}

/// Shared state for `/me` and `/logout`
pub struct SessionState<R: UserRepository> {
    pub service: UserService<R>,
    pub secure_cookies: bool,
}

impl<R: UserRepository> Clone for SessionState<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            secure_cookies: self.secure_cookies,
        }
    }
}

/// Query parameters Twitter appends to the callback URL
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OAuthCallbackQuery {
    pub code: String,
    pub state: String,
}

fn session_cookie(token: &str, max_age: i64, secure: bool) -> Result<HeaderValue, UserError> {
    let secure_flag = if secure { " Secure;" } else { "" };
    let cookie = format!(
        "{ACCESS_TOKEN_COOKIE}={token}; HttpOnly;{secure_flag} SameSite=Lax; Path=/; Max-Age={max_age}"
    );
    HeaderValue::from_str(&cookie)
        .map_err(|e| UserError::Internal(format!("Failed to create cookie: {e}")))
}

/// Session routes: `GET /me`, `POST /logout`
pub fn session_router<R: UserRepository + 'static>(
    service: UserService<R>,
    secure_cookies: bool,
) -> Router {
    Router::new()
        .route("/me", get(me::<R>))
        .route("/logout", post(logout::<R>))
        .with_state(SessionState {
            service,
            secure_cookies,
        })
}

/// Twitter login routes: `GET /twitter`, `GET /twitter/callback`
pub fn twitter_router<R: UserRepository + 'static>(state: AuthState<R>) -> Router {
    Router::new()
        .route("/twitter", get(twitter_login::<R>))
        .route("/twitter/callback", get(twitter_callback::<R>))
        .with_state(state)
}

/// Current user
#[utoipa::path(
    get,
    path = "/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Signed-in user", body = UserResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, description = "Token refers to a deleted user"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn me<R: UserRepository>(
    State(state): State<SessionState<R>>,
    user: AuthUser,
) -> Result<Json<UserResponse>, UserError> {
    let user = state.service.get_user(user.id).await?;
    Ok(Json(user.into()))
}

/// Clear the session cookie
#[utoipa::path(
    post,
    path = "/logout",
    tag = "Auth",
    responses((status = 204, description = "Session cookie cleared"))
)]
async fn logout<R: UserRepository>(
    State(state): State<SessionState<R>>,
) -> Result<Response, UserError> {
    let cookie = session_cookie("", 0, state.secure_cookies)?;
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        StatusCode::NO_CONTENT,
    )
        .into_response())
}

/// Start Twitter login
#[utoipa::path(
    get,
    path = "/twitter",
    tag = "Auth",
    responses(
        (status = 303, description = "Redirect to Twitter's consent page"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn twitter_login<R: UserRepository>(
    State(state): State<AuthState<R>>,
) -> Result<Redirect, UserError> {
    let request = state.provider.authorize()?;
    state.states.store(
        request.state,
        OAuthState {
            pkce_verifier: request.pkce_verifier,
        },
    )?;

    tracing::debug!(provider = state.provider.name(), "Redirecting to OAuth provider");
    Ok(Redirect::to(&request.url))
}

/// Finish Twitter login: find or create the user, set the session cookie
#[utoipa::path(
    get,
    path = "/twitter/callback",
    tag = "Auth",
    params(OAuthCallbackQuery),
    responses(
        (status = 302, description = "Signed in, redirect to the frontend"),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn twitter_callback<R: UserRepository>(
    State(state): State<AuthState<R>>,
    Query(query): Query<OAuthCallbackQuery>,
) -> Result<Response, UserError> {
    let pending = state.states.consume(&query.state).inspect_err(|e| {
        tracing::warn!(error = %e, "Rejected OAuth callback state");
    })?;

    let access_token = state
        .provider
        .exchange_code(&query.code, &pending.pkce_verifier)
        .await?;
    let account = state.provider.fetch_account(&access_token).await?;
    let user = state.service.find_or_create_twitter_user(account).await?;

    let token = state
        .jwt_auth
        .create_session_token(&user.id.to_string(), &user.name, &user.roles())
        .map_err(|e| {
            tracing::error!("Failed to create session token: {:?}", e);
            UserError::Internal("Failed to create token".to_string())
        })?;

    let cookie = session_cookie(&token, SESSION_TOKEN_TTL, state.secure_cookies)?;
    let location = HeaderValue::from_str(&state.frontend_url)
        .map_err(|e| UserError::Internal(format!("Invalid frontend URL: {e}")))?;

    tracing::info!(user_id = %user.id, "User signed in with Twitter");
    Ok((
        StatusCode::FOUND,
        AppendHeaders([(header::SET_COOKIE, cookie), (header::LOCATION, location)]),
    )
        .into_response())
}
