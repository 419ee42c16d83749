use async_trait::async_trait;

use crate::error::UserResult;
use crate::models::TwitterAccount;

/// Where to send the browser, plus the secrets to keep until the callback
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: String,
    pub state: String,
    pub pkce_verifier: String,
}

/// OAuth 2.0 authorization-code login with PKCE
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Build the authorize URL with a fresh random state and PKCE challenge
    fn authorize(&self) -> UserResult<AuthorizationRequest>;

    /// Trade the callback code for a provider access token
    async fn exchange_code(&self, code: &str, pkce_verifier: &str) -> UserResult<String>;

    /// Profile of the user the access token belongs to
    async fn fetch_account(&self, access_token: &str) -> UserResult<TwitterAccount>;
}
