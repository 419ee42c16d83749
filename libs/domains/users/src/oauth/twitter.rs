use async_trait::async_trait;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope, TokenResponse, TokenUrl,
    basic::BasicClient,
};
use serde::Deserialize;

use crate::config::TwitterConfig;
use crate::error::{UserError, UserResult};
use crate::models::TwitterAccount;
use crate::oauth::provider::{AuthorizationRequest, OAuthProvider};

const AUTH_URL: &str = "https://twitter.com/i/oauth2/authorize";
const TOKEN_URL: &str = "https://api.twitter.com/2/oauth2/token";
const USERS_ME_URL: &str = "https://api.twitter.com/2/users/me";
const SCOPES: &[&str] = &["users.read", "tweet.read"];

type TwitterClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

#[derive(Debug, Deserialize)]
struct UsersMeResponse {
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct UsersMeData {
    id: String,
    name: String,
    username: String,
}

/// Twitter OAuth 2.0 (PKCE) login
#[derive(Clone)]
pub struct TwitterProvider {
    client: TwitterClient,
    http_client: reqwest::Client,
}

impl TwitterProvider {
    pub fn new(config: &TwitterConfig) -> UserResult<Self> {
        let client = BasicClient::new(ClientId::new(config.client_id.clone()))
            .set_client_secret(ClientSecret::new(config.client_secret.clone()))
            .set_auth_uri(
                AuthUrl::new(AUTH_URL.to_string())
                    .map_err(|e| UserError::OAuth(format!("Invalid auth URL: {e}")))?,
            )
            .set_token_uri(
                TokenUrl::new(TOKEN_URL.to_string())
                    .map_err(|e| UserError::OAuth(format!("Invalid token URL: {e}")))?,
            )
            .set_redirect_uri(
                RedirectUrl::new(config.callback_url.clone())
                    .map_err(|e| UserError::OAuth(format!("Invalid redirect URL: {e}")))?,
            );

        // Token endpoints must not be followed through redirects
        let http_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| UserError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            http_client,
        })
    }

    fn parse_account(body: UsersMeResponse) -> UserResult<TwitterAccount> {
        let data: UsersMeData = serde_json::from_value(body.data.clone())
            .map_err(|e| UserError::OAuth(format!("Failed to parse user info: {e}")))?;
        Ok(TwitterAccount {
            id_str: data.id,
            username: data.username,
            name: data.name,
            raw: body.data,
        })
    }
}

#[async_trait]
impl OAuthProvider for TwitterProvider {
    fn name(&self) -> &str {
        "twitter"
    }

    fn authorize(&self) -> UserResult<AuthorizationRequest> {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let (url, state) = SCOPES
            .iter()
            .fold(
                self.client.authorize_url(CsrfToken::new_random),
                |request, scope| request.add_scope(Scope::new(scope.to_string())),
            )
            .set_pkce_challenge(pkce_challenge)
            .url();

        Ok(AuthorizationRequest {
            url: url.to_string(),
            state: state.secret().clone(),
            pkce_verifier: pkce_verifier.secret().clone(),
        })
    }

    async fn exchange_code(&self, code: &str, pkce_verifier: &str) -> UserResult<String> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier.to_string()))
            .request_async(&self.http_client)
            .await
            .map_err(|e| UserError::OAuth(format!("Failed to exchange code: {e}")))?;

        Ok(token.access_token().secret().clone())
    }

    async fn fetch_account(&self, access_token: &str) -> UserResult<TwitterAccount> {
        let response = self
            .http_client
            .get(USERS_ME_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| UserError::OAuth(format!("Failed to get user info: {e}")))?;

        if !response.status().is_success() {
            return Err(UserError::OAuth(format!(
                "Twitter API returned error: {}",
                response.status()
            )));
        }

        let body: UsersMeResponse = response
            .json()
            .await
            .map_err(|e| UserError::OAuth(format!("Failed to parse user info: {e}")))?;

        Self::parse_account(body)
    }
}
