use core_config::{ConfigError, FromEnv, env_or_default, env_required};

/// Twitter OAuth 2.0 client settings
///
/// - `TWITTER_CLIENT_ID` (required)
/// - `TWITTER_CLIENT_SECRET` (required)
/// - `TWITTER_CALLBACK_URL` (required), e.g. `https://sage.example/auth/twitter/callback`
/// - `FRONTEND_URL` (default: `/`), where the browser lands after login
#[derive(Clone, Debug)]
pub struct TwitterConfig {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
    pub frontend_url: String,
}

impl TwitterConfig {
    /// `Ok(None)` when no Twitter client is configured at all, so the app
    /// can start without login routes
    pub fn from_env_optional() -> Result<Option<Self>, ConfigError> {
        if std::env::var("TWITTER_CLIENT_ID").is_err() {
            return Ok(None);
        }
        Self::from_env().map(Some)
    }
}

impl FromEnv for TwitterConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            client_id: env_required("TWITTER_CLIENT_ID")?,
            client_secret: env_required("TWITTER_CLIENT_SECRET")?,
            callback_url: env_required("TWITTER_CALLBACK_URL")?,
            frontend_url: env_or_default("FRONTEND_URL", "/"),
        })
    }
}
