use axum_helpers::JwtConfig;
use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use database::mongodb::MongoConfig;
use domain_users::TwitterConfig;

pub use core_config::Environment;

/// Application configuration, composed from the shared config pieces
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    /// `None` leaves the login routes unmounted
    pub twitter: Option<TwitterConfig>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let app = app_info!();

        let mut mongodb = MongoConfig::from_env_for(&environment)?;
        if mongodb.app_name.is_none() {
            mongodb = mongodb.with_app_name(app.name);
        }

        Ok(Self {
            mongodb,
            server: ServerConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            twitter: TwitterConfig::from_env_optional()?,
            app,
            environment,
        })
    }
}
