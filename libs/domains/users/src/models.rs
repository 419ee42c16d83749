use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

/// User roles
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr,
    EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// Twitter account linked to a user, as returned by `GET /2/users/me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TwitterAccount {
    /// Twitter's user id; the lookup key for returning users
    pub id_str: String,
    pub username: String,
    pub name: String,
    /// Full provider payload
    #[serde(default)]
    #[schema(value_type = Object)]
    pub raw: serde_json::Value,
}

/// User entity - one document in the `users` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Display name
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub role: Role,
    /// Login provider, e.g. `twitter`
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<TwitterAccount>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// New `user`-role account created from a first Twitter login
    pub fn from_twitter(account: TwitterAccount) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: account.name.clone(),
            username: account.username.clone(),
            role: Role::User,
            provider: "twitter".to_string(),
            twitter: Some(account),
            created_at: Utc::now(),
        }
    }

    pub fn roles(&self) -> Vec<String> {
        vec![self.role.to_string()]
    }
}

/// Public view of a user; provider payloads stay server-side
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub role: Role,
    pub provider: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            role: user.role,
            provider: user.provider,
            created_at: user.created_at,
        }
    }
}
