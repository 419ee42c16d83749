use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: User) -> UserResult<User>;

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// Look up by `twitter.id_str`
    async fn find_by_twitter_id(&self, twitter_id: &str) -> UserResult<Option<User>>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if users.contains_key(&user.id) {
            return Err(UserError::Database(format!(
                "duplicate key error: _id {}",
                user.id
            )));
        }

        users.insert(user.id, user.clone());
        tracing::info!(user_id = %user.id, username = %user.username, "Created user");
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_twitter_id(&self, twitter_id: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.twitter.as_ref().is_some_and(|t| t.id_str == twitter_id))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TwitterAccount;

    fn account(id: &str) -> TwitterAccount {
        TwitterAccount {
            id_str: id.to_string(),
            username: format!("user{id}"),
            name: "Someone".to_string(),
            raw: serde_json::Value::Null,
        }
    }

    #[tokio::test]
    async fn test_find_by_twitter_id() {
        let repo = InMemoryUserRepository::new();
        let user = repo.insert(User::from_twitter(account("100"))).await.unwrap();
        repo.insert(User::from_twitter(account("200"))).await.unwrap();

        let found = repo.find_by_twitter_id("100").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(repo.find_by_twitter_id("300").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_duplicate_id() {
        let repo = InMemoryUserRepository::new();
        let user = User::from_twitter(account("1"));
        repo.insert(user.clone()).await.unwrap();
        assert!(matches!(repo.insert(user).await, Err(UserError::Database(_))));
    }
}
