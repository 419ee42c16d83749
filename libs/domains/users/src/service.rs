use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{TwitterAccount, User};
use crate::repository::UserRepository;

/// Service layer for User business logic
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: Uuid) -> UserResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    /// Returning Twitter users are matched on their Twitter id; anyone else
    /// gets a new `user`-role account
    #[instrument(skip(self, account), fields(twitter_id = %account.id_str))]
    pub async fn find_or_create_twitter_user(&self, account: TwitterAccount) -> UserResult<User> {
        if let Some(user) = self.repository.find_by_twitter_id(&account.id_str).await? {
            tracing::debug!(user_id = %user.id, "Existing Twitter user");
            return Ok(user);
        }

        let user = self.repository.insert(User::from_twitter(account)).await?;
        tracing::info!(user_id = %user.id, "Registered new Twitter user");
        Ok(user)
    }
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
