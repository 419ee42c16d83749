//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Binary, Bson, Document, doc, spec::BinarySubtype},
    options::IndexOptions,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::UserResult;
use crate::models::User;
use crate::repository::UserRepository;

/// Filter on `_id` in the binary form the driver writes for `Uuid`
fn id_filter(id: Uuid) -> Document {
    let id = Binary {
        subtype: BinarySubtype::Generic,
        bytes: id.as_bytes().to_vec(),
    };
    doc! { "_id": Bson::Binary(id) }
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: Database) -> Self {
        Self {
            collection: db.collection::<User>("users"),
        }
    }

    /// Unique sparse index on `twitter.id_str`, so concurrent first logins
    /// cannot create two accounts
    pub async fn ensure_indexes(&self) -> UserResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "twitter.id_str": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .sparse(true)
                    .name("twitter_id_str".to_string())
                    .build(),
            )
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn insert(&self, user: User) -> UserResult<User> {
        self.collection.insert_one(&user).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "Created user");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let user = self.collection.find_one(id_filter(id)).await?;
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_by_twitter_id(&self, twitter_id: &str) -> UserResult<Option<User>> {
        let user = self
            .collection
            .find_one(doc! { "twitter.id_str": twitter_id })
            .await?;
        Ok(user)
    }
}
