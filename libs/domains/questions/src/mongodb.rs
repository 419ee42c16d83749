//! MongoDB implementation of QuestionRepository

use async_trait::async_trait;
use mongodb::{
    Collection, Database,
    bson::{Binary, Bson, Document, doc, spec::BinarySubtype, to_document, to_raw_document_buf},
};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{QuestionError, QuestionResult};
use crate::models::{Answer, Comment, CommentParent, Question, QuestionQuery, StarOp, StarTarget};
use crate::repository::QuestionRepository;

/// A uuid as the driver stores it: generic binary, the same bytes
/// `insert_one` and `replace_one` write for every `Uuid` field
fn uuid_bson(id: Uuid) -> Bson {
    Bson::Binary(Binary {
        subtype: BinarySubtype::Generic,
        bytes: id.as_bytes().to_vec(),
    })
}

/// Embedded document encoded the way the driver encodes whole questions
fn embedded<T: Serialize>(value: &T) -> QuestionResult<Bson> {
    let document = to_raw_document_buf(value)?
        .to_document()
        .map_err(|e| QuestionError::Store(e.to_string()))?;
    Ok(Bson::Document(document))
}

/// MongoDB implementation of the QuestionRepository
pub struct MongoQuestionRepository {
    collection: Collection<Question>,
}

impl MongoQuestionRepository {
    /// Create a new MongoQuestionRepository over the `questions` collection
    ///
    /// # Example
    /// ```ignore
    /// let client = Client::with_uri_str("mongodb://localhost/sage-dev").await?;
    /// let repo = MongoQuestionRepository::new(client.database("sage-dev"));
    /// ```
    pub fn new(db: Database) -> Self {
        Self::with_collection(db, "questions")
    }

    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        let collection = db.collection::<Question>(collection_name);
        Self { collection }
    }

    pub fn collection(&self) -> &Collection<Question> {
        &self.collection
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": uuid_bson(id) }
    }

    /// Question id plus one array element that must exist
    fn element_filter(id: Uuid, array: &str, element_id: Uuid) -> Document {
        let mut filter = Self::id_filter(id);
        filter.insert(format!("{array}._id"), uuid_bson(element_id));
        filter
    }

    /// Filter and array path for the comment list under `parent`
    fn comments_location(id: Uuid, parent: CommentParent) -> (Document, String) {
        match parent {
            CommentParent::Question => (Self::id_filter(id), "comments".to_string()),
            CommentParent::Answer(answer_id) => (
                Self::element_filter(id, "answers", answer_id),
                "answers.$.comments".to_string(),
            ),
        }
    }

    /// Filter and content path for a comment the caller wrote on the answer
    /// at `index`
    fn owned_answer_comment(
        id: Uuid,
        index: usize,
        comment_id: Uuid,
        user: Uuid,
    ) -> (Document, String) {
        let comments = format!("answers.{index}.comments");
        let mut filter = Self::id_filter(id);
        filter.insert(
            comments.clone(),
            doc! { "$elemMatch": { "_id": uuid_bson(comment_id), "user": uuid_bson(user) } },
        );
        (filter, format!("{comments}.$.content"))
    }

    fn star_update(op: StarOp, path: &str, user: Uuid) -> Document {
        let operator = match op {
            StarOp::Append => "$push",
            StarOp::Remove => "$pull",
        };
        doc! { operator: { path: uuid_bson(user) } }
    }

    fn pull_owned(path: &str, element_id: Uuid, user: Uuid) -> Document {
        doc! {
            "$pull": { path: { "_id": uuid_bson(element_id), "user": uuid_bson(user) } }
        }
    }

    /// Index of `answer_id` in the stored question; answer comments are
    /// addressed by position because positional `$` only resolves one level
    async fn answer_position(&self, id: Uuid, answer_id: Uuid) -> QuestionResult<Option<usize>> {
        let question = self.collection.find_one(Self::id_filter(id)).await?;
        Ok(question.and_then(|q| q.answer_index(answer_id)))
    }

    async fn update_count(&self, filter: Document, update: Document) -> QuestionResult<u64> {
        let result = self.collection.update_one(filter, update).await?;
        Ok(result.matched_count)
    }

    async fn removal_count(&self, filter: Document, update: Document) -> QuestionResult<u64> {
        let result = self.collection.update_one(filter, update).await?;
        Ok(result.modified_count)
    }
}

#[async_trait]
impl QuestionRepository for MongoQuestionRepository {
    #[instrument(skip(self, question), fields(question_id = %question.id))]
    async fn insert(&self, question: Question) -> QuestionResult<Question> {
        self.collection.insert_one(&question).await?;
        tracing::info!(question_id = %question.id, "Question created");
        Ok(question)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> QuestionResult<Option<Question>> {
        let question = self.collection.find_one(Self::id_filter(id)).await?;
        Ok(question)
    }

    #[instrument(skip(self))]
    async fn list(&self, query: QuestionQuery, limit: i64) -> QuestionResult<Vec<Question>> {
        use futures_util::TryStreamExt;

        let filter = to_document(&query)?;
        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .await?;
        let questions: Vec<Question> = cursor.try_collect().await?;
        Ok(questions)
    }

    #[instrument(skip(self, question), fields(question_id = %question.id))]
    async fn replace(&self, question: Question) -> QuestionResult<u64> {
        let result = self
            .collection
            .replace_one(Self::id_filter(question.id), &question)
            .await?;
        Ok(result.matched_count)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> QuestionResult<u64> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;
        if result.deleted_count > 0 {
            tracing::info!(question_id = %id, "Question deleted");
        }
        Ok(result.deleted_count)
    }

    #[instrument(skip(self, answer), fields(answer_id = %answer.id))]
    async fn push_answer(&self, id: Uuid, answer: Answer) -> QuestionResult<u64> {
        let update = doc! { "$push": { "answers": embedded(&answer)? } };
        self.update_count(Self::id_filter(id), update).await
    }

    #[instrument(skip(self))]
    async fn pull_answer(&self, id: Uuid, answer_id: Uuid, user: Uuid) -> QuestionResult<u64> {
        let update = Self::pull_owned("answers", answer_id, user);
        self.removal_count(Self::id_filter(id), update).await
    }

    #[instrument(skip(self, content))]
    async fn set_answer_content(
        &self,
        id: Uuid,
        answer_id: Uuid,
        content: String,
        user: Uuid,
    ) -> QuestionResult<u64> {
        let filter = Self::element_filter(id, "answers", answer_id);
        let update = doc! {
            "$set": { "answers.$.content": content, "answers.$.user": uuid_bson(user) }
        };
        self.update_count(filter, update).await
    }

    #[instrument(skip(self, comment), fields(comment_id = %comment.id))]
    async fn push_comment(
        &self,
        id: Uuid,
        parent: CommentParent,
        comment: Comment,
    ) -> QuestionResult<u64> {
        let (filter, path) = Self::comments_location(id, parent);
        let update = doc! { "$push": { path: embedded(&comment)? } };
        self.update_count(filter, update).await
    }

    #[instrument(skip(self))]
    async fn pull_comment(
        &self,
        id: Uuid,
        parent: CommentParent,
        comment_id: Uuid,
        user: Uuid,
    ) -> QuestionResult<u64> {
        let (filter, path) = Self::comments_location(id, parent);
        let update = Self::pull_owned(&path, comment_id, user);
        self.removal_count(filter, update).await
    }

    #[instrument(skip(self, content))]
    async fn set_comment_content(
        &self,
        id: Uuid,
        parent: CommentParent,
        comment_id: Uuid,
        content: String,
        user: Uuid,
    ) -> QuestionResult<u64> {
        match parent {
            CommentParent::Question => {
                let filter = Self::element_filter(id, "comments", comment_id);
                let update = doc! {
                    "$set": { "comments.$.content": content, "comments.$.user": uuid_bson(user) }
                };
                self.update_count(filter, update).await
            }
            CommentParent::Answer(answer_id) => {
                let Some(index) = self.answer_position(id, answer_id).await? else {
                    return Ok(0);
                };
                let (filter, path) = Self::owned_answer_comment(id, index, comment_id, user);
                let update = doc! { "$set": { path: content } };
                self.update_count(filter, update).await
            }
        }
    }

    #[instrument(skip(self))]
    async fn star(
        &self,
        id: Uuid,
        target: StarTarget,
        op: StarOp,
        user: Uuid,
    ) -> QuestionResult<u64> {
        let (filter, path) = match target {
            StarTarget::Question => (Self::id_filter(id), "stars".to_string()),
            StarTarget::Answer(answer_id) => (
                Self::element_filter(id, "answers", answer_id),
                "answers.$.stars".to_string(),
            ),
            StarTarget::Comment(comment_id) => (
                Self::element_filter(id, "comments", comment_id),
                "comments.$.stars".to_string(),
            ),
            StarTarget::AnswerComment {
                answer_id,
                comment_id,
            } => {
                let Some(index) = self.answer_position(id, answer_id).await? else {
                    return Ok(0);
                };
                let comments = format!("answers.{index}.comments");
                (
                    Self::element_filter(id, &comments, comment_id),
                    format!("{comments}.$.stars"),
                )
            }
        };
        let update = Self::star_update(op, &path, user);
        self.update_count(filter, update).await
    }

    #[instrument(skip(self))]
    async fn update_search_text(&self, id: Uuid) -> QuestionResult<()> {
        let question = self
            .collection
            .find_one(Self::id_filter(id))
            .await?
            .ok_or(QuestionError::NotFound)?;

        let update = doc! { "$set": { "search_text": question.build_search_text() } };
        self.collection
            .update_one(Self::id_filter(id), update)
            .await?;
        Ok(())
    }
}
