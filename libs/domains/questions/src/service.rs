//! Question Service - Business logic layer

use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::authorization::authorize_owner;
use crate::error::{QuestionError, QuestionResult};
use crate::events::{QuestionEvent, QuestionEventPublisher};
use crate::models::{
    Answer, Comment, CommentParent, ContentInput, CreateQuestion, Question, QuestionQuery, StarOp,
    StarTarget, UpdateQuestion,
};
use crate::repository::QuestionRepository;

/// Most questions returned by one list call
pub const LIST_LIMIT: i64 = 20;

/// Question service orchestrating repository calls, ownership checks,
/// search-text refreshes and change events
pub struct QuestionService<R: QuestionRepository> {
    repository: Arc<R>,
    events: Arc<dyn QuestionEventPublisher>,
}

impl<R: QuestionRepository> QuestionService<R> {
    pub fn new(repository: R, events: Arc<dyn QuestionEventPublisher>) -> Self {
        Self {
            repository: Arc::new(repository),
            events,
        }
    }

    /// Parse the optional JSON filter from the list endpoint
    ///
    /// Absent, empty and `null` all mean "no filter".
    pub fn parse_query(raw: Option<&str>) -> QuestionResult<QuestionQuery> {
        let Some(raw) = raw.filter(|r| !r.is_empty()) else {
            return Ok(QuestionQuery::new());
        };
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(Value::Null) => Ok(QuestionQuery::new()),
            Ok(other) => Err(QuestionError::InvalidQuery(format!(
                "expected a JSON object, got {other}"
            ))),
            Err(e) => Err(QuestionError::InvalidQuery(e.to_string())),
        }
    }

    /// Newest questions first, at most [`LIST_LIMIT`]
    #[instrument(skip(self))]
    pub async fn list_questions(&self, raw_query: Option<&str>) -> QuestionResult<Vec<Question>> {
        let query = Self::parse_query(raw_query)?;
        self.repository.list(query, LIST_LIMIT).await
    }

    #[instrument(skip(self))]
    pub async fn get_question(&self, id: Uuid) -> QuestionResult<Question> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(QuestionError::NotFound)
    }

    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create_question(
        &self,
        input: CreateQuestion,
        caller: Uuid,
    ) -> QuestionResult<Question> {
        let question = self.repository.insert(Question::new(input, caller)).await?;
        self.events.publish(QuestionEvent::saved(question.clone()));
        Ok(question)
    }

    #[instrument(skip(self, input))]
    pub async fn update_question(
        &self,
        id: Uuid,
        input: UpdateQuestion,
        caller: Uuid,
    ) -> QuestionResult<Question> {
        let mut question = authorize_owner(self.get_question(id).await?, caller)?;
        question.apply_update(input);

        if self.repository.replace(question.clone()).await? == 0 {
            return Err(QuestionError::NotFound);
        }

        tracing::info!(question_id = %id, "Question updated");
        self.events.publish(QuestionEvent::saved(question.clone()));
        Ok(question)
    }

    #[instrument(skip(self))]
    pub async fn delete_question(&self, id: Uuid, caller: Uuid) -> QuestionResult<()> {
        let question = authorize_owner(self.get_question(id).await?, caller)?;

        if self.repository.delete(id).await? == 0 {
            return Err(QuestionError::NotFound);
        }

        self.events.publish(QuestionEvent::removed(question));
        Ok(())
    }

    #[instrument(skip(self, input))]
    pub async fn create_answer(
        &self,
        id: Uuid,
        input: ContentInput,
        caller: Uuid,
    ) -> QuestionResult<Question> {
        let count = self
            .repository
            .push_answer(id, Answer::new(input, caller))
            .await?;
        self.after_nested_change(id, count).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_answer(
        &self,
        id: Uuid,
        answer_id: Uuid,
        input: ContentInput,
        caller: Uuid,
    ) -> QuestionResult<Question> {
        let count = self
            .repository
            .set_answer_content(id, answer_id, input.content, caller)
            .await?;
        self.after_nested_change(id, count).await
    }

    #[instrument(skip(self))]
    pub async fn delete_answer(
        &self,
        id: Uuid,
        answer_id: Uuid,
        caller: Uuid,
    ) -> QuestionResult<Question> {
        let count = self.repository.pull_answer(id, answer_id, caller).await?;
        self.after_nested_change(id, count).await
    }

    /// Comment on the question itself or, with `CommentParent::Answer`, on one of its answers
    #[instrument(skip(self, input))]
    pub async fn create_comment(
        &self,
        id: Uuid,
        parent: CommentParent,
        input: ContentInput,
        caller: Uuid,
    ) -> QuestionResult<Question> {
        let count = self
            .repository
            .push_comment(id, parent, Comment::new(input, caller))
            .await?;
        self.after_nested_change(id, count).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_comment(
        &self,
        id: Uuid,
        parent: CommentParent,
        comment_id: Uuid,
        input: ContentInput,
        caller: Uuid,
    ) -> QuestionResult<Question> {
        let count = self
            .repository
            .set_comment_content(id, parent, comment_id, input.content, caller)
            .await?;
        self.after_nested_change(id, count).await
    }

    #[instrument(skip(self))]
    pub async fn delete_comment(
        &self,
        id: Uuid,
        parent: CommentParent,
        comment_id: Uuid,
        caller: Uuid,
    ) -> QuestionResult<Question> {
        let count = self
            .repository
            .pull_comment(id, parent, comment_id, caller)
            .await?;
        self.after_nested_change(id, count).await
    }

    /// Star or unstar; stars do not touch search text or emit events
    #[instrument(skip(self))]
    pub async fn star(
        &self,
        id: Uuid,
        target: StarTarget,
        op: StarOp,
        caller: Uuid,
    ) -> QuestionResult<Question> {
        if self.repository.star(id, target, op, caller).await? == 0 {
            return Err(QuestionError::NotFound);
        }
        self.get_question(id).await
    }

    async fn after_nested_change(&self, id: Uuid, count: u64) -> QuestionResult<Question> {
        if count == 0 {
            return Err(QuestionError::NotFound);
        }

        if let Err(e) = self.repository.update_search_text(id).await {
            tracing::warn!(question_id = %id, error = %e, "Failed to refresh search text");
        }

        let question = self.get_question(id).await?;
        self.events.publish(QuestionEvent::saved(question.clone()));
        Ok(question)
    }
}

impl<R: QuestionRepository> Clone for QuestionService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            events: Arc::clone(&self.events),
        }
    }
}
