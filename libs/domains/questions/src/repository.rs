use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{QuestionError, QuestionResult};
use crate::models::{Answer, Comment, CommentParent, Question, QuestionQuery, StarOp, StarTarget};

/// Repository trait for Question persistence
///
/// Every mutation is a single conditional update and returns how many
/// documents it touched. Removals report modified documents, so a caller
/// that does not own the element gets 0; everything else reports matched
/// documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn insert(&self, question: Question) -> QuestionResult<Question>;

    async fn find_by_id(&self, id: Uuid) -> QuestionResult<Option<Question>>;

    /// Questions matching `query`, newest first
    async fn list(&self, query: QuestionQuery, limit: i64) -> QuestionResult<Vec<Question>>;

    /// Replace the stored document with the same id
    async fn replace(&self, question: Question) -> QuestionResult<u64>;

    async fn delete(&self, id: Uuid) -> QuestionResult<u64>;

    async fn push_answer(&self, id: Uuid, answer: Answer) -> QuestionResult<u64>;

    /// Remove the answer only if `user` wrote it
    async fn pull_answer(&self, id: Uuid, answer_id: Uuid, user: Uuid) -> QuestionResult<u64>;

    /// Overwrite content and author of an answer
    async fn set_answer_content(
        &self,
        id: Uuid,
        answer_id: Uuid,
        content: String,
        user: Uuid,
    ) -> QuestionResult<u64>;

    async fn push_comment(
        &self,
        id: Uuid,
        parent: CommentParent,
        comment: Comment,
    ) -> QuestionResult<u64>;

    /// Remove the comment only if `user` wrote it
    async fn pull_comment(
        &self,
        id: Uuid,
        parent: CommentParent,
        comment_id: Uuid,
        user: Uuid,
    ) -> QuestionResult<u64>;

    /// Question comments: overwrite content and author.
    /// Answer comments: overwrite content of a comment `user` wrote.
    async fn set_comment_content(
        &self,
        id: Uuid,
        parent: CommentParent,
        comment_id: Uuid,
        content: String,
        user: Uuid,
    ) -> QuestionResult<u64>;

    async fn star(&self, id: Uuid, target: StarTarget, op: StarOp, user: Uuid)
    -> QuestionResult<u64>;

    /// Recompute and store `search_text`
    async fn update_search_text(&self, id: Uuid) -> QuestionResult<()>;
}

/// In-memory implementation of QuestionRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryQuestionRepository {
    questions: Arc<RwLock<HashMap<Uuid, Question>>>,
}

impl InMemoryQuestionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `f` to the stored question, returning 0 when it is absent
    async fn with_question<F>(&self, id: Uuid, f: F) -> u64
    where
        F: FnOnce(&mut Question) -> u64 + Send,
    {
        let mut questions = self.questions.write().await;
        questions.get_mut(&id).map_or(0, f)
    }
}

fn comments_of(question: &mut Question, parent: CommentParent) -> Option<&mut Vec<Comment>> {
    match parent {
        CommentParent::Question => Some(&mut question.comments),
        CommentParent::Answer(answer_id) => question
            .answers
            .iter_mut()
            .find(|a| a.id == answer_id)
            .map(|a| &mut a.comments),
    }
}

fn stars_of(question: &mut Question, target: StarTarget) -> Option<&mut Vec<Uuid>> {
    match target {
        StarTarget::Question => Some(&mut question.stars),
        StarTarget::Answer(answer_id) => question
            .answers
            .iter_mut()
            .find(|a| a.id == answer_id)
            .map(|a| &mut a.stars),
        StarTarget::Comment(comment_id) => question
            .comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .map(|c| &mut c.stars),
        StarTarget::AnswerComment {
            answer_id,
            comment_id,
        } => comments_of(question, CommentParent::Answer(answer_id))?
            .iter_mut()
            .find(|c| c.id == comment_id)
            .map(|c| &mut c.stars),
    }
}

/// Remove the first element matching `pred`, returning the modified count
fn pull_first<T>(items: &mut Vec<T>, pred: impl Fn(&T) -> bool) -> u64 {
    match items.iter().position(pred) {
        Some(index) => {
            items.remove(index);
            1
        }
        None => 0,
    }
}

/// Document-store style equality: dotted paths descend into objects and
/// fan out over arrays
fn matches_path(value: &Value, path: &[&str], expected: &Value) -> bool {
    match (path.split_first(), value) {
        (None, Value::Array(items)) => value == expected || items.contains(expected),
        (None, _) => value == expected,
        (Some((head, rest)), Value::Object(map)) => map
            .get(*head)
            .is_some_and(|child| matches_path(child, rest, expected)),
        (Some((head, rest)), Value::Array(items)) => match head.parse::<usize>() {
            Ok(index) => items
                .get(index)
                .is_some_and(|child| matches_path(child, rest, expected)),
            Err(_) => items.iter().any(|item| matches_path(item, path, expected)),
        },
        (Some(_), _) => false,
    }
}

fn matches_query(question: &Question, query: &QuestionQuery) -> QuestionResult<bool> {
    if query.is_empty() {
        return Ok(true);
    }
    let document =
        serde_json::to_value(question).map_err(|e| QuestionError::Store(e.to_string()))?;

    for (key, expected) in query {
        if key.starts_with('$') || expected.as_object().is_some_and(|o| o.keys().any(|k| k.starts_with('$'))) {
            return Err(QuestionError::Store(format!(
                "unsupported query operator in '{key}'"
            )));
        }
        let path: Vec<&str> = key.split('.').collect();
        if !matches_path(&document, &path, expected) {
            return Ok(false);
        }
    }
    Ok(true)
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn insert(&self, question: Question) -> QuestionResult<Question> {
        let mut questions = self.questions.write().await;
        if questions.contains_key(&question.id) {
            return Err(QuestionError::Store(format!(
                "duplicate key error: _id {}",
                question.id
            )));
        }
        questions.insert(question.id, question.clone());
        Ok(question)
    }

    async fn find_by_id(&self, id: Uuid) -> QuestionResult<Option<Question>> {
        let questions = self.questions.read().await;
        Ok(questions.get(&id).cloned())
    }

    async fn list(&self, query: QuestionQuery, limit: i64) -> QuestionResult<Vec<Question>> {
        let questions = self.questions.read().await;

        let mut matched = Vec::new();
        for question in questions.values() {
            if matches_query(question, &query)? {
                matched.push(question.clone());
            }
        }

        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        matched.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(matched)
    }

    async fn replace(&self, question: Question) -> QuestionResult<u64> {
        let mut questions = self.questions.write().await;
        match questions.get_mut(&question.id) {
            Some(stored) => {
                *stored = question;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: Uuid) -> QuestionResult<u64> {
        let mut questions = self.questions.write().await;
        Ok(u64::from(questions.remove(&id).is_some()))
    }

    async fn push_answer(&self, id: Uuid, answer: Answer) -> QuestionResult<u64> {
        Ok(self
            .with_question(id, |q| {
                q.answers.push(answer);
                1
            })
            .await)
    }

    async fn pull_answer(&self, id: Uuid, answer_id: Uuid, user: Uuid) -> QuestionResult<u64> {
        Ok(self
            .with_question(id, |q| {
                pull_first(&mut q.answers, |a| a.id == answer_id && a.user == user)
            })
            .await)
    }

    async fn set_answer_content(
        &self,
        id: Uuid,
        answer_id: Uuid,
        content: String,
        user: Uuid,
    ) -> QuestionResult<u64> {
        Ok(self
            .with_question(id, |q| match q.answers.iter_mut().find(|a| a.id == answer_id) {
                Some(answer) => {
                    answer.content = content;
                    answer.user = user;
                    1
                }
                None => 0,
            })
            .await)
    }

    async fn push_comment(
        &self,
        id: Uuid,
        parent: CommentParent,
        comment: Comment,
    ) -> QuestionResult<u64> {
        Ok(self
            .with_question(id, |q| match comments_of(q, parent) {
                Some(comments) => {
                    comments.push(comment);
                    1
                }
                None => 0,
            })
            .await)
    }

    async fn pull_comment(
        &self,
        id: Uuid,
        parent: CommentParent,
        comment_id: Uuid,
        user: Uuid,
    ) -> QuestionResult<u64> {
        Ok(self
            .with_question(id, |q| {
                comments_of(q, parent).map_or(0, |comments| {
                    pull_first(comments, |c| c.id == comment_id && c.user == user)
                })
            })
            .await)
    }

    async fn set_comment_content(
        &self,
        id: Uuid,
        parent: CommentParent,
        comment_id: Uuid,
        content: String,
        user: Uuid,
    ) -> QuestionResult<u64> {
        Ok(self
            .with_question(id, |q| {
                let Some(comments) = comments_of(q, parent) else {
                    return 0;
                };
                match parent {
                    CommentParent::Question => {
                        match comments.iter_mut().find(|c| c.id == comment_id) {
                            Some(comment) => {
                                comment.content = content;
                                comment.user = user;
                                1
                            }
                            None => 0,
                        }
                    }
                    CommentParent::Answer(_) => {
                        match comments
                            .iter_mut()
                            .find(|c| c.id == comment_id && c.user == user)
                        {
                            Some(comment) => {
                                comment.content = content;
                                1
                            }
                            None => 0,
                        }
                    }
                }
            })
            .await)
    }

    async fn star(
        &self,
        id: Uuid,
        target: StarTarget,
        op: StarOp,
        user: Uuid,
    ) -> QuestionResult<u64> {
        Ok(self
            .with_question(id, |q| {
                let Some(stars) = stars_of(q, target) else {
                    return 0;
                };
                match op {
                    StarOp::Append => stars.push(user),
                    StarOp::Remove => stars.retain(|s| *s != user),
                }
                1
            })
            .await)
    }

    async fn update_search_text(&self, id: Uuid) -> QuestionResult<()> {
        self.with_question(id, |q| {
            q.refresh_search_text();
            1
        })
        .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentInput, CreateQuestion};
    use serde_json::json;

    fn input(text: &str) -> ContentInput {
        ContentInput {
            content: text.to_string(),
        }
    }

    async fn seeded(owner: Uuid) -> (InMemoryQuestionRepository, Question) {
        let repo = InMemoryQuestionRepository::new();
        let question = Question::new(
            CreateQuestion {
                title: "How do lifetimes work?".to_string(),
                content: "Borrow checker confusion".to_string(),
            },
            owner,
        );
        let question = repo.insert(question).await.unwrap();
        (repo, question)
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let owner = Uuid::now_v7();
        let (repo, question) = seeded(owner).await;
        let found = repo.find_by_id(question.id).await.unwrap().unwrap();
        assert_eq!(found, question);
        assert!(repo.find_by_id(Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_duplicate_id_is_store_error() {
        let (repo, question) = seeded(Uuid::now_v7()).await;
        let err = repo.insert(question).await.unwrap_err();
        assert!(matches!(err, QuestionError::Store(_)));
    }

    #[tokio::test]
    async fn test_pull_answer_requires_author() {
        let owner = Uuid::now_v7();
        let (repo, question) = seeded(owner).await;
        let answer = Answer::new(input("Read the book"), owner);
        let answer_id = answer.id;
        assert_eq!(repo.push_answer(question.id, answer).await.unwrap(), 1);

        let stranger = Uuid::now_v7();
        assert_eq!(repo.pull_answer(question.id, answer_id, stranger).await.unwrap(), 0);
        assert_eq!(repo.pull_answer(question.id, answer_id, owner).await.unwrap(), 1);
        assert_eq!(repo.pull_answer(question.id, answer_id, owner).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_push_answer_missing_question() {
        let repo = InMemoryQuestionRepository::new();
        let answer = Answer::new(input("orphan"), Uuid::now_v7());
        assert_eq!(repo.push_answer(Uuid::now_v7(), answer).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_set_answer_content_overwrites_author() {
        let owner = Uuid::now_v7();
        let (repo, question) = seeded(owner).await;
        let answer = Answer::new(input("first"), owner);
        let answer_id = answer.id;
        repo.push_answer(question.id, answer).await.unwrap();

        let editor = Uuid::now_v7();
        let count = repo
            .set_answer_content(question.id, answer_id, "edited".into(), editor)
            .await
            .unwrap();
        assert_eq!(count, 1);

        let stored = repo.find_by_id(question.id).await.unwrap().unwrap();
        assert_eq!(stored.answers[0].content, "edited");
        assert_eq!(stored.answers[0].user, editor);
    }

    #[tokio::test]
    async fn test_answer_comment_edit_requires_author() {
        let owner = Uuid::now_v7();
        let (repo, question) = seeded(owner).await;
        let answer = Answer::new(input("answer"), owner);
        let answer_id = answer.id;
        repo.push_answer(question.id, answer).await.unwrap();

        let comment = Comment::new(input("nice"), owner);
        let comment_id = comment.id;
        let parent = CommentParent::Answer(answer_id);
        assert_eq!(repo.push_comment(question.id, parent, comment).await.unwrap(), 1);

        let stranger = Uuid::now_v7();
        let denied = repo
            .set_comment_content(question.id, parent, comment_id, "hijack".into(), stranger)
            .await
            .unwrap();
        assert_eq!(denied, 0);

        let allowed = repo
            .set_comment_content(question.id, parent, comment_id, "very nice".into(), owner)
            .await
            .unwrap();
        assert_eq!(allowed, 1);

        let stored = repo.find_by_id(question.id).await.unwrap().unwrap();
        assert_eq!(stored.answers[0].comments[0].content, "very nice");
    }

    #[tokio::test]
    async fn test_comment_on_missing_answer() {
        let (repo, question) = seeded(Uuid::now_v7()).await;
        let comment = Comment::new(input("lost"), Uuid::now_v7());
        let count = repo
            .push_comment(question.id, CommentParent::Answer(Uuid::now_v7()), comment)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_star_appends_without_dedup_and_remove_pulls_all() {
        let (repo, question) = seeded(Uuid::now_v7()).await;
        let fan = Uuid::now_v7();

        for _ in 0..2 {
            let count = repo
                .star(question.id, StarTarget::Question, StarOp::Append, fan)
                .await
                .unwrap();
            assert_eq!(count, 1);
        }
        let stored = repo.find_by_id(question.id).await.unwrap().unwrap();
        assert_eq!(stored.stars, vec![fan, fan]);

        repo.star(question.id, StarTarget::Question, StarOp::Remove, fan)
            .await
            .unwrap();
        let stored = repo.find_by_id(question.id).await.unwrap().unwrap();
        assert!(stored.stars.is_empty());
    }

    #[tokio::test]
    async fn test_star_missing_answer_comment() {
        let owner = Uuid::now_v7();
        let (repo, question) = seeded(owner).await;
        let target = StarTarget::AnswerComment {
            answer_id: Uuid::now_v7(),
            comment_id: Uuid::now_v7(),
        };
        let count = repo
            .star(question.id, target, StarOp::Append, owner)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_update_search_text_includes_nested_content() {
        let owner = Uuid::now_v7();
        let (repo, question) = seeded(owner).await;
        repo.push_answer(question.id, Answer::new(input("Use RAII"), owner))
            .await
            .unwrap();

        repo.update_search_text(question.id).await.unwrap();

        let stored = repo.find_by_id(question.id).await.unwrap().unwrap();
        assert!(stored.search_text.ends_with("use raii"));
    }

    #[tokio::test]
    async fn test_list_filters_by_dotted_path() {
        let owner = Uuid::now_v7();
        let (repo, question) = seeded(owner).await;
        let answer = Answer::new(input("Use RAII"), owner);
        let answer_id = answer.id;
        repo.push_answer(question.id, answer).await.unwrap();
        seeded_into(&repo, "Unrelated").await;

        let query = json!({ "answers._id": answer_id }).as_object().cloned().unwrap();
        let found = repo.list(query, 20).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, question.id);

        let query = json!({ "user": owner }).as_object().cloned().unwrap();
        assert_eq!(repo.list(query, 20).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_rejects_operators() {
        let repo = InMemoryQuestionRepository::new();
        seeded_into(&repo, "One").await;
        let query = json!({ "title": { "$regex": "O" } }).as_object().cloned().unwrap();
        assert!(matches!(
            repo.list(query, 20).await,
            Err(QuestionError::Store(_))
        ));
    }

    #[tokio::test]
    async fn test_list_newest_first_and_limited() {
        let repo = InMemoryQuestionRepository::new();
        for i in 0..5 {
            seeded_into(&repo, &format!("Question {i}")).await;
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        let listed = repo.list(QuestionQuery::new(), 3).await.unwrap();
        assert_eq!(listed.len(), 3);
        assert!(listed.windows(2).all(|w| w[0].created_at >= w[1].created_at));
        assert_eq!(listed[0].title, "Question 4");
    }

    async fn seeded_into(repo: &InMemoryQuestionRepository, title: &str) -> Question {
        let question = Question::new(
            CreateQuestion {
                title: title.to_string(),
                content: "body".to_string(),
            },
            Uuid::now_v7(),
        );
        repo.insert(question).await.unwrap()
    }
}
