use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Store filter accepted by the list endpoint, e.g. `{"user": "..."}`
pub type QuestionQuery = serde_json::Map<String, serde_json::Value>;

/// Question entity - one document in the `questions` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Question {
    /// Unique identifier (stored as _id)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// Owning user
    pub user: Uuid,
    /// Creation time, millisecond precision
    #[serde(with = "timestamp")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Users who starred the question; may repeat
    #[serde(default)]
    pub stars: Vec<Uuid>,
    /// Lowercased text of the question and everything embedded in it
    #[serde(default)]
    pub search_text: String,
}

/// Answer embedded in a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Answer {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub content: String,
    pub user: Uuid,
    #[serde(default)]
    pub stars: Vec<Uuid>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Comment embedded in a question or an answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub content: String,
    pub user: Uuid,
    #[serde(default)]
    pub stars: Vec<Uuid>,
}

/// DTO for creating a question
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateQuestion {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
}

/// DTO for updating a question; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateQuestion {
    #[validate(length(min = 1, max = 300))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub content: Option<String>,
}

/// Body for creating or editing an answer or comment
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ContentInput {
    #[validate(length(min = 1))]
    pub content: String,
}

/// Query parameters for listing questions
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// JSON-encoded store filter, e.g. `{"title":"Rust"}`
    pub query: Option<String>,
}

/// Where a comment lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentParent {
    Question,
    Answer(Uuid),
}

/// Which star list a star/unstar call touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarTarget {
    Question,
    Answer(Uuid),
    Comment(Uuid),
    AnswerComment { answer_id: Uuid, comment_id: Uuid },
}

/// Star list mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum StarOp {
    /// Push the caller's id, even if already present
    Append,
    /// Pull every occurrence of the caller's id
    Remove,
}

impl Question {
    /// Create a new question owned by `user`
    pub fn new(input: CreateQuestion, user: Uuid) -> Self {
        let mut question = Self {
            id: Uuid::now_v7(),
            title: input.title,
            content: input.content,
            user,
            created_at: Utc::now().trunc_subsecs(3),
            answers: Vec::new(),
            comments: Vec::new(),
            stars: Vec::new(),
            search_text: String::new(),
        };
        question.refresh_search_text();
        question
    }

    /// Merge supplied fields; the id and owner never change
    pub fn apply_update(&mut self, update: UpdateQuestion) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(content) = update.content {
            self.content = content;
        }
        self.refresh_search_text();
    }

    /// Position of the first answer with `answer_id`
    pub fn answer_index(&self, answer_id: Uuid) -> Option<usize> {
        self.answers.iter().position(|a| a.id == answer_id)
    }

    /// Title, content, answers, question comments, then answer comments,
    /// space-separated and lowercased
    pub fn build_search_text(&self) -> String {
        let answer_comments = self
            .answers
            .iter()
            .flat_map(|a| a.comments.iter().map(|c| c.content.as_str()));

        [self.title.as_str(), self.content.as_str()]
            .into_iter()
            .chain(self.answers.iter().map(|a| a.content.as_str()))
            .chain(self.comments.iter().map(|c| c.content.as_str()))
            .chain(answer_comments)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    pub fn refresh_search_text(&mut self) {
        self.search_text = self.build_search_text();
    }
}

impl Answer {
    pub fn new(input: ContentInput, user: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            content: input.content,
            user,
            stars: Vec::new(),
            comments: Vec::new(),
        }
    }
}

impl Comment {
    pub fn new(input: ContentInput, user: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            content: input.content,
            user,
            stars: Vec::new(),
        }
    }
}

/// Fixed-width RFC 3339 (millisecond) timestamps, so string order in the
/// store matches time order
mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn content(text: &str) -> ContentInput {
        ContentInput {
            content: text.to_string(),
        }
    }

    fn sample() -> Question {
        Question::new(
            CreateQuestion {
                title: "New Question".to_string(),
                content: "This is the brand new question!!!".to_string(),
            },
            Uuid::now_v7(),
        )
    }

    #[test]
    fn test_new_question_defaults() {
        let owner = Uuid::now_v7();
        let question = Question::new(
            CreateQuestion {
                title: "Title".to_string(),
                content: "Body".to_string(),
            },
            owner,
        );
        assert_eq!(question.user, owner);
        assert!(question.answers.is_empty());
        assert!(question.stars.is_empty());
        assert_eq!(question.search_text, "title body");
        assert_eq!(question.created_at.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn test_search_text_order() {
        let mut question = sample();
        let user = Uuid::now_v7();
        let mut answer = Answer::new(content("Use Cargo"), user);
        answer.comments.push(Comment::new(content("Agreed"), user));
        question.answers.push(answer);
        question.comments.push(Comment::new(content("Which OS?"), user));

        assert_eq!(
            question.build_search_text(),
            "new question this is the brand new question!!! use cargo which os? agreed"
        );
    }

    #[test]
    fn test_apply_update_keeps_identity() {
        let mut question = sample();
        let (id, owner) = (question.id, question.user);

        question.apply_update(UpdateQuestion {
            title: Some("Renamed".to_string()),
            content: None,
        });

        assert_eq!(question.id, id);
        assert_eq!(question.user, owner);
        assert_eq!(question.title, "Renamed");
        assert_eq!(question.content, "This is the brand new question!!!");
        assert!(question.search_text.starts_with("renamed "));
    }

    #[test]
    fn test_answer_index() {
        let mut question = sample();
        let user = Uuid::now_v7();
        let first = Answer::new(content("a"), user);
        let second = Answer::new(content("b"), user);
        let second_id = second.id;
        question.answers.extend([first, second]);

        assert_eq!(question.answer_index(second_id), Some(1));
        assert_eq!(question.answer_index(Uuid::now_v7()), None);
    }

    #[test]
    fn test_json_uses_underscore_id_and_accepts_alias() {
        let question = sample();
        let json = serde_json::to_value(&question).unwrap();
        assert_eq!(json["_id"], question.id.to_string());
        assert!(json.get("id").is_none());

        let comment: Comment = serde_json::from_value(serde_json::json!({
            "id": Uuid::nil(),
            "content": "hi",
            "user": Uuid::nil(),
        }))
        .unwrap();
        assert_eq!(comment.id, Uuid::nil());
        assert!(comment.stars.is_empty());
    }

    #[test]
    fn test_timestamp_is_fixed_width() {
        let mut question = sample();
        question.created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let json = serde_json::to_value(&question).unwrap();
        assert_eq!(json["created_at"], "2024-05-01T12:00:00.000Z");

        let back: Question = serde_json::from_value(json).unwrap();
        assert_eq!(back.created_at, question.created_at);
    }

    #[test]
    fn test_create_question_validation() {
        let input = CreateQuestion {
            title: String::new(),
            content: "body".to_string(),
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn test_star_op_names() {
        assert_eq!(StarOp::Append.to_string(), "append");
        assert_eq!(StarOp::Remove.as_ref(), "remove");
    }
}
