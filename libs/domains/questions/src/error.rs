use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuestionError {
    /// Question or nested entity absent, or an update matched nothing
    #[error("Question not found")]
    NotFound,

    /// Caller does not own the question
    #[error("Caller does not own this question")]
    Forbidden,

    /// List filter is not a JSON object
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Store error: {0}")]
    Store(String),
}

pub type QuestionResult<T> = Result<T, QuestionError>;

/// 404 and 403 are bare statuses; failures carry the raw error as JSON
impl IntoResponse for QuestionError {
    fn into_response(self) -> Response {
        match self {
            QuestionError::NotFound => StatusCode::NOT_FOUND.into_response(),
            QuestionError::Forbidden => StatusCode::FORBIDDEN.into_response(),
            QuestionError::InvalidQuery(msg) | QuestionError::Store(msg) => {
                AppError::Store(msg).into_response()
            }
        }
    }
}

impl From<mongodb::error::Error> for QuestionError {
    fn from(err: mongodb::error::Error) -> Self {
        QuestionError::Store(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for QuestionError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        QuestionError::Store(err.to_string())
    }
}
