use std::sync::Arc;

use axum::Router;
use domain_questions::{MongoQuestionRepository, QuestionService, handlers};

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let repository = MongoQuestionRepository::new(state.db.clone());
    let service = QuestionService::new(repository, Arc::new(state.question_events.clone()));
    handlers::router(service)
}
