//! Questions Domain
//!
//! Questions with embedded answers, comments on both, and per-user stars,
//! stored one document per question in MongoDB.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, caller identity
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Ownership, search text, change events
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Conditional single-document updates
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Question / Answer / Comment, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_questions::{
//!     handlers,
//!     events::QuestionEvents,
//!     mongodb::MongoQuestionRepository,
//!     service::QuestionService,
//! };
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost/sage-dev").await?;
//! let repository = MongoQuestionRepository::new(client.database("sage-dev"));
//! let service = QuestionService::new(repository, Arc::new(QuestionEvents::default()));
//!
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod authorization;
pub mod error;
pub mod events;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use authorization::authorize_owner;
pub use error::{QuestionError, QuestionResult};
pub use events::{QuestionEvent, QuestionEventKind, QuestionEventPublisher, QuestionEvents};
pub use handlers::ApiDoc;
pub use models::{
    Answer, Comment, CommentParent, ContentInput, CreateQuestion, Question, StarOp, StarTarget,
    UpdateQuestion,
};
pub use mongodb::MongoQuestionRepository;
pub use repository::{InMemoryQuestionRepository, QuestionRepository};
pub use service::QuestionService;
