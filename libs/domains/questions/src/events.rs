//! In-process change notifications for questions
//!
//! Every event is announced under two names: `<kind>` and `<kind>:<id>`.

use serde::Serialize;
use strum::{AsRefStr, Display};
use tokio::sync::broadcast;

use crate::models::Question;

const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum QuestionEventKind {
    Save,
    Remove,
}

/// A committed change and the question as it looked afterwards
/// (or just before removal)
#[derive(Debug, Clone, Serialize)]
pub struct QuestionEvent {
    pub kind: QuestionEventKind,
    pub question: Question,
}

impl QuestionEvent {
    pub fn saved(question: Question) -> Self {
        Self {
            kind: QuestionEventKind::Save,
            question,
        }
    }

    pub fn removed(question: Question) -> Self {
        Self {
            kind: QuestionEventKind::Remove,
            question,
        }
    }

    /// Generic channel name, e.g. `save`
    pub fn name(&self) -> &str {
        self.kind.as_ref()
    }

    /// Per-question channel name, e.g. `save:<id>`
    pub fn topic(&self) -> String {
        format!("{}:{}", self.kind, self.question.id)
    }
}

/// Sink for question change notifications
///
/// Publishing never fails the request that triggered it.
pub trait QuestionEventPublisher: Send + Sync {
    fn publish(&self, event: QuestionEvent);
}

/// Broadcast-channel publisher; subscribers filter by [`QuestionEvent::topic`]
#[derive(Debug, Clone)]
pub struct QuestionEvents {
    tx: broadcast::Sender<QuestionEvent>,
}

impl QuestionEvents {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QuestionEvent> {
        self.tx.subscribe()
    }
}

impl Default for QuestionEvents {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl QuestionEventPublisher for QuestionEvents {
    fn publish(&self, event: QuestionEvent) {
        tracing::debug!(event = event.name(), topic = %event.topic(), "Publishing question event");
        // Err only means nobody is listening
        let _ = self.tx.send(event);
    }
}
