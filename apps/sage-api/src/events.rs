//! Background observer for question change events

use domain_questions::{QuestionEventKind, QuestionEvents};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Log every question event until shutdown
///
/// This is where a search indexer would hook in.
pub fn spawn_observer(
    events: &QuestionEvents,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    let mut rx = events.subscribe();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    debug!("Question event observer stopping");
                    break;
                }
                received = rx.recv() => match received {
                    Ok(event) => match event.kind {
                        QuestionEventKind::Save => info!(
                            topic = %event.topic(),
                            title = %event.question.title,
                            "Question saved"
                        ),
                        QuestionEventKind::Remove => info!(topic = %event.topic(), "Question removed"),
                    },
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Question event observer fell behind");
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }
    })
}
