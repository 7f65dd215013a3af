//! Event publisher facade.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::dispatch::DispatchEngine;
use crate::error::MediationResult;
use crate::message::Event;

/// Publishes events to zero-or-more main handlers.
///
/// Selects the multiple-main-handler strategy: all reactions run
/// concurrently with no ordering guarantee among them, and an event with no
/// registered handlers completes successfully as a no-op.
#[derive(Clone)]
pub struct EventPublisher {
    engine: Arc<DispatchEngine>,
}

impl EventPublisher {
    pub(crate) fn new(engine: Arc<DispatchEngine>) -> Self {
        Self { engine }
    }

    /// Publish an event with a fresh, never-cancelled cancellation signal.
    pub async fn publish<E: Event>(&self, event: E) -> MediationResult<()> {
        self.publish_with_cancellation(event, CancellationToken::new())
            .await
    }

    /// Publish an event, threading the caller's cancellation signal through
    /// the mediation context to every handler.
    pub async fn publish_with_cancellation<E: Event>(
        &self,
        event: E,
        token: CancellationToken,
    ) -> MediationResult<()> {
        self.engine.dispatch(event, token).await?;
        Ok(())
    }
}

impl std::fmt::Debug for EventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventPublisher").finish()
    }
}
