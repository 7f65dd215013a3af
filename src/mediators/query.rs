//! Query mediator facade.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::dispatch::DispatchEngine;
use crate::error::MediationResult;
use crate::message::Query;

use super::downcast_result;

/// Dispatches queries to their single main handler, always producing one
/// typed result.
///
/// Strategy selection is identical to commands; registration problems
/// (zero or multiple main handlers) are surfaced lazily at dispatch time,
/// not at registration time.
#[derive(Clone)]
pub struct QueryMediator {
    engine: Arc<DispatchEngine>,
}

impl QueryMediator {
    pub(crate) fn new(engine: Arc<DispatchEngine>) -> Self {
        Self { engine }
    }

    /// Send a query with a fresh, never-cancelled cancellation signal.
    pub async fn send<Q: Query>(&self, query: Q) -> MediationResult<Q::Result> {
        self.send_with_cancellation(query, CancellationToken::new())
            .await
    }

    /// Send a query, threading the caller's cancellation signal through the
    /// mediation context to every handler.
    pub async fn send_with_cancellation<Q: Query>(
        &self,
        query: Q,
        token: CancellationToken,
    ) -> MediationResult<Q::Result> {
        let outcome = self.engine.dispatch(query, token).await?;
        downcast_result::<Q>(outcome)
    }
}

impl std::fmt::Debug for QueryMediator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryMediator").finish()
    }
}
