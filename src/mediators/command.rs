//! Command mediator facade.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::dispatch::DispatchEngine;
use crate::error::MediationResult;
use crate::message::Command;

use super::downcast_result;

/// Dispatches commands to their single main handler.
///
/// Selects the single-main-handler strategy (or its direct fast path when
/// no behaviors apply). Zero or multiple main handlers surface as distinct
/// cardinality errors at dispatch time.
#[derive(Clone)]
pub struct CommandMediator {
    engine: Arc<DispatchEngine>,
}

impl CommandMediator {
    pub(crate) fn new(engine: Arc<DispatchEngine>) -> Self {
        Self { engine }
    }

    /// Send a command with a fresh, never-cancelled cancellation signal.
    pub async fn send<C: Command>(&self, command: C) -> MediationResult<C::Result> {
        self.send_with_cancellation(command, CancellationToken::new())
            .await
    }

    /// Send a command, threading the caller's cancellation signal through
    /// the mediation context to every handler.
    pub async fn send_with_cancellation<C: Command>(
        &self,
        command: C,
        token: CancellationToken,
    ) -> MediationResult<C::Result> {
        let outcome = self.engine.dispatch(command, token).await?;
        downcast_result::<C>(outcome)
    }
}

impl std::fmt::Debug for CommandMediator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandMediator").finish()
    }
}
