//! The behavior trait and the type-erased dispatch function shapes it
//! composes over.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use crate::context::MediationContext;
use crate::error::MediationError;
use crate::message::{ErasedMessage, ErasedResult};

/// Outcome of a dispatch layer: a type-erased result for single-main
/// categories, `None` for events.
pub type DispatchOutcome = Result<Option<ErasedResult>, MediationError>;

/// Boxed future produced by a dispatch layer.
pub type DispatchFuture = Pin<Box<dyn Future<Output = DispatchOutcome> + Send>>;

/// A compiled, reusable dispatch layer: behavior chain link or strategy core.
pub type DispatchFn = Arc<dyn Fn(ErasedMessage, MediationContext) -> DispatchFuture + Send + Sync>;

/// Continuation handle for the next inner layer of the pipeline.
///
/// A behavior that never calls [`Next::run`] short-circuits the pipeline;
/// the strategy and all narrower behaviors are skipped.
pub struct Next {
    inner: DispatchFn,
}

impl Next {
    pub(crate) fn new(inner: DispatchFn) -> Self {
        Self { inner }
    }

    /// Invoke the next inner layer.
    pub async fn run(self, message: ErasedMessage, ctx: MediationContext) -> DispatchOutcome {
        (self.inner)(message, ctx).await
    }
}

/// A middleware layer wrapping strategy execution for a message type.
///
/// Behaviors receive the type-erased message so a single instance can serve
/// any scope tier; message-specific behaviors downcast with
/// `message.downcast_ref::<M>()`.
#[async_trait]
pub trait PipelineBehavior: Send + Sync {
    /// Wrap the inner pipeline. Call `next.run(message, ctx)` to continue,
    /// or return without calling it to short-circuit.
    async fn handle(
        &self,
        message: ErasedMessage,
        ctx: MediationContext,
        next: Next,
    ) -> DispatchOutcome;

    /// Behavior name for logs.
    fn behavior_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
