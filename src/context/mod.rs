//! # Mediation Context
//!
//! Per-dispatch ambient state: cancellation signal, result slot, correlation
//! identity.
//!
//! ## Overview
//!
//! One [`MediationContext`] is created at the entry of every top-level
//! dispatch and lives for that call chain only, including all asynchronous
//! continuations reachable from it. The context is handed to every handler
//! explicitly and is *also* available ambiently through [`current`] /
//! [`try_current`] while the dispatch future runs inside [`scope`]. The
//! ambient mechanism is task-local, so concurrent call chains never observe
//! each other's context, and scope exit restores whatever context was
//! ambient before; nesting behaves as a stack.
//!
//! ## Key Features
//!
//! - **Cooperative cancellation** via a [`CancellationToken`] observable by
//!   every handler in the chain
//! - **Result slot** written by single-main strategies so post handlers can
//!   observe the main result out-of-band
//! - **Correlation id** (`uuid`) threaded through structured log lines
//! - **Stack-disciplined ambient scope** backed by `tokio::task_local!`
//!
//! ## Usage
//!
//! ```rust
//! use mediator_core::context::{self, MediationContext};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let ctx = MediationContext::new(CancellationToken::new());
//! let correlation_id = ctx.correlation_id();
//!
//! context::scope(ctx, async move {
//!     let ambient = context::current().unwrap();
//!     assert_eq!(ambient.correlation_id(), correlation_id);
//! })
//! .await;
//!
//! assert!(!context::has_current());
//! # }
//! ```

use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::message::ErasedResult;

tokio::task_local! {
    static CURRENT_CONTEXT: MediationContext;
}

/// Errors from the ambient context accessors.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    /// [`current`] was called outside any active mediation scope.
    #[error("no mediation context is active on this call chain")]
    NoActiveContext,
}

struct ContextInner {
    correlation_id: Uuid,
    created_at: DateTime<Utc>,
    cancellation: CancellationToken,
    result_slot: Mutex<Option<ErasedResult>>,
}

/// Ambient per-dispatch state. Cheap to clone; all clones share one inner
/// record.
#[derive(Clone)]
pub struct MediationContext {
    inner: Arc<ContextInner>,
}

impl MediationContext {
    /// Create a fresh context carrying the given cancellation token.
    pub fn new(cancellation: CancellationToken) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                correlation_id: Uuid::new_v4(),
                created_at: Utc::now(),
                cancellation,
                result_slot: Mutex::new(None),
            }),
        }
    }

    /// Correlation id identifying this dispatch in log output.
    pub fn correlation_id(&self) -> Uuid {
        self.inner.correlation_id
    }

    /// When this dispatch entered the engine.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.inner.created_at
    }

    /// The cancellation token handlers observe cooperatively.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.inner.cancellation
    }

    /// Whether cancellation has been requested for this dispatch.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancellation.is_cancelled()
    }

    /// Stash the main handler result so post handlers can observe it.
    pub(crate) fn set_result(&self, result: ErasedResult) {
        *self.inner.result_slot.lock() = Some(result);
    }

    /// Drain the result slot, returning ownership to the strategy.
    pub(crate) fn take_result(&self) -> Option<ErasedResult> {
        self.inner.result_slot.lock().take()
    }

    /// Whether the result slot currently holds a value.
    pub fn has_result(&self) -> bool {
        self.inner.result_slot.lock().is_some()
    }

    /// Observe the stashed main result without taking it. The closure
    /// receives `None` when the slot is empty or holds a different type.
    pub fn peek_result<R: Any, T>(&self, f: impl FnOnce(Option<&R>) -> T) -> T {
        let slot = self.inner.result_slot.lock();
        f(slot.as_deref().and_then(|value| value.downcast_ref::<R>()))
    }
}

impl std::fmt::Debug for MediationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediationContext")
            .field("correlation_id", &self.inner.correlation_id)
            .field("created_at", &self.inner.created_at)
            .field("cancelled", &self.is_cancelled())
            .field("has_result", &self.has_result())
            .finish()
    }
}

/// Run `fut` with `ctx` as the ambient context for its logical call chain.
///
/// On exit the previously ambient context (if any) is restored; nested scopes
/// behave as a stack.
pub async fn scope<F: Future>(ctx: MediationContext, fut: F) -> F::Output {
    CURRENT_CONTEXT.scope(ctx, fut).await
}

/// The ambient context of the current call chain, if one is active.
pub fn try_current() -> Option<MediationContext> {
    CURRENT_CONTEXT.try_with(MediationContext::clone).ok()
}

/// The ambient context of the current call chain.
pub fn current() -> Result<MediationContext, ContextError> {
    try_current().ok_or(ContextError::NoActiveContext)
}

/// Non-failing check for an active ambient context.
pub fn has_current() -> bool {
    CURRENT_CONTEXT.try_with(|_| ()).is_ok()
}
