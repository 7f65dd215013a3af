//! # Mediation Strategies
//!
//! Pluggable algorithms deciding handler cardinality and fan-out order for a
//! message category.
//!
//! ## Overview
//!
//! A strategy executes the handler phases for one message type: all pre
//! handlers launched concurrently and awaited together, then the main
//! handler(s), then all post handlers. The phase barriers are absolute:
//! every pre handler completes before any main handler starts, and every
//! main handler completes before any post handler starts. There is no
//! ordering inside a fanned-out set.
//!
//! ## Strategies
//!
//! - [`SingleMainStrategy`] handles commands and queries: exactly one main
//!   handler, distinct cardinality errors for zero or several, fail-fast
//!   error propagation, main result stashed in the context slot for post
//!   handlers.
//! - [`MultiMainStrategy`] handles events: zero-or-more main handlers, no
//!   result, fan-out error policy configurable (collect-all by default).
//! - [`DirectStrategy`] is the fast path chosen when no pipeline behaviors
//!   apply to the type; observably identical to [`SingleMainStrategy`].

pub mod direct;
pub mod multi_main;
pub mod single_main;

pub use direct::DirectStrategy;
pub use multi_main::MultiMainStrategy;
pub use single_main::SingleMainStrategy;

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{join_all, try_join_all};

use crate::context::MediationContext;
use crate::error::MediationError;
use crate::message::ErasedMessage;
use crate::pipeline::DispatchOutcome;
use crate::registry::descriptor::{MainHandlerEntry, MessageDescriptor, UnitHandlerEntry};
use crate::resolver::HandlerResolver;

/// Executes the handler phases for one message type.
///
/// Instances are constructed per cached dispatcher and close over the
/// descriptor snapshot and the resolver, so `mediate` needs only the message
/// and the per-dispatch context.
#[async_trait]
pub trait MediationStrategy: Send + Sync {
    /// Strategy name for logs.
    fn strategy_name(&self) -> &'static str;

    /// Run the pre/main/post phases for `message`.
    async fn mediate(&self, message: ErasedMessage, ctx: MediationContext) -> DispatchOutcome;
}

/// Resolve the sole main handler entry for a single-main category, failing
/// with the matching cardinality error otherwise.
pub(crate) fn sole_main_handler(
    descriptor: &MessageDescriptor,
) -> Result<&MainHandlerEntry, MediationError> {
    match descriptor.main_handlers.as_slice() {
        [] => Err(MediationError::NoMainHandler {
            message_type: descriptor.message_name(),
        }),
        [entry] => Ok(entry),
        entries => Err(MediationError::MultipleMainHandlers {
            message_type: descriptor.message_name(),
            count: entries.len(),
        }),
    }
}

/// Launch a pre or post handler set concurrently; the first error aborts the
/// phase and propagates.
pub(crate) async fn run_unit_phase(
    entries: &[UnitHandlerEntry],
    resolver: &Arc<dyn HandlerResolver>,
    message: &ErasedMessage,
    ctx: &MediationContext,
) -> Result<(), MediationError> {
    if entries.is_empty() {
        return Ok(());
    }
    try_join_all(
        entries
            .iter()
            .map(|entry| (entry.invoke)(resolver.clone(), message.clone(), ctx.clone())),
    )
    .await?;
    Ok(())
}

/// Launch a pre or post handler set concurrently, driving every handler to
/// completion; returns all failures.
pub(crate) async fn run_unit_phase_collect(
    entries: &[UnitHandlerEntry],
    resolver: &Arc<dyn HandlerResolver>,
    message: &ErasedMessage,
    ctx: &MediationContext,
) -> Vec<MediationError> {
    if entries.is_empty() {
        return Vec::new();
    }
    join_all(
        entries
            .iter()
            .map(|entry| (entry.invoke)(resolver.clone(), message.clone(), ctx.clone())),
    )
    .await
    .into_iter()
    .filter_map(Result::err)
    .collect()
}

/// Shared pre → sole main → post pipeline for the single-main categories.
///
/// [`SingleMainStrategy`] and [`DirectStrategy`] both delegate here, which
/// is what guarantees the direct fast path cannot diverge observably.
pub(crate) async fn run_single_main_phases(
    descriptor: &MessageDescriptor,
    resolver: &Arc<dyn HandlerResolver>,
    message: ErasedMessage,
    ctx: MediationContext,
) -> DispatchOutcome {
    let main = sole_main_handler(descriptor)?;

    run_unit_phase(&descriptor.pre_handlers, resolver, &message, &ctx).await?;

    let result = (main.invoke)(resolver.clone(), message.clone(), ctx.clone()).await?;
    // Stash the main result so post handlers can observe it out-of-band.
    ctx.set_result(result);

    run_unit_phase(&descriptor.post_handlers, resolver, &message, &ctx).await?;

    Ok(ctx.take_result())
}
