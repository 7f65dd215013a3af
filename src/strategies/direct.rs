//! Direct dispatch fast path for behavior-free message types.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::context::MediationContext;
use crate::message::ErasedMessage;
use crate::pipeline::DispatchOutcome;
use crate::registry::MessageDescriptor;
use crate::resolver::HandlerResolver;

use super::{run_single_main_phases, MediationStrategy};

/// Fast path chosen when no pipeline behaviors apply to a single-main
/// message type: the dispatcher skips chain construction entirely and goes
/// straight to pre → main → post.
///
/// Delegates to the same phase pipeline as
/// [`SingleMainStrategy`](super::SingleMainStrategy), so cardinality rules,
/// fan-out behavior and error propagation are observably identical; only
/// the chain-building work is saved.
pub struct DirectStrategy {
    descriptor: Arc<MessageDescriptor>,
    resolver: Arc<dyn HandlerResolver>,
}

impl DirectStrategy {
    pub fn new(descriptor: Arc<MessageDescriptor>, resolver: Arc<dyn HandlerResolver>) -> Self {
        Self {
            descriptor,
            resolver,
        }
    }
}

#[async_trait]
impl MediationStrategy for DirectStrategy {
    fn strategy_name(&self) -> &'static str {
        "direct"
    }

    async fn mediate(&self, message: ErasedMessage, ctx: MediationContext) -> DispatchOutcome {
        debug!(
            correlation_id = %ctx.correlation_id(),
            "Mediating {} '{}' on the direct fast path",
            self.descriptor.category(),
            self.descriptor.message_name()
        );
        run_single_main_phases(&self.descriptor, &self.resolver, message, ctx).await
    }
}
