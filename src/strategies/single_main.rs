//! Single-main-handler strategy for commands and queries.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::context::MediationContext;
use crate::message::ErasedMessage;
use crate::pipeline::DispatchOutcome;
use crate::registry::MessageDescriptor;
use crate::resolver::HandlerResolver;

use super::{run_single_main_phases, MediationStrategy};

/// Strategy for the single-main-handler categories.
///
/// Fails with a cardinality error when zero or more than one main handler is
/// registered. Any error from any phase aborts the remaining pipeline and
/// propagates unchanged; there is no partial success.
pub struct SingleMainStrategy {
    descriptor: Arc<MessageDescriptor>,
    resolver: Arc<dyn HandlerResolver>,
}

impl SingleMainStrategy {
    pub fn new(descriptor: Arc<MessageDescriptor>, resolver: Arc<dyn HandlerResolver>) -> Self {
        Self {
            descriptor,
            resolver,
        }
    }
}

#[async_trait]
impl MediationStrategy for SingleMainStrategy {
    fn strategy_name(&self) -> &'static str {
        "single_main"
    }

    async fn mediate(&self, message: ErasedMessage, ctx: MediationContext) -> DispatchOutcome {
        debug!(
            correlation_id = %ctx.correlation_id(),
            "Mediating {} '{}' with single-main strategy",
            self.descriptor.category(),
            self.descriptor.message_name()
        );
        run_single_main_phases(&self.descriptor, &self.resolver, message, ctx).await
    }
}
