//! Multiple-main-handler strategy for events.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{join_all, try_join_all};
use tracing::debug;

use crate::config::EventErrorPolicy;
use crate::context::MediationContext;
use crate::error::MediationError;
use crate::message::ErasedMessage;
use crate::pipeline::DispatchOutcome;
use crate::registry::MessageDescriptor;
use crate::resolver::HandlerResolver;

use super::{run_unit_phase, run_unit_phase_collect, MediationStrategy};

/// Strategy for events: zero-or-more main handlers, no result.
///
/// Zero main handlers is a legal silent no-op. Fan-out failures are either
/// collected across the whole failing phase and reported together
/// ([`EventErrorPolicy::CollectAll`], default) or abort that phase on the
/// first error ([`EventErrorPolicy::FailFast`]); either way a failing phase
/// prevents later phases from starting, and failures are never silently
/// discarded.
pub struct MultiMainStrategy {
    descriptor: Arc<MessageDescriptor>,
    resolver: Arc<dyn HandlerResolver>,
    policy: EventErrorPolicy,
}

impl MultiMainStrategy {
    pub fn new(
        descriptor: Arc<MessageDescriptor>,
        resolver: Arc<dyn HandlerResolver>,
        policy: EventErrorPolicy,
    ) -> Self {
        Self {
            descriptor,
            resolver,
            policy,
        }
    }

    async fn run_main_fan_out(
        &self,
        message: &ErasedMessage,
        ctx: &MediationContext,
    ) -> Result<(), MediationError> {
        let invocations = self.descriptor.main_handlers.iter().map(|entry| {
            let fut = (entry.invoke)(self.resolver.clone(), message.clone(), ctx.clone());
            async move { fut.await.map(|_| ()) }
        });

        match self.policy {
            EventErrorPolicy::FailFast => {
                try_join_all(invocations).await?;
                Ok(())
            }
            EventErrorPolicy::CollectAll => {
                let errors: Vec<MediationError> = join_all(invocations)
                    .await
                    .into_iter()
                    .filter_map(Result::err)
                    .collect();
                if errors.is_empty() {
                    Ok(())
                } else {
                    Err(MediationError::aggregate(errors))
                }
            }
        }
    }

    async fn run_unit_fan_out(
        &self,
        entries: &[crate::registry::descriptor::UnitHandlerEntry],
        message: &ErasedMessage,
        ctx: &MediationContext,
    ) -> Result<(), MediationError> {
        match self.policy {
            EventErrorPolicy::FailFast => {
                run_unit_phase(entries, &self.resolver, message, ctx).await
            }
            EventErrorPolicy::CollectAll => {
                let errors = run_unit_phase_collect(entries, &self.resolver, message, ctx).await;
                if errors.is_empty() {
                    Ok(())
                } else {
                    Err(MediationError::aggregate(errors))
                }
            }
        }
    }
}

#[async_trait]
impl MediationStrategy for MultiMainStrategy {
    fn strategy_name(&self) -> &'static str {
        "multi_main"
    }

    async fn mediate(&self, message: ErasedMessage, ctx: MediationContext) -> DispatchOutcome {
        debug!(
            correlation_id = %ctx.correlation_id(),
            "Publishing event '{}' to {} main handler(s)",
            self.descriptor.message_name(),
            self.descriptor.main_handler_count()
        );

        self.run_unit_fan_out(&self.descriptor.pre_handlers, &message, &ctx)
            .await?;
        self.run_main_fan_out(&message, &ctx).await?;
        self.run_unit_fan_out(&self.descriptor.post_handlers, &message, &ctx)
            .await?;

        // Events are reaction-only; there is never a result value.
        Ok(None)
    }
}
