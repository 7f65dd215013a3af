//! Dispatch engine: compiles and runs per-type dispatchers.

use std::any::TypeId;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::MediatorConfig;
use crate::context::{self, MediationContext};
use crate::message::{ErasedMessage, Message, MessageCategory};
use crate::pipeline::{ChainBuilder, DispatchFn, DispatchOutcome};
use crate::registry::descriptor::MessageDescriptor;
use crate::registry::{BehaviorRegistry, MessageRegistry};
use crate::resolver::HandlerResolver;
use crate::strategies::{DirectStrategy, MediationStrategy, MultiMainStrategy, SingleMainStrategy};

use super::cache::{DispatcherCache, DispatcherCacheStats};

/// Shared dispatch core behind the category mediators.
///
/// Owns the registries, the resolver handle and the dispatcher cache; the
/// typed facades delegate every dispatch here.
pub(crate) struct DispatchEngine {
    registry: Arc<MessageRegistry>,
    behaviors: Arc<BehaviorRegistry>,
    resolver: Arc<dyn HandlerResolver>,
    cache: DispatcherCache,
    config: MediatorConfig,
}

impl DispatchEngine {
    pub fn new(
        registry: Arc<MessageRegistry>,
        behaviors: Arc<BehaviorRegistry>,
        resolver: Arc<dyn HandlerResolver>,
        config: MediatorConfig,
    ) -> Self {
        Self {
            registry,
            behaviors,
            resolver,
            cache: DispatcherCache::new(),
            config,
        }
    }

    /// Dispatch `message` through the cached (or freshly compiled)
    /// dispatcher for its concrete type, inside a fresh mediation scope.
    pub async fn dispatch<M: Message>(
        &self,
        message: M,
        token: CancellationToken,
    ) -> DispatchOutcome {
        let dispatcher = self
            .cache
            .get_or_build(TypeId::of::<M>(), M::message_name(), || {
                self.compile_dispatcher::<M>()
            });

        let ctx = MediationContext::new(token);
        debug!(
            correlation_id = %ctx.correlation_id(),
            "Dispatching {} '{}'",
            M::CATEGORY,
            M::message_name()
        );

        let message: ErasedMessage = Arc::new(message);
        context::scope(ctx.clone(), dispatcher(message, ctx)).await
    }

    /// Compile the dispatch function for `M`: descriptor snapshot, strategy
    /// selection, behavior chain composition. Side-effect-free, so racing
    /// cache builders are safe.
    fn compile_dispatcher<M: Message>(&self) -> DispatchFn {
        let descriptor = Arc::new(
            self.registry
                .lookup(TypeId::of::<M>())
                .unwrap_or_else(MessageDescriptor::empty_for::<M>),
        );
        let behaviors = self
            .behaviors
            .behaviors_for(TypeId::of::<M>(), M::CATEGORY);

        let strategy: Arc<dyn MediationStrategy> = match M::CATEGORY {
            MessageCategory::Event => Arc::new(MultiMainStrategy::new(
                descriptor,
                self.resolver.clone(),
                self.config.event_error_policy,
            )),
            MessageCategory::Command | MessageCategory::Query => {
                if behaviors.is_empty() && self.config.direct_path_enabled {
                    Arc::new(DirectStrategy::new(descriptor, self.resolver.clone()))
                } else {
                    Arc::new(SingleMainStrategy::new(descriptor, self.resolver.clone()))
                }
            }
        };

        debug!(
            "Compiling dispatcher for '{}': strategy '{}', {} behavior layer(s)",
            M::message_name(),
            strategy.strategy_name(),
            behaviors.len()
        );

        let core: DispatchFn = Arc::new(move |message, ctx| {
            let strategy = strategy.clone();
            Box::pin(async move { strategy.mediate(message, ctx).await })
        });

        if behaviors.is_empty() {
            core
        } else {
            ChainBuilder::compose(core, &behaviors)
        }
    }

    pub fn cache_stats(&self) -> DispatcherCacheStats {
        self.cache.stats()
    }

    pub fn registry(&self) -> &Arc<MessageRegistry> {
        &self.registry
    }
}

impl std::fmt::Debug for DispatchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchEngine")
            .field("registry", &self.registry)
            .field("behaviors", &self.behaviors)
            .field("cache", &self.cache)
            .finish()
    }
}
