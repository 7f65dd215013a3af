//! Mediator assembly: builder wiring registrations, behaviors, resolver and
//! configuration into the three category facades.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::MediatorConfig;
use crate::dispatch::{DispatchEngine, DispatcherCacheStats};
use crate::error::MediationResult;
use crate::handler::{MainHandler, PostHandler, PreHandler};
use crate::message::{Command, Event, Message, Query};
use crate::pipeline::PipelineBehavior;
use crate::registry::{BehaviorRegistry, BehaviorScope, MessageRegistry, RegistryStats};
use crate::resolver::{HandlerResolver, StaticHandlerResolver};

use super::{CommandMediator, EventPublisher, QueryMediator};

/// Builder for a [`Mediator`].
///
/// Handler types are recorded in the message registry; instances are either
/// provided up front (stored in the built-in [`StaticHandlerResolver`]) or
/// resolved through a custom [`HandlerResolver`] supplied with
/// [`with_resolver`](Self::with_resolver).
pub struct MediatorBuilder {
    registry: Arc<MessageRegistry>,
    behaviors: Arc<BehaviorRegistry>,
    static_resolver: Arc<StaticHandlerResolver>,
    resolver_override: Option<Arc<dyn HandlerResolver>>,
    config: MediatorConfig,
}

impl MediatorBuilder {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(MessageRegistry::new()),
            behaviors: Arc::new(BehaviorRegistry::new()),
            static_resolver: Arc::new(StaticHandlerResolver::new()),
            resolver_override: None,
            config: MediatorConfig::default(),
        }
    }

    /// Replace the default configuration.
    pub fn with_config(mut self, config: MediatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolve handler instances through the host's own resolver instead of
    /// the built-in static one.
    pub fn with_resolver(mut self, resolver: Arc<dyn HandlerResolver>) -> Self {
        self.resolver_override = Some(resolver);
        self
    }

    /// Provide a singleton instance for a handler type without registering
    /// it against any message (multi-role handler types are provided once
    /// and registered per role).
    pub fn provide<H: Send + Sync + 'static>(self, instance: Arc<H>) -> Self {
        self.static_resolver.provide(instance);
        self
    }

    /// Record `H` as the main handler type for `M` (instance resolved at
    /// dispatch time).
    pub fn register_main<M: Message, H: MainHandler<M>>(self) -> Self {
        self.registry.register_main::<M, H>();
        self
    }

    /// Record `H` as a pre handler type for `M`.
    pub fn register_pre<M: Message, H: PreHandler<M>>(self) -> Self {
        self.registry.register_pre::<M, H>();
        self
    }

    /// Record `H` as a post handler type for `M`.
    pub fn register_post<M: Message, H: PostHandler<M>>(self) -> Self {
        self.registry.register_post::<M, H>();
        self
    }

    /// Provide an instance and register it as the main handler for `M`.
    pub fn main_handler<M: Message, H: MainHandler<M>>(self, instance: Arc<H>) -> Self {
        self.provide(instance).register_main::<M, H>()
    }

    /// Provide an instance and register it as a pre handler for `M`.
    pub fn pre_handler<M: Message, H: PreHandler<M>>(self, instance: Arc<H>) -> Self {
        self.provide(instance).register_pre::<M, H>()
    }

    /// Provide an instance and register it as a post handler for `M`.
    pub fn post_handler<M: Message, H: PostHandler<M>>(self, instance: Arc<H>) -> Self {
        self.provide(instance).register_post::<M, H>()
    }

    /// Register a pipeline behavior at the given scope. Registration order
    /// within a tier determines nesting order.
    pub fn behavior(self, scope: BehaviorScope, behavior: Arc<dyn PipelineBehavior>) -> Self {
        self.behaviors.register(scope, behavior);
        self
    }

    /// Assemble the mediator.
    pub fn build(self) -> Mediator {
        let resolver: Arc<dyn HandlerResolver> = match self.resolver_override {
            Some(resolver) => resolver,
            None => self.static_resolver,
        };
        let stats = self.registry.stats();
        info!(
            "Mediator assembled: {} message type(s), {} main / {} pre / {} post handler(s), {} behavior(s)",
            stats.message_types,
            stats.main_handlers,
            stats.pre_handlers,
            stats.post_handlers,
            self.behaviors.len()
        );

        let engine = Arc::new(DispatchEngine::new(
            self.registry,
            self.behaviors,
            resolver,
            self.config,
        ));
        Mediator {
            commands: CommandMediator::new(engine.clone()),
            queries: QueryMediator::new(engine.clone()),
            events: EventPublisher::new(engine.clone()),
            engine,
        }
    }
}

impl Default for MediatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The assembled mediation engine: one dispatch core shared by the three
/// category facades.
#[derive(Clone)]
pub struct Mediator {
    commands: CommandMediator,
    queries: QueryMediator,
    events: EventPublisher,
    engine: Arc<DispatchEngine>,
}

impl Mediator {
    pub fn builder() -> MediatorBuilder {
        MediatorBuilder::new()
    }

    /// The command facade.
    pub fn commands(&self) -> &CommandMediator {
        &self.commands
    }

    /// The query facade.
    pub fn queries(&self) -> &QueryMediator {
        &self.queries
    }

    /// The event facade.
    pub fn events(&self) -> &EventPublisher {
        &self.events
    }

    /// Convenience: send a command through the command facade.
    pub async fn send<C: Command>(&self, command: C) -> MediationResult<C::Result> {
        self.commands.send(command).await
    }

    /// Convenience: send a command with the caller's cancellation signal.
    pub async fn send_with_cancellation<C: Command>(
        &self,
        command: C,
        token: CancellationToken,
    ) -> MediationResult<C::Result> {
        self.commands.send_with_cancellation(command, token).await
    }

    /// Convenience: send a query through the query facade.
    pub async fn query<Q: Query>(&self, query: Q) -> MediationResult<Q::Result> {
        self.queries.send(query).await
    }

    /// Convenience: publish an event through the event facade.
    pub async fn publish<E: Event>(&self, event: E) -> MediationResult<()> {
        self.events.publish(event).await
    }

    /// Message registry counters.
    pub fn registry_stats(&self) -> RegistryStats {
        self.engine.registry().stats()
    }

    /// Dispatcher cache counters.
    pub fn cache_stats(&self) -> DispatcherCacheStats {
        self.engine.cache_stats()
    }
}

impl std::fmt::Debug for Mediator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mediator")
            .field("engine", &self.engine)
            .finish()
    }
}
