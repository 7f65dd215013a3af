//! # Message Registry
//!
//! Thread-safe registry mapping message type identities to their classified
//! handler sets.
//!
//! ## Overview
//!
//! Registration is explicit and per-capability: `register_main`,
//! `register_pre` and `register_post` each append a [`HandlerDescriptor`]
//! (plus its type-erased invoker) to the [`MessageDescriptor`] for the
//! message type, creating the descriptor on first touch via an atomic
//! get-or-create. For commands and queries the single-main-handler
//! constraint is enforced at registration time: a second main registration
//! for the same message type is ignored with a warning. Events accept
//! unlimited main handlers.
//!
//! Handler instances are never stored here; invokers resolve them through
//! the [`HandlerResolver`] boundary once per dispatch.
//!
//! ## Key Features
//!
//! - **Atomic get-or-create** descriptors keyed by `TypeId` (`DashMap`)
//! - **Append-only handler lists**, read-only during dispatch
//! - **Registration-time cardinality enforcement** for single-main categories
//! - **Registry statistics** for diagnostics
//!
//! [`HandlerResolver`]: crate::resolver::HandlerResolver

use std::any::TypeId;
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::context::MediationContext;
use crate::error::MediationError;
use crate::handler::{MainHandler, PostHandler, PreHandler};
use crate::message::{ErasedMessage, ErasedResult, Message};
use crate::resolver::{HandlerResolver, HandlerTypeId};

use super::descriptor::{
    HandlerDescriptor, HandlerRole, MainHandlerEntry, MainInvokeFuture, MainInvokerFn,
    MessageDescriptor, UnitHandlerEntry, UnitInvokeFuture, UnitInvokerFn,
};

/// Counts of registered descriptors and handlers per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub message_types: usize,
    pub main_handlers: usize,
    pub pre_handlers: usize,
    pub post_handlers: usize,
}

/// Registry of message descriptors, shared and read-mostly.
#[derive(Default)]
pub struct MessageRegistry {
    descriptors: DashMap<TypeId, MessageDescriptor>,
}

impl MessageRegistry {
    pub fn new() -> Self {
        Self {
            descriptors: DashMap::new(),
        }
    }

    /// Register `H` as a main handler for `M`, enforcing the single-main
    /// constraint at registration time for commands and queries.
    ///
    /// Returns `false` when the registration was ignored because `M` is a
    /// single-main category that already has a main handler.
    pub fn register_main<M: Message, H: MainHandler<M>>(&self) -> bool {
        self.register_main_inner::<M, H>(true)
    }

    /// Register `H` as a main handler for `M` without the registration-time
    /// constraint; cardinality is then validated lazily at dispatch time.
    ///
    /// For hosts that prefer surfacing duplicate registrations as a dispatch
    /// error rather than silently keeping the first.
    pub fn register_main_unconstrained<M: Message, H: MainHandler<M>>(&self) {
        self.register_main_inner::<M, H>(false);
    }

    fn register_main_inner<M: Message, H: MainHandler<M>>(&self, enforce_single: bool) -> bool {
        let mut descriptor = self
            .descriptors
            .entry(TypeId::of::<M>())
            .or_insert_with(MessageDescriptor::empty_for::<M>);

        if enforce_single
            && M::CATEGORY.single_main_handler()
            && !descriptor.main_handlers.is_empty()
        {
            warn!(
                "Ignoring main handler '{}' for {} '{}': a main handler is already registered",
                std::any::type_name::<H>(),
                M::CATEGORY,
                M::message_name()
            );
            return false;
        }

        descriptor.main_handlers.push(MainHandlerEntry {
            descriptor: handler_descriptor::<M, H>(HandlerRole::Main),
            invoke: main_invoker::<M, H>(),
        });
        debug!(
            "Registered main handler '{}' for {} '{}'",
            std::any::type_name::<H>(),
            M::CATEGORY,
            M::message_name()
        );
        true
    }

    /// Register `H` as a pre handler for `M`. Any count permitted.
    pub fn register_pre<M: Message, H: PreHandler<M>>(&self) {
        let mut descriptor = self
            .descriptors
            .entry(TypeId::of::<M>())
            .or_insert_with(MessageDescriptor::empty_for::<M>);
        descriptor.pre_handlers.push(UnitHandlerEntry {
            descriptor: handler_descriptor::<M, H>(HandlerRole::Pre),
            invoke: pre_invoker::<M, H>(),
        });
        debug!(
            "Registered pre handler '{}' for {} '{}'",
            std::any::type_name::<H>(),
            M::CATEGORY,
            M::message_name()
        );
    }

    /// Register `H` as a post handler for `M`. Any count permitted.
    pub fn register_post<M: Message, H: PostHandler<M>>(&self) {
        let mut descriptor = self
            .descriptors
            .entry(TypeId::of::<M>())
            .or_insert_with(MessageDescriptor::empty_for::<M>);
        descriptor.post_handlers.push(UnitHandlerEntry {
            descriptor: handler_descriptor::<M, H>(HandlerRole::Post),
            invoke: post_invoker::<M, H>(),
        });
        debug!(
            "Registered post handler '{}' for {} '{}'",
            std::any::type_name::<H>(),
            M::CATEGORY,
            M::message_name()
        );
    }

    /// Descriptor snapshot for a message type, or `None` when nothing has
    /// been registered against it.
    pub fn lookup(&self, message_type: TypeId) -> Option<MessageDescriptor> {
        self.descriptors
            .get(&message_type)
            .map(|entry| entry.value().clone())
    }

    /// Number of distinct message types with a descriptor.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Aggregate counts across all descriptors.
    pub fn stats(&self) -> RegistryStats {
        let mut stats = RegistryStats {
            message_types: 0,
            main_handlers: 0,
            pre_handlers: 0,
            post_handlers: 0,
        };
        for entry in self.descriptors.iter() {
            stats.message_types += 1;
            stats.main_handlers += entry.main_handler_count();
            stats.pre_handlers += entry.pre_handler_count();
            stats.post_handlers += entry.post_handler_count();
        }
        stats
    }
}

impl std::fmt::Debug for MessageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageRegistry")
            .field("message_types", &self.descriptors.len())
            .finish()
    }
}

fn handler_descriptor<M: Message, H: Send + Sync + 'static>(role: HandlerRole) -> HandlerDescriptor {
    HandlerDescriptor {
        message_type: TypeId::of::<M>(),
        handler_type: TypeId::of::<H>(),
        handler_name: std::any::type_name::<H>(),
        role,
    }
}

/// Build the type-erased invoker for a main handler: resolve the instance,
/// downcast both sides, execute, box the result.
fn main_invoker<M: Message, H: MainHandler<M>>() -> MainInvokerFn {
    Arc::new(
        |resolver: Arc<dyn HandlerResolver>, message: ErasedMessage, ctx: MediationContext| -> MainInvokeFuture {
            Box::pin(async move {
                let handler = resolve_handler::<H>(resolver.as_ref())?;
                let message = downcast_message::<M>(message)?;
                match handler.handle(message.as_ref(), &ctx).await {
                    Ok(result) => Ok(Box::new(result) as ErasedResult),
                    Err(err) => Err(MediationError::from_handler(std::any::type_name::<H>(), err)),
                }
            })
        },
    )
}

fn pre_invoker<M: Message, H: PreHandler<M>>() -> UnitInvokerFn {
    Arc::new(
        |resolver: Arc<dyn HandlerResolver>, message: ErasedMessage, ctx: MediationContext| -> UnitInvokeFuture {
            Box::pin(async move {
                let handler = resolve_handler::<H>(resolver.as_ref())?;
                let message = downcast_message::<M>(message)?;
                handler
                    .handle(message.as_ref(), &ctx)
                    .await
                    .map_err(|err| MediationError::from_handler(std::any::type_name::<H>(), err))
            })
        },
    )
}

fn post_invoker<M: Message, H: PostHandler<M>>() -> UnitInvokerFn {
    Arc::new(
        |resolver: Arc<dyn HandlerResolver>, message: ErasedMessage, ctx: MediationContext| -> UnitInvokeFuture {
            Box::pin(async move {
                let handler = resolve_handler::<H>(resolver.as_ref())?;
                let message = downcast_message::<M>(message)?;
                handler
                    .handle(message.as_ref(), &ctx)
                    .await
                    .map_err(|err| MediationError::from_handler(std::any::type_name::<H>(), err))
            })
        },
    )
}

fn resolve_handler<H: Send + Sync + 'static>(
    resolver: &dyn HandlerResolver,
) -> Result<Arc<H>, MediationError> {
    let instance = resolver.resolve(&HandlerTypeId::of::<H>())?;
    instance
        .downcast::<H>()
        .map_err(|_| MediationError::HandlerTypeMismatch {
            handler: std::any::type_name::<H>(),
        })
}

fn downcast_message<M: Message>(message: ErasedMessage) -> Result<Arc<M>, MediationError> {
    message.downcast::<M>().map_err(|_| MediationError::TypeMismatch {
        expected: M::message_name(),
    })
}
