//! # Handler Resolver Boundary
//!
//! The single capability the engine consumes from its host: turn a handler
//! type identity into a live handler instance.
//!
//! ## Overview
//!
//! The registry records *which* handler types serve a message; it never holds
//! the instances themselves. At dispatch time each registered handler is
//! resolved exactly once through a [`HandlerResolver`], so hosts with a real
//! dependency-injection container keep full control over handler lifecycle.
//! Resolution failures propagate unwrapped to the dispatch caller.
//!
//! ## Key Features
//!
//! - **Opaque factory contract**: `resolve(type identity) -> instance`
//! - **Unwrapped failure propagation** via a transparent error variant
//! - **[`StaticHandlerResolver`]**: a ready-made resolver over pre-registered
//!   singleton instances for hosts without a container
//!
//! ## Usage
//!
//! ```rust
//! use mediator_core::resolver::{HandlerResolver, HandlerTypeId, StaticHandlerResolver};
//! use std::sync::Arc;
//!
//! struct CreateUserHandler;
//!
//! let resolver = StaticHandlerResolver::new();
//! resolver.provide(Arc::new(CreateUserHandler));
//!
//! let instance = resolver.resolve(&HandlerTypeId::of::<CreateUserHandler>()).unwrap();
//! assert!(instance.downcast::<CreateUserHandler>().is_ok());
//! ```

use std::any::{Any, TypeId};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

/// Identity of a handler type: its `TypeId` plus a readable name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerTypeId {
    type_id: TypeId,
    name: &'static str,
}

impl HandlerTypeId {
    /// Identity of the concrete handler type `H`.
    pub fn of<H: Send + Sync + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<H>(),
            name: std::any::type_name::<H>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl std::fmt::Display for HandlerTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

/// Errors from the resolver boundary.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No instance registered for the requested handler type.
    #[error("no instance provided for handler type '{handler}'")]
    NotProvided { handler: &'static str },

    /// Host-specific resolution failure.
    #[error("handler resolution failed for '{handler}': {reason}")]
    Failed {
        handler: &'static str,
        reason: String,
    },
}

/// Produces a live handler instance from a handler type identity.
///
/// Invoked once per registered handler per dispatch. Implementations own
/// their thread-safety; the engine treats them as opaque factories.
pub trait HandlerResolver: Send + Sync {
    fn resolve(&self, handler: &HandlerTypeId) -> Result<Arc<dyn Any + Send + Sync>, ResolveError>;
}

/// Resolver backed by a map of pre-registered singleton instances.
///
/// The built-in resolver for hosts that assemble handlers by hand instead of
/// through a container. Instances are shared (`Arc`) and returned on every
/// resolution, mirroring singleton lifetime.
#[derive(Default)]
pub struct StaticHandlerResolver {
    instances: DashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl StaticHandlerResolver {
    pub fn new() -> Self {
        Self {
            instances: DashMap::new(),
        }
    }

    /// Register a singleton instance for handler type `H`, replacing any
    /// previous instance of the same type.
    pub fn provide<H: Send + Sync + 'static>(&self, instance: Arc<H>) {
        debug!(
            "Provided singleton instance for handler type '{}'",
            std::any::type_name::<H>()
        );
        self.instances.insert(TypeId::of::<H>(), instance);
    }

    /// Number of registered instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl HandlerResolver for StaticHandlerResolver {
    fn resolve(&self, handler: &HandlerTypeId) -> Result<Arc<dyn Any + Send + Sync>, ResolveError> {
        self.instances
            .get(&handler.type_id())
            .map(|entry| entry.value().clone())
            .ok_or(ResolveError::NotProvided {
                handler: handler.name(),
            })
    }
}

impl std::fmt::Debug for StaticHandlerResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticHandlerResolver")
            .field("instances", &self.instances.len())
            .finish()
    }
}
