//! Message and handler descriptors: the registry's record types.

use std::any::TypeId;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::context::MediationContext;
use crate::error::MediationError;
use crate::message::{ErasedMessage, ErasedResult, Message, MessageCategory};
use crate::resolver::HandlerResolver;

/// Role a handler type plays for a message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerRole {
    Main,
    Pre,
    Post,
}

impl HandlerRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerRole::Main => "main",
            HandlerRole::Pre => "pre",
            HandlerRole::Post => "post",
        }
    }
}

/// Registry record for one (message type, handler type, role) registration.
///
/// A handler type satisfying several capabilities produces one descriptor
/// per role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerDescriptor {
    pub message_type: TypeId,
    pub handler_type: TypeId,
    pub handler_name: &'static str,
    pub role: HandlerRole,
}

pub(crate) type MainInvokeFuture =
    Pin<Box<dyn Future<Output = Result<ErasedResult, MediationError>> + Send>>;
pub(crate) type UnitInvokeFuture =
    Pin<Box<dyn Future<Output = Result<(), MediationError>> + Send>>;

/// Type-erased invoker for a main handler: resolve, downcast, execute.
pub(crate) type MainInvokerFn = Arc<
    dyn Fn(Arc<dyn HandlerResolver>, ErasedMessage, MediationContext) -> MainInvokeFuture
        + Send
        + Sync,
>;

/// Type-erased invoker for a pre or post handler.
pub(crate) type UnitInvokerFn = Arc<
    dyn Fn(Arc<dyn HandlerResolver>, ErasedMessage, MediationContext) -> UnitInvokeFuture
        + Send
        + Sync,
>;

#[derive(Clone)]
pub(crate) struct MainHandlerEntry {
    pub descriptor: HandlerDescriptor,
    pub invoke: MainInvokerFn,
}

#[derive(Clone)]
pub(crate) struct UnitHandlerEntry {
    pub descriptor: HandlerDescriptor,
    pub invoke: UnitInvokerFn,
}

/// Registry record for one message type: all handlers classified against it.
///
/// Handler lists are append-only during registration and read-only during
/// dispatch; the dispatcher cache works against an owned snapshot.
#[derive(Clone)]
pub struct MessageDescriptor {
    message_type: TypeId,
    message_name: &'static str,
    category: MessageCategory,
    pub(crate) main_handlers: Vec<MainHandlerEntry>,
    pub(crate) pre_handlers: Vec<UnitHandlerEntry>,
    pub(crate) post_handlers: Vec<UnitHandlerEntry>,
}

impl MessageDescriptor {
    /// Fresh descriptor for message type `M` with no handlers yet.
    pub(crate) fn empty_for<M: Message>() -> Self {
        Self {
            message_type: TypeId::of::<M>(),
            message_name: M::message_name(),
            category: M::CATEGORY,
            main_handlers: Vec::new(),
            pre_handlers: Vec::new(),
            post_handlers: Vec::new(),
        }
    }

    pub fn message_type(&self) -> TypeId {
        self.message_type
    }

    pub fn message_name(&self) -> &'static str {
        self.message_name
    }

    pub fn category(&self) -> MessageCategory {
        self.category
    }

    pub fn main_handler_count(&self) -> usize {
        self.main_handlers.len()
    }

    pub fn pre_handler_count(&self) -> usize {
        self.pre_handlers.len()
    }

    pub fn post_handler_count(&self) -> usize {
        self.post_handlers.len()
    }

    /// All handler descriptors recorded against this message type.
    pub fn handler_descriptors(&self) -> Vec<HandlerDescriptor> {
        self.main_handlers
            .iter()
            .map(|entry| entry.descriptor.clone())
            .chain(self.pre_handlers.iter().map(|entry| entry.descriptor.clone()))
            .chain(self.post_handlers.iter().map(|entry| entry.descriptor.clone()))
            .collect()
    }
}

impl std::fmt::Debug for MessageDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageDescriptor")
            .field("message_name", &self.message_name)
            .field("category", &self.category)
            .field("main_handlers", &self.main_handlers.len())
            .field("pre_handlers", &self.pre_handlers.len())
            .field("post_handlers", &self.post_handlers.len())
            .finish()
    }
}
