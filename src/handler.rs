//! Handler capability traits.
//!
//! A handler type declares which roles it fills by implementing one or more
//! of [`MainHandler`], [`PreHandler`] and [`PostHandler`] for a message type.
//! A type implementing several capabilities is registered once per role and
//! produces a separate descriptor entry for each.

use async_trait::async_trait;

use crate::context::MediationContext;
use crate::error::HandlerError;
use crate::message::Message;

/// The primary business-logic handler for a message type.
///
/// Commands and queries require exactly one main handler; events permit any
/// number (including zero).
#[async_trait]
pub trait MainHandler<M: Message>: Send + Sync + 'static {
    /// Handle the message and produce its result.
    async fn handle(
        &self,
        message: &M,
        ctx: &MediationContext,
    ) -> Result<M::Result, HandlerError>;

    /// Handler name for logs and error messages.
    fn handler_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A handler that runs before the main handler(s) of a message type.
///
/// All pre handlers of a dispatch are launched concurrently and awaited
/// together; every one completes before any main handler starts.
#[async_trait]
pub trait PreHandler<M: Message>: Send + Sync + 'static {
    async fn handle(&self, message: &M, ctx: &MediationContext) -> Result<(), HandlerError>;

    fn handler_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A handler that runs after the main handler(s) of a message type.
///
/// Post handlers of single-main-handler categories can observe the main
/// result through [`MediationContext::peek_result`].
#[async_trait]
pub trait PostHandler<M: Message>: Send + Sync + 'static {
    async fn handle(&self, message: &M, ctx: &MediationContext) -> Result<(), HandlerError>;

    fn handler_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
