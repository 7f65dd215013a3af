//! # Message Taxonomy
//!
//! Core message traits and the type-erased plumbing shared by the registry,
//! strategies and dispatch pipeline.
//!
//! ## Overview
//!
//! Every value submitted for mediation implements [`Message`], which declares
//! the result type produced by its main handler and the [`MessageCategory`]
//! it belongs to. The marker subtraits [`Command`], [`Query`] and [`Event`]
//! are explicit capability tags: they gate the typed facade methods at
//! compile time, so a query cannot be sent through the command mediator and
//! an event can never promise a result.
//!
//! Inside the engine a message travels as an [`ErasedMessage`] (a shared
//! `dyn Any`) so that one compiled dispatch closure per concrete type can be
//! cached and reused; the typed facades downcast the result back at the
//! boundary.

use std::any::Any;
use std::sync::Arc;

/// The three mediation categories, each with its own cardinality rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageCategory {
    /// Mutates state; exactly one main handler; returns nothing or one value.
    Command,
    /// Read-only; exactly one main handler; returns exactly one value.
    Query,
    /// Notification; zero-or-more main handlers; no result.
    Event,
}

impl MessageCategory {
    /// Stable lowercase name used in logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageCategory::Command => "command",
            MessageCategory::Query => "query",
            MessageCategory::Event => "event",
        }
    }

    /// Whether this category permits at most one main handler.
    pub fn single_main_handler(&self) -> bool {
        !matches!(self, MessageCategory::Event)
    }
}

impl std::fmt::Display for MessageCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value that can be submitted for mediation.
///
/// Implementors also pick exactly one of the [`Command`], [`Query`] or
/// [`Event`] markers; the marker must agree with [`Message::CATEGORY`].
pub trait Message: Send + Sync + 'static {
    /// Result produced by the main handler. Events use `()`.
    type Result: Send + 'static;

    /// Category this message belongs to.
    const CATEGORY: MessageCategory;

    /// Human-readable message type name for logs and errors.
    fn message_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Marker for messages dispatched through the command mediator.
pub trait Command: Message {}

/// Marker for messages dispatched through the query mediator.
pub trait Query: Message {}

/// Marker for messages dispatched through the event publisher.
pub trait Event: Message<Result = ()> {}

/// A message with its concrete type erased, shareable across the concurrent
/// pre/main/post handler sets of a single dispatch.
pub type ErasedMessage = Arc<dyn Any + Send + Sync>;

/// A handler result with its concrete type erased; downcast by the typed
/// facades at the dispatch boundary.
pub type ErasedResult = Box<dyn Any + Send>;

#[cfg(test)]
mod tests {
    use super::*;

    struct Ping;
    impl Message for Ping {
        type Result = u32;
        const CATEGORY: MessageCategory = MessageCategory::Query;
    }
    impl Query for Ping {}

    #[test]
    fn test_category_names() {
        assert_eq!(MessageCategory::Command.as_str(), "command");
        assert_eq!(MessageCategory::Query.as_str(), "query");
        assert_eq!(MessageCategory::Event.as_str(), "event");
    }

    #[test]
    fn test_single_main_handler_rule() {
        assert!(MessageCategory::Command.single_main_handler());
        assert!(MessageCategory::Query.single_main_handler());
        assert!(!MessageCategory::Event.single_main_handler());
    }

    #[test]
    fn test_default_message_name_uses_type_name() {
        assert!(Ping::message_name().ends_with("Ping"));
    }
}
