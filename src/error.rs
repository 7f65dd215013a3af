//! # Error Taxonomy
//!
//! Structured error types for the mediation engine.
//!
//! ## Overview
//!
//! Dispatch failures fall into four kinds, each with its own variant family:
//! cardinality errors (wrong number of main handlers for a single-handler
//! category), resolution errors (the [`HandlerResolver`] boundary failed,
//! propagated transparently), handler execution errors, and cancellation as
//! a distinct, recognizable kind of execution failure. Event fan-out under
//! the collect-all policy reports every failure through
//! [`MediationError::Aggregate`].
//!
//! Handler implementations return the narrower [`HandlerError`]; the engine
//! maps it into [`MediationError`] with the handler name attached.
//!
//! [`HandlerResolver`]: crate::resolver::HandlerResolver

use crate::resolver::ResolveError;

/// Error raised from inside a pre, main or post handler.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// The handler observed cooperative cancellation and stopped its work.
    #[error("handler observed cancellation")]
    Cancelled,
    /// Any other handler failure.
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

impl HandlerError {
    /// Build a failure from a plain message.
    pub fn message(msg: impl Into<String>) -> Self {
        HandlerError::Failed(anyhow::anyhow!(msg.into()))
    }
}

/// Errors surfaced to dispatch callers.
#[derive(Debug, thiserror::Error)]
pub enum MediationError {
    /// No main handler registered for a command or query message type.
    #[error("no main handler registered for message type '{message_type}'")]
    NoMainHandler { message_type: &'static str },

    /// More than one main handler registered for a single-handler category.
    #[error("{count} main handlers registered for single-handler message type '{message_type}'")]
    MultipleMainHandlers {
        message_type: &'static str,
        count: usize,
    },

    /// The handler resolver boundary failed; propagated unwrapped.
    #[error(transparent)]
    Resolution(#[from] ResolveError),

    /// A pre, main or post handler failed during execution.
    #[error("handler '{handler}' failed: {source}")]
    HandlerFailed {
        handler: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// A handler observed cooperative cancellation.
    #[error("handler '{handler}' observed cancellation")]
    Cancelled { handler: &'static str },

    /// Multiple handlers failed during event fan-out (collect-all policy).
    #[error("{} handler(s) failed during event fan-out", .0.len())]
    Aggregate(Vec<MediationError>),

    /// The resolver produced an instance that is not the registered handler
    /// type. Surfaced as a resolution-class failure.
    #[error("resolved instance for handler '{handler}' has an unexpected type")]
    HandlerTypeMismatch { handler: &'static str },

    /// A dispatched value or result did not match the registered type. Should
    /// be unreachable through the typed facades.
    #[error("dispatched value does not match registered type '{expected}'")]
    TypeMismatch { expected: &'static str },
}

impl MediationError {
    /// Whether this error (or, for aggregates, every inner error) is the
    /// cancellation kind.
    pub fn is_cancellation(&self) -> bool {
        match self {
            MediationError::Cancelled { .. } => true,
            MediationError::Aggregate(errors) => {
                !errors.is_empty() && errors.iter().all(MediationError::is_cancellation)
            }
            _ => false,
        }
    }

    /// Whether this is one of the two cardinality variants.
    pub fn is_cardinality(&self) -> bool {
        matches!(
            self,
            MediationError::NoMainHandler { .. } | MediationError::MultipleMainHandlers { .. }
        )
    }

    /// Collapse a list of fan-out failures into a single error: one failure
    /// propagates as itself, several become an aggregate.
    pub(crate) fn aggregate(mut errors: Vec<MediationError>) -> MediationError {
        if errors.len() == 1 {
            errors.remove(0)
        } else {
            MediationError::Aggregate(errors)
        }
    }

    /// Map a handler-boundary error to the dispatch taxonomy.
    pub(crate) fn from_handler(handler: &'static str, error: HandlerError) -> MediationError {
        match error {
            HandlerError::Cancelled => MediationError::Cancelled { handler },
            HandlerError::Failed(source) => MediationError::HandlerFailed { handler, source },
        }
    }
}

/// Convenience alias used across the crate.
pub type MediationResult<T> = std::result::Result<T, MediationError>;
