//! # Pipeline Behaviors
//!
//! Middleware layers that wrap strategy execution for a message type.
//!
//! ## Overview
//!
//! A [`PipelineBehavior`] runs logic before and after the mediation strategy
//! for a message, may short-circuit by never invoking [`Next`], or may
//! transform the result on the way out. Behaviors are registered against a
//! scope tier (generic, category-specific or message-specific), and the
//! [`ChainBuilder`] composes them so that the most specific behaviors wrap
//! innermost, closest to the handlers, while generic behaviors observe the
//! full outer timing window.
//!
//! Composed chains are built once per concrete message type and cached by
//! the dispatcher cache; building a chain has no observable side effects, so
//! rebuilding under a cache race is safe.

pub mod behavior;
pub mod chain;

pub use behavior::{DispatchFn, DispatchFuture, DispatchOutcome, Next, PipelineBehavior};
pub use chain::ChainBuilder;
