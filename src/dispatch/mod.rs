//! # Dispatch Core
//!
//! The per-type compiled dispatcher cache and the engine that builds and
//! runs dispatchers.
//!
//! ## Overview
//!
//! The first dispatch of a concrete message type compiles a reusable
//! dispatch function (descriptor snapshot, strategy selection and behavior
//! chain composition all happen once) and caches it by `TypeId` for the
//! lifetime of the process. Subsequent dispatches are a cache hit followed
//! by a call through the compiled closure, with no type inspection on the
//! hot path.

pub mod cache;
pub mod engine;

pub use cache::{DispatcherCache, DispatcherCacheStats};
pub(crate) use engine::DispatchEngine;
