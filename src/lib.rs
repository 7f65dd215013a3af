#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Mediator Core Rust
//!
//! In-process CQRS mediation engine: commands, queries and events routed
//! from callers to registered handlers without callers knowing handler
//! identity.
//!
//! ## Overview
//!
//! The engine classifies handler types by capability (main, pre, post) per
//! message type, composes optional pipeline behaviors around a mediation
//! strategy chosen by message category, compiles the whole arrangement into
//! one reusable dispatch function per concrete message type, and caches it
//! for the lifetime of the process. Handler instances are produced by a
//! host-controlled [`resolver`] boundary, so any dependency-injection
//! scheme plugs in.
//!
//! ## Architecture
//!
//! - **Commands and queries** run the single-main-handler strategy: all pre
//!   handlers concurrently, the sole main handler, all post handlers
//!   concurrently; any failure aborts and propagates unchanged.
//! - **Events** run the multiple-main-handler strategy: zero-or-more
//!   reactions fan out concurrently; fan-out failures are collected and
//!   reported together by default.
//! - **Pipeline behaviors** wrap strategy execution in three scope tiers
//!   (generic, category, message-specific), most specific innermost.
//! - **The dispatcher cache** makes repeat dispatches a lookup plus a call
//!   through a compiled closure; types with no behaviors skip chain
//!   construction entirely via the direct fast path.
//! - **The mediation context** threads a cancellation signal and a result
//!   slot through every handler, explicitly and ambiently (task-local).
//!
//! ## Module Organization
//!
//! - [`message`] - Message traits, categories and type-erased plumbing
//! - [`handler`] - Main/pre/post handler capability traits
//! - [`registry`] - Message descriptors and behavior registrations
//! - [`resolver`] - The handler-resolution boundary
//! - [`context`] - Per-dispatch ambient context and cancellation
//! - [`strategies`] - Single-main, multi-main and direct strategies
//! - [`pipeline`] - Pipeline behaviors and chain composition
//! - [`dispatch`] - Dispatcher cache and engine
//! - [`mediators`] - Category facades and the mediator builder
//! - [`config`] - Engine configuration
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust
//! use async_trait::async_trait;
//! use mediator_core::context::MediationContext;
//! use mediator_core::error::HandlerError;
//! use mediator_core::handler::MainHandler;
//! use mediator_core::message::{Event, Message, MessageCategory};
//! use mediator_core::Mediator;
//! use std::sync::Arc;
//!
//! struct UserCreated {
//!     user_id: u64,
//! }
//! impl Message for UserCreated {
//!     type Result = ();
//!     const CATEGORY: MessageCategory = MessageCategory::Event;
//! }
//! impl Event for UserCreated {}
//!
//! struct WelcomeMailer;
//!
//! #[async_trait]
//! impl MainHandler<UserCreated> for WelcomeMailer {
//!     async fn handle(
//!         &self,
//!         _event: &UserCreated,
//!         _ctx: &MediationContext,
//!     ) -> Result<(), HandlerError> {
//!         Ok(())
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mediator = Mediator::builder()
//!     .main_handler::<UserCreated, _>(Arc::new(WelcomeMailer))
//!     .build();
//!
//! mediator.publish(UserCreated { user_id: 7 }).await.unwrap();
//! # }
//! ```
//!
//! ## Concurrency Model
//!
//! Purely cooperative async on the host's tokio runtime; the engine owns no
//! threads. The registry and dispatcher cache are shared read-mostly
//! structures mutated only through atomic get-or-insert operations, and the
//! mediation context is never shared across independent dispatches.

pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod logging;
pub mod mediators;
pub mod message;
pub mod pipeline;
pub mod registry;
pub mod resolver;
pub mod strategies;

pub use config::{EventErrorPolicy, MediatorConfig};
pub use context::MediationContext;
pub use error::{HandlerError, MediationError, MediationResult};
pub use handler::{MainHandler, PostHandler, PreHandler};
pub use mediators::{CommandMediator, EventPublisher, Mediator, MediatorBuilder, QueryMediator};
pub use message::{Command, Event, Message, MessageCategory, Query};
pub use pipeline::{Next, PipelineBehavior};
pub use registry::{BehaviorScope, HandlerRole};
pub use resolver::{HandlerResolver, HandlerTypeId, StaticHandlerResolver};
