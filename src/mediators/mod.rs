//! # Category Mediators
//!
//! Thin typed entry points over the shared dispatch engine.
//!
//! ## Overview
//!
//! Each category gets its own facade ([`CommandMediator`],
//! [`QueryMediator`], [`EventPublisher`]) selecting the right strategy and
//! result shape for its category and delegating to the cached dispatcher
//! for the concrete message type. The [`Mediator`] facade bundles all three
//! over one engine, and [`MediatorBuilder`] assembles registrations,
//! behaviors, resolver and configuration.
//!
//! ## Usage
//!
//! ```rust
//! use async_trait::async_trait;
//! use mediator_core::context::MediationContext;
//! use mediator_core::error::HandlerError;
//! use mediator_core::handler::MainHandler;
//! use mediator_core::message::{Command, Message, MessageCategory};
//! use mediator_core::Mediator;
//! use std::sync::Arc;
//!
//! struct CreateUser {
//!     name: String,
//! }
//! impl Message for CreateUser {
//!     type Result = u64;
//!     const CATEGORY: MessageCategory = MessageCategory::Command;
//! }
//! impl Command for CreateUser {}
//!
//! struct CreateUserHandler;
//!
//! #[async_trait]
//! impl MainHandler<CreateUser> for CreateUserHandler {
//!     async fn handle(
//!         &self,
//!         _message: &CreateUser,
//!         _ctx: &MediationContext,
//!     ) -> Result<u64, HandlerError> {
//!         Ok(42)
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mediator = Mediator::builder()
//!     .main_handler::<CreateUser, _>(Arc::new(CreateUserHandler))
//!     .build();
//!
//! let user_id = mediator
//!     .send(CreateUser {
//!         name: "ada".to_string(),
//!     })
//!     .await
//!     .unwrap();
//! assert_eq!(user_id, 42);
//! # }
//! ```

pub mod builder;
pub mod command;
pub mod event;
pub mod query;

pub use builder::{Mediator, MediatorBuilder};
pub use command::CommandMediator;
pub use event::EventPublisher;
pub use query::QueryMediator;

use std::any::TypeId;

use crate::error::{MediationError, MediationResult};
use crate::message::{ErasedResult, Message};

/// Recover the typed result at the dispatch boundary.
///
/// A result-less outcome is tolerated for unit-result messages (a behavior
/// may legitimately short-circuit a `()` command without synthesizing a
/// boxed unit).
pub(crate) fn downcast_result<M: Message>(
    outcome: Option<ErasedResult>,
) -> MediationResult<M::Result> {
    let boxed = match outcome {
        Some(boxed) => boxed,
        None if TypeId::of::<M::Result>() == TypeId::of::<()>() => Box::new(()),
        None => {
            return Err(MediationError::TypeMismatch {
                expected: std::any::type_name::<M::Result>(),
            })
        }
    };
    boxed
        .downcast::<M::Result>()
        .map(|result| *result)
        .map_err(|_| MediationError::TypeMismatch {
            expected: std::any::type_name::<M::Result>(),
        })
}
