//! Shared fixtures for the mediation integration suites: message types,
//! marker-recording handlers and pipeline behaviors.

#![allow(dead_code)] // each test binary uses a subset of the fixtures

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use mediator_core::context::MediationContext;
use mediator_core::error::HandlerError;
use mediator_core::handler::{MainHandler, PostHandler, PreHandler};
use mediator_core::message::{Command, ErasedMessage, Event, Message, MessageCategory, Query};
use mediator_core::pipeline::{DispatchOutcome, Next, PipelineBehavior};

/// Execution-marker recorder shared across the handlers of a dispatch.
#[derive(Default)]
pub struct Recorder {
    markers: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn record(&self, marker: impl Into<String>) {
        self.markers.lock().push(marker.into());
    }

    pub fn markers(&self) -> Vec<String> {
        self.markers.lock().clone()
    }

    /// Position of the first marker equal to `needle`, if recorded.
    pub fn position(&self, needle: &str) -> Option<usize> {
        self.markers.lock().iter().position(|m| m == needle)
    }
}

// ---------------------------------------------------------------------------
// Message fixtures
// ---------------------------------------------------------------------------

pub struct CreateUser {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedUser {
    pub id: u64,
}

impl Message for CreateUser {
    type Result = CreatedUser;
    const CATEGORY: MessageCategory = MessageCategory::Command;
}
impl Command for CreateUser {}

pub struct GetUser {
    pub id: u64,
}

impl Message for GetUser {
    type Result = String;
    const CATEGORY: MessageCategory = MessageCategory::Query;
}
impl Query for GetUser {}

pub struct UserCreated {
    pub user_id: u64,
}

impl Message for UserCreated {
    type Result = ();
    const CATEGORY: MessageCategory = MessageCategory::Event;
}
impl Event for UserCreated {}

// ---------------------------------------------------------------------------
// Handler fixtures
// ---------------------------------------------------------------------------

/// Pre handler recording marker `P`.
pub struct CreateUserPre {
    pub recorder: Arc<Recorder>,
}

#[async_trait]
impl PreHandler<CreateUser> for CreateUserPre {
    async fn handle(
        &self,
        _message: &CreateUser,
        _ctx: &MediationContext,
    ) -> Result<(), HandlerError> {
        self.recorder.record("P");
        Ok(())
    }
}

/// Main handler recording marker `M` and answering with user id 42.
pub struct CreateUserMain {
    pub recorder: Arc<Recorder>,
}

#[async_trait]
impl MainHandler<CreateUser> for CreateUserMain {
    async fn handle(
        &self,
        _message: &CreateUser,
        _ctx: &MediationContext,
    ) -> Result<CreatedUser, HandlerError> {
        self.recorder.record("M");
        Ok(CreatedUser { id: 42 })
    }
}

/// Post handler recording marker `Q`; also captures the stashed main result.
pub struct CreateUserPost {
    pub recorder: Arc<Recorder>,
    pub observed_id: Mutex<Option<u64>>,
}

impl CreateUserPost {
    pub fn new(recorder: &Arc<Recorder>) -> Arc<Self> {
        Arc::new(Self {
            recorder: recorder.clone(),
            observed_id: Mutex::new(None),
        })
    }
}

#[async_trait]
impl PostHandler<CreateUser> for CreateUserPost {
    async fn handle(
        &self,
        _message: &CreateUser,
        ctx: &MediationContext,
    ) -> Result<(), HandlerError> {
        self.recorder.record("Q");
        *self.observed_id.lock() = ctx.peek_result::<CreatedUser, _>(|r| r.map(|u| u.id));
        Ok(())
    }
}

/// Query main handler answering with a formatted user name.
pub struct GetUserMain;

#[async_trait]
impl MainHandler<GetUser> for GetUserMain {
    async fn handle(
        &self,
        message: &GetUser,
        _ctx: &MediationContext,
    ) -> Result<String, HandlerError> {
        Ok(format!("user-{}", message.id))
    }
}

/// Event reaction recording marker `A`.
pub struct ReactionA {
    pub recorder: Arc<Recorder>,
}

#[async_trait]
impl MainHandler<UserCreated> for ReactionA {
    async fn handle(
        &self,
        _event: &UserCreated,
        _ctx: &MediationContext,
    ) -> Result<(), HandlerError> {
        self.recorder.record("A");
        Ok(())
    }
}

/// Second, independent event reaction recording marker `B`.
pub struct ReactionB {
    pub recorder: Arc<Recorder>,
}

#[async_trait]
impl MainHandler<UserCreated> for ReactionB {
    async fn handle(
        &self,
        _event: &UserCreated,
        _ctx: &MediationContext,
    ) -> Result<(), HandlerError> {
        self.recorder.record("B");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Behavior fixtures
// ---------------------------------------------------------------------------

/// Pipeline behavior recording `{label}-enter` / `{label}-exit` around the
/// rest of the chain.
pub struct MarkerBehavior {
    pub label: &'static str,
    pub recorder: Arc<Recorder>,
}

impl MarkerBehavior {
    pub fn new(label: &'static str, recorder: &Arc<Recorder>) -> Arc<Self> {
        Arc::new(Self {
            label,
            recorder: recorder.clone(),
        })
    }
}

#[async_trait]
impl PipelineBehavior for MarkerBehavior {
    async fn handle(
        &self,
        message: ErasedMessage,
        ctx: MediationContext,
        next: Next,
    ) -> DispatchOutcome {
        self.recorder.record(format!("{}-enter", self.label));
        let outcome = next.run(message, ctx).await;
        self.recorder.record(format!("{}-exit", self.label));
        outcome
    }
}
