//! # Behavior Registry
//!
//! Pipeline behaviors recorded by scope tier, served in composition order.
//!
//! ## Overview
//!
//! Behaviors register at one of three tiers: generic (applies to every
//! message type), category-scoped (all commands, all queries or all events)
//! or message-specific. `behaviors_for` returns the behaviors matching a
//! concrete message type in outermost-first order: generic tier first,
//! category tier next, message-specific tier last, with registration order
//! preserved inside each tier. The chain builder wraps that list so the most
//! specific behaviors execute closest to the handlers.

use std::any::TypeId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::message::{Message, MessageCategory};
use crate::pipeline::PipelineBehavior;

/// Scope tier a pipeline behavior applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorScope {
    /// Applies to every message type; wraps outermost.
    Generic,
    /// Applies to every message of one category.
    Category(MessageCategory),
    /// Applies to one concrete message type; wraps innermost.
    Message(TypeId),
}

impl BehaviorScope {
    /// Message-specific scope for the concrete message type `M`.
    pub fn message_of<M: Message>() -> Self {
        BehaviorScope::Message(TypeId::of::<M>())
    }

    /// Whether a behavior at this scope applies to the given message type.
    fn applies_to(&self, message_type: TypeId, category: MessageCategory) -> bool {
        match self {
            BehaviorScope::Generic => true,
            BehaviorScope::Category(scoped) => *scoped == category,
            BehaviorScope::Message(scoped) => *scoped == message_type,
        }
    }

    /// Tier rank: lower wraps further out.
    fn tier(&self) -> u8 {
        match self {
            BehaviorScope::Generic => 0,
            BehaviorScope::Category(_) => 1,
            BehaviorScope::Message(_) => 2,
        }
    }
}

struct BehaviorEntry {
    scope: BehaviorScope,
    behavior: Arc<dyn PipelineBehavior>,
    seq: u64,
}

/// Registry of pipeline behavior registrations across all scope tiers.
#[derive(Default)]
pub struct BehaviorRegistry {
    entries: RwLock<Vec<BehaviorEntry>>,
    next_seq: AtomicU64,
}

impl BehaviorRegistry {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Record a behavior at the given scope. Registration order within a
    /// tier determines nesting order (first registered wraps outermost
    /// within its tier).
    pub fn register(&self, scope: BehaviorScope, behavior: Arc<dyn PipelineBehavior>) {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        debug!(
            "Registered pipeline behavior '{}' at scope {:?} (seq {})",
            behavior.behavior_name(),
            scope,
            seq
        );
        self.entries.write().push(BehaviorEntry {
            scope,
            behavior,
            seq,
        });
    }

    /// Behaviors applying to a concrete message type, outermost-first.
    pub fn behaviors_for(
        &self,
        message_type: TypeId,
        category: MessageCategory,
    ) -> Vec<Arc<dyn PipelineBehavior>> {
        let entries = self.entries.read();
        let mut matching: Vec<(&BehaviorEntry, u8)> = entries
            .iter()
            .filter(|entry| entry.scope.applies_to(message_type, category))
            .map(|entry| (entry, entry.scope.tier()))
            .collect();
        matching.sort_by_key(|(entry, tier)| (*tier, entry.seq));
        matching
            .into_iter()
            .map(|(entry, _)| entry.behavior.clone())
            .collect()
    }

    /// Total registrations across all tiers.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl std::fmt::Debug for BehaviorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BehaviorRegistry")
            .field("registrations", &self.len())
            .finish()
    }
}
