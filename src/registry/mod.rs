//! # Registry Infrastructure
//!
//! Registries consulted at dispatch time: message descriptors and pipeline
//! behavior registrations.
//!
//! ## Overview
//!
//! The registry module records what the host wires up at startup: which
//! handler types serve which message types, and which pipeline behaviors
//! wrap which scope tiers. Both registries are shared, read-mostly
//! structures mutated only through atomic get-or-insert style operations;
//! dispatch works against snapshots.
//!
//! ## Available Registries
//!
//! - **MessageRegistry**: handler types classified by role per message type
//! - **BehaviorRegistry**: pipeline behaviors by scope tier, in
//!   composition order
//!
//! ## Architecture
//!
//! ```text
//! Registry Infrastructure
//! ├── MessageRegistry       (MessageDescriptor per message TypeId)
//! │   └── HandlerDescriptor (main / pre / post, with erased invoker)
//! └── BehaviorRegistry      (generic → category → message-specific tiers)
//! ```

pub mod behavior_registry;
pub mod descriptor;
pub mod message_registry;

// Re-export main types for easy access
pub use behavior_registry::{BehaviorRegistry, BehaviorScope};
pub use descriptor::{HandlerDescriptor, HandlerRole, MessageDescriptor};
pub use message_registry::{MessageRegistry, RegistryStats};
