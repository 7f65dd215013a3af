//! Engine configuration.
//!
//! `MediatorConfig` is supplied by the embedding host (plain struct, serde
//! derives for hosts that deserialize it from their own configuration
//! surface). Defaults are safe for production use.

use serde::{Deserialize, Serialize};

/// Error policy for concurrent event fan-out.
///
/// The single-main-handler categories always fail fast; events choose
/// between first-error abort and driving every handler to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventErrorPolicy {
    /// Drive every handler in the failing phase to completion, then report
    /// all failures together (default).
    #[default]
    CollectAll,
    /// Abort the failing phase on the first error observed.
    FailFast,
}

/// Configuration for the mediation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediatorConfig {
    /// How event fan-out reports concurrent handler failures.
    #[serde(default)]
    pub event_error_policy: EventErrorPolicy,

    /// Whether the no-behaviors fast path may skip chain construction for
    /// commands and queries. Disabling forces every dispatch through the
    /// full chain builder; observable behavior is identical either way.
    #[serde(default = "default_direct_path_enabled")]
    pub direct_path_enabled: bool,
}

fn default_direct_path_enabled() -> bool {
    true
}

impl Default for MediatorConfig {
    fn default() -> Self {
        Self {
            event_error_policy: EventErrorPolicy::default(),
            direct_path_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MediatorConfig::default();
        assert_eq!(config.event_error_policy, EventErrorPolicy::CollectAll);
        assert!(config.direct_path_enabled);
    }
}
