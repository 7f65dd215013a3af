//! Chain composition: folds an ordered behavior list around a strategy core.

use std::sync::Arc;

use tracing::trace;

use super::behavior::{DispatchFn, Next, PipelineBehavior};

/// Builds a composed dispatch function by wrapping a running "next" closure
/// with behavior layers, innermost-first.
///
/// Callers hand [`ChainBuilder::compose`] the behavior list in
/// outermost-first order (generic tier before category tier before
/// message-specific tier, registration order within a tier); the builder
/// folds it in reverse so the last-wrapped layer ends up outermost.
pub struct ChainBuilder {
    chain: DispatchFn,
    layers: usize,
}

impl ChainBuilder {
    /// Start a chain from the strategy core.
    pub fn new(core: DispatchFn) -> Self {
        Self {
            chain: core,
            layers: 0,
        }
    }

    /// Wrap the current chain with `behavior` as the new outermost layer.
    pub fn wrap(self, behavior: Arc<dyn PipelineBehavior>) -> Self {
        let inner = self.chain;
        let chain: DispatchFn = Arc::new(move |message, ctx| {
            let behavior = behavior.clone();
            let next = Next::new(inner.clone());
            Box::pin(async move { behavior.handle(message, ctx, next).await })
        });
        Self {
            chain,
            layers: self.layers + 1,
        }
    }

    /// Number of behavior layers wrapped so far.
    pub fn layers(&self) -> usize {
        self.layers
    }

    /// Finish, yielding the composed entry point.
    pub fn build(self) -> DispatchFn {
        self.chain
    }

    /// Compose `behaviors` (outermost-first) around `core`.
    pub fn compose(core: DispatchFn, behaviors: &[Arc<dyn PipelineBehavior>]) -> DispatchFn {
        trace!("Composing dispatch chain with {} behavior(s)", behaviors.len());
        behaviors
            .iter()
            .rev()
            .fold(ChainBuilder::new(core), |builder, behavior| {
                builder.wrap(behavior.clone())
            })
            .build()
    }
}
