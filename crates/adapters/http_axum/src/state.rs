//! Shared application state for axum handlers.

use std::sync::Arc;

use pixelhub_app::engine::RuleEngine;
use pixelhub_app::intent_bus::InProcessIntentBus;
use pixelhub_app::ports::IntentSink;

/// Application state shared across all axum handlers.
///
/// Generic over the intent sink to avoid dynamic dispatch. `Clone` is
/// implemented manually so the engine itself does not need to be
/// `Clone` — only the `Arc` wrappers are cloned.
pub struct AppState<S> {
    /// The rule engine and its stores.
    pub engine: Arc<RuleEngine<S>>,
    /// Intent bus backing the SSE stream.
    pub intent_bus: Arc<InProcessIntentBus>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            intent_bus: Arc::clone(&self.intent_bus),
        }
    }
}

impl<S: IntentSink + Send + Sync + 'static> AppState<S> {
    /// Create state from a pre-wrapped engine and the intent bus.
    ///
    /// The engine is shared with the scheduler and the MQTT bridge, so
    /// it always arrives already wrapped in an `Arc`.
    pub fn new(engine: Arc<RuleEngine<S>>, intent_bus: Arc<InProcessIntentBus>) -> Self {
        Self { engine, intent_bus }
    }
}
