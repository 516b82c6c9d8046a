//! In-process intent bus backed by a tokio broadcast channel.

use std::future::Future;

use tokio::sync::broadcast;

use pixelhub_domain::error::PixelHubError;
use pixelhub_domain::intent::Intent;

use crate::ports::IntentSink;

/// In-process intent bus using a tokio [`broadcast`] channel.
///
/// Delivery succeeds even when there are no active subscribers (the
/// intent is simply dropped) — dispatch must stay fire-and-forget.
pub struct InProcessIntentBus {
    sender: broadcast::Sender<Intent>,
}

impl InProcessIntentBus {
    /// Create a new bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to intents on this bus.
    ///
    /// Returns a receiver that will get all intents delivered *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Intent> {
        self.sender.subscribe()
    }
}

impl IntentSink for InProcessIntentBus {
    fn deliver(&self, intent: Intent) -> impl Future<Output = Result<(), PixelHubError>> + Send {
        // broadcast::send fails only when there are zero receivers,
        // which is fine — we simply ignore the error.
        let _ = self.sender.send(intent);
        async { Ok(()) }
    }
}
