//! Intent sink port — fire-and-forget delivery of outbound intents.

use std::future::Future;

use pixelhub_domain::error::PixelHubError;
use pixelhub_domain::intent::Intent;

/// Receives intents emitted by the dispatcher.
///
/// Delivery is fire-and-forget: the engine never waits for the effect
/// to be realised, only for the hand-off to complete.
pub trait IntentSink {
    /// Hand an intent to the collaborator.
    fn deliver(&self, intent: Intent) -> impl Future<Output = Result<(), PixelHubError>> + Send;
}

impl<T: IntentSink + Send + Sync> IntentSink for std::sync::Arc<T> {
    fn deliver(&self, intent: Intent) -> impl Future<Output = Result<(), PixelHubError>> + Send {
        (**self).deliver(intent)
    }
}
