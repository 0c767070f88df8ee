//! Defines an abstraction over the event sending mechanism.

use super::events::UserEvent;
use tokio::sync::mpsc::UnboundedSender;

/// A trait that abstracts the sending of user events.
/// This is "fire-and-forget" and doesn't return a result, simplifying its use.
pub trait EventProxy: Send + Sync + Clone + 'static {
    fn send_event(&self, event: UserEvent);
}

/// The standard delivery channel: an unbounded tokio MPSC sender whose
/// receiving half is drained by the presentation loop.
impl EventProxy for UnboundedSender<UserEvent> {
    fn send_event(&self, event: UserEvent) {
        // The receiver being gone means the presentation layer shut down;
        // there is nobody left to tell, so we just log it.
        if let Err(e) = self.send(event) {
            tracing::warn!("Failed to deliver event, receiver dropped: {}", e);
        }
    }
}
