use tracing::debug;

use crate::host::{CommandHost, SubscriptionId};
use crate::types::EventKind;

/// Event subscriptions held by one command session.
///
/// Owned by the session and released when it is destroyed. Nothing outside
/// the session keeps handlers alive.
#[derive(Debug, Default)]
pub struct Subscriptions {
    held: Vec<(EventKind, SubscriptionId)>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to every event kind not already held.
    pub fn subscribe_all(&mut self, host: &mut dyn CommandHost) {
        for kind in EventKind::ALL {
            if !self.is_subscribed(kind) {
                let id = host.subscribe(kind);
                self.held.push((kind, id));
            }
        }
        debug!(count = self.held.len(), "subscribed to host events");
    }

    pub fn is_subscribed(&self, kind: EventKind) -> bool {
        self.held.iter().any(|(k, _)| *k == kind)
    }

    pub fn len(&self) -> usize {
        self.held.len()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// Unsubscribe everything. Each id is handed back to the host once.
    pub fn release(&mut self, host: &mut dyn CommandHost) -> usize {
        let released = self.held.len();
        for (_, id) in self.held.drain(..) {
            host.unsubscribe(id);
        }
        debug!(released, "released host subscriptions");
        released
    }
}
