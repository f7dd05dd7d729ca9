use serde::{Deserialize, Serialize};

use crate::types::EventKind;

/// Handle returned by the host for one event subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

/// The UI side of the host application, as seen by a command.
pub trait CommandHost {
    /// Register interest in events of `kind` for the running command.
    fn subscribe(&mut self, kind: EventKind) -> SubscriptionId;

    /// Drop a subscription returned by [`CommandHost::subscribe`].
    fn unsubscribe(&mut self, id: SubscriptionId);

    /// Show a modal message box.
    fn show_message(&mut self, message: &str);
}
