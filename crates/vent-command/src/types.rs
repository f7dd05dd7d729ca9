use serde::{Deserialize, Serialize};
use vent_kernel::KernelError;
use vent_ops::VentError;
use vent_types::FieldId;

use crate::config::ConfigError;
use crate::inputs::InputError;

/// Where a command session is in its lifecycle.
///
/// A preview cycle ends in `Valid` or `Invalid` and the session rests there
/// until the next event. Both accept exactly the events `Created` accepts, so
/// an input change, another preview, an execute or a destroy can follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleState {
    /// Not yet created by the host.
    Idle,
    /// Dialog is open; no preview has run since the last input change.
    Created,
    /// A preview attempt is running.
    Previewing,
    /// The last preview succeeded and its geometry is live.
    Valid,
    /// The last preview or execute failed; the document is as it was.
    Invalid,
    /// Execute succeeded; the vent is part of the document.
    Committed,
    /// The dialog closed without a commit; any live preview was retracted.
    Cancelled,
    /// The host destroyed the command. Terminal.
    Destroyed,
}

impl LifecycleState {
    /// Whether an event of `kind` may be handled in this state.
    pub fn accepts(self, kind: EventKind) -> bool {
        use EventKind as E;
        use LifecycleState as S;
        matches!(
            (self, kind),
            (S::Idle, E::Created)
                | (
                    S::Created | S::Valid | S::Invalid,
                    E::InputChanged | E::Preview | E::Execute | E::Destroy
                )
                | (S::Committed, E::Destroy)
        )
    }
}

/// Why the host destroyed the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    Completed,
    Cancelled,
    Aborted,
    PreEmpted,
    DocumentClosed,
}

/// Kinds of host events a command reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Created,
    InputChanged,
    Preview,
    Execute,
    Destroy,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::Created,
        EventKind::InputChanged,
        EventKind::Preview,
        EventKind::Execute,
        EventKind::Destroy,
    ];
}

/// An event dispatched by the host to the command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostEvent {
    Created,
    InputChanged { field: FieldId },
    Preview,
    Execute,
    Destroy { reason: TerminationReason },
}

impl HostEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            HostEvent::Created => EventKind::Created,
            HostEvent::InputChanged { .. } => EventKind::InputChanged,
            HostEvent::Preview => EventKind::Preview,
            HostEvent::Execute => EventKind::Execute,
            HostEvent::Destroy { .. } => EventKind::Destroy,
        }
    }
}

/// What the host reads back after dispatching an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventResponse {
    pub kind: EventKind,
    /// Result validity for preview and execute, `None` for other events.
    pub valid: Option<bool>,
    /// Set when the event itself could not be handled.
    pub error: Option<String>,
}

/// Errors from command handling.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("{event:?} event is not accepted in state {state:?}")]
    InvalidTransition {
        state: LifecycleState,
        event: EventKind,
    },

    #[error("invalid input: {0}")]
    Input(#[from] InputError),

    #[error(transparent)]
    Vent(#[from] VentError),

    #[error("rolling back the attempt failed: {0}")]
    Rollback(KernelError),

    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_only_accepts_created() {
        for kind in EventKind::ALL {
            assert_eq!(LifecycleState::Idle.accepts(kind), kind == EventKind::Created);
        }
    }

    #[test]
    fn preview_outcomes_accept_what_created_accepts() {
        for state in [LifecycleState::Valid, LifecycleState::Invalid] {
            for kind in EventKind::ALL {
                assert_eq!(
                    state.accepts(kind),
                    LifecycleState::Created.accepts(kind),
                    "{state:?} on {kind:?}"
                );
            }
        }
    }

    #[test]
    fn committed_only_accepts_destroy() {
        assert!(LifecycleState::Committed.accepts(EventKind::Destroy));
        assert!(!LifecycleState::Committed.accepts(EventKind::Preview));
        assert!(!LifecycleState::Committed.accepts(EventKind::Execute));
    }

    #[test]
    fn destroyed_accepts_nothing() {
        assert!(EventKind::ALL
            .iter()
            .all(|k| !LifecycleState::Destroyed.accepts(*k)));
    }

    #[test]
    fn host_event_json_is_tagged() {
        let event = HostEvent::InputChanged {
            field: FieldId::VentType,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"InputChanged","field":"vent_type"}"#);
    }
}
