use tracing::debug;
use vent_kernel::TimelineMarker;
use vent_ops::VentReport;
use vent_types::{SeedPoint, SessionId, VentSpec};

use crate::subscriptions::Subscriptions;
use crate::types::{CommandError, EventKind, LifecycleState};

/// State changes kept in [`SessionState::transitions`].
pub const TRANSITION_HISTORY: usize = 32;

/// State of one open command invocation.
#[derive(Debug)]
pub struct SessionState {
    pub id: SessionId,
    pub state: LifecycleState,
    /// Last definition read from the dialog.
    pub spec: VentSpec,
    pub seed: Option<SeedPoint>,
    /// Start marker of the preview currently shown in the document.
    pub live_preview: Option<TimelineMarker>,
    pub subscriptions: Subscriptions,
    pub last_report: Option<VentReport>,
    /// Message of the last failed attempt, cleared by a successful one.
    pub last_error: Option<String>,
    /// The most recent state changes in order, for diagnostics.
    pub transitions: Vec<(LifecycleState, LifecycleState)>,
}

impl SessionState {
    pub fn new(spec: VentSpec) -> Self {
        Self {
            id: SessionId::new(),
            state: LifecycleState::Idle,
            spec,
            seed: None,
            live_preview: None,
            subscriptions: Subscriptions::new(),
            last_report: None,
            last_error: None,
            transitions: Vec::new(),
        }
    }

    pub fn transition(&mut self, to: LifecycleState) {
        let from = self.state;
        if from == to {
            return;
        }
        debug!(session = %self.id, ?from, ?to, "state transition");
        if self.transitions.len() == TRANSITION_HISTORY {
            self.transitions.remove(0);
        }
        self.transitions.push((from, to));
        self.state = to;
    }

    pub fn ensure_accepts(&self, event: EventKind) -> Result<(), CommandError> {
        if self.state.accepts(event) {
            Ok(())
        } else {
            Err(CommandError::InvalidTransition {
                state: self.state,
                event,
            })
        }
    }

    /// Flow area of the last successful build, if it reported one.
    pub fn flow_area(&self) -> Option<f64> {
        self.last_report.as_ref().and_then(|r| r.flow_area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vent_types::{CircularVent, VentSpec};

    fn session() -> SessionState {
        SessionState::new(VentSpec::Circular(CircularVent {
            radius: 5.0,
            border: 0.1,
            axial_count: 5,
            radial_count: 3,
        }))
    }

    #[test]
    fn transitions_are_recorded_once() {
        let mut s = session();
        s.transition(LifecycleState::Created);
        s.transition(LifecycleState::Created);
        s.transition(LifecycleState::Previewing);
        assert_eq!(
            s.transitions,
            vec![
                (LifecycleState::Idle, LifecycleState::Created),
                (LifecycleState::Created, LifecycleState::Previewing),
            ]
        );
    }

    #[test]
    fn transition_history_is_bounded() {
        let mut s = session();
        s.transition(LifecycleState::Created);
        for _ in 0..100 {
            s.transition(LifecycleState::Previewing);
            s.transition(LifecycleState::Valid);
        }
        assert_eq!(s.transitions.len(), TRANSITION_HISTORY);
        assert_eq!(
            s.transitions.last(),
            Some(&(LifecycleState::Previewing, LifecycleState::Valid))
        );
        assert_eq!(s.transitions[0].0, LifecycleState::Valid);
    }

    #[test]
    fn ensure_accepts_rejects_preview_before_create() {
        let s = session();
        assert_eq!(
            s.ensure_accepts(EventKind::Preview),
            Err(CommandError::InvalidTransition {
                state: LifecycleState::Idle,
                event: EventKind::Preview,
            })
        );
    }
}
