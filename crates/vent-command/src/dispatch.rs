use tracing::warn;

use crate::hooks::{CommandContext, CommandHooks};
use crate::types::{CommandError, EventResponse, HostEvent};

/// Route a host event to the matching hook of `command`.
///
/// Errors are folded into the response; the host only ever sees an
/// [`EventResponse`].
pub fn dispatch(
    command: &mut dyn CommandHooks,
    event: &HostEvent,
    cx: &mut CommandContext<'_>,
) -> EventResponse {
    let kind = event.kind();
    match handle_event(command, event, cx) {
        Ok(valid) => EventResponse {
            kind,
            valid,
            error: None,
        },
        Err(e) => {
            warn!(?kind, state = ?command.state(), %e, "event rejected");
            EventResponse {
                kind,
                valid: None,
                error: Some(e.to_string()),
            }
        }
    }
}

fn handle_event(
    command: &mut dyn CommandHooks,
    event: &HostEvent,
    cx: &mut CommandContext<'_>,
) -> Result<Option<bool>, CommandError> {
    match event {
        HostEvent::Created => {
            command.on_create(cx)?;
            Ok(None)
        }

        HostEvent::InputChanged { field } => {
            command.on_input_changed(*field, cx)?;
            Ok(None)
        }

        HostEvent::Preview => command.on_preview(cx).map(Some),

        HostEvent::Execute => command.on_execute(cx).map(Some),

        HostEvent::Destroy { reason } => {
            command.on_destroy(*reason, cx)?;
            Ok(None)
        }
    }
}
