use vent_ops::KernelBundle;
use vent_types::{DialogState, FieldId};

use crate::host::CommandHost;
use crate::types::{CommandError, LifecycleState, TerminationReason};

/// Everything a hook may touch while handling one event.
pub struct CommandContext<'a> {
    pub dialog: &'a mut DialogState,
    pub kernel: &'a mut dyn KernelBundle,
    pub host: &'a mut dyn CommandHost,
}

/// The capability set a vent command exposes to the host.
///
/// `on_preview` and `on_execute` return whether the attempt produced a valid
/// result. A failed attempt is not an error; `Err` means the event itself
/// could not be handled.
pub trait CommandHooks {
    fn state(&self) -> LifecycleState;

    fn on_create(&mut self, cx: &mut CommandContext<'_>) -> Result<(), CommandError>;

    fn on_input_changed(
        &mut self,
        field: FieldId,
        cx: &mut CommandContext<'_>,
    ) -> Result<(), CommandError>;

    fn on_preview(&mut self, cx: &mut CommandContext<'_>) -> Result<bool, CommandError>;

    fn on_execute(&mut self, cx: &mut CommandContext<'_>) -> Result<bool, CommandError>;

    fn on_destroy(
        &mut self,
        reason: TerminationReason,
        cx: &mut CommandContext<'_>,
    ) -> Result<(), CommandError>;
}
