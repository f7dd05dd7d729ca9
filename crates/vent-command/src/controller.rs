use tracing::{info, instrument, warn};
use vent_ops::build_vent;
use vent_types::{FieldId, FieldValue};

use crate::config::CommandConfig;
use crate::hooks::{CommandContext, CommandHooks};
use crate::inputs::{apply_visibility, initial_dialog, read_kind, read_seed, read_spec, InputModel};
use crate::session::SessionState;
use crate::transaction::{bracketed, AttemptError};
use crate::types::{CommandError, EventKind, LifecycleState, TerminationReason};

/// The vent command: one instance per open dialog.
///
/// Drives the input model and the geometry engine from host events. Every
/// preview and execute attempt starts from the document as it was before the
/// command opened: the previous live preview is undone first, and a failed
/// attempt is undone before it is reported.
#[derive(Debug)]
pub struct VentCommand {
    pub config: CommandConfig,
    pub session: SessionState,
}

impl VentCommand {
    pub fn new(config: CommandConfig) -> Self {
        let spec = config.defaults.spec(config.defaults.vent_type);
        Self {
            config,
            session: SessionState::new(spec),
        }
    }

    /// Undo the preview currently shown, if any.
    fn retract_preview(&mut self, cx: &mut CommandContext<'_>) -> Result<(), CommandError> {
        if let Some(marker) = self.session.live_preview.take() {
            cx.kernel.undo_to(marker).map_err(CommandError::Rollback)?;
            info!(session = %self.session.id, marker = marker.0, "retracted live preview");
        }
        Ok(())
    }

    fn write_flow_area(&self, cx: &mut CommandContext<'_>, area: Option<f64>) {
        let text = match area {
            Some(area) => format!("{area:.4}"),
            None => "0.0".to_string(),
        };
        cx.dialog.set(FieldId::FlowArea, FieldValue::Text(text));
    }

    /// One rollback-bracketed build. Returns whether it produced a valid result.
    #[instrument(skip(self, cx), fields(session = %self.session.id))]
    fn attempt(&mut self, cx: &mut CommandContext<'_>, commit: bool) -> Result<bool, CommandError> {
        let event = if commit {
            EventKind::Execute
        } else {
            EventKind::Preview
        };
        self.session.ensure_accepts(event)?;
        self.retract_preview(cx)?;
        if !commit {
            self.session.transition(LifecycleState::Previewing);
        }

        let model = match InputModel::from_dialog(cx.dialog, &self.config.count_limits) {
            Ok(model) => model,
            Err(e) => {
                warn!(%e, "dialog inputs rejected");
                self.session.last_error = Some(e.to_string());
                self.session.last_report = None;
                self.write_flow_area(cx, None);
                self.session.transition(LifecycleState::Invalid);
                return Ok(false);
            }
        };
        self.session.spec = model.spec;
        self.session.seed = Some(model.seed.clone());

        let spec = model.spec;
        let seed = model.seed;
        match bracketed(&mut *cx.kernel, |kb| build_vent(kb, &spec, &seed)) {
            Ok((report, span)) => {
                info!(
                    kind = %report.kind,
                    cut = report.bodies_cut,
                    joined = report.bodies_joined,
                    flow_area = ?report.flow_area,
                    commit,
                    "vent attempt succeeded"
                );
                self.write_flow_area(cx, report.flow_area);
                self.session.last_report = Some(report);
                self.session.last_error = None;
                if commit {
                    self.session.transition(LifecycleState::Committed);
                } else {
                    self.session.live_preview = Some(span.start);
                    self.session.transition(LifecycleState::Valid);
                }
                Ok(true)
            }
            Err(AttemptError::Failed(e)) => {
                self.report_failure(cx, &e);
                Ok(false)
            }
            Err(AttemptError::RollbackFailed { cause, undo }) => {
                self.report_failure(cx, &cause);
                Err(CommandError::Rollback(undo))
            }
        }
    }

    fn report_failure(&mut self, cx: &mut CommandContext<'_>, error: &dyn std::fmt::Display) {
        let message = self.config.failure_message(error);
        cx.host.show_message(&message);
        self.session.last_error = Some(error.to_string());
        self.session.last_report = None;
        self.write_flow_area(cx, None);
        self.session.transition(LifecycleState::Invalid);
    }
}

impl CommandHooks for VentCommand {
    fn state(&self) -> LifecycleState {
        self.session.state
    }

    fn on_create(&mut self, cx: &mut CommandContext<'_>) -> Result<(), CommandError> {
        self.session.ensure_accepts(EventKind::Created)?;
        *cx.dialog = initial_dialog(&self.config);
        self.session.spec = self.config.defaults.spec(self.config.defaults.vent_type);
        self.session.subscriptions.subscribe_all(cx.host);
        info!(
            session = %self.session.id,
            command = %self.config.command_id,
            "vent command created"
        );
        self.session.transition(LifecycleState::Created);
        Ok(())
    }

    fn on_input_changed(
        &mut self,
        field: FieldId,
        cx: &mut CommandContext<'_>,
    ) -> Result<(), CommandError> {
        self.session.ensure_accepts(EventKind::InputChanged)?;
        if field == FieldId::VentType {
            apply_visibility(cx.dialog, read_kind(cx.dialog)?);
        }
        // Partial edits are normal while typing; keep the last good values.
        if let Ok(spec) = read_spec(cx.dialog, &self.config.count_limits) {
            self.session.spec = spec;
        }
        self.session.seed = read_seed(cx.dialog).ok();
        self.session.transition(LifecycleState::Created);
        Ok(())
    }

    fn on_preview(&mut self, cx: &mut CommandContext<'_>) -> Result<bool, CommandError> {
        self.attempt(cx, false)
    }

    fn on_execute(&mut self, cx: &mut CommandContext<'_>) -> Result<bool, CommandError> {
        self.attempt(cx, true)
    }

    fn on_destroy(
        &mut self,
        reason: TerminationReason,
        cx: &mut CommandContext<'_>,
    ) -> Result<(), CommandError> {
        self.session.ensure_accepts(EventKind::Destroy)?;
        let released = self.session.subscriptions.release(cx.host);
        let retracted = if self.session.state == LifecycleState::Committed {
            Ok(())
        } else {
            let retracted = self.retract_preview(cx);
            self.session.transition(LifecycleState::Cancelled);
            retracted
        };
        self.session.transition(LifecycleState::Destroyed);
        info!(session = %self.session.id, ?reason, released, "vent command destroyed");
        retracted
    }
}
