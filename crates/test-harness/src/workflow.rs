//! VentWorkflow: fluent API for scripting dialog sessions in tests.
//!
//! Wraps `vent_command::dispatch()` to test the real event routing, not a
//! simulation. Field edits go through `InputChanged` events exactly as the
//! host would send them.

use vent_command::{
    dispatch, CommandConfig, CommandContext, CommandHooks, EventResponse, HostEvent,
    LifecycleState, TerminationReason, VentCommand,
};
use vent_kernel::{MockBox, MockKernel};
use vent_ops::VentReport;
use vent_types::{DialogState, FieldId, FieldValue, SeedPoint, VentKind, VentSpec};

use crate::helpers::*;

/// A fluent driver for one command session against a mock document.
pub struct VentWorkflow {
    pub command: VentCommand,
    pub dialog: DialogState,
    pub kernel: MockKernel,
    pub host: RecordingHost,
    /// The solid the vent is cut into, when the fixture has one.
    pub target: Option<MockBox>,
    history: Vec<(HostEvent, EventResponse)>,
}

impl VentWorkflow {
    /// Session on [`slab_document`] with the default config.
    pub fn on_slab() -> Self {
        let (kernel, slab) = slab_document();
        Self::on_document(kernel, Some(slab))
    }

    /// Session on [`sheet_document`]: no face opposes the sheet.
    pub fn on_sheet() -> Self {
        let (kernel, _) = sheet_document();
        Self::on_document(kernel, None)
    }

    pub fn on_document(kernel: MockKernel, target: Option<MockBox>) -> Self {
        Self {
            command: VentCommand::new(CommandConfig::default()),
            dialog: DialogState::new(),
            kernel,
            host: RecordingHost::new(),
            target,
            history: Vec::new(),
        }
    }

    /// Replace the command config. Call before [`VentWorkflow::create`].
    pub fn with_config(mut self, config: CommandConfig) -> Self {
        self.command = VentCommand::new(config);
        self
    }

    // ── Events ──────────────────────────────────────────────────────────

    /// Send one event and record it, whatever the outcome.
    pub fn send(&mut self, event: HostEvent) -> EventResponse {
        let mut cx = CommandContext {
            dialog: &mut self.dialog,
            kernel: &mut self.kernel,
            host: &mut self.host,
        };
        let response = dispatch(&mut self.command, &event, &mut cx);
        self.history.push((event, response.clone()));
        response
    }

    /// Send an event that must be accepted.
    fn send_ok(&mut self, event: HostEvent) -> Result<EventResponse, HarnessError> {
        let label = format!("{:?}", event);
        let response = self.send(event);
        match &response.error {
            None => Ok(response),
            Some(message) => Err(HarnessError::DispatchError {
                event: label,
                message: message.clone(),
            }),
        }
    }

    pub fn create(&mut self) -> Result<&mut Self, HarnessError> {
        self.send_ok(HostEvent::Created)?;
        Ok(self)
    }

    /// Write a field and notify the command.
    pub fn set(&mut self, field: FieldId, value: FieldValue) -> Result<&mut Self, HarnessError> {
        self.dialog.set(field, value);
        self.send_ok(HostEvent::InputChanged { field })?;
        Ok(self)
    }

    pub fn choose(&mut self, kind: VentKind) -> Result<&mut Self, HarnessError> {
        self.set(FieldId::VentType, FieldValue::Choice(kind))
    }

    pub fn pick(&mut self, seed: SeedPoint) -> Result<&mut Self, HarnessError> {
        self.set(FieldId::CenterPoint, FieldValue::Selection(vec![seed]))
    }

    /// Select the centre of the fixture's top face.
    pub fn pick_top_center(&mut self) -> Result<&mut Self, HarnessError> {
        let seed = top_center_seed(&self.kernel);
        self.pick(seed)
    }

    /// Type every field of `spec` into the dialog.
    pub fn enter(&mut self, spec: &VentSpec) -> Result<&mut Self, HarnessError> {
        for (field, value) in spec_fields(spec) {
            self.set(field, value)?;
        }
        Ok(self)
    }

    /// Request a preview. Returns whether the command reported it valid.
    pub fn preview(&mut self) -> Result<bool, HarnessError> {
        let response = self.send_ok(HostEvent::Preview)?;
        Ok(response.valid == Some(true))
    }

    pub fn execute(&mut self) -> Result<bool, HarnessError> {
        let response = self.send_ok(HostEvent::Execute)?;
        Ok(response.valid == Some(true))
    }

    pub fn destroy(&mut self, reason: TerminationReason) -> Result<(), HarnessError> {
        self.send_ok(HostEvent::Destroy { reason })?;
        Ok(())
    }

    // ── Inspection ──────────────────────────────────────────────────────

    pub fn state(&self) -> LifecycleState {
        self.command.state()
    }

    pub fn last_report(&self) -> Option<&VentReport> {
        self.command.session.last_report.as_ref()
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot::capture(&self.kernel, self.target.map(|t| t.body))
    }

    /// Text of the read-only flow area field.
    pub fn flow_area_text(&self) -> Option<&str> {
        match self.dialog.get(FieldId::FlowArea) {
            Some(FieldValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn history(&self) -> &[(HostEvent, EventResponse)] {
        &self.history
    }

    /// One line per event sent so far.
    pub fn history_text(&self) -> String {
        self.history
            .iter()
            .map(|(event, response)| {
                format!(
                    "{:?} -> valid={:?} error={}",
                    event,
                    response.valid,
                    response.error.as_deref().unwrap_or("-")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
