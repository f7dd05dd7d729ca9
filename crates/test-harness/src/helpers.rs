//! Helper functions: error type, document fixtures, dialog builders, the
//! recording host.

use vent_command::{
    apply_visibility, initial_dialog, CommandConfig, CommandHost, EventKind, SubscriptionId,
};
use vent_kernel::{BodySummary, FaceId, MockBox, MockKernel, SurfaceKind};
use vent_types::{
    BodyId, CircularVent, DialogState, FieldId, FieldValue, RectangularVent, SeedPoint, SlotVent,
    VentSpec,
};

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("dispatch error ({event}): {message}")]
    DispatchError { event: String, message: String },

    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("oracle failure ({oracle}): {detail}")]
    OracleFailure { oracle: String, detail: String },

    #[error("fixture error: {reason}")]
    Fixture { reason: String },
}

// ── Tracing ─────────────────────────────────────────────────────────────────

/// Route `tracing` output to the test writer. `RUST_LOG` overrides the
/// default filter. Safe to call from every test.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vent_ops=debug,vent_command=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

// ── Document Fixtures ───────────────────────────────────────────────────────

/// A 20 x 20 slab, 1 unit thick, top face at z = 1. The top and bottom faces
/// are the parallel pair every grid test cuts through.
pub fn slab_document() -> (MockKernel, MockBox) {
    slab_of(20.0, 20.0, 1.0)
}

/// A centred slab of the given size with its bottom face at z = 0.
pub fn slab_of(width: f64, depth: f64, thickness: f64) -> (MockKernel, MockBox) {
    let mut kernel = MockKernel::new();
    let root = kernel.root_component();
    let slab = kernel.add_box(
        root,
        [-width / 2.0, -depth / 2.0, 0.0],
        [width / 2.0, depth / 2.0, thickness],
    );
    (kernel, slab)
}

/// A single 20 x 20 planar sheet at z = 1 with nothing behind it.
pub fn sheet_document() -> (MockKernel, FaceId) {
    let mut kernel = MockKernel::new();
    let root = kernel.root_component();
    let (_, face) = kernel.add_sheet(
        root,
        [0.0, 0.0, 1.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 0.0],
        [10.0, 10.0],
        SurfaceKind::Planar,
    );
    (kernel, face)
}

/// A 20 x 20 cylindrical patch at z = 1; nothing can be sketched on it.
pub fn curved_document() -> (MockKernel, FaceId) {
    let mut kernel = MockKernel::new();
    let root = kernel.root_component();
    let (_, face) = kernel.add_sheet(
        root,
        [0.0, 0.0, 1.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 0.0],
        [10.0, 10.0],
        SurfaceKind::Cylindrical,
    );
    (kernel, face)
}

/// The seed point at the centre of the fixtures' top face.
pub fn top_center_seed(kernel: &MockKernel) -> SeedPoint {
    SeedPoint::new([0.0, 0.0, 1.0], kernel.root_component())
}

// ── Reference Vents ─────────────────────────────────────────────────────────

/// 10 x 4 grid of 3 x 6 rounded rectangles, 0.1 border and corner radius.
pub fn reference_rectangular() -> VentSpec {
    VentSpec::Rectangular(RectangularVent {
        width: 10.0,
        height: 4.0,
        border: 0.1,
        cols: 3,
        rows: 6,
        corner_radius: 0.1,
    })
}

pub fn reference_slot() -> VentSpec {
    VentSpec::Slot(SlotVent {
        width: 10.0,
        height: 4.0,
        border: 0.1,
        cols: 3,
        rows: 6,
    })
}

/// The dialog defaults: radius 5, 5 spokes, 3 rings.
pub fn reference_circular() -> VentSpec {
    VentSpec::Circular(CircularVent {
        radius: 5.0,
        border: 0.1,
        axial_count: 5,
        radial_count: 3,
    })
}

// ── Dialog Builders ─────────────────────────────────────────────────────────

/// The dialog as `on_create` leaves it with the default config.
pub fn default_dialog() -> DialogState {
    initial_dialog(&CommandConfig::default())
}

/// Field values describing `spec`, in the order a user would type them.
pub fn spec_fields(spec: &VentSpec) -> Vec<(FieldId, FieldValue)> {
    let mut fields = vec![
        (FieldId::VentType, FieldValue::Choice(spec.kind())),
        (FieldId::VentBorder, FieldValue::Length(spec.border())),
    ];
    match spec {
        VentSpec::Circular(c) => {
            fields.push((FieldId::VentRadius, FieldValue::Length(c.radius)));
            fields.push((FieldId::NumberAxial, count(c.axial_count)));
            fields.push((FieldId::NumberRadial, count(c.radial_count)));
        }
        VentSpec::Slot(s) => {
            fields.push((FieldId::VentWidth, FieldValue::Length(s.width)));
            fields.push((FieldId::VentHeight, FieldValue::Length(s.height)));
            fields.push((FieldId::NumberWidth, count(s.cols)));
            fields.push((FieldId::NumberHeight, count(s.rows)));
        }
        VentSpec::Rectangular(r) => {
            fields.push((FieldId::VentWidth, FieldValue::Length(r.width)));
            fields.push((FieldId::VentHeight, FieldValue::Length(r.height)));
            fields.push((FieldId::NumberWidth, count(r.cols)));
            fields.push((FieldId::NumberHeight, count(r.rows)));
            fields.push((FieldId::Radius, FieldValue::Length(r.corner_radius)));
        }
    }
    fields
}

fn count(n: u32) -> FieldValue {
    FieldValue::Integer(i64::from(n))
}

/// A default dialog filled in for `spec` with `seed` selected.
pub fn dialog_for(spec: &VentSpec, seed: SeedPoint) -> DialogState {
    let mut dialog = default_dialog();
    for (id, value) in spec_fields(spec) {
        dialog.set(id, value);
    }
    dialog.select_point(seed);
    apply_visibility(&mut dialog, spec.kind());
    dialog
}

pub fn rectangular_dialog(seed: SeedPoint) -> DialogState {
    dialog_for(&reference_rectangular(), seed)
}

// ── Recording Host ──────────────────────────────────────────────────────────

/// A `CommandHost` that records every call.
#[derive(Debug, Default)]
pub struct RecordingHost {
    next_id: u64,
    pub subscribed: Vec<(EventKind, SubscriptionId)>,
    pub unsubscribed: Vec<SubscriptionId>,
    pub messages: Vec<String>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscriptions handed out and not yet returned.
    pub fn live_subscriptions(&self) -> usize {
        self.subscribed
            .iter()
            .filter(|(_, id)| !self.unsubscribed.contains(id))
            .count()
    }

    pub fn last_message(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }
}

impl CommandHost for RecordingHost {
    fn subscribe(&mut self, kind: EventKind) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscribed.push((kind, id));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.unsubscribed.push(id);
    }

    fn show_message(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

// ── Document Snapshots ──────────────────────────────────────────────────────

/// What a test compares to decide whether two documents are the same.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    pub bodies: Vec<BodyId>,
    pub sketches: usize,
    pub timeline: usize,
    pub groups: usize,
    pub target: Option<BodySummary>,
}

impl DocumentSnapshot {
    pub fn capture(kernel: &MockKernel, target: Option<BodyId>) -> Self {
        Self {
            bodies: kernel.bodies(),
            sketches: kernel.sketch_count(),
            timeline: kernel.timeline_len(),
            groups: kernel.groups().len(),
            target: target.and_then(|b| kernel.body_summary(b)),
        }
    }
}
