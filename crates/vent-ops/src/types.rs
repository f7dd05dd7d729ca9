use std::time::Instant;

use serde::Serialize;
use vent_kernel::{BodyId, FaceId, KernelError, SketchId};
use vent_types::VentKind;

/// Complete result of a vent build.
/// Contains everything the command layer needs to report back to the dialog.
#[derive(Debug, Clone, Serialize)]
pub struct VentReport {
    pub kind: VentKind,
    /// The solid the vent was cut into.
    pub target: BodyId,
    /// Face the seed point lies on; every sketch of the build sits on it.
    pub host_face: FaceId,
    /// Face the vent extrudes terminate on.
    pub terminating_face: FaceId,
    /// Sketches created by the build, in creation order.
    pub sketches: Vec<SketchId>,
    /// Tool bodies consumed by `Cut` combines.
    pub bodies_cut: usize,
    /// Tool bodies consumed by `Join` combines.
    pub bodies_joined: usize,
    /// Total open area of a grid vent. `None` for hub-and-spoke.
    pub flow_area: Option<f64>,
    /// Cell layout of a grid vent.
    pub grid: Option<GridLayout>,
    /// Non-fatal warnings and timing information.
    pub diagnostics: Diagnostics,
}

/// Derived geometry of a rectangular or slot grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridLayout {
    pub width: f64,
    pub height: f64,
    pub border: f64,
    pub cols: u32,
    pub rows: u32,
    /// Width of one cell.
    pub cell_width: f64,
    /// Height of one cell.
    pub cell_height: f64,
    /// Center-to-center spacing along the sketch x axis.
    pub x_pitch: f64,
    /// Center-to-center spacing along the sketch y axis.
    pub y_pitch: f64,
    /// Corner fillet radius. Zero disables filleting.
    pub fillet_radius: f64,
}

impl GridLayout {
    pub fn cell_count(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    /// Area of one cell as drawn: rectangle minus what four fillets remove.
    pub fn cell_area(&self) -> f64 {
        let r = self.fillet_radius;
        self.cell_width * self.cell_height - (4.0 - std::f64::consts::PI) * r * r
    }

    /// Center of cell (0, 0) relative to the seed point, in sketch space.
    pub fn first_cell_offset(&self) -> [f64; 2] {
        [
            -self.width / 2.0 + self.border + self.cell_width / 2.0,
            -self.height / 2.0 + self.border + self.cell_height / 2.0,
        ]
    }
}

/// One timed step of a build.
#[derive(Debug, Clone, Serialize)]
pub struct StepTiming {
    pub step: &'static str,
    pub elapsed_ms: f64,
}

/// Non-fatal diagnostics from a build.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    /// Kernel-facing steps in the order they ran.
    pub steps: Vec<StepTiming>,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Time spent in timed steps, in milliseconds.
    pub kernel_time_ms: f64,
}

impl Diagnostics {
    /// Run `f` and record how long it took under `step`.
    pub fn timed<T>(&mut self, step: &'static str, f: impl FnOnce() -> T) -> T {
        let started = Instant::now();
        let out = f();
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        self.steps.push(StepTiming { step, elapsed_ms });
        self.kernel_time_ms += elapsed_ms;
        out
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.step).collect()
    }
}

/// Errors from vent builds.
///
/// Every variant invalidates the current attempt only; none of them ends the
/// command session.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VentError {
    #[error("the selected point does not lie on a valid face: {reason}")]
    NoHostFace { reason: String },

    #[error("the vent is not completely terminated by the opposite face: {reason}")]
    Unterminated { reason: String },

    #[error("degenerate parameters: {reason}")]
    DegenerateParameters { reason: String },

    #[error("unexpected kernel failure: {0}")]
    Unexpected(KernelError),
}

impl VentError {
    pub fn degenerate(reason: impl Into<String>) -> Self {
        VentError::DegenerateParameters {
            reason: reason.into(),
        }
    }

    /// Short machine-readable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            VentError::NoHostFace { .. } => "no_host_face",
            VentError::Unterminated { .. } => "unterminated",
            VentError::DegenerateParameters { .. } => "degenerate_parameters",
            VentError::Unexpected(_) => "unexpected",
        }
    }
}

impl From<KernelError> for VentError {
    fn from(err: KernelError) -> Self {
        match err {
            KernelError::ExtentNotReached { reason } => VentError::Unterminated { reason },
            other => VentError::Unexpected(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_failure_maps_to_unterminated() {
        let err: VentError = KernelError::ExtentNotReached {
            reason: "open".into(),
        }
        .into();
        assert_eq!(err.kind(), "unterminated");

        let err: VentError = KernelError::FilletFailed {
            reason: "too big".into(),
        }
        .into();
        assert!(matches!(err, VentError::Unexpected(KernelError::FilletFailed { .. })));
    }

    #[test]
    fn cell_area_without_fillets() {
        let layout = GridLayout {
            width: 10.0,
            height: 4.0,
            border: 0.1,
            cols: 3,
            rows: 6,
            cell_width: 3.2,
            cell_height: 0.55,
            x_pitch: 3.3,
            y_pitch: 0.65,
            fillet_radius: 0.0,
        };
        assert!((layout.cell_area() - 3.2 * 0.55).abs() < 1e-12);
        assert_eq!(layout.cell_count(), 18);
    }

    #[test]
    fn timed_steps_are_recorded_in_order() {
        let mut diag = Diagnostics::default();
        let v = diag.timed("sketch", || 3);
        diag.timed("extrude", || ());
        assert_eq!(v, 3);
        assert_eq!(diag.step_names(), vec!["sketch", "extrude"]);
        assert!(diag.kernel_time_ms >= 0.0);
    }
}
