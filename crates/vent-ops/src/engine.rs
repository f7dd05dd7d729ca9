use tracing::{info, instrument, warn};
use vent_types::{SeedPoint, VentSpec};

use crate::hub_spoke::hub_spoke_vent;
use crate::kernel_ext::KernelBundle;
use crate::rect_grid::rectangular_grid_vent;
use crate::types::{VentError, VentReport};
use crate::validate;

/// Build the vent described by `spec` at `seed`.
///
/// Parameters are validated before the kernel is touched. Kernel failures are
/// translated into [`VentError`] and returned as-is; the build is never
/// retried and nothing is rolled back here. Callers that need the document
/// restored bracket the call with a timeline marker.
#[instrument(skip(kb, spec, seed), fields(kind = %spec.kind()))]
pub fn build_vent(
    kb: &mut dyn KernelBundle,
    spec: &VentSpec,
    seed: &SeedPoint,
) -> Result<VentReport, VentError> {
    let result = match spec {
        VentSpec::Circular(circular) => {
            validate::validate_circular(circular)?;
            hub_spoke_vent(kb, circular, seed)
        }
        VentSpec::Slot(slot) => {
            let layout = validate::slot_layout(slot)?;
            rectangular_grid_vent(kb, spec.kind(), &layout, seed)
        }
        VentSpec::Rectangular(rect) => {
            let layout = validate::rectangular_layout(rect)?;
            rectangular_grid_vent(kb, spec.kind(), &layout, seed)
        }
    };

    match &result {
        Ok(report) => info!(
            cut = report.bodies_cut,
            joined = report.bodies_joined,
            kernel_ms = report.diagnostics.kernel_time_ms,
            "vent build succeeded"
        ),
        Err(err) => warn!(kind = err.kind(), %err, "vent build failed"),
    }
    result
}
