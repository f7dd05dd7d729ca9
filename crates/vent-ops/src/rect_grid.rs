use tracing::{info, instrument};
use vent_kernel::{CombineOp, Extent, ExtrudeInput, KernelError};
use vent_types::{SeedPoint, VentKind};

use crate::combine;
use crate::kernel_ext::KernelBundle;
use crate::next_surface::resolve_next_face;
use crate::pattern::{replicate, GridPattern};
use crate::sketch::create_vent_sketch;
use crate::types::{Diagnostics, GridLayout, VentError, VentReport};

/// Cut a grid of rounded rectangles (or slots) around the seed point.
///
/// One cell is drawn at grid position (0, 0), extruded to the next face as a
/// standalone body, replicated across the grid and cut from the host solid
/// in a single combine.
#[instrument(skip(kb, layout), fields(cols = layout.cols, rows = layout.rows))]
pub fn rectangular_grid_vent(
    kb: &mut dyn KernelBundle,
    kind: VentKind,
    layout: &GridLayout,
    seed: &SeedPoint,
) -> Result<VentReport, VentError> {
    let mut diag = Diagnostics::default();

    let session = diag.timed("sketch", || create_vent_sketch(kb, seed))?;
    let sketch = session.sketch;
    let offset = layout.first_cell_offset();
    let center = [
        session.center.local[0] + offset[0],
        session.center.local[1] + offset[1],
    ];
    let corner = [
        center[0] + layout.cell_width / 2.0,
        center[1] + layout.cell_height / 2.0,
    ];

    let profile = diag.timed("profile", || -> Result<_, VentError> {
        let lines = kb.add_center_rectangle(sketch, center, corner)?;
        if layout.fillet_radius > 0.0 {
            for i in 0..lines.len() {
                kb.add_fillet(sketch, lines[i], lines[(i + 1) % 4], layout.fillet_radius)?;
            }
        }
        kb.sketch_profiles(sketch)?
            .first()
            .copied()
            .ok_or_else(|| {
                VentError::Unexpected(KernelError::Other {
                    message: "cell sketch has no closed profile".to_string(),
                })
            })
    })?;

    let cell_area = kb.profile_area(profile)?;
    let flow_area = cell_area * layout.cell_count() as f64;
    if (cell_area - layout.cell_area()).abs() > 1e-6 * layout.cell_area().max(1.0) {
        diag.warn(format!(
            "kernel cell area {cell_area:.6} differs from nominal {:.6}",
            layout.cell_area()
        ));
    }
    if kind == VentKind::Slot && (layout.cell_width - layout.cell_height).abs() < 1e-9 {
        diag.warn("square cells turn every slot into a circle");
    }

    let next = resolve_next_face(
        kb.as_introspect(),
        session.component,
        session.center.world,
        session.host_face,
    )?;
    let cell = diag.timed("extrude", || {
        kb.extrude(&ExtrudeInput::new_body(
            vec![profile],
            Extent::ToFace(next.face),
        ))
    })?;

    let axes = kb.sketch_axes(sketch)?;
    let pattern = GridPattern {
        x_axis: axes.x_direction,
        y_axis: axes.y_direction,
        cols: layout.cols,
        x_pitch: layout.x_pitch,
        rows: layout.rows,
        y_pitch: layout.y_pitch,
    };
    let replicated = diag.timed("pattern", || {
        replicate(kb, session.component, &cell.bodies, &pattern)
    })?;

    let bodies_cut = diag.timed("combine", || {
        combine::combine(kb, session.target_body, &replicated.bodies, CombineOp::Cut)
    })?;

    info!(
        bodies_cut,
        copies = replicated.copy_operations,
        flow_area,
        "grid vent built"
    );

    Ok(VentReport {
        kind,
        target: session.target_body,
        host_face: session.host_face,
        terminating_face: next.face,
        sketches: vec![sketch],
        bodies_cut,
        bodies_joined: 0,
        flow_area: Some(flow_area),
        grid: Some(*layout),
        diagnostics: diag,
    })
}
