use std::f64::consts::PI;

use approx::assert_relative_eq;
use vent_kernel::{
    CombineOp, Kernel, KernelCall, KernelError, KernelIntrospect, MockBox, MockKernel,
    SurfaceKind,
};
use vent_ops::{build_vent, replicate, resolve_next_face, GridPattern, VentError};
use vent_types::{CircularVent, RectangularVent, SeedPoint, SlotVent, VentSpec};

/// Helper: 20 x 20 slab, 1 thick, top face at z = 1.
fn slab(kernel: &mut MockKernel) -> MockBox {
    let root = kernel.root_component();
    kernel.add_box(root, [-10.0, -10.0, 0.0], [10.0, 10.0, 1.0])
}

fn seed(kernel: &MockKernel) -> SeedPoint {
    SeedPoint::new([0.0, 0.0, 1.0], kernel.root_component())
}

fn rectangular(corner_radius: f64) -> VentSpec {
    VentSpec::Rectangular(RectangularVent {
        width: 10.0,
        height: 4.0,
        border: 0.1,
        cols: 3,
        rows: 6,
        corner_radius,
    })
}

fn circular() -> VentSpec {
    VentSpec::Circular(CircularVent {
        radius: 5.0,
        border: 0.1,
        axial_count: 5,
        radial_count: 3,
    })
}

// ── Next-surface resolution ────────────────────────────────────────────────

#[test]
fn parallel_faces_resolve_to_the_opposite_face() {
    let mut kernel = MockKernel::new();
    let root = kernel.root_component();
    let a = kernel.add_sheet(
        root,
        [0.0, 0.0, 3.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 0.0],
        [4.0, 4.0],
        SurfaceKind::Planar,
    );
    let b = kernel.add_sheet(
        root,
        [0.0, 0.0, 0.0],
        [0.0, 0.0, -1.0],
        [1.0, 0.0, 0.0],
        [4.0, 4.0],
        SurfaceKind::Planar,
    );

    let next = resolve_next_face(&kernel, root, [1.0, 1.0, 3.0], a.1).unwrap();
    assert_eq!(next.face, b.1, "Seeded on A, must terminate on B");
    assert_ne!(next.face, a.1, "Must never return the source face");
}

#[test]
fn slab_top_never_returns_itself() {
    let mut kernel = MockKernel::new();
    let s = slab(&mut kernel);
    let root = kernel.root_component();
    for x in [-9.0, -3.5, 0.0, 4.2, 9.9] {
        let next = resolve_next_face(&kernel, root, [x, 1.0, 1.0], s.top).unwrap();
        assert_eq!(next.face, s.bottom);
    }
}

#[test]
fn single_sheet_is_unterminated() {
    let mut kernel = MockKernel::new();
    let root = kernel.root_component();
    let (_, face) = kernel.add_sheet(
        root,
        [0.0, 0.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 0.0],
        [4.0, 4.0],
        SurfaceKind::Planar,
    );
    let err = resolve_next_face(&kernel, root, [0.0, 0.0, 0.0], face).unwrap_err();
    assert!(
        matches!(err, VentError::Unterminated { .. }),
        "Expected Unterminated, got {:?}",
        err
    );
}

// ── Pattern replication ────────────────────────────────────────────────────

#[test]
fn replicator_uses_two_linear_passes() {
    let mut kernel = MockKernel::new();
    let root = kernel.root_component();
    let cell = kernel.add_box(root, [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
    let pattern = GridPattern {
        x_axis: [1.0, 0.0, 0.0],
        y_axis: [0.0, 1.0, 0.0],
        cols: 4,
        x_pitch: 1.5,
        rows: 3,
        y_pitch: 2.0,
    };

    let out = replicate(&mut kernel, root, &[cell.body], &pattern).unwrap();

    assert_eq!(out.bodies.len(), 12, "cols * rows bodies");
    assert_eq!(out.copy_operations, 3 + 2, "(cols - 1) + (rows - 1) copies");
    assert_eq!(kernel.stats().copy_calls, 5);
    assert_eq!(kernel.stats().translate_calls, 5);
    assert_eq!(kernel.body_count(), 12);
}

#[test]
fn replicated_cells_sit_on_the_grid() {
    let mut kernel = MockKernel::new();
    let root = kernel.root_component();
    let cell = kernel.add_box(root, [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
    let pattern = GridPattern {
        x_axis: [1.0, 0.0, 0.0],
        y_axis: [0.0, 1.0, 0.0],
        cols: 2,
        x_pitch: 3.0,
        rows: 2,
        y_pitch: 5.0,
    };
    replicate(&mut kernel, root, &[cell.body], &pattern).unwrap();

    // The far corner cell's top face is hit by a ray dropped at its center.
    let hits = kernel.ray_hits(root, [3.5, 5.5, 10.0], [0.0, 0.0, -1.0]);
    assert_eq!(hits.len(), 2, "top and bottom of the translated copy");
}

// ── Rectangular and slot grids ─────────────────────────────────────────────

#[test]
fn reference_rectangular_vent_cuts_eighteen_bodies() {
    let mut kernel = MockKernel::new();
    let s = slab(&mut kernel);
    let seed = seed(&kernel);

    let report = build_vent(&mut kernel, &rectangular(0.1), &seed).unwrap();

    assert_eq!(report.bodies_cut, 18);
    assert_eq!(report.bodies_joined, 0);
    assert_eq!(report.target, s.body);
    assert_eq!(report.host_face, s.top);
    assert_eq!(report.terminating_face, s.bottom);

    let grid = report.grid.unwrap();
    assert_relative_eq!(grid.cell_width, 3.2, epsilon = 1e-9);
    assert_relative_eq!(grid.cell_height, 0.55, epsilon = 1e-9);

    let stats = kernel.stats();
    assert_eq!(stats.copy_calls, 2 + 5);
    assert_eq!(stats.combine_calls, 1, "one combine for the whole grid");
    assert_eq!(kernel.combine_log()[0].op, CombineOp::Cut);
    assert_eq!(kernel.combine_log()[0].tools.len(), 18);

    // Every tool body was consumed by the cut.
    assert_eq!(kernel.body_count(), 1);
    assert_eq!(kernel.body_summary(s.body).unwrap().cut_tools, 18);
}

#[test]
fn rectangular_flow_area_follows_cell_area() {
    let mut kernel = MockKernel::new();
    slab(&mut kernel);
    let seed = seed(&kernel);

    let report = build_vent(&mut kernel, &rectangular(0.1), &seed).unwrap();
    let expected = 18.0 * (3.2 * 0.55 - (4.0 - PI) * 0.1 * 0.1);
    assert_relative_eq!(report.flow_area.unwrap(), expected, epsilon = 1e-9);
}

#[test]
fn zero_corner_radius_skips_fillets() {
    let mut kernel = MockKernel::new();
    slab(&mut kernel);
    let seed = seed(&kernel);

    let report = build_vent(&mut kernel, &rectangular(0.0), &seed).unwrap();
    assert_relative_eq!(report.flow_area.unwrap(), 18.0 * 3.2 * 0.55, epsilon = 1e-9);

    let summary = kernel.sketch_summary(report.sketches[0]).unwrap();
    assert_eq!(summary.arcs, 0);
}

#[test]
fn slot_radius_is_derived_from_the_cell() {
    let mut kernel = MockKernel::new();
    slab(&mut kernel);
    let seed = seed(&kernel);
    let spec = VentSpec::Slot(SlotVent {
        width: 10.0,
        height: 4.0,
        border: 0.1,
        cols: 3,
        rows: 6,
    });

    let report = build_vent(&mut kernel, &spec, &seed).unwrap();
    let r = 0.55 / 2.0;
    assert_relative_eq!(report.grid.unwrap().fillet_radius, r, epsilon = 1e-9);
    assert_relative_eq!(
        report.flow_area.unwrap(),
        18.0 * (3.2 * 0.55 - (4.0 - PI) * r * r),
        epsilon = 1e-9
    );
    assert_eq!(kernel.sketch_summary(report.sketches[0]).unwrap().arcs, 4);
}

#[test]
fn oversized_corner_radius_is_rejected_before_sketching() {
    let mut kernel = MockKernel::new();
    slab(&mut kernel);
    let seed = seed(&kernel);

    let err = build_vent(&mut kernel, &rectangular(0.5), &seed).unwrap_err();
    assert!(matches!(err, VentError::DegenerateParameters { .. }));
    assert_eq!(kernel.sketch_count(), 0, "nothing reached the kernel");
}

#[test]
fn vent_wider_than_the_face_is_unterminated() {
    let mut kernel = MockKernel::new();
    let root = kernel.root_component();
    kernel.add_box(root, [-2.5, -2.5, 0.0], [2.5, 2.5, 1.0]);
    let seed = SeedPoint::new([0.0, 0.0, 1.0], root);

    let err = build_vent(&mut kernel, &rectangular(0.1), &seed).unwrap_err();
    assert!(
        matches!(err, VentError::Unterminated { .. }),
        "Expected Unterminated, got {:?}",
        err
    );
}

#[test]
fn seed_off_the_model_has_no_host_face() {
    let mut kernel = MockKernel::new();
    slab(&mut kernel);
    let seed = SeedPoint::new([0.0, 0.0, 7.0], kernel.root_component());

    let err = build_vent(&mut kernel, &rectangular(0.1), &seed).unwrap_err();
    assert!(matches!(err, VentError::NoHostFace { .. }));
}

#[test]
fn grid_build_reports_its_steps() {
    let mut kernel = MockKernel::new();
    slab(&mut kernel);
    let seed = seed(&kernel);

    let report = build_vent(&mut kernel, &rectangular(0.1), &seed).unwrap();
    assert_eq!(
        report.diagnostics.step_names(),
        vec!["sketch", "profile", "extrude", "pattern", "combine"]
    );
    assert!(report.diagnostics.warnings.is_empty());
}

// ── Hub and spoke ──────────────────────────────────────────────────────────

#[test]
fn hub_spoke_draws_spokes_and_rings() {
    let mut kernel = MockKernel::new();
    slab(&mut kernel);
    let seed = seed(&kernel);

    let report = build_vent(&mut kernel, &circular(), &seed).unwrap();
    assert_eq!(report.sketches.len(), 2);
    assert!(report.flow_area.is_none());

    let hub = kernel.sketch_summary(report.sketches[1]).unwrap();
    assert_eq!(hub.lines, 5, "one line per spoke");
    assert_eq!(hub.circles, 2, "radial_count - 1 rings");
    // 4 projected face edges + the projected boundary circle
    assert_eq!(hub.construction, 5);
    // 5 coincident + 1 vertical
    assert_eq!(hub.constraints, 6);
    // 4 angular + 2 radial
    assert_eq!(hub.dimensions, 6);
}

#[test]
fn hub_spoke_cuts_before_it_joins() {
    let mut kernel = MockKernel::new();
    let s = slab(&mut kernel);
    let seed = seed(&kernel);

    let report = build_vent(&mut kernel, &circular(), &seed).unwrap();

    let ops: Vec<CombineOp> = kernel.combine_log().iter().map(|c| c.op).collect();
    assert_eq!(ops, vec![CombineOp::Cut, CombineOp::Join]);
    assert_eq!(report.bodies_cut, 1, "the boundary body");
    assert_eq!(report.bodies_joined, 7, "5 spokes + 2 rings");
    assert_eq!(kernel.stats().thicken_calls, 7, "one thicken per face");

    let target = kernel.body_summary(s.body).unwrap();
    assert_eq!(target.cut_tools, 1);
    assert_eq!(target.joined_tools, 7);
}

#[test]
fn hub_spoke_on_a_sheet_is_unterminated() {
    let mut kernel = MockKernel::new();
    let root = kernel.root_component();
    kernel.add_sheet(
        root,
        [0.0, 0.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 0.0],
        [10.0, 10.0],
        SurfaceKind::Planar,
    );
    let seed = SeedPoint::new([0.0, 0.0, 0.0], root);

    let err = build_vent(&mut kernel, &circular(), &seed).unwrap_err();
    assert!(matches!(err, VentError::Unterminated { .. }));
}

#[test]
fn failed_join_leaves_partial_geometry_until_undone() {
    let mut kernel = MockKernel::new();
    let s = slab(&mut kernel);
    let seed = seed(&kernel);
    let marker = kernel.timeline_marker();

    // Second combine is the join that follows the boundary cut.
    kernel.fail_on(KernelCall::Combine, 2);
    let err = build_vent(&mut kernel, &circular(), &seed).unwrap_err();
    assert_eq!(
        err,
        VentError::Unexpected(KernelError::Injected {
            call: "combine".to_string()
        })
    );
    assert!(kernel.sketch_count() > 0, "engine does not roll back by itself");

    kernel.undo_to(marker).unwrap();
    assert_eq!(kernel.body_count(), 1);
    assert_eq!(kernel.sketch_count(), 0);
    assert_eq!(kernel.body_summary(s.body).unwrap().cut_tools, 0);

    // A clean rerun produces the same document as a first-time build.
    build_vent(&mut kernel, &circular(), &seed).unwrap();
    let mut fresh = MockKernel::new();
    slab(&mut fresh);
    build_vent(&mut fresh, &circular(), &seed).unwrap();
    assert_eq!(kernel.body_count(), fresh.body_count());
    assert_eq!(kernel.sketch_count(), fresh.sketch_count());
}

#[test]
fn too_thick_border_is_degenerate() {
    let mut kernel = MockKernel::new();
    slab(&mut kernel);
    let seed = seed(&kernel);
    let spec = VentSpec::Circular(CircularVent {
        radius: 3.0,
        border: 1.5,
        axial_count: 4,
        radial_count: 2,
    });
    let err = build_vent(&mut kernel, &spec, &seed).unwrap_err();
    assert!(matches!(err, VentError::DegenerateParameters { .. }));
    assert_eq!(kernel.sketch_count(), 0);
}
