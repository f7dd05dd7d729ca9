//! End-to-end dialog sessions against MockKernel documents.

use approx::assert_relative_eq;
use test_harness::assertions::*;
use test_harness::helpers::*;
use test_harness::{BuildReport, HarnessError, VentWorkflow};
use vent_command::{CommandConfig, LifecycleState, TerminationReason};
use vent_kernel::{CombineOp, KernelCall};
use vent_types::{FieldId, FieldValue, SeedPoint, VentKind};

// ── Grid vents ──────────────────────────────────────────────────────────────

#[test]
fn reference_rectangular_vent_cuts_eighteen_cells() -> Result<(), HarnessError> {
    init_tracing();
    let mut wf = VentWorkflow::on_slab();
    wf.create()?.enter(&reference_rectangular())?.pick_top_center()?;

    assert!(wf.preview()?, "{}", BuildReport::from_workflow(&wf));
    assert_state(&wf, LifecycleState::Valid, "after preview")?;
    assert_cut_count(&wf, 18, "after preview")?;
    assert_build_oracles(&wf, "after preview")?;

    let grid = wf.last_report().and_then(|r| r.grid).expect("grid layout");
    assert_relative_eq!(grid.cell_width, 3.2, epsilon = 1e-12);
    assert_relative_eq!(grid.cell_height, 0.55, epsilon = 1e-12);
    assert_eq!(wf.kernel.stats().copy_calls, 7);
    assert_eq!(wf.kernel.combine_log().len(), 1);

    let area = wf.last_report().and_then(|r| r.flow_area).expect("flow area");
    assert_flow_area_text(&wf, area, "after preview")?;
    Ok(())
}

#[test]
fn slot_vent_uses_half_the_short_side_as_radius() -> Result<(), HarnessError> {
    let mut wf = VentWorkflow::on_slab();
    wf.create()?.enter(&reference_slot())?.pick_top_center()?;

    assert!(wf.preview()?);
    let grid = wf.last_report().and_then(|r| r.grid).expect("grid layout");
    assert_relative_eq!(grid.fillet_radius, 0.275, epsilon = 1e-12);
    assert_build_oracles(&wf, "slot")?;
    Ok(())
}

#[test]
fn square_corners_with_zero_radius() -> Result<(), HarnessError> {
    let mut wf = VentWorkflow::on_slab();
    wf.create()?
        .enter(&reference_rectangular())?
        .set(FieldId::Radius, FieldValue::Length(0.0))?
        .pick_top_center()?;

    assert!(wf.preview()?);
    let area = wf.last_report().and_then(|r| r.flow_area).expect("flow area");
    assert_relative_eq!(area, 18.0 * 3.2 * 0.55, epsilon = 1e-9);
    Ok(())
}

#[test]
fn editing_counts_between_previews_rebuilds_from_scratch() -> Result<(), HarnessError> {
    let mut wf = VentWorkflow::on_slab();
    wf.create()?.enter(&reference_rectangular())?.pick_top_center()?;
    assert!(wf.preview()?);

    wf.set(FieldId::NumberWidth, FieldValue::Integer(2))?
        .set(FieldId::NumberHeight, FieldValue::Integer(4))?;
    assert_state(&wf, LifecycleState::Created, "after edits")?;
    assert!(wf.preview()?);

    // The first preview's 18 cells are gone; only the new 8 are cut.
    assert_cut_count(&wf, 8, "second preview")?;
    assert_eq!(wf.kernel.sketch_count(), 1);
    assert_eq!(wf.kernel.groups().len(), 1);
    Ok(())
}

// ── Hub and spoke ───────────────────────────────────────────────────────────

#[test]
fn default_dialog_builds_hub_and_spoke() -> Result<(), HarnessError> {
    let mut wf = VentWorkflow::on_slab();
    wf.create()?.pick_top_center()?;

    assert!(wf.preview()?, "{}", BuildReport::from_workflow(&wf));
    let report = wf.last_report().expect("report");
    assert_eq!(report.kind, VentKind::Circular);
    assert_eq!(report.bodies_cut, 1);
    assert_eq!(report.bodies_joined, 7);
    assert!(report.flow_area.is_none());
    assert_eq!(wf.flow_area_text(), Some("0.0"));

    let ops: Vec<CombineOp> = wf.kernel.combine_log().iter().map(|c| c.op).collect();
    assert_eq!(ops, vec![CombineOp::Cut, CombineOp::Join]);
    assert_build_oracles(&wf, "hub and spoke")?;
    Ok(())
}

#[test]
fn failure_after_boundary_cut_leaves_no_trace() -> Result<(), HarnessError> {
    let mut wf = VentWorkflow::on_slab();
    wf.create()?.pick_top_center()?;
    let before = wf.snapshot();

    wf.kernel.fail_on(KernelCall::Combine, 2);
    assert!(!wf.preview()?);
    assert_state(&wf, LifecycleState::Invalid, "after injected failure")?;
    assert_restored(&wf, &before, "after injected failure")?;
    assert_eq!(wf.host.messages.len(), 1);

    // Same inputs again: identical to a first-time success.
    assert!(wf.preview()?);
    let mut fresh = VentWorkflow::on_slab();
    fresh.create()?.pick_top_center()?;
    assert!(fresh.preview()?);
    assert_eq!(wf.kernel.body_count(), fresh.kernel.body_count());
    assert_eq!(wf.kernel.sketch_count(), fresh.kernel.sketch_count());
    assert_eq!(wf.snapshot().target, fresh.snapshot().target);
    Ok(())
}

// ── Failures ────────────────────────────────────────────────────────────────

#[test]
fn sheet_without_opposing_face_is_reported() -> Result<(), HarnessError> {
    let mut wf = VentWorkflow::on_sheet();
    wf.create()?.enter(&reference_rectangular())?.pick_top_center()?;
    let before = wf.snapshot();

    assert!(!wf.preview()?);
    assert_restored(&wf, &before, "unterminated")?;
    let message = wf.host.last_message().unwrap_or_default();
    assert!(
        message.contains("not completely terminated"),
        "unexpected message: {}",
        message
    );
    Ok(())
}

#[test]
fn point_off_the_model_is_reported() -> Result<(), HarnessError> {
    let mut wf = VentWorkflow::on_slab();
    let above = SeedPoint::new([0.0, 0.0, 5.0], wf.kernel.root_component());
    wf.create()?.enter(&reference_rectangular())?.pick(above)?;

    assert!(!wf.preview()?);
    assert_state(&wf, LifecycleState::Invalid, "no host face")?;
    assert_eq!(wf.kernel.sketch_count(), 0);
    assert_eq!(wf.host.messages.len(), 1);
    Ok(())
}

#[test]
fn oversized_corner_radius_never_reaches_the_kernel() -> Result<(), HarnessError> {
    let mut wf = VentWorkflow::on_slab();
    wf.create()?
        .enter(&reference_rectangular())?
        .set(FieldId::Radius, FieldValue::Length(0.5))?
        .pick_top_center()?;
    let timeline = wf.kernel.timeline_len();

    assert!(!wf.preview()?);
    assert_eq!(wf.kernel.timeline_len(), timeline);
    assert!(wf.host.last_message().is_some());
    Ok(())
}

#[test]
fn custom_failure_text_is_used() -> Result<(), HarnessError> {
    let config = CommandConfig {
        failure_prefix: "Vent failed.".into(),
        failure_suffix: "Adjust and retry.".into(),
        ..CommandConfig::default()
    };
    let mut wf = VentWorkflow::on_sheet().with_config(config);
    wf.create()?.pick_top_center()?;

    assert!(!wf.preview()?);
    let message = wf.host.last_message().unwrap_or_default();
    assert!(message.starts_with("Vent failed.\n\n"));
    assert!(message.ends_with("\n\nAdjust and retry."));
    Ok(())
}

// ── Lifecycle ───────────────────────────────────────────────────────────────

#[test]
fn commit_then_complete() -> Result<(), HarnessError> {
    let mut wf = VentWorkflow::on_slab();
    wf.create()?.enter(&reference_slot())?.pick_top_center()?;
    assert!(wf.preview()?);
    assert!(wf.execute()?);
    assert_state(&wf, LifecycleState::Committed, "after execute")?;

    wf.destroy(TerminationReason::Completed)?;
    assert_state(&wf, LifecycleState::Destroyed, "after destroy")?;
    assert_cut_count(&wf, 18, "committed vent survives")?;
    assert_eq!(wf.host.live_subscriptions(), 0);
    assert_eq!(wf.host.unsubscribed.len(), wf.host.subscribed.len());
    Ok(())
}

#[test]
fn cancel_restores_the_pre_command_document() -> Result<(), HarnessError> {
    let mut wf = VentWorkflow::on_slab();
    let before = wf.snapshot();
    wf.create()?.enter(&reference_rectangular())?.pick_top_center()?;
    assert!(wf.preview()?);

    wf.destroy(TerminationReason::Cancelled)?;
    assert_restored(&wf, &before, "after cancel")?;
    assert_eq!(wf.host.live_subscriptions(), 0);
    Ok(())
}

#[test]
fn document_closed_mid_session_releases_everything() -> Result<(), HarnessError> {
    let mut wf = VentWorkflow::on_slab();
    wf.create()?;
    assert_eq!(wf.host.live_subscriptions(), 5);
    wf.destroy(TerminationReason::DocumentClosed)?;
    assert_eq!(wf.host.live_subscriptions(), 0);
    assert!(wf.preview().is_err());
    Ok(())
}
