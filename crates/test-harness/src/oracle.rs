//! Verification oracles: pure functions returning pass/fail verdicts.
//!
//! Each oracle returns an `OracleVerdict` with diagnostic detail, not panics.
//! This lets a test collect all failures in one pass.

use std::collections::BTreeSet;

use vent_kernel::{CallStats, CombineOp, CombineRecord};
use vent_ops::{GridLayout, VentReport};
use vent_types::{variant_fields, visibility, FieldId, VentKind, COMMON_FIELDS};

use crate::helpers::DocumentSnapshot;

/// The result of a single oracle check.
#[derive(Debug, Clone)]
pub struct OracleVerdict {
    pub oracle_name: String,
    pub passed: bool,
    pub detail: String,
    pub value: Option<f64>,
}

impl OracleVerdict {
    fn pass(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: None,
        }
    }

    fn pass_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: Some(value),
        }
    }

    fn fail(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: None,
        }
    }

    fn fail_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: Some(value),
        }
    }
}

// ── Grid Oracles ────────────────────────────────────────────────────────────

/// A grid build asks for one copy and one translate per extra column and per
/// extra row, never one per cell.
pub fn check_replication_cost(stats: &CallStats, cols: u32, rows: u32) -> OracleVerdict {
    let expected = (cols as usize - 1) + (rows as usize - 1);
    let copies = stats.copy_calls;
    let translates = stats.translate_calls;
    if copies == expected && translates == expected {
        OracleVerdict::pass(
            "replication_cost",
            format!("{}x{} grid used {} copy operations", cols, rows, copies),
        )
    } else {
        OracleVerdict::fail(
            "replication_cost",
            format!(
                "{}x{} grid: expected {} copies and translates, got {} copies and {} translates",
                cols, rows, expected, copies, translates
            ),
        )
    }
}

/// Reported flow area equals `cols * rows * (cell_w * cell_h - (4 - pi) * r^2)`.
pub fn check_flow_area(report: &VentReport, tol: f64) -> OracleVerdict {
    let Some(layout) = report.grid else {
        return OracleVerdict::fail("flow_area", "report has no grid layout".into());
    };
    let Some(area) = report.flow_area else {
        return OracleVerdict::fail("flow_area", "report has no flow area".into());
    };
    let expected = expected_flow_area(&layout);
    let diff = (area - expected).abs();
    if diff <= tol * expected.abs().max(1.0) {
        OracleVerdict::pass_val(
            "flow_area",
            format!("flow area {:.6} matches {:.6}", area, expected),
            area,
        )
    } else {
        OracleVerdict::fail_val(
            "flow_area",
            format!("flow area {:.6}, expected {:.6} (diff {:.2e})", area, expected, diff),
            area,
        )
    }
}

/// Closed-form flow area of a grid layout.
pub fn expected_flow_area(layout: &GridLayout) -> f64 {
    let r = layout.fillet_radius;
    let cell = layout.cell_width * layout.cell_height - (4.0 - std::f64::consts::PI) * r * r;
    cell * layout.cell_count() as f64
}

// ── Combine Oracles ─────────────────────────────────────────────────────────

/// Every `Join` on a target comes after at least one `Cut` on that target.
pub fn check_cut_before_join(log: &[CombineRecord]) -> OracleVerdict {
    let mut cut_targets = BTreeSet::new();
    for (i, record) in log.iter().enumerate() {
        match record.op {
            CombineOp::Cut => {
                cut_targets.insert(record.target);
            }
            CombineOp::Join => {
                if !cut_targets.contains(&record.target) {
                    return OracleVerdict::fail(
                        "cut_before_join",
                        format!("combine #{} joins into {:?} before any cut", i, record.target),
                    );
                }
            }
        }
    }
    OracleVerdict::pass(
        "cut_before_join",
        format!("{} combine calls in valid order", log.len()),
    )
}

// ── Document Oracles ────────────────────────────────────────────────────────

/// The document matches a snapshot taken before the attempt.
pub fn check_restored(before: &DocumentSnapshot, after: &DocumentSnapshot) -> OracleVerdict {
    if before == after {
        return OracleVerdict::pass(
            "document_restored",
            format!(
                "{} bodies, {} sketches, {} timeline entries",
                after.bodies.len(),
                after.sketches,
                after.timeline
            ),
        );
    }
    let mut diffs = Vec::new();
    if before.bodies != after.bodies {
        diffs.push(format!("bodies {:?} -> {:?}", before.bodies, after.bodies));
    }
    if before.sketches != after.sketches {
        diffs.push(format!("sketches {} -> {}", before.sketches, after.sketches));
    }
    if before.timeline != after.timeline {
        diffs.push(format!("timeline {} -> {}", before.timeline, after.timeline));
    }
    if before.groups != after.groups {
        diffs.push(format!("groups {} -> {}", before.groups, after.groups));
    }
    if before.target != after.target {
        diffs.push(format!("target {:?} -> {:?}", before.target, after.target));
    }
    OracleVerdict::fail("document_restored", diffs.join("; "))
}

// ── Dialog Oracles ──────────────────────────────────────────────────────────

/// `visibility(kind)` is exactly the common fields plus the variant's own.
pub fn check_visibility_table(kind: VentKind) -> OracleVerdict {
    let expected: BTreeSet<FieldId> = COMMON_FIELDS
        .iter()
        .chain(variant_fields(kind))
        .copied()
        .collect();
    let actual = visibility(kind);
    if actual != expected {
        return OracleVerdict::fail(
            "visibility_table",
            format!("{}: expected {:?}, got {:?}", kind, expected, actual),
        );
    }
    let leaked: Vec<FieldId> = VentKind::ALL
        .iter()
        .filter(|other| **other != kind)
        .flat_map(|other| variant_fields(*other).iter().copied())
        .filter(|f| actual.contains(f) && !variant_fields(kind).contains(f))
        .collect();
    if leaked.is_empty() {
        OracleVerdict::pass(
            "visibility_table",
            format!("{}: {} visible fields", kind, actual.len()),
        )
    } else {
        OracleVerdict::fail(
            "visibility_table",
            format!("{}: fields of other variants leaked: {:?}", kind, leaked),
        )
    }
}

/// Run every applicable oracle on a successful build.
pub fn run_build_oracles(report: &VentReport, log: &[CombineRecord]) -> Vec<OracleVerdict> {
    let mut verdicts = vec![check_cut_before_join(log)];
    if report.grid.is_some() {
        verdicts.push(check_flow_area(report, 1e-9));
    }
    verdicts
}
