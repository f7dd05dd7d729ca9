//! Property tests for the grid laws and the visibility table.

use proptest::prelude::*;
use test_harness::helpers::*;
use test_harness::oracle;
use vent_kernel::MockKernel;
use vent_ops::{build_vent, replicate, GridPattern};
use vent_types::{RectangularVent, SeedPoint, SlotVent, VentKind, VentSpec};

fn kind_strategy() -> impl Strategy<Value = VentKind> {
    prop_oneof![
        Just(VentKind::Circular),
        Just(VentKind::Slot),
        Just(VentKind::Rectangular),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn replicate_yields_cols_times_rows(cols in 1u32..8, rows in 1u32..8) {
        let mut kernel = MockKernel::new();
        let root = kernel.root_component();
        let cell = kernel.add_box(root, [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        kernel.reset_stats();

        let pattern = GridPattern {
            x_axis: [1.0, 0.0, 0.0],
            y_axis: [0.0, 1.0, 0.0],
            cols,
            x_pitch: 2.0,
            rows,
            y_pitch: 2.0,
        };
        let out = replicate(&mut kernel, root, &[cell.body], &pattern).unwrap();

        let expected_ops = (cols - 1 + rows - 1) as usize;
        prop_assert_eq!(out.bodies.len(), (cols * rows) as usize);
        prop_assert_eq!(out.copy_operations, expected_ops);
        let verdict = oracle::check_replication_cost(kernel.stats(), cols, rows);
        prop_assert!(verdict.passed, "{}", verdict.detail);
    }

    #[test]
    fn rectangular_flow_area_law(
        cols in 1u32..5,
        rows in 1u32..5,
        width in 4.0f64..12.0,
        height in 2.0f64..6.0,
        radius_frac in 0.0f64..0.95,
    ) {
        let border = 0.1;
        let cell_w = (width - f64::from(cols + 1) * border) / f64::from(cols);
        let cell_h = (height - f64::from(rows + 1) * border) / f64::from(rows);
        prop_assume!(cell_w > 0.05 && cell_h > 0.05);
        let corner_radius = radius_frac * cell_w.min(cell_h) / 2.0;

        let (mut kernel, _) = slab_document();
        let seed = top_center_seed(&kernel);
        let spec = VentSpec::Rectangular(RectangularVent {
            width,
            height,
            border,
            cols,
            rows,
            corner_radius,
        });
        let report = build_vent(&mut kernel, &spec, &seed).unwrap();

        let expected = f64::from(cols * rows)
            * (cell_w * cell_h - (4.0 - std::f64::consts::PI) * corner_radius * corner_radius);
        let area = report.flow_area.unwrap();
        prop_assert!((area - expected).abs() <= 1e-9 * expected.max(1.0),
            "area {} expected {}", area, expected);
        prop_assert_eq!(report.bodies_cut, (cols * rows) as usize);
        let verdict = oracle::check_flow_area(&report, 1e-9);
        prop_assert!(verdict.passed, "{}", verdict.detail);
    }

    #[test]
    fn slot_cut_count_matches_grid(cols in 1u32..5, rows in 1u32..5) {
        let (mut kernel, slab) = slab_document();
        let seed = top_center_seed(&kernel);
        let spec = VentSpec::Slot(SlotVent {
            width: 8.0,
            height: 4.0,
            border: 0.2,
            cols,
            rows,
        });
        build_vent(&mut kernel, &spec, &seed).unwrap();
        let cut = kernel.body_summary(slab.body).unwrap().cut_tools;
        prop_assert_eq!(cut, (cols * rows) as usize);
        prop_assert_eq!(kernel.combine_log().len(), 1);
    }

    #[test]
    fn visibility_is_common_plus_variant(kind in kind_strategy()) {
        let verdict = oracle::check_visibility_table(kind);
        prop_assert!(verdict.passed, "{}", verdict.detail);

        let mut dialog = default_dialog();
        vent_command::apply_visibility(&mut dialog, kind);
        let shown: std::collections::BTreeSet<_> =
            dialog.visible_fields().into_iter().collect();
        prop_assert_eq!(shown, vent_types::visibility(kind));
    }
}

#[test]
fn seeds_off_center_still_cut_every_cell() {
    let (mut kernel, slab) = slab_document();
    let seed = SeedPoint::new([3.0, -4.0, 1.0], kernel.root_component());
    build_vent(&mut kernel, &reference_rectangular(), &seed).unwrap();
    assert_eq!(kernel.body_summary(slab.body).unwrap().cut_tools, 18);
}

#[test]
fn replicate_single_cell_issues_no_copies() {
    let mut kernel = MockKernel::new();
    let root = kernel.root_component();
    let b = kernel.add_box(root, [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
    kernel.reset_stats();
    let pattern = GridPattern {
        x_axis: [1.0, 0.0, 0.0],
        y_axis: [0.0, 1.0, 0.0],
        cols: 1,
        x_pitch: 2.0,
        rows: 1,
        y_pitch: 2.0,
    };
    let out = replicate(&mut kernel, root, &[b.body], &pattern).unwrap();
    assert_eq!(out.bodies, vec![b.body]);
    assert_eq!(kernel.stats().copy_calls, 0);
}
