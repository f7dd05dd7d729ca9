//! Rich assertion helpers with diagnostic output.
//!
//! Every failure includes expected vs actual and the event history of the
//! session, so a failing scenario can be read without re-running it.

use vent_command::LifecycleState;

use crate::helpers::{DocumentSnapshot, HarnessError};
use crate::oracle::{self, OracleVerdict};
use crate::workflow::VentWorkflow;

/// Assert the session is in `expected`.
pub fn assert_state(
    wf: &VentWorkflow,
    expected: LifecycleState,
    ctx: &str,
) -> Result<(), HarnessError> {
    let actual = wf.state();
    if actual == expected {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] expected state {:?}, got {:?}\nlast error: {}\nevents:\n{}",
                ctx,
                expected,
                actual,
                wf.command.session.last_error.as_deref().unwrap_or("-"),
                wf.history_text(),
            ),
        })
    }
}

/// Assert how many tool bodies have been cut from the fixture's target.
pub fn assert_cut_count(wf: &VentWorkflow, expected: usize, ctx: &str) -> Result<(), HarnessError> {
    let Some(target) = wf.target else {
        return Err(HarnessError::Fixture {
            reason: format!("[{}] the document has no target solid", ctx),
        });
    };
    let summary = wf
        .kernel
        .body_summary(target.body)
        .ok_or_else(|| HarnessError::AssertionFailed {
            detail: format!("[{}] target body {:?} no longer exists", ctx, target.body),
        })?;
    if summary.cut_tools == expected {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] expected {} bodies cut from the target, got {} ({:?})",
                ctx, expected, summary.cut_tools, summary
            ),
        })
    }
}

/// Assert the document is back to `before`.
pub fn assert_restored(
    wf: &VentWorkflow,
    before: &DocumentSnapshot,
    ctx: &str,
) -> Result<(), HarnessError> {
    let verdict = oracle::check_restored(before, &wf.snapshot());
    verdict_to_result(verdict, ctx)
}

/// Assert the flow area field shows `expected` with four decimals.
pub fn assert_flow_area_text(
    wf: &VentWorkflow,
    expected: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    let want = format!("{:.4}", expected);
    match wf.flow_area_text() {
        Some(text) if text == want => Ok(()),
        other => Err(HarnessError::AssertionFailed {
            detail: format!("[{}] flow area field: expected {}, got {:?}", ctx, want, other),
        }),
    }
}

/// Run every build oracle on the last report and fail on the first miss.
pub fn assert_build_oracles(wf: &VentWorkflow, ctx: &str) -> Result<(), HarnessError> {
    let report = wf.last_report().ok_or_else(|| HarnessError::AssertionFailed {
        detail: format!("[{}] no successful build to check\n{}", ctx, wf.history_text()),
    })?;
    for verdict in oracle::run_build_oracles(report, wf.kernel.combine_log()) {
        verdict_to_result(verdict, ctx)?;
    }
    Ok(())
}

fn verdict_to_result(verdict: OracleVerdict, ctx: &str) -> Result<(), HarnessError> {
    if verdict.passed {
        Ok(())
    } else {
        Err(HarnessError::OracleFailure {
            oracle: verdict.oracle_name,
            detail: format!("[{}] {}", ctx, verdict.detail),
        })
    }
}
