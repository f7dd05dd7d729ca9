//! Structured text reports of a vent session.
//!
//! Reports are plain text so a failing test can print them as-is; the JSON
//! form is there for tests that diff whole reports.

use std::fmt;

use serde::Serialize;
use vent_command::LifecycleState;
use vent_ops::VentReport;

use crate::oracle::{self, OracleVerdict};
use crate::workflow::VentWorkflow;

/// What a session produced, ready to print.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub state: LifecycleState,
    pub build: Option<VentReport>,
    pub last_error: Option<String>,
    pub bodies: usize,
    pub sketches: usize,
    pub timeline: usize,
    pub combines: Vec<String>,
    #[serde(skip)]
    pub oracle_results: Vec<OracleVerdict>,
}

impl BuildReport {
    pub fn from_workflow(wf: &VentWorkflow) -> Self {
        let build = wf.last_report().cloned();
        let oracle_results = build
            .as_ref()
            .map(|r| oracle::run_build_oracles(r, wf.kernel.combine_log()))
            .unwrap_or_default();
        Self {
            state: wf.state(),
            build,
            last_error: wf.command.session.last_error.clone(),
            bodies: wf.kernel.body_count(),
            sketches: wf.kernel.sketch_count(),
            timeline: wf.kernel.timeline_len(),
            combines: wf
                .kernel
                .combine_log()
                .iter()
                .map(|c| format!("{:?} {} into {:?}", c.op, c.tools.len(), c.target))
                .collect(),
            oracle_results,
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("=== Vent Session Report ===\n\n");
        out.push_str(&format!("State: {:?}\n", self.state));
        out.push_str(&format!(
            "Document: {} bodies, {} sketches, {} timeline entries\n",
            self.bodies, self.sketches, self.timeline,
        ));

        match &self.build {
            Some(build) => {
                out.push_str(&format!(
                    "\nBuild ({}): {} cut, {} joined, {} sketches\n",
                    build.kind,
                    build.bodies_cut,
                    build.bodies_joined,
                    build.sketches.len(),
                ));
                if let Some(area) = build.flow_area {
                    out.push_str(&format!("  Flow area: {:.4}\n", area));
                }
                if let Some(grid) = &build.grid {
                    out.push_str(&format!(
                        "  Grid: {} x {} cells of {:.4} x {:.4}, pitch {:.4} x {:.4}, r={:.4}\n",
                        grid.cols,
                        grid.rows,
                        grid.cell_width,
                        grid.cell_height,
                        grid.x_pitch,
                        grid.y_pitch,
                        grid.fillet_radius,
                    ));
                }
                out.push_str(&format!(
                    "  Steps ({:.3} ms):\n",
                    build.diagnostics.kernel_time_ms
                ));
                for step in &build.diagnostics.steps {
                    out.push_str(&format!("    {:<18} {:.3} ms\n", step.step, step.elapsed_ms));
                }
                for warning in &build.diagnostics.warnings {
                    out.push_str(&format!("  Warning: {}\n", warning));
                }
            }
            None => out.push_str("\nBuild: none\n"),
        }

        if !self.combines.is_empty() {
            out.push_str(&format!("\nCombines ({}):\n", self.combines.len()));
            for c in &self.combines {
                out.push_str(&format!("  {}\n", c));
            }
        }

        if !self.oracle_results.is_empty() {
            out.push_str(&format!(
                "\nOracle Results ({} checks):\n",
                self.oracle_results.len()
            ));
            for v in &self.oracle_results {
                let status = if v.passed { "PASS" } else { "FAIL" };
                out.push_str(&format!("  [{}] {}: {}\n", status, v.oracle_name, v.detail));
            }
        }

        match &self.last_error {
            Some(e) => out.push_str(&format!("\nLast error: {}\n", e)),
            None => out.push_str("\nErrors: none\n"),
        }
        out
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}
