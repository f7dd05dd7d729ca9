//! Test harness for the vent command.
//!
//! Provides programmatic tools for scripting dialog sessions against a
//! `MockKernel` document, verifying the result at every step, and generating
//! diagnostic output.
//!
//! # Key Components
//!
//! - [`VentWorkflow`]: Fluent API driving a command through host events
//! - [`oracle`]: Verification functions returning pass/fail verdicts
//! - [`report`]: Structured text description of a build
//! - [`helpers`]: Document fixtures, dialog builders, the recording host
//! - [`assertions`]: Rich assertion helpers with diagnostics

pub mod assertions;
pub mod helpers;
pub mod oracle;
pub mod report;
pub mod workflow;

pub use helpers::{DocumentSnapshot, HarnessError, RecordingHost};
pub use oracle::OracleVerdict;
pub use report::BuildReport;
pub use workflow::VentWorkflow;
