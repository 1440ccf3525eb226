//! Handler for the `diagnose` command.

use std::path::PathBuf;

use crate::cli::OutputFormat;
use crate::engine::context::RuleContext;
use crate::error::Result;
use crate::facade::diagnose_issue;
use crate::handlers::utils::{emit_report, load_snapshot};

pub fn handle_diagnose(
    snapshot_path: PathBuf,
    target: String,
    format: OutputFormat,
    output: Option<PathBuf>,
    ctx: &RuleContext,
) -> Result<()> {
    let snapshot = load_snapshot(&snapshot_path)?;
    let report = diagnose_issue(&snapshot, &target, ctx)?;
    let title = format!("Diagnosis: {target}");
    emit_report(&title, &report, format, output.as_ref())
}
