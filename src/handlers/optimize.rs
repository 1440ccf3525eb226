//! Handler for the `optimize` command.

use std::path::PathBuf;

use crate::cli::OutputFormat;
use crate::engine::context::RuleContext;
use crate::error::Result;
use crate::facade::optimize_costs;
use crate::handlers::utils::{emit_report, load_snapshot};

pub fn handle_optimize(
    snapshot_path: PathBuf,
    format: OutputFormat,
    output: Option<PathBuf>,
    ctx: &RuleContext,
) -> Result<()> {
    let snapshot = load_snapshot(&snapshot_path)?;
    let report = optimize_costs(&snapshot, ctx)?;
    emit_report("Cost Optimization", &report, format, output.as_ref())
}
