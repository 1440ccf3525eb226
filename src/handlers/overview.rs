//! Handler for the `overview` command.

use std::path::PathBuf;

use crate::cli::OutputFormat;
use crate::engine::context::RuleContext;
use crate::error::Result;
use crate::facade::account_overview;
use crate::handlers::utils::{emit_report, load_snapshot};

pub fn handle_overview(
    snapshot_path: PathBuf,
    format: OutputFormat,
    output: Option<PathBuf>,
    ctx: &RuleContext,
) -> Result<()> {
    let snapshot = load_snapshot(&snapshot_path)?;
    let report = account_overview(&snapshot, ctx)?;
    emit_report("Account Overview", &report, format, output.as_ref())
}
