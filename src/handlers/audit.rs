//! Handler for the `audit` command.

use std::path::PathBuf;

use crate::cli::OutputFormat;
use crate::engine::context::RuleContext;
use crate::engine::types::Severity;
use crate::error::Result;
use crate::facade::audit_security;
use crate::handlers::utils::{emit_report, load_snapshot};

pub fn handle_audit(
    snapshot_path: PathBuf,
    format: OutputFormat,
    output: Option<PathBuf>,
    fail_on_findings: bool,
    ctx: &RuleContext,
) -> Result<()> {
    let snapshot = load_snapshot(&snapshot_path)?;
    let report = audit_security(&snapshot, ctx)?;
    emit_report("Security Audit", &report, format, output.as_ref())?;

    if fail_on_findings {
        let critical = report
            .summary
            .by_severity
            .get(&Severity::Critical)
            .copied()
            .unwrap_or(0);
        let high = report
            .summary
            .by_severity
            .get(&Severity::High)
            .copied()
            .unwrap_or(0);
        if critical > 0 {
            eprintln!("Critical findings present.");
            std::process::exit(2);
        } else if high > 0 {
            eprintln!("High severity findings present.");
            std::process::exit(1);
        }
    }
    Ok(())
}
