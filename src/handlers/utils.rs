//! Shared plumbing for the report-producing commands: snapshot loading,
//! table/JSON rendering and output-file handling.

use std::fs;
use std::path::{Path, PathBuf};

use colored::*;

use crate::cli::OutputFormat;
use crate::engine::aggregate::Report;
use crate::engine::types::Severity;
use crate::error::{CloudAuditError, Result};
use crate::normalize::AccountSnapshot;

/// Read and parse a snapshot file.
pub fn load_snapshot(path: &Path) -> Result<AccountSnapshot> {
    let content = fs::read_to_string(path).map_err(|e| {
        CloudAuditError::Snapshot(format!("cannot read {}: {e}", path.display()))
    })?;
    AccountSnapshot::from_json(&content).map_err(|e| {
        CloudAuditError::Snapshot(format!("cannot parse {}: {e}", path.display()))
    })
}

fn severity_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::Critical => "CRITICAL".red().bold(),
        Severity::High => "HIGH".red(),
        Severity::Medium => "MEDIUM".yellow(),
        Severity::Low => "LOW".blue(),
    }
}

/// Render a report as a human-readable table.
pub fn render_table(title: &str, report: &Report) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{}\n", title.bold()));
    out.push_str(&format!("{}\n", "=".repeat(72)));

    if report.findings.is_empty() {
        out.push_str(&format!("\n{}\n", "No findings.".green()));
    } else {
        for finding in &report.findings {
            out.push_str(&format!(
                "\n[{}] {} {} ({})\n",
                severity_label(finding.severity),
                finding.rule_id.as_str().bold(),
                finding.title,
                finding.resource_type,
            ));
            for reason in &finding.rationale {
                out.push_str(&format!("    - {reason}\n"));
            }
            if let Some(impact) = finding.estimated_monthly_impact {
                out.push_str(&format!(
                    "    {} ${impact:.2}/month\n",
                    "estimated impact:".cyan()
                ));
            }
            out.push_str(&format!("    fix: {}\n", finding.recommendation));
        }
    }

    let summary = &report.summary;
    out.push_str(&format!("\n{}\n", "-".repeat(72)));
    out.push_str(&format!(
        "Findings: {}  (skipped rule executions: {})\n",
        summary.total_findings, summary.rules_skipped
    ));
    for (severity, count) in &summary.by_severity {
        out.push_str(&format!("  {}: {count}\n", severity_label(*severity)));
    }
    if summary.total_monthly_impact > 0.0 {
        out.push_str(&format!(
            "Estimated waste: ${:.2}/month (${:.2}/year)\n",
            summary.total_monthly_impact, summary.total_annual_impact
        ));
    }

    if !report.top_recommendations.is_empty() {
        out.push_str(&format!("\n{}\n", "Top recommendations".bold()));
        for (i, rec) in report.top_recommendations.iter().enumerate() {
            out.push_str(&format!("  {}. {rec}\n", i + 1));
        }
    }
    out
}

/// Format a report and either print it or save it to a file.
pub fn emit_report(
    title: &str,
    report: &Report,
    format: OutputFormat,
    output: Option<&PathBuf>,
) -> Result<()> {
    let rendered = match format {
        OutputFormat::Table => render_table(title, report),
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
    };
    match output {
        Some(path) => {
            fs::write(path, rendered)?;
            println!("Report saved to: {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
