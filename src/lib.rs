//! # CloudAudit CLI
//!
//! A Rust-based command-line application that evaluates exported AWS account
//! snapshots against a catalog of security, compliance, cost and performance
//! rules, producing a severity-ranked report with estimated monthly savings.
//!
//! ## Features
//!
//! - **Snapshot Normalization**: Folds raw AWS API shapes into a canonical
//!   per-resource descriptor model
//! - **Rule Catalog**: Security group exposure, IAM risk, S3/RDS posture,
//!   zombie-resource cost rules, all pure and independently testable
//! - **Deterministic Reports**: Findings sorted by severity then impact,
//!   deduplicated, with recomputed summaries on merge
//! - **Offline by Design**: Never talks to AWS; consumes snapshots produced
//!   by your inventory tooling
//!
//! ## Example
//!
//! ```rust,no_run
//! use cloudaudit_cli::engine::RuleContext;
//! use cloudaudit_cli::facade::account_overview;
//! use cloudaudit_cli::normalize::AccountSnapshot;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let json = std::fs::read_to_string("snapshot.json")?;
//! let snapshot = AccountSnapshot::from_json(&json)?;
//! let report = account_overview(&snapshot, &RuleContext::default())?;
//! println!("{} findings", report.summary.total_findings);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod facade;
pub mod handlers;
pub mod normalize;

// Re-export commonly used types and functions
pub use engine::{Report, RuleContext, Severity};
pub use error::{CloudAuditError, Result};
pub use facade::{account_overview, audit_security, diagnose_issue, optimize_costs};
pub use normalize::AccountSnapshot;

use cli::Commands;

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Dispatch a parsed CLI command.
pub fn run_command(command: Commands, ctx: &RuleContext) -> Result<()> {
    match command {
        Commands::Audit {
            snapshot,
            format,
            output,
            fail_on_findings,
        } => handlers::handle_audit(snapshot, format, output, fail_on_findings, ctx),
        Commands::Optimize {
            snapshot,
            format,
            output,
        } => handlers::handle_optimize(snapshot, format, output, ctx),
        Commands::Diagnose {
            snapshot,
            target,
            format,
            output,
        } => handlers::handle_diagnose(snapshot, target, format, output, ctx),
        Commands::Overview {
            snapshot,
            format,
            output,
        } => handlers::handle_overview(snapshot, format, output, ctx),
        Commands::Rules { category, format } => handlers::handle_rules(category, format),
    }
}
