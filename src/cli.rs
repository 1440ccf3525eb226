use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cloudaudit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Evaluate AWS resource inventories against security and cost rules")]
#[command(
    long_about = "Evaluates an exported AWS account snapshot (JSON) against a catalog of security, compliance, cost and performance rules, and produces a severity-ranked report with estimated monthly savings. The tool never talks to AWS itself; it consumes snapshots produced by your inventory tooling."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file (defaults to .cloudaudit.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the security and compliance rules against a snapshot
    Audit {
        /// Path to the account snapshot JSON
        #[arg(value_name = "SNAPSHOT")]
        snapshot: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Export the report to a file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Exit non-zero when findings exist (1 for high, 2 for critical)
        #[arg(long)]
        fail_on_findings: bool,
    },

    /// Run the cost rules and estimate monthly savings
    Optimize {
        /// Path to the account snapshot JSON
        #[arg(value_name = "SNAPSHOT")]
        snapshot: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Export the report to a file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Run every rule category against one service's resources
    Diagnose {
        /// Path to the account snapshot JSON
        #[arg(value_name = "SNAPSHOT")]
        snapshot: PathBuf,

        /// Target service (ec2, s3, iam, network, storage, rds)
        #[arg(short, long)]
        target: String,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Export the report to a file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Merged security and cost overview of the whole account
    Overview {
        /// Path to the account snapshot JSON
        #[arg(value_name = "SNAPSHOT")]
        snapshot: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Export the report to a file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List the rule catalog
    Rules {
        /// Only show rules in this category
        #[arg(long, value_enum)]
        category: Option<CategoryFilter>,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryFilter {
    Security,
    Cost,
    Compliance,
    Performance,
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}
