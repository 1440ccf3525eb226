use clap::Parser;
use cloudaudit_cli::{
    cli::Cli,
    config,
    run_command,
};
use std::process;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> cloudaudit_cli::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    cli.init_logging();

    // Load configuration
    let ctx = config::load_context(cli.config.as_deref())?;

    // Execute command
    run_command(cli.command, &ctx)
}
