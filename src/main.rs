//! colcon-test-result - Command-line entry point for the test-result verb

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colcon_test_result::commands::test_result::Mode;
use colcon_test_result::commands::{Command, TestResultCommand};
use colcon_test_result::config::{TestResultDefaults, DEFAULTS_FILE_ENV};
use colcon_test_result::ui::CliUI;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "colcon-test-result")]
#[command(about = "Collect and summarize test results of a build", long_about = None)]
#[command(version)]
struct Cli {
    /// Set log level for the console output (e.g. debug, info, warn)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// INI file with per-verb defaults
    #[arg(long, global = true, env = DEFAULTS_FILE_ENV)]
    defaults_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the test results generated when testing a set of packages
    #[command(name = "test-result")]
    TestResult(TestResultArgs),
}

#[derive(Args)]
struct TestResultArgs {
    /// The base path for all test results (default: build)
    #[arg(long)]
    test_result_base: Option<String>,

    /// Show all test result files (even without errors / failures)
    #[arg(long)]
    all: bool,

    /// Show additional information for errors / failures
    #[arg(long)]
    verbose: bool,

    /// Print only the paths of the test result files
    #[arg(long, conflicts_with_all = ["delete", "delete_yes"])]
    result_files_only: bool,

    /// Delete the test result files after asking for confirmation
    #[arg(long, conflicts_with = "delete_yes")]
    delete: bool,

    /// Delete the test result files without asking for confirmation
    #[arg(long)]
    delete_yes: bool,
}

fn init_logging(level: &str) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("Invalid log level '{}'", level))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

fn build_command(cli: &Cli) -> anyhow::Result<TestResultCommand> {
    let defaults = match &cli.defaults_file {
        Some(path) => TestResultDefaults::load_from_file(path)?,
        None => TestResultDefaults::default(),
    };

    let Commands::TestResult(args) = &cli.command;
    let mode = if args.result_files_only {
        Mode::ResultFilesOnly
    } else if args.delete || args.delete_yes {
        Mode::Delete {
            assume_yes: args.delete_yes,
        }
    } else {
        Mode::Summary
    };

    Ok(TestResultCommand::with_all_options(
        args.test_result_base
            .clone()
            .or(defaults.test_result_base),
        args.all || defaults.all.unwrap_or(false),
        args.verbose || defaults.verbose.unwrap_or(false),
        mode,
    ))
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.log_level) {
        let _ = writeln!(std::io::stderr(), "Error: {:#}", e);
        std::process::exit(1);
    }

    let cmd = match build_command(&cli) {
        Ok(cmd) => cmd,
        Err(e) => {
            let _ = writeln!(std::io::stderr(), "Error: {:#}", e);
            std::process::exit(1);
        }
    };

    let mut ui = CliUI::new();
    match cmd.execute(&mut ui) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            let _ = writeln!(std::io::stderr(), "Error: {}", e);
            std::process::exit(1);
        }
    }
}
