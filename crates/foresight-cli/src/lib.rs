//! Foresight CLI - Command-line interface for scenario planning workshops
//!
//! This CLI gives facilitators a terminal interface to:
//! - Plan a workshop agenda
//! - Rank drivers and inspect the scenario matrix of a session file
//! - Track signposts and watch probabilities move
//! - Stress-test strategies and export a full session report

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;
mod session_file;

use commands::{drivers, matrix, report, stress, track, workshop};
pub use config::CliConfig;
pub use error::{CliError, CliResult};
pub use output::OutputFormat;

/// Foresight CLI application
#[derive(Parser)]
#[command(name = "foresight")]
#[command(about = "Foresight - scenario planning toolkit", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to <config dir>/foresight/config.toml)
    #[arg(short, long, global = true, env = "FORESIGHT_CONFIG")]
    config: Option<String>,

    /// Output format (table, json, yaml)
    #[arg(short, long, global = true)]
    output: Option<OutputFormat>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Plan a facilitated workshop agenda
    Workshop(workshop::WorkshopArgs),

    /// Rank a session's drivers by criticality
    Drivers(drivers::DriversArgs),

    /// Show the scenario matrix of a session
    Matrix(matrix::MatrixArgs),

    /// Apply signpost triggers and show updated probabilities
    Track(track::TrackArgs),

    /// Stress-test the session's strategies
    Stress(stress::StressArgs),

    /// Export the full session report
    Report(report::ReportArgs),

    /// Show the effective CLI configuration
    Config,
}

/// Run using the current process arguments.
pub fn run() -> CliResult<()> {
    run_with_args(std::env::args_os())
}

/// Run using the provided argument iterator.
pub fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    // Initialize tracing; logs go to stderr so structured output stays clean
    let filter = if cli.verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init();

    let config = CliConfig::load(cli.config.as_deref())?;
    let format = cli.output.or(config.output).unwrap_or_default();

    match cli.command {
        Commands::Workshop(args) => workshop::execute(args, format, &config),
        Commands::Drivers(args) => drivers::execute(args, format),
        Commands::Matrix(args) => matrix::execute(args, format),
        Commands::Track(args) => track::execute(args, format),
        Commands::Stress(args) => stress::execute(args, format, &config),
        Commands::Report(args) => report::execute(args, format, &config),
        Commands::Config => show_config(&config, format),
    }
}

fn show_config(config: &CliConfig, format: OutputFormat) -> CliResult<()> {
    use colored::Colorize;

    match format {
        OutputFormat::Json | OutputFormat::Yaml => output::print_structured(config, format),
        OutputFormat::Table => {
            output::print_heading("Foresight Configuration");
            let output = config.output.unwrap_or_default();
            println!("  {:<16} {:?}", "output".bold(), output);
            match config.mode {
                Some(mode) => println!("  {:<16} {}", "mode".bold(), mode),
                None => println!("  {:<16} {}", "mode".bold(), "from session file".dimmed()),
            }
            match &config.default_domain {
                Some(domain) => println!("  {:<16} {}", "default_domain".bold(), domain),
                None => println!("  {:<16} {}", "default_domain".bold(), "unset".dimmed()),
            }
            println!("  {:<16} {}", "group_size".bold(), config.group_size());
            Ok(())
        }
    }
}
