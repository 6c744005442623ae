mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing::{debug, Level};

use commands::lbo::{AssumptionArgs, ModelArgs, SensitivityArgs};

/// Leveraged buyout projection, debt schedule and returns waterfall
#[derive(Parser)]
#[command(
    name = "lbo",
    version,
    about = "Leveraged buyout returns engine",
    long_about = "Projects revenue and EBITDA, builds a term loan / revolver / cash sweep \
                  schedule, and computes exit value, sponsor IRR and a tiered LP/GP promote \
                  split with decimal precision. Inputs come from --input (JSON or YAML), \
                  piped JSON on stdin, or the built-in base case plus flag overrides."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full model: projection, debt schedule, returns, sensitivity
    Model(ModelArgs),
    /// Project revenue and EBITDA over the holding period
    Project(AssumptionArgs),
    /// Build the cash flow and debt schedule
    Schedule(AssumptionArgs),
    /// Plain term loan amortisation table
    Amortisation(AssumptionArgs),
    /// IRR across a set of exit multiples
    Sensitivity(SensitivityArgs),
    /// Print the base-case assumptions (usable as an input template)
    BaseCase,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
    Csv,
    Minimal,
    /// Formatted results report
    Report,
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    logging::init_tracing(cli.log_json, level);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Model(args) => commands::lbo::run_model(args),
        Commands::Project(args) => commands::lbo::run_project(args),
        Commands::Schedule(args) => commands::lbo::run_schedule(args),
        Commands::Amortisation(args) => commands::lbo::run_amortisation(args),
        Commands::Sensitivity(args) => commands::lbo::run_sensitivity(args),
        Commands::BaseCase => commands::lbo::run_base_case(),
        Commands::Version => {
            println!("lbo {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            debug!(format = ?cli.output, "writing output");
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
