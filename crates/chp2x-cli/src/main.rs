mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::cashflow::{PayoutArgs, ProjectArgs};
use commands::electrolyzer::SweepArgs;

/// CHP2X investment and SCWE electrolyzer calculators
#[derive(Parser)]
#[command(
    name = "chp2x",
    version,
    about = "CHP2X investment and SCWE electrolyzer calculators",
    long_about = "Deterministic calculators for the Sunthetics CHP2X methanol \
                  investment scheme and the SCWE electrolyzer: monthly cash-flow \
                  projection with NPV and LCOE, fixed-assumption payout \
                  schedules, and per-temperature electrolyzer sweeps."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Project the CHP2X monthly cash flows, NPV, and LCOE
    Project(ProjectArgs),
    /// Derive the payout schedule for a fixed-assumption investment
    Payout(PayoutArgs),
    /// Sweep the SCWE electrolyzer across a temperature range
    Sweep(SweepArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Project(args) => commands::cashflow::run_project(args),
        Commands::Payout(args) => commands::cashflow::run_payout(args),
        Commands::Sweep(args) => commands::electrolyzer::run_sweep(args),
        Commands::Version => {
            println!("chp2x {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
