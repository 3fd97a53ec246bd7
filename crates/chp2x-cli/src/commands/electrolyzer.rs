use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use chp2x_core::electrolyzer::sweep::{self, SweepInput};

use crate::input;

/// Arguments for the SCWE temperature sweep.
#[derive(Args)]
pub struct SweepArgs {
    /// Electrical power fed to the stack (kW)
    #[arg(long, default_value = "6.8")]
    pub power_kw: Decimal,

    /// Number of cells in the stack
    #[arg(long, default_value = "40")]
    pub cells: u32,

    /// Minimum temperature (°C)
    #[arg(long, default_value = "250")]
    pub temp_min: i32,

    /// Maximum temperature (°C)
    #[arg(long, default_value = "750")]
    pub temp_max: i32,

    /// Temperature step (°C)
    #[arg(long, default_value = "50")]
    pub temp_step: i32,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_sweep(args: SweepArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input: SweepInput = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(piped) = input::read_stdin()? {
        piped
    } else {
        SweepInput {
            power_kw: args.power_kw,
            cell_count: args.cells,
            temp_min_c: args.temp_min,
            temp_max_c: args.temp_max,
            temp_step_c: args.temp_step,
        }
    };

    check_sweep_ranges(&input)?;

    let result = sweep::run_sweep(&input)?;
    Ok(serde_json::to_value(result)?)
}

// Mirrors the interactive sliders; the core library only rejects ladders it
// cannot iterate (inverted range, nonpositive step).
fn check_sweep_ranges(input: &SweepInput) -> Result<(), Box<dyn std::error::Error>> {
    if !(dec!(1)..=dec!(20)).contains(&input.power_kw) {
        return Err("--power-kw must be between 1 and 20".into());
    }
    if !(10..=80).contains(&input.cell_count) {
        return Err("--cells must be between 10 and 80".into());
    }
    if !(250..=700).contains(&input.temp_min_c) {
        return Err("--temp-min must be between 250 and 700".into());
    }
    if input.temp_max_c <= input.temp_min_c || input.temp_max_c > 800 {
        return Err("--temp-max must be above --temp-min and at most 800".into());
    }
    if !(10..=100).contains(&input.temp_step_c) {
        return Err("--temp-step must be between 10 and 100".into());
    }

    Ok(())
}
