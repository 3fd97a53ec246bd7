use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use chp2x_core::cashflow::payout::{self, PayoutInput};
use chp2x_core::cashflow::projector::{self, CashFlowInput};
use chp2x_core::types::{format_money, Currency};

use crate::input;

/// Settlement currency selector shared by the CHP2X commands.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CurrencyArg {
    Sek,
    Eur,
    Usd,
}

impl From<CurrencyArg> for Currency {
    fn from(arg: CurrencyArg) -> Self {
        match arg {
            CurrencyArg::Sek => Currency::SEK,
            CurrencyArg::Eur => Currency::EUR,
            CurrencyArg::Usd => Currency::USD,
        }
    }
}

/// Arguments for the cash-flow projection. Defaults describe the baseline
/// SEK scenario; flag values are interpreted in the selected currency.
#[derive(Args)]
pub struct ProjectArgs {
    /// CAPEX per hectare
    #[arg(long, default_value = "15000000")]
    pub capex_per_hectare: Decimal,

    /// Number of hectares
    #[arg(long, default_value = "1")]
    pub hectares: u32,

    /// Methanol production rate per hectare (L/h)
    #[arg(long, default_value = "105")]
    pub liters_per_hour: Decimal,

    /// Annual sun hours (DNI)
    #[arg(long, default_value = "1250")]
    pub sun_hours: u32,

    /// Project lifetime (years)
    #[arg(long, default_value = "50")]
    pub lifetime_years: u32,

    /// Build time (years)
    #[arg(long, default_value = "4")]
    pub build_years: u32,

    /// Price per share
    #[arg(long, default_value = "1000")]
    pub share_price: Decimal,

    /// Fraction of gross revenue distributed to shareholders
    #[arg(long, default_value = "0.5")]
    pub revenue_sharing: Decimal,

    /// Methanol price per liter
    #[arg(long, default_value = "5.5")]
    pub price_per_liter: Decimal,

    /// Annual price escalation (0.01 to 0.05)
    #[arg(long, default_value = "0.025")]
    pub escalation: Decimal,

    /// Annual discount rate (0.04 to 0.07)
    #[arg(long, default_value = "0.05")]
    pub discount_rate: Decimal,

    /// Settlement currency
    #[arg(long, value_enum, default_value = "sek")]
    pub currency: CurrencyArg,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the fixed-assumption payout schedule.
#[derive(Args)]
pub struct PayoutArgs {
    /// Investment amount
    #[arg(long, default_value = "100000")]
    pub investment: Decimal,

    /// Target annual return rate (0.05 to 0.25)
    #[arg(long, default_value = "0.15")]
    pub return_rate: Decimal,

    /// Methanol price per liter
    #[arg(long, default_value = "0.55")]
    pub price_per_liter: Decimal,

    /// Build time (years)
    #[arg(long, default_value = "4")]
    pub build_years: u32,

    /// Settlement currency
    #[arg(long, value_enum, default_value = "sek")]
    pub currency: CurrencyArg,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input: CashFlowInput = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(piped) = input::read_stdin()? {
        piped
    } else {
        CashFlowInput {
            capex_per_hectare: args.capex_per_hectare,
            hectares: args.hectares,
            liters_per_hour_per_hectare: args.liters_per_hour,
            sun_hours: args.sun_hours,
            project_lifetime_years: args.lifetime_years,
            build_time_years: args.build_years,
            share_price: args.share_price,
            revenue_sharing: args.revenue_sharing,
            price_per_liter: args.price_per_liter,
            annual_price_escalation: args.escalation,
            discount_rate: args.discount_rate,
            currency: args.currency.into(),
        }
    };

    check_project_ranges(&input)?;

    let result = projector::project_cash_flows(&input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_payout(args: PayoutArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input: PayoutInput = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(piped) = input::read_stdin()? {
        piped
    } else {
        PayoutInput {
            investment_amount: args.investment,
            annual_return_rate: args.return_rate,
            price_per_liter: args.price_per_liter,
            build_time_years: args.build_years,
            currency: args.currency.into(),
        }
    };

    check_payout_ranges(&input)?;

    let result = payout::schedule_payout(&input)?;
    Ok(serde_json::to_value(result)?)
}

// ---------------------------------------------------------------------------
// Input-widget range constraints
// ---------------------------------------------------------------------------

// The accepted ranges mirror the interactive input widgets: currency-scaled
// floors on monetary fields and fixed slider bounds on the rest. The core
// library itself only rejects structurally impossible values.

fn check_project_ranges(input: &CashFlowInput) -> Result<(), Box<dyn std::error::Error>> {
    let currency = input.currency;

    let capex_floor = currency.min_capex_per_hectare();
    if input.capex_per_hectare < capex_floor {
        return Err(format!(
            "--capex-per-hectare must be at least {}",
            format_money(capex_floor, currency)
        )
        .into());
    }
    let share_floor = currency.min_share_price();
    if input.share_price < share_floor {
        return Err(format!(
            "--share-price must be at least {}",
            format_money(share_floor, currency)
        )
        .into());
    }
    let price_floor = currency.min_price_per_liter();
    if input.price_per_liter < price_floor {
        return Err(format!(
            "--price-per-liter must be at least {}",
            format_money(price_floor, currency)
        )
        .into());
    }
    if input.liters_per_hour_per_hectare < dec!(1) {
        return Err("--liters-per-hour must be at least 1".into());
    }
    if !(500..=3500).contains(&input.sun_hours) {
        return Err("--sun-hours must be between 500 and 3500".into());
    }
    if !(1..=100).contains(&input.project_lifetime_years) {
        return Err("--lifetime-years must be between 1 and 100".into());
    }
    if input.build_time_years > 10 {
        return Err("--build-years must be at most 10".into());
    }
    if !(dec!(0.01)..=dec!(0.05)).contains(&input.annual_price_escalation) {
        return Err("--escalation must be between 0.01 and 0.05".into());
    }
    if !(dec!(0.04)..=dec!(0.07)).contains(&input.discount_rate) {
        return Err("--discount-rate must be between 0.04 and 0.07".into());
    }

    Ok(())
}

fn check_payout_ranges(input: &PayoutInput) -> Result<(), Box<dyn std::error::Error>> {
    let currency = input.currency;

    let investment_floor = currency.min_investment();
    if input.investment_amount < investment_floor {
        return Err(format!(
            "--investment must be at least {}",
            format_money(investment_floor, currency)
        )
        .into());
    }
    if !(dec!(0.05)..=dec!(0.25)).contains(&input.annual_return_rate) {
        return Err("--return-rate must be between 0.05 and 0.25".into());
    }
    let price_floor = dec!(0.10) * currency.rate_from_sek();
    if input.price_per_liter < price_floor {
        return Err(format!(
            "--price-per-liter must be at least {}",
            format_money(price_floor, currency)
        )
        .into());
    }
    if input.build_time_years > 10 {
        return Err("--build-years must be at most 10".into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sek_project_input() -> CashFlowInput {
        CashFlowInput {
            capex_per_hectare: dec!(15_000_000),
            hectares: 1,
            liters_per_hour_per_hectare: dec!(105),
            sun_hours: 1250,
            project_lifetime_years: 50,
            build_time_years: 4,
            share_price: dec!(1000),
            revenue_sharing: dec!(0.5),
            price_per_liter: dec!(5.5),
            annual_price_escalation: dec!(0.025),
            discount_rate: dec!(0.05),
            currency: Currency::SEK,
        }
    }

    #[test]
    fn test_sample_scenario_passes_ranges() {
        assert!(check_project_ranges(&sek_project_input()).is_ok());
    }

    #[test]
    fn test_capex_floor_scales_with_currency() {
        let mut input = sek_project_input();
        input.capex_per_hectare = dec!(5000);
        assert!(check_project_ranges(&input).is_err());

        // 5,000 clears the EUR floor of 870
        input.currency = Currency::EUR;
        input.share_price = dec!(87);
        input.price_per_liter = dec!(0.48);
        assert!(check_project_ranges(&input).is_ok());
    }

    #[test]
    fn test_discount_rate_outside_slider_rejected() {
        let mut input = sek_project_input();
        input.discount_rate = dec!(0.09);
        assert!(check_project_ranges(&input).is_err());
    }

    #[test]
    fn test_payout_return_rate_bounds() {
        let input = PayoutInput {
            investment_amount: dec!(100_000),
            annual_return_rate: dec!(0.30),
            price_per_liter: dec!(0.55),
            build_time_years: 4,
            currency: Currency::SEK,
        };
        assert!(check_payout_ranges(&input).is_err());
    }
}
