use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::Chp2xError;
use crate::types::{with_metadata, ComputationOutput, Currency, Money, Rate};
use crate::Chp2xResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Assumed annual methanol volume per hectare (L/year). The payout scheme
/// fixes the plant assumptions instead of deriving them from user parameters.
pub const ASSUMED_ANNUAL_LITERS_PER_HECTARE: Decimal = dec!(735_000);

/// The payout series always spans this horizon.
pub const PAYOUT_HORIZON_YEARS: u32 = 50;

const MONTHS_PER_YEAR: u32 = 12;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for the fixed-assumption payout schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutInput {
    /// Capital the investor puts in
    pub investment_amount: Money,
    /// Target annual return rate paid out to the investor
    pub annual_return_rate: Rate,
    /// Methanol price per liter
    pub price_per_liter: Money,
    /// Construction years before payouts start
    pub build_time_years: u32,
    /// Currency the monetary inputs are denominated in
    pub currency: Currency,
}

/// One month of the payout series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutPoint {
    pub month: u32,
    pub payout: Money,
    pub cumulative_payout: Money,
}

/// Output of the payout schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutOutput {
    /// investment × annual rate / 12
    pub monthly_payout: Money,
    /// Gross revenue one hectare generates per month under the fixed
    /// production assumption
    pub monthly_revenue_per_hectare: Money,
    /// Fraction of one hectare's revenue needed to cover the payout
    pub required_production_share: Rate,
    /// Hectares whose full revenue would cover the payout. Numerically the
    /// same quotient as `required_production_share`, reported in hectares.
    pub required_hectares: Decimal,
    /// Month-indexed payout series over the fixed 50-year horizon
    pub monthly_series: Vec<PayoutPoint>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derive the monthly payout a fixed-assumption CHP2X plant owes an investor
/// and the production share required to cover it.
pub fn schedule_payout(input: &PayoutInput) -> Chp2xResult<ComputationOutput<PayoutOutput>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let monthly_revenue_per_hectare =
        ASSUMED_ANNUAL_LITERS_PER_HECTARE * input.price_per_liter / dec!(12);
    let monthly_payout = input.investment_amount * input.annual_return_rate / dec!(12);
    let required_production_share = monthly_payout / monthly_revenue_per_hectare;

    let months = PAYOUT_HORIZON_YEARS * MONTHS_PER_YEAR;
    let build_months = input.build_time_years * MONTHS_PER_YEAR;
    let mut monthly_series = Vec::with_capacity(months as usize);
    let mut cumulative = Decimal::ZERO;
    for month in 0..months {
        let payout = if month < build_months {
            Decimal::ZERO
        } else {
            monthly_payout
        };
        cumulative += payout;
        monthly_series.push(PayoutPoint {
            month,
            payout,
            cumulative_payout: cumulative,
        });
    }

    let output = PayoutOutput {
        monthly_payout,
        monthly_revenue_per_hectare,
        required_production_share,
        required_hectares: required_production_share,
        monthly_series,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "CHP2X fixed-assumption payout schedule",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_input(input: &PayoutInput) -> Chp2xResult<()> {
    if input.investment_amount <= Decimal::ZERO {
        return Err(Chp2xError::InvalidInput {
            field: "investment_amount".into(),
            reason: "Investment amount must be positive".into(),
        });
    }
    if input.annual_return_rate <= Decimal::ZERO {
        return Err(Chp2xError::InvalidInput {
            field: "annual_return_rate".into(),
            reason: "Annual return rate must be positive".into(),
        });
    }
    if input.price_per_liter <= Decimal::ZERO {
        return Err(Chp2xError::InvalidInput {
            field: "price_per_liter".into(),
            reason: "Price per liter must be positive".into(),
        });
    }
    if input.build_time_years >= PAYOUT_HORIZON_YEARS {
        return Err(Chp2xError::InvalidInput {
            field: "build_time_years".into(),
            reason: format!(
                "Build time must be shorter than the {PAYOUT_HORIZON_YEARS}-year payout horizon"
            ),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
