use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::Chp2xError;
use crate::time_value::{compound, monthly_rate, npv};
use crate::types::{with_metadata, ComputationOutput, Currency, Money, Rate};
use crate::Chp2xResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Shares issued per hectare of plant.
pub const SHARES_PER_HECTARE: u32 = 15_000;

/// Assumed daily operating-hours multiplier applied to the hourly production
/// rate when deriving annual volume from sun hours.
pub const DAILY_OPERATING_FACTOR: Decimal = dec!(6);

/// Electrical energy equivalent of one liter of methanol (kWh/L), used for
/// the LCOE denominator.
pub const KWH_PER_LITER: Decimal = dec!(5);

const MONTHS_PER_YEAR: u32 = 12;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for the CHP2X cash-flow projection. All values are
/// scalars, immutable per run; monetary fields are denominated in `currency`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowInput {
    /// Construction cost per hectare
    pub capex_per_hectare: Money,
    /// Plant size in hectares
    pub hectares: u32,
    /// Methanol production rate per hectare (L/h)
    pub liters_per_hour_per_hectare: Decimal,
    /// Annual direct-normal-irradiance sun hours
    pub sun_hours: u32,
    /// Project lifetime in years
    pub project_lifetime_years: u32,
    /// Construction years before first revenue
    pub build_time_years: u32,
    /// Price per share
    pub share_price: Money,
    /// Fraction of gross revenue distributed to shareholders
    pub revenue_sharing: Rate,
    /// Methanol price per liter in year 0
    pub price_per_liter: Money,
    /// Annual methanol price escalation
    pub annual_price_escalation: Rate,
    /// Annual discount rate for the NPV reduction
    pub discount_rate: Rate,
    /// Currency the monetary inputs are denominated in
    pub currency: Currency,
}

/// One month of the projection. `cumulative_cash_flow` is the running sum of
/// the monthly cash flows and excludes the initial CAPEX outlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    pub month: u32,
    pub revenue: Money,
    pub cash_flow: Money,
    pub cumulative_cash_flow: Money,
}

/// Production volumes and base-year revenue before escalation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionSummary {
    /// Annual methanol volume per hectare (L/year)
    pub annual_liters_per_hectare: Decimal,
    /// Year-0 revenue across all hectares
    pub annual_revenue_base: Money,
    pub monthly_revenue_base: Money,
}

/// Capital requirement and share subscription figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentSummary {
    pub total_capex: Money,
    /// CAPEX amortized flat across the ENTIRE project lifetime, build years
    /// included, not just the post-build operating period.
    pub monthly_capex_payment: Money,
    pub share_count: u64,
    pub total_share_investment: Money,
    /// total_capex - total_share_investment
    pub investment_gap: Money,
}

/// Shareholder revenue-sharing figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueShareSummary {
    pub monthly_revenue_share: Money,
    pub monthly_revenue_share_per_share: Money,
    pub annual_revenue_share_per_share: Money,
    /// Gross share distributions over the full lifetime
    pub total_revenue_share: Money,
    pub total_revenue_share_per_share: Money,
    /// total_revenue_share / total_share_investment
    pub total_revenue_share_ratio: Decimal,
    /// Equivalent annual return on the share investment
    pub annual_return_rate: Rate,
}

/// Revenue figures at the edges of the operating period. All fields are
/// absent when the build period consumes the entire lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatingSummary {
    /// Revenue in the first post-build month
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_month_revenue: Option<Money>,
    /// Revenue in the last month of the lifetime
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_month_revenue: Option<Money>,
    /// First-month revenue net of the CAPEX payment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_month_net_revenue: Option<Money>,
    /// First-month revenue net of CAPEX payment and shareholder distribution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_month_company_earnings: Option<Money>,
}

/// Lifetime economics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifetimeSummary {
    /// NPV of [-total_capex, monthly cash flows...] at the monthly rate
    pub npv: Money,
    /// Levelized cost of energy (currency/kWh)
    pub lcoe: Money,
    pub total_energy_production_kwh: Decimal,
    /// Sum of monthly revenue over the charted series
    pub total_revenue: Money,
    /// CAPEX only; shareholder distributions are part of the return
    pub total_costs: Money,
    /// total_revenue - total_costs - total_revenue_share
    pub total_company_earnings: Money,
    pub revenue_to_capex: Decimal,
    pub annual_revenue_to_capex: Decimal,
}

/// Output of the cash-flow projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowOutput {
    pub production: ProductionSummary,
    pub investment: InvestmentSummary,
    pub revenue_share: RevenueShareSummary,
    pub operating: OperatingSummary,
    pub lifetime: LifetimeSummary,
    /// Month-indexed series for charting, one entry per lifetime month
    pub monthly_series: Vec<MonthlyPoint>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Project the CHP2X monthly cash flows and summary metrics.
///
/// Pure function: identical input yields bit-identical output. Range and
/// currency-floor constraints on the individual parameters belong to the
/// presentation layer; this function only rejects inputs that would make a
/// denominator zero or the series meaningless.
pub fn project_cash_flows(
    input: &CashFlowInput,
) -> Chp2xResult<ComputationOutput<CashFlowOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let months = input.project_lifetime_years * MONTHS_PER_YEAR;
    let hectares = Decimal::from(input.hectares);
    let lifetime_years = Decimal::from(input.project_lifetime_years);

    // --- Investment ---
    let total_capex = input.capex_per_hectare * hectares;
    let share_count = u64::from(input.hectares) * u64::from(SHARES_PER_HECTARE);
    let shares = Decimal::from(share_count);
    let total_share_investment = input.share_price * shares;
    let investment_gap = total_capex - total_share_investment;
    let monthly_capex_payment = total_capex / Decimal::from(months);

    // --- Base revenue ---
    let annual_liters_per_hectare = DAILY_OPERATING_FACTOR
        * input.liters_per_hour_per_hectare
        * Decimal::from(input.sun_hours);
    let annual_revenue_base = annual_liters_per_hectare * input.price_per_liter * hectares;
    let monthly_revenue_base = annual_revenue_base / dec!(12);

    // --- Revenue sharing ---
    let monthly_revenue_share = monthly_revenue_base * input.revenue_sharing;
    let monthly_revenue_share_per_share = monthly_revenue_share / shares;
    let annual_revenue_share_per_share = monthly_revenue_share_per_share * dec!(12);
    let total_revenue_share = monthly_revenue_share * dec!(12) * lifetime_years;
    let total_revenue_share_per_share = total_revenue_share / shares;
    let total_revenue_share_ratio = total_revenue_share / total_share_investment;
    let annual_return_rate = monthly_revenue_share * dec!(12) / total_share_investment;

    // --- Monthly series with price escalation ---
    let monthly_series =
        build_monthly_series(input, annual_liters_per_hectare, monthly_capex_payment);

    // --- NPV: initial outlay at period 0, then the monthly flows ---
    let rate = monthly_rate(input.discount_rate)?;
    let mut npv_flows: Vec<Money> = Vec::with_capacity(monthly_series.len() + 1);
    npv_flows.push(-total_capex);
    npv_flows.extend(monthly_series.iter().map(|p| p.cash_flow));
    let npv_value = npv(rate, &npv_flows)?;

    // --- Lifetime totals ---
    let total_revenue: Money = monthly_series.iter().map(|p| p.revenue).sum();
    let total_costs = total_capex;
    let annual_energy_kwh = annual_liters_per_hectare * hectares * KWH_PER_LITER;
    let total_energy_kwh = annual_energy_kwh * lifetime_years;
    let lcoe = total_costs / total_energy_kwh;
    let total_company_earnings = total_revenue - total_costs - total_revenue_share;

    // --- Operating-period edges ---
    let operating = operating_summary(
        input,
        &monthly_series,
        monthly_capex_payment,
        monthly_revenue_share,
    );

    if input.build_time_years >= input.project_lifetime_years {
        warnings.push(format!(
            "Build time ({} years) consumes the entire {}-year lifetime; every month is a CAPEX-only outflow",
            input.build_time_years, input.project_lifetime_years
        ));
    } else if let Some(final_revenue) = operating.final_month_revenue {
        if final_revenue <= monthly_capex_payment {
            warnings.push(
                "Monthly revenue never exceeds the monthly CAPEX payment; cumulative cash flow declines over the whole lifetime"
                    .to_string(),
            );
        }
    }

    let output = CashFlowOutput {
        production: ProductionSummary {
            annual_liters_per_hectare,
            annual_revenue_base,
            monthly_revenue_base,
        },
        investment: InvestmentSummary {
            total_capex,
            monthly_capex_payment,
            share_count,
            total_share_investment,
            investment_gap,
        },
        revenue_share: RevenueShareSummary {
            monthly_revenue_share,
            monthly_revenue_share_per_share,
            annual_revenue_share_per_share,
            total_revenue_share,
            total_revenue_share_per_share,
            total_revenue_share_ratio,
            annual_return_rate,
        },
        operating,
        lifetime: LifetimeSummary {
            npv: npv_value,
            lcoe,
            total_energy_production_kwh: total_energy_kwh,
            total_revenue,
            total_costs,
            total_company_earnings,
            revenue_to_capex: total_revenue / total_capex,
            annual_revenue_to_capex: annual_revenue_base / total_capex,
        },
        monthly_series,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "CHP2X monthly cash-flow projection (escalated price, monthly-compounded NPV)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_input(input: &CashFlowInput) -> Chp2xResult<()> {
    if input.hectares == 0 {
        return Err(Chp2xError::InvalidInput {
            field: "hectares".into(),
            reason: "At least one hectare is required".into(),
        });
    }
    if input.project_lifetime_years == 0 || input.project_lifetime_years > 100 {
        return Err(Chp2xError::InvalidInput {
            field: "project_lifetime_years".into(),
            reason: "Project lifetime must be between 1 and 100 years".into(),
        });
    }
    if input.capex_per_hectare <= Decimal::ZERO {
        return Err(Chp2xError::InvalidInput {
            field: "capex_per_hectare".into(),
            reason: "CAPEX per hectare must be positive".into(),
        });
    }
    if input.liters_per_hour_per_hectare <= Decimal::ZERO {
        return Err(Chp2xError::InvalidInput {
            field: "liters_per_hour_per_hectare".into(),
            reason: "Production rate must be positive".into(),
        });
    }
    if input.sun_hours == 0 {
        return Err(Chp2xError::InvalidInput {
            field: "sun_hours".into(),
            reason: "Sun hours must be positive".into(),
        });
    }
    if input.share_price <= Decimal::ZERO {
        return Err(Chp2xError::InvalidInput {
            field: "share_price".into(),
            reason: "Share price must be positive".into(),
        });
    }
    if input.price_per_liter <= Decimal::ZERO {
        return Err(Chp2xError::InvalidInput {
            field: "price_per_liter".into(),
            reason: "Price per liter must be positive".into(),
        });
    }
    if input.revenue_sharing < Decimal::ZERO || input.revenue_sharing > Decimal::ONE {
        return Err(Chp2xError::InvalidInput {
            field: "revenue_sharing".into(),
            reason: "Revenue sharing must be between 0 and 1".into(),
        });
    }
    if input.annual_price_escalation < Decimal::ZERO {
        return Err(Chp2xError::InvalidInput {
            field: "annual_price_escalation".into(),
            reason: "Price escalation cannot be negative".into(),
        });
    }
    if input.discount_rate < Decimal::ZERO {
        return Err(Chp2xError::InvalidInput {
            field: "discount_rate".into(),
            reason: "Discount rate cannot be negative".into(),
        });
    }

    Ok(())
}

fn build_monthly_series(
    input: &CashFlowInput,
    annual_liters_per_hectare: Decimal,
    monthly_capex_payment: Money,
) -> Vec<MonthlyPoint> {
    let months = input.project_lifetime_years * MONTHS_PER_YEAR;
    let hectares = Decimal::from(input.hectares);
    let mut series = Vec::with_capacity(months as usize);
    let mut cumulative = Decimal::ZERO;

    for year in 0..input.project_lifetime_years {
        let year_price = input.price_per_liter * compound(input.annual_price_escalation, year);
        let monthly_revenue = annual_liters_per_hectare * year_price * hectares / dec!(12);
        let building = year < input.build_time_years;

        for month_of_year in 0..MONTHS_PER_YEAR {
            let month = year * MONTHS_PER_YEAR + month_of_year;
            let (revenue, cash_flow) = if building {
                (Decimal::ZERO, -monthly_capex_payment)
            } else {
                (monthly_revenue, monthly_revenue - monthly_capex_payment)
            };
            cumulative += cash_flow;
            series.push(MonthlyPoint {
                month,
                revenue,
                cash_flow,
                cumulative_cash_flow: cumulative,
            });
        }
    }

    series
}

fn operating_summary(
    input: &CashFlowInput,
    series: &[MonthlyPoint],
    monthly_capex_payment: Money,
    monthly_revenue_share: Money,
) -> OperatingSummary {
    let first_operating_month = (input.build_time_years * MONTHS_PER_YEAR) as usize;
    if first_operating_month >= series.len() {
        return OperatingSummary {
            first_month_revenue: None,
            final_month_revenue: None,
            first_month_net_revenue: None,
            first_month_company_earnings: None,
        };
    }

    let first = series[first_operating_month].revenue;
    let last = series.last().map(|p| p.revenue);
    OperatingSummary {
        first_month_revenue: Some(first),
        final_month_revenue: last,
        first_month_net_revenue: Some(first - monthly_capex_payment),
        first_month_company_earnings: Some(first - monthly_capex_payment - monthly_revenue_share),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_input() -> CashFlowInput {
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
    fn test_sample_scenario_investment() {
        let result = project_cash_flows(&sample_input()).unwrap();
        let inv = &result.result.investment;

        assert_eq!(inv.total_capex, dec!(15_000_000));
        // 15M over 600 months
        assert_eq!(inv.monthly_capex_payment, dec!(25_000));
        assert_eq!(inv.share_count, 15_000);
        assert_eq!(inv.total_share_investment, dec!(15_000_000));
        assert_eq!(inv.investment_gap, dec!(0));
    }

    #[test]
    fn test_sample_scenario_production() {
        let result = project_cash_flows(&sample_input()).unwrap();
        let prod = &result.result.production;

        // 6 * 105 * 1250 = 787,500 L/year
        assert_eq!(prod.annual_liters_per_hectare, dec!(787_500));
        // 787,500 * 5.5 = 4,331,250
        assert_eq!(prod.annual_revenue_base, dec!(4_331_250));
        assert_eq!(prod.monthly_revenue_base, dec!(360_937.5));
    }

    #[test]
    fn test_build_months_are_capex_only() {
        let result = project_cash_flows(&sample_input()).unwrap();
        let series = &result.result.monthly_series;

        assert_eq!(series.len(), 600);
        for point in &series[..48] {
            assert_eq!(point.revenue, Decimal::ZERO);
            assert_eq!(point.cash_flow, dec!(-25_000));
        }
        // First operating month carries the year-4 escalated price
        assert!(series[48].revenue > Decimal::ZERO);
    }

    #[test]
    fn test_first_operating_month_uses_escalated_price() {
        let result = project_cash_flows(&sample_input()).unwrap();
        let out = &result.result;

        // Year 4 price = 5.5 * 1.025^4; monthly revenue = 787,500 * price / 12
        let expected = dec!(787_500) * dec!(5.5) * compound(dec!(0.025), 4) / dec!(12);
        assert_eq!(out.operating.first_month_revenue, Some(expected));
        assert_eq!(out.monthly_series[48].revenue, expected);
    }

    #[test]
    fn test_revenue_share_metrics() {
        let result = project_cash_flows(&sample_input()).unwrap();
        let rs = &result.result.revenue_share;

        // 4,331,250 / 12 * 0.5 = 180,468.75
        assert_eq!(rs.monthly_revenue_share, dec!(180_468.75));
        assert_eq!(rs.monthly_revenue_share_per_share, dec!(12.03125));
        assert_eq!(rs.annual_revenue_share_per_share, dec!(144.375));
        // 180,468.75 * 12 * 50 = 108,281,250
        assert_eq!(rs.total_revenue_share, dec!(108_281_250));
        assert_eq!(rs.total_revenue_share_ratio, dec!(7.21875));
        assert_eq!(rs.annual_return_rate, dec!(0.144375));
    }

    #[test]
    fn test_lcoe_sample_scenario() {
        let result = project_cash_flows(&sample_input()).unwrap();
        let lt = &result.result.lifetime;

        // 787,500 * 1 * 5 * 50 = 196,875,000 kWh
        assert_eq!(lt.total_energy_production_kwh, dec!(196_875_000));
        // 15,000,000 / 196,875,000 ≈ 0.0762
        assert!((lt.lcoe - dec!(0.076190476)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_cumulative_excludes_initial_outlay() {
        let result = project_cash_flows(&sample_input()).unwrap();
        let series = &result.result.monthly_series;

        assert_eq!(series[0].cumulative_cash_flow, dec!(-25_000));
        // Running sum property
        let partial: Money = series[..10].iter().map(|p| p.cash_flow).sum();
        assert_eq!(series[9].cumulative_cash_flow, partial);
    }

    #[test]
    fn test_cumulative_rises_once_revenue_covers_capex_payment() {
        let result = project_cash_flows(&sample_input()).unwrap();
        let series = &result.result.monthly_series;

        // Post-build revenue (~370k) dwarfs the 25k CAPEX payment
        for window in series[48..].windows(2) {
            assert!(window[1].cumulative_cash_flow > window[0].cumulative_cash_flow);
        }
    }

    #[test]
    fn test_npv_zero_discount_collapses_to_sum() {
        let mut input = sample_input();
        input.discount_rate = Decimal::ZERO;

        let result = project_cash_flows(&input).unwrap();
        let out = &result.result;
        let undiscounted = -out.investment.total_capex
            + out
                .monthly_series
                .last()
                .unwrap()
                .cumulative_cash_flow;
        assert_eq!(out.lifetime.npv, undiscounted);
    }

    #[test]
    fn test_npv_negative_when_build_consumes_lifetime() {
        let mut input = sample_input();
        input.project_lifetime_years = 3;
        input.build_time_years = 4;

        let result = project_cash_flows(&input).unwrap();
        let out = &result.result;

        assert!(out.lifetime.npv < Decimal::ZERO);
        assert!(out.monthly_series.iter().all(|p| p.cash_flow < Decimal::ZERO));
        assert!(out.operating.first_month_revenue.is_none());
        assert!(out.operating.final_month_revenue.is_none());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_zero_build_time_has_no_empty_months() {
        let mut input = sample_input();
        input.build_time_years = 0;

        let result = project_cash_flows(&input).unwrap();
        assert!(result
            .result
            .monthly_series
            .iter()
            .all(|p| p.revenue > Decimal::ZERO));
    }

    #[test]
    fn test_deterministic_bit_identical() {
        let input = sample_input();
        let a = project_cash_flows(&input).unwrap();
        let b = project_cash_flows(&input).unwrap();
        assert_eq!(
            serde_json::to_string(&a.result).unwrap(),
            serde_json::to_string(&b.result).unwrap()
        );
    }

    #[test]
    fn test_zero_hectares_rejected() {
        let mut input = sample_input();
        input.hectares = 0;
        assert!(project_cash_flows(&input).is_err());
    }

    #[test]
    fn test_lifetime_out_of_range_rejected() {
        let mut input = sample_input();
        input.project_lifetime_years = 101;
        assert!(project_cash_flows(&input).is_err());

        input.project_lifetime_years = 0;
        assert!(project_cash_flows(&input).is_err());
    }

    #[test]
    fn test_revenue_sharing_above_one_rejected() {
        let mut input = sample_input();
        input.revenue_sharing = dec!(1.5);
        assert!(project_cash_flows(&input).is_err());
    }

    #[test]
    fn test_methodology() {
        let result = project_cash_flows(&sample_input()).unwrap();
        assert_eq!(
            result.methodology,
            "CHP2X monthly cash-flow projection (escalated price, monthly-compounded NPV)"
        );
    }
}
