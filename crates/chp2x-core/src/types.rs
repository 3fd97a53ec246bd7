use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Settlement currency for a calculation run.
///
/// SEK is the base currency; the other codes carry a fixed conversion
/// multiplier used to scale input floors and defaults. Monetary inputs are
/// expected to already be denominated in the selected currency, so the
/// multiplier never touches computed results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    SEK,
    EUR,
    USD,
}

impl Currency {
    /// Fixed conversion multiplier from SEK into this currency.
    pub fn rate_from_sek(&self) -> Decimal {
        match self {
            Currency::SEK => dec!(1.0),
            Currency::EUR => dec!(0.087),
            Currency::USD => dec!(0.095),
        }
    }

    /// Display symbol appended after formatted amounts.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::SEK => "SEK",
            Currency::EUR => "€",
            Currency::USD => "$",
        }
    }

    /// Minimum CAPEX per hectare accepted for this currency.
    pub fn min_capex_per_hectare(&self) -> Money {
        dec!(10_000) * self.rate_from_sek()
    }

    /// Minimum share price accepted for this currency.
    pub fn min_share_price(&self) -> Money {
        dec!(100) * self.rate_from_sek()
    }

    /// Minimum methanol price per liter accepted for this currency.
    pub fn min_price_per_liter(&self) -> Money {
        dec!(1.0) * self.rate_from_sek()
    }

    /// Minimum payout-scheme investment accepted for this currency.
    pub fn min_investment(&self) -> Money {
        dec!(10_000) * self.rate_from_sek()
    }
}

/// Format a monetary amount as `1,234,567.89 SYMBOL`.
pub fn format_money(amount: Money, currency: Currency) -> String {
    format!("{} {}", format_grouped(amount), currency.symbol())
}

/// Round to two decimals and group the integer part in thousands.
pub fn format_grouped(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = rounded.abs().to_string();

    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (text, String::new()),
    };
    let mut frac = frac_part;
    while frac.len() < 2 {
        frac.push('0');
    }

    let digits = int_part.len();
    let mut grouped = String::with_capacity(digits + digits / 3 + 4);
    if negative {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.push('.');
    grouped.push_str(&frac);
    grouped
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_grouped_thousands() {
        assert_eq!(format_grouped(dec!(1234567.891)), "1,234,567.89");
        assert_eq!(format_grouped(dec!(25000)), "25,000.00");
        assert_eq!(format_grouped(dec!(999)), "999.00");
        assert_eq!(format_grouped(dec!(0.5)), "0.50");
    }

    #[test]
    fn test_format_grouped_negative() {
        assert_eq!(format_grouped(dec!(-15000000)), "-15,000,000.00");
        // A negative fraction that rounds to zero must not print "-0.00"
        assert_eq!(format_grouped(dec!(-0.001)), "0.00");
    }

    #[test]
    fn test_format_money_symbols() {
        assert_eq!(format_money(dec!(1000), Currency::SEK), "1,000.00 SEK");
        assert_eq!(format_money(dec!(87), Currency::EUR), "87.00 €");
        assert_eq!(format_money(dec!(95), Currency::USD), "95.00 $");
    }

    #[test]
    fn test_currency_floors_scale_with_rate() {
        assert_eq!(Currency::SEK.min_capex_per_hectare(), dec!(10_000));
        assert_eq!(Currency::EUR.min_capex_per_hectare(), dec!(870.0));
        assert_eq!(Currency::USD.min_share_price(), dec!(9.500));
        assert_eq!(Currency::EUR.min_price_per_liter(), dec!(0.0870));
    }
}
