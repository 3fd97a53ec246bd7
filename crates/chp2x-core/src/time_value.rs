use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::Chp2xError;
use crate::types::{Money, Rate};
use crate::Chp2xResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Net Present Value of a series of cash flows. The first entry is the
/// period-0 flow (typically the initial outlay) and is not discounted.
pub fn npv(rate: Rate, cash_flows: &[Money]) -> Chp2xResult<Money> {
    if rate <= dec!(-1) {
        return Err(Chp2xError::InvalidInput {
            field: "rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }

    let mut result = Decimal::ZERO;
    let one_plus_r = Decimal::ONE + rate;
    let mut discount = Decimal::ONE;

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            discount *= one_plus_r;
        }
        if discount.is_zero() {
            return Err(Chp2xError::DivisionByZero {
                context: format!("NPV discount factor at period {t}"),
            });
        }
        result += cf / discount;
    }

    Ok(result)
}

/// Effective monthly rate equivalent to an annually compounded rate:
/// (1 + r)^(1/12) - 1. A zero annual rate maps to exactly zero so an
/// undiscounted NPV stays an exact sum.
pub fn monthly_rate(annual_rate: Rate) -> Chp2xResult<Rate> {
    if annual_rate <= dec!(-1) {
        return Err(Chp2xError::InvalidInput {
            field: "annual_rate".into(),
            reason: "Annual rate must be greater than -100%".into(),
        });
    }
    if annual_rate.is_zero() {
        return Ok(Decimal::ZERO);
    }

    let base = Decimal::ONE + annual_rate;
    Ok(base.powd(Decimal::ONE / MONTHS_PER_YEAR) - Decimal::ONE)
}

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
pub fn compound(rate: Rate, n: u32) -> Decimal {
    let mut result = Decimal::ONE;
    let factor = Decimal::ONE + rate;
    for _ in 0..n {
        result *= factor;
    }
    result
}
