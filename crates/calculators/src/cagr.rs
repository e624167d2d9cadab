use crate::error::CalcError;
use crate::math::{div, mul, pow, sub};
use core_types::Tone;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CagrReport {
    pub cagr_pct: Decimal,
    pub absolute_return_pct: Decimal,
    pub tone: Tone,
}

/// Compound annual growth rate between two values `years` apart.
pub fn cagr(initial: Decimal, final_value: Decimal, years: Decimal) -> Result<CagrReport, CalcError> {
    if initial.is_zero() || final_value.is_zero() || years.is_zero() {
        return Err(CalcError::Incomplete("CAGR"));
    }

    let ratio = div(final_value, initial, "CAGR")?;
    let exponent = div(Decimal::ONE, years, "CAGR")?;
    let growth = sub(pow(ratio, exponent, "CAGR")?, Decimal::ONE, "CAGR")?;
    let cagr_pct = mul(growth, Decimal::ONE_HUNDRED, "CAGR")?;
    let absolute_return_pct = mul(
        div(sub(final_value, initial, "absolute return")?, initial, "absolute return")?,
        Decimal::ONE_HUNDRED,
        "absolute return",
    )?;

    Ok(CagrReport {
        cagr_pct,
        absolute_return_pct,
        tone: Tone::for_amount(cagr_pct),
    })
}
