use crate::error::CalcError;
use crate::math::{add, div, monthly_rate, mul, pow, sub};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmiReport {
    pub principal: Decimal,
    pub monthly_emi: Decimal,
    pub total_interest: Decimal,
    pub total_amount: Decimal,
}

/// Equated monthly installment for a loan.
///
/// `annual_rate_pct` is the yearly rate in percent, `months` the tenure.
/// EMI = P·r·(1+r)^N / ((1+r)^N − 1) with r the monthly rate.
pub fn emi(principal: Decimal, annual_rate_pct: Decimal, months: Decimal) -> Result<EmiReport, CalcError> {
    if principal.is_zero() || annual_rate_pct.is_zero() || months.is_zero() {
        return Err(CalcError::Incomplete("EMI"));
    }

    let r = monthly_rate(annual_rate_pct);
    let growth = pow(add(Decimal::ONE, r, "EMI")?, months, "EMI")?;
    let monthly_emi = div(
        mul(mul(principal, r, "EMI")?, growth, "EMI")?,
        sub(growth, Decimal::ONE, "EMI")?,
        "EMI",
    )?;
    let total_amount = mul(monthly_emi, months, "EMI total")?;

    Ok(EmiReport {
        principal,
        monthly_emi,
        total_interest: sub(total_amount, principal, "EMI interest")?,
        total_amount,
    })
}
