//! Wealth projections: monthly SIP, one-time lumpsum and monthly SWP.

use crate::error::CalcError;
use crate::math::{add, div, monthly_rate, mul, pow, sub};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const MONTHS_PER_YEAR: u32 = 12;
/// Longest SWP tenure simulated: 100 years.
pub const MAX_SWP_MONTHS: u32 = 1200;

/// Invested amount, projected value and the gain between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WealthReport {
    pub invested: Decimal,
    pub estimated_returns: Decimal,
    pub total_value: Decimal,
}

/// Future value of a monthly SIP, each installment invested at the start of the month.
pub fn sip(monthly_amount: Decimal, annual_rate_pct: Decimal, years: Decimal) -> Result<WealthReport, CalcError> {
    if monthly_amount.is_zero() || annual_rate_pct.is_zero() || years.is_zero() {
        return Err(CalcError::Incomplete("SIP"));
    }

    let i = monthly_rate(annual_rate_pct);
    let months = mul(years, Decimal::from(MONTHS_PER_YEAR), "SIP tenure")?;
    let step = add(Decimal::ONE, i, "SIP")?;
    let growth = pow(step, months, "SIP")?;
    let annuity = div(sub(growth, Decimal::ONE, "SIP")?, i, "SIP")?;
    let total_value = mul(mul(monthly_amount, annuity, "SIP")?, step, "SIP")?;
    let invested = mul(monthly_amount, months, "SIP invested")?;

    Ok(WealthReport {
        invested,
        estimated_returns: sub(total_value, invested, "SIP returns")?,
        total_value,
    })
}

/// Future value of a one-time investment compounded yearly.
pub fn lumpsum(amount: Decimal, annual_rate_pct: Decimal, years: Decimal) -> Result<WealthReport, CalcError> {
    if amount.is_zero() || annual_rate_pct.is_zero() || years.is_zero() {
        return Err(CalcError::Incomplete("lumpsum"));
    }

    let step = add(Decimal::ONE, annual_rate_pct / Decimal::ONE_HUNDRED, "lumpsum")?;
    let total_value = mul(amount, pow(step, years, "lumpsum")?, "lumpsum")?;

    Ok(WealthReport {
        invested: amount,
        estimated_returns: sub(total_value, amount, "lumpsum returns")?,
        total_value,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwpReport {
    pub initial_corpus: Decimal,
    pub total_withdrawn: Decimal,
    pub final_balance: Decimal,
    /// Months actually simulated; shorter than the tenure when the corpus ran out.
    pub months_elapsed: u32,
    pub exhausted: bool,
}

/// Simulates a systematic withdrawal plan month by month.
///
/// Each month the balance earns interest, then the withdrawal is taken out.
/// If the balance goes negative it is clamped to zero and the simulation stops;
/// the final withdrawal still counts toward the total. Tenures beyond
/// [`MAX_SWP_MONTHS`] are rejected.
pub fn swp(
    corpus: Decimal,
    monthly_withdrawal: Decimal,
    annual_rate_pct: Decimal,
    years: Decimal,
) -> Result<SwpReport, CalcError> {
    if corpus.is_zero() || monthly_withdrawal.is_zero() || annual_rate_pct.is_zero() || years.is_zero() {
        return Err(CalcError::Incomplete("SWP"));
    }
    if years.is_sign_negative() {
        return Err(CalcError::Incomplete("SWP"));
    }

    let i = monthly_rate(annual_rate_pct);
    let months = mul(years, Decimal::from(MONTHS_PER_YEAR), "SWP tenure")?.ceil();
    let months = match months.to_u32() {
        Some(m) if m <= MAX_SWP_MONTHS => m,
        _ => {
            return Err(CalcError::Undefined(format!(
                "SWP tenure of {years} years exceeds {} years",
                MAX_SWP_MONTHS / MONTHS_PER_YEAR
            )));
        }
    };

    let mut balance = corpus;
    let mut total_withdrawn = Decimal::ZERO;
    let mut months_elapsed = 0;
    let mut exhausted = false;

    for _ in 0..months {
        let interest = mul(balance, i, "SWP interest")?;
        balance = add(balance, interest, "SWP balance")?;
        balance = sub(balance, monthly_withdrawal, "SWP balance")?;
        total_withdrawn = add(total_withdrawn, monthly_withdrawal, "SWP withdrawals")?;
        months_elapsed += 1;

        if balance.is_sign_negative() && !balance.is_zero() {
            balance = Decimal::ZERO;
            exhausted = true;
            break;
        }
    }

    tracing::debug!(months_elapsed, exhausted, "SWP simulation finished.");

    Ok(SwpReport {
        initial_corpus: corpus,
        total_withdrawn,
        final_balance: balance,
        months_elapsed,
        exhausted,
    })
}
