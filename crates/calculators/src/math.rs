use crate::error::CalcError;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Raises `base` to `exponent`.
///
/// Whole exponents go through exact repeated multiplication; fractional ones
/// use the exp/ln approximation and require a non-negative base.
pub(crate) fn pow(base: Decimal, exponent: Decimal, what: &'static str) -> Result<Decimal, CalcError> {
    if exponent.fract().is_zero() {
        let whole = exponent.to_i64().ok_or(CalcError::Overflow(what))?;
        return base.checked_powi(whole).ok_or(CalcError::Overflow(what));
    }

    if base.is_sign_negative() {
        return Err(CalcError::Undefined(format!(
            "{what}: negative base {base} with fractional exponent {exponent}"
        )));
    }
    if base.is_zero() {
        return Ok(Decimal::ZERO);
    }
    base.checked_powd(exponent).ok_or(CalcError::Overflow(what))
}

pub(crate) fn add(a: Decimal, b: Decimal, what: &'static str) -> Result<Decimal, CalcError> {
    a.checked_add(b).ok_or(CalcError::Overflow(what))
}

pub(crate) fn sub(a: Decimal, b: Decimal, what: &'static str) -> Result<Decimal, CalcError> {
    a.checked_sub(b).ok_or(CalcError::Overflow(what))
}

pub(crate) fn mul(a: Decimal, b: Decimal, what: &'static str) -> Result<Decimal, CalcError> {
    a.checked_mul(b).ok_or(CalcError::Overflow(what))
}

pub(crate) fn div(a: Decimal, b: Decimal, what: &'static str) -> Result<Decimal, CalcError> {
    if b.is_zero() {
        return Err(CalcError::Undefined(format!("{what}: division by zero")));
    }
    a.checked_div(b).ok_or(CalcError::Overflow(what))
}

/// Converts an annual percentage rate into a monthly fraction (12 -> 0.01).
pub(crate) fn monthly_rate(annual_pct: Decimal) -> Decimal {
    annual_pct / Decimal::from(12) / Decimal::ONE_HUNDRED
}

#[cfg(test)]
pub(crate) fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} (±{tolerance}), got {actual}"
    );
}
