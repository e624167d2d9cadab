use crate::error::CalcError;
use crate::math::{add, mul};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentageReport {
    pub percent: Decimal,
    pub base: Decimal,
    /// `percent`% of `base`.
    pub result: Decimal,
    /// `base` increased by `result`.
    pub total_value: Decimal,
}

/// "X% of Y". Both fields must be filled in; zero is a valid value for either.
pub fn percentage(percent: Option<Decimal>, base: Option<Decimal>) -> Result<PercentageReport, CalcError> {
    let (Some(percent), Some(base)) = (percent, base) else {
        return Err(CalcError::Incomplete("percentage"));
    };

    let result = mul(percent / Decimal::ONE_HUNDRED, base, "percentage")?;
    Ok(PercentageReport {
        percent,
        base,
        result,
        total_value: add(base, result, "percentage total")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn fifteen_percent_of_two_hundred() {
        let report = percentage(Some(dec!(15)), Some(dec!(200))).unwrap();
        assert_eq!(report.result, dec!(30));
        assert_eq!(report.total_value, dec!(230));
    }

    #[test]
    fn zero_is_a_value_not_a_blank() {
        let report = percentage(Some(dec!(0)), Some(dec!(200))).unwrap();
        assert_eq!(report.result, dec!(0));
        assert_eq!(report.total_value, dec!(200));
    }

    #[test]
    fn huge_values_overflow_instead_of_panicking() {
        assert_eq!(
            percentage(Some(dec!(100)), Some(dec!(5e28))),
            Err(CalcError::Overflow("percentage total"))
        );
    }

    #[test]
    fn blank_field_hides_the_panel() {
        assert!(percentage(Some(dec!(10)), None).unwrap_err().is_incomplete());
    }
}
