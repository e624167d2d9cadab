use crate::error::CalcError;
use crate::math::{add, div, mul, sub};
use core_types::Tone;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoiReport {
    pub invested: Decimal,
    pub current: Decimal,
    pub profit: Decimal,
    pub roi_pct: Decimal,
    pub tone: Tone,
}

/// Simple return on investment.
///
/// Both fields must be filled in. A zero investment has no meaningful
/// percentage, so it hides the panel as well.
pub fn roi(invested: Option<Decimal>, current: Option<Decimal>) -> Result<RoiReport, CalcError> {
    let (Some(invested), Some(current)) = (invested, current) else {
        return Err(CalcError::Incomplete("ROI"));
    };
    if invested.is_zero() {
        return Err(CalcError::Incomplete("ROI"));
    }

    let profit = sub(current, invested, "ROI profit")?;
    let roi_pct = mul(div(profit, invested, "ROI")?, Decimal::ONE_HUNDRED, "ROI")?;

    Ok(RoiReport {
        invested,
        current,
        profit,
        roi_pct,
        tone: Tone::for_amount(profit),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancedRoiReport {
    pub gross_profit: Decimal,
    pub charges: Decimal,
    pub net_profit: Decimal,
    pub net_roi_pct: Decimal,
    pub tone: Tone,
}

/// Return on investment after brokerage and taxes.
///
/// `charge_pct` applies to the full turnover (buy value plus sell value);
/// `flat_charge` is added on top.
pub fn advanced_roi(
    invested: Decimal,
    current: Decimal,
    charge_pct: Decimal,
    flat_charge: Decimal,
) -> Result<AdvancedRoiReport, CalcError> {
    if invested.is_zero() || current.is_zero() {
        return Err(CalcError::Incomplete("net ROI"));
    }

    let gross_profit = sub(current, invested, "gross profit")?;
    let turnover = add(invested, current, "turnover")?;
    let charges = add(
        mul(turnover, charge_pct / Decimal::ONE_HUNDRED, "charges")?,
        flat_charge,
        "charges",
    )?;
    let net_profit = sub(gross_profit, charges, "net profit")?;
    let net_roi_pct = mul(div(net_profit, invested, "net ROI")?, Decimal::ONE_HUNDRED, "net ROI")?;

    Ok(AdvancedRoiReport {
        gross_profit,
        charges,
        net_profit,
        net_roi_pct,
        tone: Tone::for_amount(net_profit),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn profit_and_percentage() {
        let report = roi(Some(dec!(1000)), Some(dec!(1250))).unwrap();
        assert_eq!(report.profit, dec!(250));
        assert_eq!(report.roi_pct, dec!(25));
        assert_eq!(report.tone, Tone::Profit);
    }

    #[test]
    fn loss_is_flagged() {
        let report = roi(Some(dec!(1000)), Some(dec!(800))).unwrap();
        assert_eq!(report.profit, dec!(-200));
        assert_eq!(report.roi_pct, dec!(-20));
        assert_eq!(report.tone, Tone::Loss);
    }

    #[test]
    fn current_value_of_zero_is_a_total_loss() {
        let report = roi(Some(dec!(500)), Some(dec!(0))).unwrap();
        assert_eq!(report.roi_pct, dec!(-100));
    }

    #[test]
    fn missing_fields_hide_the_panel() {
        assert!(roi(None, Some(dec!(1))).unwrap_err().is_incomplete());
        assert!(roi(Some(dec!(1)), None).unwrap_err().is_incomplete());
        assert!(roi(Some(dec!(0)), Some(dec!(5))).unwrap_err().is_incomplete());
    }

    #[test]
    fn charges_apply_to_turnover() {
        let report = advanced_roi(dec!(10000), dec!(12000), dec!(0.1), dec!(20)).unwrap();
        assert_eq!(report.gross_profit, dec!(2000));
        assert_eq!(report.charges, dec!(42));
        assert_eq!(report.net_profit, dec!(1958));
        assert_eq!(report.net_roi_pct, dec!(19.58));
        assert_eq!(report.tone, Tone::Profit);
    }

    #[test]
    fn charges_can_turn_a_gain_into_a_loss() {
        let report = advanced_roi(dec!(1000), dec!(1010), dec!(0), dec!(25)).unwrap();
        assert_eq!(report.net_profit, dec!(-15));
        assert_eq!(report.tone, Tone::Loss);
    }

    #[test]
    fn opposite_extremes_overflow() {
        assert_eq!(
            roi(Some(dec!(-5e28)), Some(dec!(5e28))),
            Err(CalcError::Overflow("ROI profit"))
        );
        assert_eq!(
            advanced_roi(dec!(5e28), dec!(5e28), dec!(0), dec!(0)),
            Err(CalcError::Overflow("turnover"))
        );
        assert_eq!(
            advanced_roi(dec!(1), dec!(2), dec!(0), Decimal::MIN),
            Err(CalcError::Overflow("net profit"))
        );
    }

    #[test]
    fn advanced_roi_needs_both_values() {
        assert!(advanced_roi(dec!(0), dec!(10), dec!(1), dec!(1))
            .unwrap_err()
            .is_incomplete());
    }
}
