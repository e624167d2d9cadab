use crate::error::CalcError;
use crate::math::{add, div, mul, sub};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One purchase row: a quantity bought at a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StockEntry {
    pub quantity: Decimal,
    pub price: Decimal,
}

impl StockEntry {
    pub fn new(quantity: Decimal, price: Decimal) -> Self {
        Self { quantity, price }
    }

    /// The amount shown under each row, computed even for rows the average ignores.
    /// Saturates toward the sign of the product when it overflows.
    pub fn invested(&self) -> Decimal {
        self.quantity.checked_mul(self.price).unwrap_or_else(|| {
            if self.quantity.is_sign_negative() != self.price.is_sign_negative() {
                Decimal::MIN
            } else {
                Decimal::MAX
            }
        })
    }

    fn counts(&self) -> bool {
        self.quantity > Decimal::ZERO && self.price > Decimal::ZERO
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AverageReport {
    pub total_quantity: Decimal,
    pub total_cost: Decimal,
    pub average_price: Decimal,
}

/// Weighted average buy price across every row with a positive quantity and price.
pub fn stock_average(entries: &[StockEntry]) -> Result<AverageReport, CalcError> {
    let mut total_quantity = Decimal::ZERO;
    let mut total_cost = Decimal::ZERO;

    for entry in entries.iter().filter(|e| e.counts()) {
        total_quantity = add(total_quantity, entry.quantity, "total quantity")?;
        let cost = mul(entry.quantity, entry.price, "row cost")?;
        total_cost = add(total_cost, cost, "total cost")?;
    }

    if total_quantity.is_zero() {
        return Err(CalcError::Incomplete("stock average"));
    }

    Ok(AverageReport {
        total_quantity,
        total_cost,
        average_price: div(total_cost, total_quantity, "average price")?,
    })
}

/// Why a desired average cannot be reached with the given new price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetHint {
    MustBeAboveNewPrice,
    MustBeBelowNewPrice,
    Impossible,
}

impl TargetHint {
    pub fn message(&self) -> &'static str {
        match self {
            TargetHint::MustBeAboveNewPrice => "Desired average must be higher than New Price.",
            TargetHint::MustBeBelowNewPrice => "Desired average must be lower than New Price.",
            TargetHint::Impossible => {
                "Impossible to achieve this average with the current new price."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TargetAverageReport {
    /// Buy this many whole shares at the new price.
    Achievable {
        buy_quantity: Decimal,
        investment: Decimal,
    },
    Unreachable { hint: TargetHint },
}

/// How many shares to buy at `new_price` to move the average from
/// `current_average` to `desired_average`.
pub fn target_average(
    quantity: Decimal,
    current_average: Decimal,
    new_price: Decimal,
    desired_average: Decimal,
) -> Result<TargetAverageReport, CalcError> {
    if quantity.is_zero()
        || current_average.is_zero()
        || new_price.is_zero()
        || desired_average.is_zero()
    {
        return Err(CalcError::Incomplete("target average"));
    }

    let averaging_down = current_average > new_price
        && desired_average < current_average
        && desired_average > new_price;
    let averaging_up = current_average < new_price
        && desired_average > current_average
        && desired_average < new_price;

    if !averaging_down && !averaging_up {
        let hint = if desired_average <= new_price && current_average > new_price {
            TargetHint::MustBeAboveNewPrice
        } else if desired_average >= new_price && current_average < new_price {
            TargetHint::MustBeBelowNewPrice
        } else {
            TargetHint::Impossible
        };
        return Ok(TargetAverageReport::Unreachable { hint });
    }

    // Q2 = Q1 * (P1 - target) / (target - P2)
    let numerator = mul(
        quantity,
        sub(current_average, desired_average, "target quantity")?,
        "target quantity",
    )?;
    let required = div(
        numerator,
        sub(desired_average, new_price, "target quantity")?,
        "target quantity",
    )?
    .abs();
    let buy_quantity = required.ceil();

    Ok(TargetAverageReport::Achievable {
        buy_quantity,
        investment: mul(buy_quantity, new_price, "target investment")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn averages_only_valid_rows() {
        let entries = [
            StockEntry::new(dec!(10), dec!(100)),
            StockEntry::new(dec!(20), dec!(130)),
            StockEntry::new(dec!(0), dec!(50)),
            StockEntry::new(dec!(5), dec!(-3)),
        ];
        let report = stock_average(&entries).unwrap();
        assert_eq!(report.total_quantity, dec!(30));
        assert_eq!(report.total_cost, dec!(3600));
        assert_eq!(report.average_price, dec!(120));
    }

    #[test]
    fn no_valid_rows_hides_the_panel() {
        let entries = [StockEntry::default(), StockEntry::new(dec!(3), dec!(0))];
        assert_eq!(
            stock_average(&entries),
            Err(CalcError::Incomplete("stock average"))
        );
        assert!(stock_average(&[]).unwrap_err().is_incomplete());
    }

    #[test]
    fn row_invested_ignores_validity() {
        assert_eq!(StockEntry::new(dec!(5), dec!(-3)).invested(), dec!(-15));
        assert_eq!(StockEntry::new(dec!(2.5), dec!(40)).invested(), dec!(100));
    }

    #[test]
    fn row_invested_saturates_by_sign() {
        assert_eq!(StockEntry::new(dec!(5e28), dec!(10)).invested(), Decimal::MAX);
        assert_eq!(StockEntry::new(dec!(5e28), dec!(-10)).invested(), Decimal::MIN);
        assert_eq!(StockEntry::new(dec!(-5e28), dec!(-10)).invested(), Decimal::MAX);
    }

    #[test]
    fn averaging_down_rounds_up_to_whole_shares() {
        let report = target_average(dec!(100), dec!(200), dec!(150), dec!(180)).unwrap();
        assert_eq!(
            report,
            TargetAverageReport::Achievable {
                buy_quantity: dec!(67),
                investment: dec!(10050),
            }
        );
    }

    #[test]
    fn averaging_up() {
        let report = target_average(dec!(10), dec!(100), dec!(200), dec!(150)).unwrap();
        assert_eq!(
            report,
            TargetAverageReport::Achievable {
                buy_quantity: dec!(10),
                investment: dec!(2000),
            }
        );
    }

    #[test]
    fn unreachable_targets_explain_themselves() {
        let below_new = target_average(dec!(10), dec!(200), dec!(150), dec!(140)).unwrap();
        assert_eq!(
            below_new,
            TargetAverageReport::Unreachable { hint: TargetHint::MustBeAboveNewPrice }
        );

        let above_new = target_average(dec!(10), dec!(100), dec!(200), dec!(250)).unwrap();
        assert_eq!(
            above_new,
            TargetAverageReport::Unreachable { hint: TargetHint::MustBeBelowNewPrice }
        );

        let flat = target_average(dec!(10), dec!(100), dec!(100), dec!(120)).unwrap();
        assert_eq!(
            flat,
            TargetAverageReport::Unreachable { hint: TargetHint::Impossible }
        );
        assert_eq!(
            TargetHint::Impossible.message(),
            "Impossible to achieve this average with the current new price."
        );
    }

    #[test]
    fn target_with_extreme_prices_overflows() {
        assert_eq!(
            target_average(dec!(1), dec!(7e28), dec!(-7e28), dec!(-1e28)),
            Err(CalcError::Overflow("target quantity"))
        );
    }

    #[test]
    fn target_requires_every_field() {
        assert!(target_average(dec!(0), dec!(100), dec!(90), dec!(95))
            .unwrap_err()
            .is_incomplete());
    }
}
