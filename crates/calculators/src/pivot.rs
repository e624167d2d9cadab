use crate::error::CalcError;
use crate::math::{add, div, mul, sub};
use core_types::{LevelKind, PivotMethod};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// A single support, resistance or pivot level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotLevel {
    pub kind: LevelKind,
    /// 1 for R1/S1, 2 for R2/S2, ...; 0 for the pivot itself.
    pub rank: u8,
    pub value: Decimal,
}

impl PivotLevel {
    fn resistance(rank: u8, value: Decimal) -> Self {
        Self { kind: LevelKind::Resistance, rank, value }
    }

    fn support(rank: u8, value: Decimal) -> Self {
        Self { kind: LevelKind::Support, rank, value }
    }

    pub fn label(&self) -> String {
        match self.kind {
            LevelKind::Resistance => format!("Resistance {}", self.rank),
            LevelKind::Pivot => "Pivot Point".to_string(),
            LevelKind::Support => format!("Support {}", self.rank),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotReport {
    pub method: PivotMethod,
    pub pivot: Decimal,
    /// Ordered top-down: highest resistance first, lowest support last.
    pub levels: Vec<PivotLevel>,
}

/// Derives pivot levels from the previous session's high, low and close.
///
/// `open` is accepted for completeness; none of the supported methods use it.
pub fn pivot_points(
    high: Decimal,
    low: Decimal,
    close: Decimal,
    _open: Decimal,
    method: PivotMethod,
) -> Result<PivotReport, CalcError> {
    if high.is_zero() || low.is_zero() || close.is_zero() {
        return Err(CalcError::Incomplete("pivot points"));
    }

    const WHAT: &str = "pivot points";
    let range = sub(high, low, WHAT)?;
    let twice = |v: Decimal| mul(dec!(2), v, WHAT);
    let typical = || div(add(add(high, low, WHAT)?, close, WHAT)?, dec!(3), WHAT);

    let (pivot, resistances, supports): (Decimal, Vec<Decimal>, Vec<Decimal>) = match method {
        PivotMethod::Classic => {
            let pp = typical()?;
            (
                pp,
                vec![
                    sub(twice(pp)?, low, WHAT)?,
                    add(pp, range, WHAT)?,
                    add(high, twice(sub(pp, low, WHAT)?)?, WHAT)?,
                ],
                vec![
                    sub(twice(pp)?, high, WHAT)?,
                    sub(pp, range, WHAT)?,
                    sub(low, twice(sub(high, pp, WHAT)?)?, WHAT)?,
                ],
            )
        }
        PivotMethod::Woodie => {
            let weighted = add(add(high, low, WHAT)?, twice(close)?, WHAT)?;
            let pp = div(weighted, dec!(4), WHAT)?;
            (
                pp,
                vec![sub(twice(pp)?, low, WHAT)?, add(pp, range, WHAT)?],
                vec![sub(twice(pp)?, high, WHAT)?, sub(pp, range, WHAT)?],
            )
        }
        PivotMethod::Camarilla => {
            let pp = typical()?;
            let spread = mul(range, dec!(1.1), WHAT)?;
            let offsets = [dec!(12), dec!(6), dec!(4), dec!(2)].map(|d| spread / d);
            (
                pp,
                offsets
                    .iter()
                    .map(|o| add(close, *o, WHAT))
                    .collect::<Result<_, _>>()?,
                offsets
                    .iter()
                    .map(|o| sub(close, *o, WHAT))
                    .collect::<Result<_, _>>()?,
            )
        }
        PivotMethod::Fibonacci => {
            let pp = typical()?;
            let ratios = [dec!(0.382), dec!(0.618), dec!(1.000)];
            let steps = ratios
                .iter()
                .map(|r| mul(*r, range, WHAT))
                .collect::<Result<Vec<_>, _>>()?;
            (
                pp,
                steps
                    .iter()
                    .map(|s| add(pp, *s, WHAT))
                    .collect::<Result<_, _>>()?,
                steps
                    .iter()
                    .map(|s| sub(pp, *s, WHAT))
                    .collect::<Result<_, _>>()?,
            )
        }
    };

    // Camarilla always shows all eight levels; the other methods drop a level
    // that lands exactly on zero.
    let keep = |value: &Decimal| method == PivotMethod::Camarilla || !value.is_zero();

    let mut levels = Vec::with_capacity(resistances.len() + supports.len() + 1);
    for (idx, value) in resistances.iter().enumerate().rev() {
        if keep(value) {
            levels.push(PivotLevel::resistance(idx as u8 + 1, *value));
        }
    }
    levels.push(PivotLevel { kind: LevelKind::Pivot, rank: 0, value: pivot });
    for (idx, value) in supports.iter().enumerate() {
        if keep(value) {
            levels.push(PivotLevel::support(idx as u8 + 1, *value));
        }
    }

    Ok(PivotReport { method, pivot, levels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::assert_close;

    fn values(report: &PivotReport) -> Vec<(String, Decimal)> {
        report.levels.iter().map(|l| (l.label(), l.value)).collect()
    }

    #[test]
    fn classic_levels() {
        let report = pivot_points(dec!(110), dec!(90), dec!(100), dec!(0), PivotMethod::Classic).unwrap();
        assert_eq!(report.pivot, dec!(100));
        assert_eq!(
            values(&report),
            vec![
                ("Resistance 3".to_string(), dec!(130)),
                ("Resistance 2".to_string(), dec!(120)),
                ("Resistance 1".to_string(), dec!(110)),
                ("Pivot Point".to_string(), dec!(100)),
                ("Support 1".to_string(), dec!(90)),
                ("Support 2".to_string(), dec!(80)),
                ("Support 3".to_string(), dec!(70)),
            ]
        );
    }

    #[test]
    fn classic_drops_levels_at_zero() {
        let report = pivot_points(dec!(20), dec!(10), dec!(15), dec!(0), PivotMethod::Classic).unwrap();
        let labels: Vec<String> = report.levels.iter().map(PivotLevel::label).collect();
        assert!(!labels.contains(&"Support 3".to_string()));
        assert_eq!(report.levels.len(), 6);
    }

    #[test]
    fn woodie_weights_the_close() {
        let report = pivot_points(dec!(110), dec!(90), dec!(105), dec!(99), PivotMethod::Woodie).unwrap();
        assert_eq!(report.pivot, dec!(102.5));
        assert_eq!(
            values(&report),
            vec![
                ("Resistance 2".to_string(), dec!(122.5)),
                ("Resistance 1".to_string(), dec!(115)),
                ("Pivot Point".to_string(), dec!(102.5)),
                ("Support 1".to_string(), dec!(95)),
                ("Support 2".to_string(), dec!(82.5)),
            ]
        );
    }

    #[test]
    fn camarilla_has_four_levels_each_side() {
        let report = pivot_points(dec!(110), dec!(90), dec!(100), dec!(0), PivotMethod::Camarilla).unwrap();
        assert_eq!(report.levels.len(), 9);
        assert_eq!(report.levels[0].label(), "Resistance 4");
        assert_eq!(report.levels[0].value, dec!(111));
        assert_eq!(report.levels[1].value, dec!(105.5));
        assert_close(report.levels[2].value, dec!(103.6667), dec!(0.0001));
        assert_close(report.levels[3].value, dec!(101.8333), dec!(0.0001));
        assert_eq!(report.levels[4].kind, LevelKind::Pivot);
        assert_close(report.levels[5].value, dec!(98.1667), dec!(0.0001));
        assert_eq!(report.levels[8].label(), "Support 4");
        assert_eq!(report.levels[8].value, dec!(89));
    }

    #[test]
    fn fibonacci_ratios() {
        let report = pivot_points(dec!(110), dec!(90), dec!(100), dec!(0), PivotMethod::Fibonacci).unwrap();
        assert_eq!(
            values(&report),
            vec![
                ("Resistance 3".to_string(), dec!(120)),
                ("Resistance 2".to_string(), dec!(112.36)),
                ("Resistance 1".to_string(), dec!(107.64)),
                ("Pivot Point".to_string(), dec!(100)),
                ("Support 1".to_string(), dec!(92.36)),
                ("Support 2".to_string(), dec!(87.64)),
                ("Support 3".to_string(), dec!(80)),
            ]
        );
    }

    #[test]
    fn huge_prices_overflow_instead_of_panicking() {
        for method in [
            PivotMethod::Classic,
            PivotMethod::Woodie,
            PivotMethod::Camarilla,
            PivotMethod::Fibonacci,
        ] {
            assert_eq!(
                pivot_points(dec!(5e28), dec!(5e28), dec!(5e28), dec!(0), method),
                Err(CalcError::Overflow("pivot points"))
            );
        }
    }

    #[test]
    fn open_is_optional_but_high_low_close_are_not() {
        assert!(pivot_points(dec!(0), dec!(90), dec!(100), dec!(95), PivotMethod::Classic)
            .unwrap_err()
            .is_incomplete());
    }
}
