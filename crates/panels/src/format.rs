//! Number formatting in the en-IN style: the last three integer digits form one
//! group and the rest are grouped in pairs (`1,23,45,678`).

use rust_decimal::{Decimal, RoundingStrategy};

const RUPEE: &str = "₹";

fn round2(value: Decimal) -> Decimal {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    // -0.001 rounds to a negative zero; show it as plain zero.
    if rounded.is_zero() { Decimal::ZERO } else { rounded }
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

fn split_sign(value: Decimal) -> (&'static str, Decimal) {
    if value.is_sign_negative() && !value.is_zero() {
        ("-", value.abs())
    } else {
        ("", value)
    }
}

/// Currency with exactly two fraction digits: `₹1,00,000.00`, `-₹42.50`.
pub fn format_inr(value: Decimal) -> String {
    let (sign, magnitude) = split_sign(round2(value));
    let text = format!("{:.2}", magnitude);
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{sign}{RUPEE}{}.{frac_part}", group_indian(int_part))
}

/// Grouped number with up to two fraction digits and no trailing zeros:
/// `1,00,000`, `1,234.5`.
pub fn format_grouped(value: Decimal) -> String {
    let (sign, magnitude) = split_sign(round2(value));
    let text = magnitude.normalize().to_string();
    match text.split_once('.') {
        Some((int_part, frac_part)) => format!("{sign}{}.{frac_part}", group_indian(int_part)),
        None => format!("{sign}{}", group_indian(&text)),
    }
}

/// Percentage with two decimals: `19.58%`.
pub fn format_pct(value: Decimal) -> String {
    format!("{:.2}%", round2(value))
}

/// Two decimals, no grouping or symbol: `30.00`.
pub fn format_fixed2(value: Decimal) -> String {
    format!("{:.2}", round2(value))
}

/// The shortest plain representation: `30`, `2.5`.
pub fn format_plain(value: Decimal) -> String {
    value.normalize().to_string()
}
