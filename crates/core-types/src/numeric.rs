//! Lenient number parsing for user-typed input fields.
//!
//! A field is read the way a browser's `parseFloat` reads it: leading
//! whitespace is skipped, then the longest numeric prefix is taken and the
//! rest is ignored. Anything that does not start with a number is absent.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parses the numeric prefix of `raw`, or `None` if there is none.
pub fn parse_number(raw: Option<&str>) -> Option<Decimal> {
    let text = raw?.trim_start();
    let bytes = text.as_bytes();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_digits = &text[int_start..pos];

    let mut frac_digits = "";
    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut end = frac_start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        frac_digits = &text[frac_start..end];
        pos = end;
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let mut exponent = None;
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut end = pos + 1;
        if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
            end += 1;
        }
        let digits_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        // A dangling "e" is not part of the number.
        if end > digits_start {
            exponent = Some(&text[pos + 1..end]);
        }
    }

    let mut normalized = String::with_capacity(text.len() + 2);
    if negative {
        normalized.push('-');
    }
    normalized.push_str(if int_digits.is_empty() { "0" } else { int_digits });
    if !frac_digits.is_empty() {
        normalized.push('.');
        normalized.push_str(frac_digits);
    }

    let parsed = match exponent {
        Some(exp) => {
            normalized.push('e');
            normalized.push_str(exp);
            Decimal::from_scientific(&normalized)
        }
        None => Decimal::from_str(&normalized),
    };

    match parsed {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(input = text, error = %e, "Numeric input out of range, treating as absent.");
            None
        }
    }
}

/// Parses `raw`, treating absent or non-numeric input as zero.
pub fn number_or_zero(raw: Option<&str>) -> Decimal {
    parse_number(raw).unwrap_or(Decimal::ZERO)
}
