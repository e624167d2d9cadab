use crate::error::CoreError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The formula family used to derive pivot support and resistance levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PivotMethod {
    #[default]
    Classic,
    Woodie,
    Camarilla,
    Fibonacci,
}

impl PivotMethod {
    pub const ALL: [PivotMethod; 4] = [
        PivotMethod::Classic,
        PivotMethod::Woodie,
        PivotMethod::Camarilla,
        PivotMethod::Fibonacci,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PivotMethod::Classic => "classic",
            PivotMethod::Woodie => "woodie",
            PivotMethod::Camarilla => "camarilla",
            PivotMethod::Fibonacci => "fibonacci",
        }
    }
}

impl fmt::Display for PivotMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PivotMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "classic" => Ok(PivotMethod::Classic),
            "woodie" => Ok(PivotMethod::Woodie),
            "camarilla" => Ok(PivotMethod::Camarilla),
            "fibonacci" => Ok(PivotMethod::Fibonacci),
            other => Err(CoreError::UnknownPivotMethod(other.to_string())),
        }
    }
}

/// Which side of the pivot a level sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelKind {
    Resistance,
    Pivot,
    Support,
}

/// The visual emphasis of a displayed value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Neutral,
    Profit,
    Loss,
    Primary,
    Muted,
}

impl Tone {
    /// Negative amounts are losses; zero and above count as profit.
    pub fn for_amount(amount: Decimal) -> Self {
        if amount.is_sign_negative() && !amount.is_zero() {
            Tone::Loss
        } else {
            Tone::Profit
        }
    }
}
