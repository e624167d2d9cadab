use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    /// A required field is missing or zero. Callers hide the result panel.
    #[error("Not enough input to calculate {0}")]
    Incomplete(&'static str),

    #[error("Calculation overflowed while computing {0}")]
    Overflow(&'static str),

    #[error("Result is undefined: {0}")]
    Undefined(String),
}

impl CalcError {
    pub fn is_incomplete(&self) -> bool {
        matches!(self, CalcError::Incomplete(_))
    }
}
