use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanError {
    #[error("Invalid loan terms: {field} — {reason}")]
    InvalidLoanTerms { field: String, reason: String },

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid status transition: cannot move loan from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Arithmetic overflow in {context}")]
    ArithmeticOverflow { context: String },

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl LoanError {
    pub(crate) fn terms(field: &str, reason: impl Into<String>) -> Self {
        LoanError::InvalidLoanTerms {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn overflow(context: impl Into<String>) -> Self {
        LoanError::ArithmeticOverflow {
            context: context.into(),
        }
    }

    pub(crate) fn input(field: &str, reason: impl Into<String>) -> Self {
        LoanError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for LoanError {
    fn from(e: serde_json::Error) -> Self {
        LoanError::Serialization(e.to_string())
    }
}
