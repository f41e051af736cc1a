pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "origination")]
pub mod origination;

pub use error::LoanError;
pub use types::*;

/// Standard result type for all loan engine operations
pub type LoanResult<T> = Result<T, LoanError>;
