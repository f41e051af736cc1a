use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LoanError;
use crate::time_value;
use crate::types::{Money, Percent, Rate};
use crate::LoanResult;

/// Principal, annual rate and monthly term of a level-payment loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// Annual rate as a percentage: 12 means 12% per annum.
    pub annual_rate_percent: Percent,
    /// Number of monthly periods.
    pub term_periods: u32,
}

impl LoanTerms {
    /// Build validated terms.
    pub fn new(
        principal: Money,
        annual_rate_percent: Percent,
        term_periods: u32,
    ) -> LoanResult<Self> {
        let terms = LoanTerms {
            principal,
            annual_rate_percent,
            term_periods,
        };
        terms.validate()?;
        Ok(terms)
    }

    /// Check the arithmetic preconditions of the amortization formulas.
    pub fn validate(&self) -> LoanResult<()> {
        if self.principal <= Decimal::ZERO {
            return Err(LoanError::terms("principal", "Principal must be positive"));
        }
        if self.term_periods == 0 {
            return Err(LoanError::terms(
                "term_periods",
                "Term must be at least 1 period",
            ));
        }
        if self.annual_rate_percent < Decimal::ZERO {
            return Err(LoanError::terms(
                "annual_rate_percent",
                "Annual interest rate cannot be negative",
            ));
        }
        Ok(())
    }

    /// Monthly decimal rate: `annual_rate_percent / 100 / 12`.
    pub fn periodic_rate(&self) -> Rate {
        time_value::periodic_rate(self.annual_rate_percent)
    }
}
