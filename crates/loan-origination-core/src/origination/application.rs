use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::amortization::terms::LoanTerms;
use crate::error::LoanError;
use crate::types::*;
use crate::LoanResult;

/// Review state of a loan application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LoanStatus::Pending => "pending",
            LoanStatus::Approved => "approved",
            LoanStatus::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// Fields a borrower submits when applying.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanApplicationRequest {
    pub applicant: String,
    pub loan_amount: Money,
    pub loan_type: String,
    pub annual_interest_rate: Percent,
    pub loan_term: u32,
    pub employment_details: String,
}

/// Partial edit of a pending application. Rate and term are fixed at submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoanApplicationUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_details: Option<String>,
}

/// A submitted loan application and its review state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub applicant: String,
    pub loan_amount: Money,
    pub loan_type: String,
    pub annual_interest_rate: Percent,
    pub loan_term: u32,
    pub employment_details: String,
    #[serde(default)]
    pub status: LoanStatus,
}

impl LoanApplication {
    /// Validate a request and open a pending application.
    pub fn submit(request: LoanApplicationRequest) -> LoanResult<Self> {
        if request.applicant.trim().is_empty() {
            return Err(LoanError::input("applicant", "Applicant name is required"));
        }
        if request.loan_type.trim().is_empty() {
            return Err(LoanError::input("loan_type", "Loan type is required"));
        }
        validate_amount(request.loan_amount)?;
        if request.annual_interest_rate < Decimal::ZERO {
            return Err(LoanError::input(
                "annual_interest_rate",
                "Annual interest rate cannot be negative",
            ));
        }
        if request.loan_term == 0 {
            return Err(LoanError::input(
                "loan_term",
                "Loan term must be at least 1 month",
            ));
        }

        tracing::debug!(applicant = %request.applicant, amount = %request.loan_amount, "loan application submitted");
        Ok(LoanApplication {
            applicant: request.applicant,
            loan_amount: request.loan_amount,
            loan_type: request.loan_type,
            annual_interest_rate: request.annual_interest_rate,
            loan_term: request.loan_term,
            employment_details: request.employment_details,
            status: LoanStatus::Pending,
        })
    }

    /// Amortization terms of this application, field by field.
    pub fn terms(&self) -> LoanResult<LoanTerms> {
        LoanTerms::new(self.loan_amount, self.annual_interest_rate, self.loan_term)
    }

    /// Approve a pending application, returning the terms of the booked loan.
    pub fn approve(&mut self) -> LoanResult<LoanTerms> {
        self.ensure_pending(LoanStatus::Approved)?;
        let terms = self.terms()?;
        self.status = LoanStatus::Approved;
        tracing::info!(applicant = %self.applicant, "loan application approved");
        Ok(terms)
    }

    /// Reject a pending application.
    pub fn reject(&mut self) -> LoanResult<()> {
        self.ensure_pending(LoanStatus::Rejected)?;
        self.status = LoanStatus::Rejected;
        tracing::info!(applicant = %self.applicant, "loan application rejected");
        Ok(())
    }

    /// Apply a borrower edit. Decided applications are frozen. Every field is
    /// validated before any is written, so a rejected edit changes nothing.
    pub fn apply_update(&mut self, update: LoanApplicationUpdate) -> LoanResult<()> {
        if self.status != LoanStatus::Pending {
            return Err(LoanError::input(
                "status",
                format!("Cannot edit a loan application that is {}", self.status),
            ));
        }
        if let Some(amount) = update.loan_amount {
            validate_amount(amount)?;
        }
        if let Some(ref loan_type) = update.loan_type {
            if loan_type.trim().is_empty() {
                return Err(LoanError::input("loan_type", "Loan type is required"));
            }
        }

        if let Some(amount) = update.loan_amount {
            self.loan_amount = amount;
        }
        if let Some(loan_type) = update.loan_type {
            self.loan_type = loan_type;
        }
        if let Some(details) = update.employment_details {
            self.employment_details = details;
        }
        Ok(())
    }

    fn ensure_pending(&self, to: LoanStatus) -> LoanResult<()> {
        if self.status == LoanStatus::Pending {
            Ok(())
        } else {
            Err(LoanError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: to.to_string(),
            })
        }
    }
}

fn validate_amount(amount: Money) -> LoanResult<()> {
    if amount <= Decimal::ZERO {
        return Err(LoanError::input("loan_amount", "Loan amount must be positive"));
    }
    Ok(())
}

/// Admin decision on a pending application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject,
}

/// Input for an admin review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewInput {
    pub application: LoanApplication,
    pub decision: Decision,
}

/// Reviewed application; approved loans carry their booked terms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewOutput {
    pub application: LoanApplication,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_terms: Option<LoanTerms>,
}

/// Apply an admin decision to an application.
pub fn review_application(input: &ReviewInput) -> LoanResult<ComputationOutput<ReviewOutput>> {
    let start = Instant::now();
    let mut application = input.application.clone();

    let approved_terms = match input.decision {
        Decision::Approve => Some(application.approve()?),
        Decision::Reject => {
            application.reject()?;
            None
        }
    };

    let output = ReviewOutput {
        application,
        approved_terms,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Loan application review",
        &serde_json::json!({
            "decision": input.decision,
            "previous_status": input.application.status,
        }),
        Vec::new(),
        elapsed,
        output,
    ))
}
