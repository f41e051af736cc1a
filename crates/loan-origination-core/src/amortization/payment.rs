use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::terms::LoanTerms;
use crate::error::LoanError;
use crate::time_value;
use crate::types::*;
use crate::LoanResult;

/// Borrower-facing payment summary, amounts rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub monthly_payment: Money,
    pub total_repayment: Money,
    pub total_interest: Money,
    pub periodic_rate: Rate,
}

/// Fixed monthly payment that amortises the loan, at full precision.
pub fn compute_periodic_payment(terms: &LoanTerms) -> LoanResult<Money> {
    terms.validate()?;
    let rate = terms.periodic_rate();
    let payment = time_value::annuity_payment(terms.principal, rate, terms.term_periods)?;
    tracing::debug!(
        principal = %terms.principal,
        %rate,
        term = terms.term_periods,
        %payment,
        "computed periodic payment"
    );
    Ok(payment)
}

/// Sum of all level payments. Fails only when the total is not representable.
pub fn compute_total_repayment(payment: Money, term_periods: u32) -> LoanResult<Money> {
    payment
        .checked_mul(Decimal::from(term_periods))
        .ok_or_else(|| LoanError::overflow("total repayment"))
}

/// Monthly payment and total repayment, rounded at the boundary.
///
/// The total is the rounded payment times the term, so it always equals what
/// the borrower pays if every instalment is collected at the displayed amount.
pub fn calculate_loan(terms: &LoanTerms) -> LoanResult<ComputationOutput<LoanSummary>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let payment = compute_periodic_payment(terms)?;
    let monthly_payment = time_value::round_money(payment);
    let total_repayment =
        time_value::round_money(compute_total_repayment(monthly_payment, terms.term_periods)?);
    let total_interest = total_repayment - terms.principal;

    if total_interest < Decimal::ZERO {
        warnings.push(format!(
            "Rounded instalments repay {total_repayment}, short of principal {}",
            terms.principal
        ));
    }

    let output = LoanSummary {
        monthly_payment,
        total_repayment,
        total_interest,
        periodic_rate: terms.periodic_rate(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment annuity (monthly compounding)",
        &serde_json::json!({
            "principal": terms.principal.to_string(),
            "annual_rate_percent": terms.annual_rate_percent.to_string(),
            "term_periods": terms.term_periods,
            "rounding": "2dp, half-even, applied to payment before totalling",
        }),
        warnings,
        elapsed,
        output,
    ))
}
