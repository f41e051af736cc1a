use chrono::NaiveDate;
use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use loan_origination_core::amortization::{
    self, DueDateConvention, LoanTerms, RepaymentScheduleInput,
};
use loan_origination_core::origination::{self, ReviewInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Schedule request from the frontend; the start date defaults to today.
#[derive(Deserialize)]
struct ScheduleRequest {
    terms: LoanTerms,
    #[serde(default)]
    start_date: Option<NaiveDate>,
    #[serde(default)]
    convention: DueDateConvention,
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_loan(input_json: String) -> NapiResult<String> {
    let terms: LoanTerms = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::calculate_loan(&terms).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn repayment_schedule(input_json: String) -> NapiResult<String> {
    let request: ScheduleRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let input = RepaymentScheduleInput {
        terms: request.terms,
        start_date: request
            .start_date
            .unwrap_or_else(|| chrono::Local::now().date_naive()),
        convention: request.convention,
    };
    let output = amortization::repayment_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Origination
// ---------------------------------------------------------------------------

#[napi]
pub fn review_application(input_json: String) -> NapiResult<String> {
    let input: ReviewInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = origination::review_application(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
