use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_origination_core::amortization::{
    self, DueDateConvention, LoanTerms, RepaymentScheduleInput,
};

use crate::input;

/// Arguments for the monthly payment calculation
#[derive(Args)]
pub struct CalculateArgs {
    /// Path to JSON input file with loan terms (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (12 = 12%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in monthly periods
    #[arg(long)]
    pub term: Option<u32>,
}

pub fn run_calculate(args: CalculateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: LoanTerms = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        terms_from_flags(args.principal, args.rate, args.term)?
    };

    let result = amortization::calculate_loan(&terms)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the repayment schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON input file (terms, start_date, convention)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (12 = 12%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in monthly periods
    #[arg(long)]
    pub term: Option<u32>,

    /// Schedule start date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Step due dates by calendar month instead of 30 days
    #[arg(long)]
    pub calendar_months: bool,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let schedule_input: RepaymentScheduleInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let convention = if args.calendar_months {
            DueDateConvention::CalendarMonth
        } else {
            DueDateConvention::ThirtyDay
        };
        RepaymentScheduleInput {
            terms: terms_from_flags(args.principal, args.rate, args.term)?,
            start_date: args
                .start_date
                .unwrap_or_else(|| chrono::Local::now().date_naive()),
            convention,
        }
    };

    let result = amortization::repayment_schedule(&schedule_input)?;
    Ok(serde_json::to_value(result)?)
}

fn terms_from_flags(
    principal: Option<Decimal>,
    rate: Option<Decimal>,
    term: Option<u32>,
) -> Result<LoanTerms, Box<dyn std::error::Error>> {
    let principal = principal.ok_or("--principal is required (or provide --input)")?;
    let rate = rate.ok_or("--rate is required (or provide --input)")?;
    let term = term.ok_or("--term is required (or provide --input)")?;
    Ok(LoanTerms {
        principal,
        annual_rate_percent: rate,
        term_periods: term,
    })
}
