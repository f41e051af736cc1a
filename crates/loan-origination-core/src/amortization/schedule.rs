use chrono::{Duration, Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::payment::compute_periodic_payment;
use crate::amortization::terms::LoanTerms;
use crate::error::LoanError;
use crate::time_value;
use crate::types::*;
use crate::LoanResult;

/// Days between consecutive due dates under the thirty-day convention.
pub const DAYS_PER_PERIOD: i64 = 30;

/// Largest residual balance reported without a warning.
const RESIDUAL_TOLERANCE: Money = dec!(0.005);

/// How due dates are stepped from the schedule start date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueDateConvention {
    /// `start + n * 30 days`.
    #[default]
    ThirtyDay,
    /// `start + n months`, clamped to the last day of short months.
    CalendarMonth,
}

impl DueDateConvention {
    fn due_date(self, start_date: NaiveDate, period_index: u32) -> LoanResult<NaiveDate> {
        let due = match self {
            DueDateConvention::ThirtyDay => {
                let offset = Duration::days(DAYS_PER_PERIOD * i64::from(period_index));
                start_date.checked_add_signed(offset)
            }
            DueDateConvention::CalendarMonth => {
                start_date.checked_add_months(Months::new(period_index))
            }
        };
        due.ok_or_else(|| {
            LoanError::DateOutOfRange(format!(
                "due date for period {period_index} after {start_date} is not representable"
            ))
        })
    }
}

/// One instalment of a repayment schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub period_index: u32,
    pub due_date: NaiveDate,
    pub interest_component: Money,
    pub principal_component: Money,
    pub payment_amount: Money,
    pub remaining_balance: Money,
}

/// Period-by-period schedule with thirty-day due dates.
///
/// Balances are carried at full precision. The final balance may differ from
/// zero by a rounding residual which is returned as-is.
pub fn build_repayment_schedule(
    terms: &LoanTerms,
    start_date: NaiveDate,
) -> LoanResult<Vec<ScheduleEntry>> {
    build_repayment_schedule_with(terms, start_date, DueDateConvention::ThirtyDay)
}

/// Period-by-period schedule with an explicit due date convention.
pub fn build_repayment_schedule_with(
    terms: &LoanTerms,
    start_date: NaiveDate,
    convention: DueDateConvention,
) -> LoanResult<Vec<ScheduleEntry>> {
    let payment = compute_periodic_payment(terms)?;
    let rate = terms.periodic_rate();

    let mut entries = Vec::with_capacity(terms.term_periods as usize);
    let mut balance = terms.principal;

    for period_index in 1..=terms.term_periods {
        let interest = balance
            .checked_mul(rate)
            .ok_or_else(|| LoanError::overflow(format!("interest for period {period_index}")))?;
        let principal_component = payment - interest;
        balance = balance
            .checked_sub(principal_component)
            .ok_or_else(|| LoanError::overflow(format!("balance after period {period_index}")))?;

        entries.push(ScheduleEntry {
            period_index,
            due_date: convention.due_date(start_date, period_index)?,
            interest_component: interest,
            principal_component,
            payment_amount: payment,
            remaining_balance: balance,
        });
    }

    tracing::debug!(
        periods = entries.len(),
        residual = %balance,
        ?convention,
        "built repayment schedule"
    );
    Ok(entries)
}

/// Input for a full repayment schedule report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepaymentScheduleInput {
    pub terms: LoanTerms,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub convention: DueDateConvention,
}

/// Repayment schedule with borrower-facing totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepaymentScheduleOutput {
    pub convention: DueDateConvention,
    pub periodic_payment: Money,
    pub total_payments: Money,
    pub total_interest: Money,
    pub total_principal: Money,
    /// Unclamped balance left after the final instalment.
    pub residual_balance: Money,
    pub entries: Vec<ScheduleEntry>,
}

/// Build the schedule and summarise it. Totals are rounded to cents;
/// entries keep full precision.
pub fn repayment_schedule(
    input: &RepaymentScheduleInput,
) -> LoanResult<ComputationOutput<RepaymentScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let terms = &input.terms;
    let entries = build_repayment_schedule_with(terms, input.start_date, input.convention)?;

    let mut total_payments = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;
    let mut total_principal = Decimal::ZERO;
    for e in &entries {
        total_payments = checked_total(total_payments, e.payment_amount, "total payments")?;
        total_interest = checked_total(total_interest, e.interest_component, "total interest")?;
        total_principal += e.principal_component;
    }

    let (periodic_payment, residual_balance) = match entries.last() {
        Some(last) => (last.payment_amount, last.remaining_balance),
        None => (Decimal::ZERO, terms.principal),
    };

    if residual_balance.abs() > RESIDUAL_TOLERANCE {
        warnings.push(format!(
            "Residual balance of {} after final period exceeds half a cent",
            residual_balance.round_dp(6)
        ));
    }
    if terms.annual_rate_percent > Decimal::ZERO
        && time_value::round_money(total_interest).is_zero()
    {
        warnings.push(
            "Interest rate accrues less than a cent over the term; schedule is effectively straight-line"
                .into(),
        );
    }
    if input.convention == DueDateConvention::CalendarMonth {
        warnings.push("Due dates stepped by calendar month instead of 30-day periods".into());
    }

    let output = RepaymentScheduleOutput {
        convention: input.convention,
        periodic_payment: time_value::round_money(periodic_payment),
        total_payments: time_value::round_money(total_payments),
        total_interest: time_value::round_money(total_interest),
        total_principal: time_value::round_money(total_principal),
        residual_balance,
        entries,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment amortization schedule",
        &serde_json::json!({
            "principal": terms.principal.to_string(),
            "annual_rate_percent": terms.annual_rate_percent.to_string(),
            "term_periods": terms.term_periods,
            "start_date": input.start_date.to_string(),
            "convention": input.convention,
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn checked_total(total: Money, amount: Money, context: &str) -> LoanResult<Money> {
    total
        .checked_add(amount)
        .ok_or_else(|| LoanError::overflow(context))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
    }

    fn standard_terms() -> LoanTerms {
        LoanTerms {
            principal: dec!(10000),
            annual_rate_percent: dec!(12),
            term_periods: 12,
        }
    }

    #[test]
    fn test_schedule_length_and_order() {
        let sched = build_repayment_schedule(&standard_terms(), start()).unwrap();
        assert_eq!(sched.len(), 12);
        let indices: Vec<u32> = sched.iter().map(|e| e.period_index).collect();
        assert_eq!(indices, (1..=12).collect::<Vec<u32>>());
    }

    #[test]
    fn test_first_period_split() {
        let sched = build_repayment_schedule(&standard_terms(), start()).unwrap();
        let first = &sched[0];
        // Interest on 10,000 at 1% = 100
        assert_eq!(first.interest_component, dec!(100));
        assert_eq!(
            first.principal_component,
            first.payment_amount - dec!(100)
        );
        assert_eq!(
            first.remaining_balance,
            dec!(10000) - first.principal_component
        );
    }

    #[test]
    fn test_thirty_day_due_dates() {
        let sched = build_repayment_schedule(&standard_terms(), start()).unwrap();
        assert_eq!(sched[0].due_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(sched[1].due_date, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        assert_eq!(
            sched[11].due_date,
            start() + Duration::days(360)
        );
    }

    #[test]
    fn test_calendar_month_due_dates_clamp_to_month_end() {
        let sched =
            build_repayment_schedule_with(&standard_terms(), start(), DueDateConvention::CalendarMonth)
                .unwrap();
        assert_eq!(sched[0].due_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(sched[1].due_date, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        assert_eq!(sched[11].due_date, NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
    }

    #[test]
    fn test_interest_declines_principal_rises() {
        let sched = build_repayment_schedule(&standard_terms(), start()).unwrap();
        for pair in sched.windows(2) {
            assert!(pair[1].interest_component < pair[0].interest_component);
            assert!(pair[1].principal_component > pair[0].principal_component);
        }
    }

    #[test]
    fn test_zero_rate_schedule() {
        let terms = LoanTerms {
            principal: dec!(1200),
            annual_rate_percent: Decimal::ZERO,
            term_periods: 12,
        };
        let sched = build_repayment_schedule(&terms, start()).unwrap();
        for e in &sched {
            assert_eq!(e.interest_component, Decimal::ZERO);
            assert_eq!(e.principal_component, dec!(100));
        }
        assert_eq!(sched[11].remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_due_date_overflow() {
        let terms = LoanTerms {
            principal: dec!(1000),
            annual_rate_percent: dec!(5),
            term_periods: 12,
        };
        let err = build_repayment_schedule(&terms, NaiveDate::MAX).unwrap_err();
        assert!(matches!(err, LoanError::DateOutOfRange(_)));
    }

    #[test]
    fn test_overflowing_growth_schedule_is_interest_only() {
        // 12,000% a year is 1,000% a month; (1 + 10)^360 overflows
        let terms = LoanTerms {
            principal: dec!(100),
            annual_rate_percent: dec!(12000),
            term_periods: 360,
        };
        let sched = build_repayment_schedule(&terms, start()).unwrap();
        assert_eq!(sched.len(), 360);
        for e in &sched {
            assert_eq!(e.payment_amount, dec!(1000));
            assert_eq!(e.interest_component, dec!(1000));
            assert_eq!(e.principal_component, Decimal::ZERO);
        }
        assert_eq!(sched[359].remaining_balance, dec!(100));

        let out = repayment_schedule(&RepaymentScheduleInput {
            terms,
            start_date: start(),
            convention: DueDateConvention::ThirtyDay,
        })
        .unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("Residual balance")));
    }

    #[test]
    fn test_unrepresentable_payment_is_error_not_panic() {
        let terms = LoanTerms {
            principal: dec!(10000000000000000000000000000),
            annual_rate_percent: dec!(12000),
            term_periods: 360,
        };
        let err = build_repayment_schedule(&terms, start()).unwrap_err();
        assert!(matches!(err, LoanError::ArithmeticOverflow { .. }));

        let input = RepaymentScheduleInput {
            terms,
            start_date: start(),
            convention: DueDateConvention::ThirtyDay,
        };
        assert!(matches!(
            repayment_schedule(&input),
            Err(LoanError::ArithmeticOverflow { .. })
        ));
    }

    #[test]
    fn test_report_total_payments_overflow() {
        // Interest-only payment of 6e27 per period cannot be totalled over 360 periods
        let input = RepaymentScheduleInput {
            terms: LoanTerms {
                principal: dec!(6000000000000000000000000000),
                annual_rate_percent: dec!(1200),
                term_periods: 360,
            },
            start_date: start(),
            convention: DueDateConvention::ThirtyDay,
        };
        assert!(matches!(
            repayment_schedule(&input),
            Err(LoanError::ArithmeticOverflow { .. })
        ));
    }

    #[test]
    fn test_report_totals() {
        let input = RepaymentScheduleInput {
            terms: standard_terms(),
            start_date: start(),
            convention: DueDateConvention::default(),
        };
        let out = repayment_schedule(&input).unwrap();
        let r = &out.result;
        assert_eq!(r.periodic_payment, dec!(888.49));
        assert_eq!(r.total_principal, dec!(10000));
        // 888.48788678... * 12 = 10661.85464...
        assert_eq!(r.total_payments, dec!(10661.85));
        assert_eq!(r.total_interest, dec!(661.85));
        assert!(r.residual_balance.abs() < dec!(0.01));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_report_flags_calendar_convention() {
        let input = RepaymentScheduleInput {
            terms: standard_terms(),
            start_date: start(),
            convention: DueDateConvention::CalendarMonth,
        };
        let out = repayment_schedule(&input).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.assumptions["convention"], "calendar_month");
    }

    #[test]
    fn test_report_input_defaults_convention() {
        let input: RepaymentScheduleInput = serde_json::from_str(
            r#"{"terms": {"principal": "1000", "annual_rate_percent": "6", "term_periods": 6},
                "start_date": "2024-05-01"}"#,
        )
        .unwrap();
        assert_eq!(input.convention, DueDateConvention::ThirtyDay);
    }
}
