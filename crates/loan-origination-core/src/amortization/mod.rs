pub mod payment;
pub mod schedule;
pub mod terms;

pub use payment::{calculate_loan, compute_periodic_payment, compute_total_repayment, LoanSummary};
pub use schedule::{
    build_repayment_schedule, build_repayment_schedule_with, repayment_schedule,
    DueDateConvention, RepaymentScheduleInput, RepaymentScheduleOutput, ScheduleEntry,
};
pub use terms::LoanTerms;
