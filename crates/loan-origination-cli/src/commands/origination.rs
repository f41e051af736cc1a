use clap::{Args, ValueEnum};
use serde_json::Value;

use loan_origination_core::origination::{self, Decision, LoanApplication, ReviewInput};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DecisionArg {
    Approve,
    Reject,
}

impl From<DecisionArg> for Decision {
    fn from(arg: DecisionArg) -> Self {
        match arg {
            DecisionArg::Approve => Decision::Approve,
            DecisionArg::Reject => Decision::Reject,
        }
    }
}

/// Arguments for reviewing a loan application
#[derive(Args)]
pub struct ReviewArgs {
    /// Path to JSON file holding the loan application
    #[arg(long)]
    pub input: Option<String>,

    /// Decision to apply
    #[arg(long)]
    pub decision: DecisionArg,
}

pub fn run_review(args: ReviewArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let application: LoanApplication = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <application.json> or stdin required for review".into());
    };

    let review = ReviewInput {
        application,
        decision: args.decision.into(),
    };
    let result = origination::review_application(&review)?;
    Ok(serde_json::to_value(result)?)
}
