pub mod application;

pub use application::{
    review_application, Decision, LoanApplication, LoanApplicationRequest, LoanApplicationUpdate,
    LoanStatus, ReviewInput, ReviewOutput,
};
