pub mod loan;
pub mod origination;
