//! Approval orchestration.
//!
//! - [`classify`]: map raw wallet/chain failures onto a closed [`ErrorKind`] set
//! - [`outcome`]: the lifecycle of a submitted approval
//! - [`approve`]: the user-triggered approval flow and allowance check

pub mod allowance;
pub mod approve;
pub mod classify;
pub mod outcome;

pub use approve::{ApprovalAmount, ApprovalRequest, ApproveParams, Approver};
pub use classify::{classify, Classified, ErrorKind, Rule, RULES};
pub use outcome::TransactionOutcome;
