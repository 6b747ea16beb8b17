//! Leave management for the leave engine.
//!
//! This module contains the leave ledger, annual balances and carryover,
//! and the leave request workflow that writes approved requests into the
//! ledger.

mod balance;
mod change;
mod ledger;
mod workflow;

pub use balance::DEFAULT_ANNUAL_HOURS;
pub use change::LeaveRequestChange;
pub use ledger::{LeaveEntry, LeaveLedger, VACATION_CODE};
pub use workflow::{HOLIDAY_CODE, HOLIDAY_HOURS, RequestOutcome};
