//! Core data models for the pay-run engine.
//!
//! This module contains all the domain models used throughout the engine.

mod overtime;
mod pay_period;
mod pay_run;
mod rate;
mod scheme;
mod shift;

pub use overtime::{OvertimePolicy, OvertimeRule};
pub use pay_period::PayPeriod;
pub use pay_run::{LineStatus, PayRun, PayRunChange, PayRunLine, PayRunStatus, PayRunTotals};
pub use rate::RateHistoryEntry;
pub use scheme::PeriodScheme;
pub use shift::{ShiftRecord, ShiftStatus};
