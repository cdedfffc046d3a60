//! Orchestration over the storage boundary.
//!
//! The modules here wire the pure calculation core to the store: shift
//! aggregation, batched rate resolution, rate-history maintenance, pay run
//! generation, and the post-creation mutation ledger.

mod aggregator;
mod builder;
mod ledger;
mod rates;
mod resolver;

pub use aggregator::{EmployeeHours, aggregate_shifts};
pub use builder::{PayRunBuilder, PayRunOutcome};
pub use ledger::{LineEdit, PayRunLedger};
pub use rates::{NewRateEntry, RateHistoryService};
pub use resolver::resolve_rates;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{LineStatus, PayRunLine, PayRunTotals};

/// A mutation the engine asks the authorization boundary about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationAction {
    /// Generating a pay run.
    CreatePayRun,
    /// Editing a pay run line.
    EditPayRunLine,
    /// Moving a pay run along its lifecycle.
    TransitionPayRun,
    /// Deleting a draft pay run.
    DeletePayRun,
    /// Appending a rate history entry.
    AddRateEntry,
    /// Deleting a not-yet-effective rate history entry.
    DeleteRateEntry,
}

impl MutationAction {
    fn describe(self) -> &'static str {
        match self {
            MutationAction::CreatePayRun => "create a pay run",
            MutationAction::EditPayRunLine => "edit a pay run line",
            MutationAction::TransitionPayRun => "transition a pay run",
            MutationAction::DeletePayRun => "delete a pay run",
            MutationAction::AddRateEntry => "add a rate history entry",
            MutationAction::DeleteRateEntry => "delete a rate history entry",
        }
    }
}

/// The authorization boundary consulted before every mutation.
///
/// Role gating itself belongs to the surrounding application; the engine
/// only guarantees the check happens. [`AllowAll`] is the permissive
/// implementation used when no gating is wired in.
pub trait MutationGate: Send + Sync {
    /// Returns `Ok(())` when `actor` may perform `action`.
    fn authorize(&self, actor: &str, action: MutationAction) -> EngineResult<()>;
}

/// A gate that permits every mutation.
pub struct AllowAll;

impl MutationGate for AllowAll {
    fn authorize(&self, _actor: &str, _action: MutationAction) -> EngineResult<()> {
        Ok(())
    }
}

/// A denial produced by a gate implementation.
pub fn forbidden(actor: &str, action: MutationAction) -> EngineError {
    EngineError::Forbidden {
        actor: actor.to_string(),
        action: action.describe().to_string(),
    }
}

/// Header totals over the included lines of a run.
pub(crate) fn totals_over_included(lines: &[PayRunLine]) -> PayRunTotals {
    let included = lines.iter().filter(|l| l.status == LineStatus::Included);
    let mut hours = Decimal::ZERO;
    let mut gross_pay = Decimal::ZERO;
    let mut staff_count = 0u32;
    for line in included {
        hours += line.total_hours;
        gross_pay += line.gross_pay;
        staff_count += 1;
    }
    PayRunTotals {
        hours,
        gross_pay,
        staff_count,
    }
}
