//! Persistence boundary of the engine.
//!
//! The engine treats storage as an external collaborator reachable through
//! the traits below: batched reads, atomic writes, and storage-level
//! uniqueness constraints. [`MemoryStore`] is the in-process implementation
//! used by the HTTP surface and the test suite; a relational backend would
//! implement the same traits.

mod memory;

pub use memory::MemoryStore;

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{
    OvertimePolicy, PayRun, PayRunChange, PayRunLine, PayRunTotals, RateHistoryEntry, ShiftRecord,
};

/// Read access to the tenant's scheduled shifts.
pub trait ShiftStore: Send + Sync {
    /// Non-cancelled shifts for `tenant_id` whose start falls in
    /// `[start, end)`, in one read.
    fn payable_shifts_in_window(
        &self,
        tenant_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<ShiftRecord>;
}

/// Access to the append-only rate history.
///
/// There is deliberately no per-employee lookup: rate resolution is a batch
/// operation, and a caller looping over ids would reintroduce the
/// one-query-per-employee defect this contract exists to prevent.
pub trait RateStore: Send + Sync {
    /// Every rate history row for the given employees, in one read.
    fn rate_entries_for(&self, employee_ids: &[String]) -> Vec<RateHistoryEntry>;

    /// Appends an entry. The `(employee_id, effective_date)` uniqueness
    /// constraint is enforced here, under the store's own lock.
    fn insert_rate_entry(&self, entry: RateHistoryEntry) -> EngineResult<()>;

    /// Removes and returns an entry.
    fn remove_rate_entry(
        &self,
        employee_id: &str,
        effective_date: NaiveDate,
    ) -> EngineResult<RateHistoryEntry>;
}

/// Read access to per-employee overtime policy overrides.
pub trait PolicyStore: Send + Sync {
    /// Overrides for the given employees, in one read. Employees without an
    /// override are absent; callers fall back to the tenant default.
    fn overtime_policies_for(
        &self,
        tenant_id: &str,
        employee_ids: &[String],
    ) -> HashMap<String, OvertimePolicy>;
}

/// Access to pay runs, their lines, and the audit trail.
pub trait RunStore: Send + Sync {
    /// The run covering exactly `(tenant_id, period_start, period_end)`,
    /// whatever its status, if one exists.
    fn find_run_for_period(
        &self,
        tenant_id: &str,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Option<PayRun>;

    /// Inserts a run header and its lines atomically. The one-run-per-period
    /// uniqueness constraint is enforced here, under the store's own lock;
    /// an application-level pre-check alone would race under concurrent
    /// creation.
    fn insert_run(&self, run: PayRun, lines: Vec<PayRunLine>) -> EngineResult<()>;

    /// Loads a run header.
    fn run(&self, run_id: Uuid) -> EngineResult<PayRun>;

    /// Replaces a run header.
    fn update_run(&self, run: PayRun) -> EngineResult<()>;

    /// Deletes a run and cascades to its lines. Audit rows survive. Status
    /// gating (draft only) is the ledger's responsibility.
    fn delete_run(&self, run_id: Uuid) -> EngineResult<()>;

    /// Loads one line.
    fn line(&self, line_id: Uuid) -> EngineResult<PayRunLine>;

    /// All lines of a run.
    fn lines_for_run(&self, run_id: Uuid) -> Vec<PayRunLine>;

    /// Applies a line edit atomically: the audit rows are appended, the line
    /// is replaced, and the owning run's totals are refreshed, together or
    /// not at all. The audit rows are written first.
    fn apply_line_edit(
        &self,
        line: PayRunLine,
        totals: PayRunTotals,
        changes: Vec<PayRunChange>,
    ) -> EngineResult<()>;

    /// The audit trail of one line, oldest first.
    fn changes_for_line(&self, line_id: Uuid) -> Vec<PayRunChange>;
}

/// The full storage surface the engine orchestration needs.
pub trait EngineStore: ShiftStore + RateStore + PolicyStore + RunStore {}

impl<T: ShiftStore + RateStore + PolicyStore + RunStore> EngineStore for T {}
