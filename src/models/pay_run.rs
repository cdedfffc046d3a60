//! Pay run, pay run line, and audit trail models.
//!
//! A pay run is a generated, editable, eventually-immutable batch of
//! per-employee payroll lines for one pay period. Every post-creation field
//! change on a line is recorded as an append-only [`PayRunChange`] row.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a pay run.
///
/// Transitions are one-directional along Draft → Reviewing → Approved →
/// Finalised. A finalised run accepts no further mutation of any kind, and
/// only a draft run may be deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayRunStatus {
    /// Freshly generated; freely editable and deletable.
    Draft,
    /// Under review; still freely editable.
    Reviewing,
    /// Approved; adjustment edits require a reason.
    Approved,
    /// Terminal; no line may be edited.
    Finalised,
}

impl PayRunStatus {
    /// Position of the status along the one-directional lifecycle.
    pub fn rank(self) -> u8 {
        match self {
            PayRunStatus::Draft => 0,
            PayRunStatus::Reviewing => 1,
            PayRunStatus::Approved => 2,
            PayRunStatus::Finalised => 3,
        }
    }

    /// Whether moving to `next` is a forward transition.
    pub fn can_transition_to(self, next: PayRunStatus) -> bool {
        next.rank() > self.rank()
    }
}

/// Aggregated totals stored on the pay run header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayRunTotals {
    /// Total hours across included lines.
    pub hours: Decimal,
    /// Total gross pay across included lines.
    pub gross_pay: Decimal,
    /// Number of included lines.
    pub staff_count: u32,
}

impl PayRunTotals {
    /// Empty totals for a run with no lines.
    pub fn zero() -> Self {
        PayRunTotals {
            hours: Decimal::ZERO,
            gross_pay: Decimal::ZERO,
            staff_count: 0,
        }
    }
}

/// The header of one generated pay run.
///
/// The period boundary is stored denormalized as calendar dates for display
/// and for the one-run-per-period uniqueness constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayRun {
    /// Unique identifier.
    pub id: Uuid,
    /// The tenant the run belongs to.
    pub tenant_id: String,
    /// First calendar day of the period (inclusive).
    pub period_start: NaiveDate,
    /// Day after the last calendar day of the period (exclusive).
    pub period_end: NaiveDate,
    /// Lifecycle state.
    pub status: PayRunStatus,
    /// Totals over included lines.
    pub totals: PayRunTotals,
    /// The actor that generated the run.
    pub created_by: String,
    /// The actor that moved the run to Approved, once it has been.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    /// The actor that finalised the run, once it has been.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finalised_by: Option<String>,
    /// When the run was generated.
    pub created_at: DateTime<Utc>,
}

/// Whether a line participates in the run's totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStatus {
    /// Counted in run totals and paid.
    Included,
    /// Kept for the record but excluded from totals.
    Excluded,
}

/// One employee's payroll line within a run.
///
/// Invariant: `gross_pay` equals `regular_pay + overtime_pay + adjustments`
/// rounded to two decimal places. Hours and base pay components are computed
/// only at generation time from shifts; post-creation edits touch
/// adjustments and inclusion status, never re-derive hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayRunLine {
    /// Unique identifier.
    pub id: Uuid,
    /// The run that owns this line.
    pub pay_run_id: Uuid,
    /// The employee this line pays.
    pub employee_id: String,
    /// Hours paid at the base rate.
    pub regular_hours: Decimal,
    /// Hours paid at the overtime rate.
    pub overtime_hours: Decimal,
    /// Total worked hours attributed to the period.
    pub total_hours: Decimal,
    /// The base hourly rate in effect for the period.
    pub hourly_rate: Decimal,
    /// The overtime hourly rate; zero when no overtime applies.
    pub overtime_rate: Decimal,
    /// Pay for regular hours, rounded to 2 decimal places.
    pub regular_pay: Decimal,
    /// Pay for overtime hours, rounded to 2 decimal places.
    pub overtime_pay: Decimal,
    /// Manual adjustment applied after generation; zero initially.
    pub adjustments: Decimal,
    /// Reason supplied with the latest adjustment, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjustment_reason: Option<String>,
    /// `round2(regular_pay + overtime_pay + adjustments)`.
    pub gross_pay: Decimal,
    /// Whether the line counts toward run totals.
    pub status: LineStatus,
    /// The shifts whose hours produced this line, for traceability.
    pub source_shift_ids: Vec<String>,
}

/// One immutable audit record of a field change on a pay run line.
///
/// Rows are append-only; they are never updated or deleted, not even when a
/// draft run (and its lines) is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayRunChange {
    /// Unique identifier.
    pub id: Uuid,
    /// The line that was changed.
    pub pay_run_line_id: Uuid,
    /// The field that changed (`"adjustments"` or `"status"`).
    pub field_changed: String,
    /// The value before the change, rendered as text.
    pub old_value: String,
    /// The value after the change, rendered as text.
    pub new_value: String,
    /// The reason supplied with the change, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// The actor that made the change.
    pub changed_by: String,
    /// When the change was recorded.
    pub changed_at: DateTime<Utc>,
}
