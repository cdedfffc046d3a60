//! Scheduled shift records.
//!
//! This module defines the [`ShiftRecord`] struct and [`ShiftStatus`] enum.
//! Shift records are owned by the scheduling side of the platform and are
//! read-only to this engine; only non-cancelled shifts contribute hours.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The lifecycle status of a scheduled shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    /// Published but not yet acknowledged by the employee.
    Scheduled,
    /// Acknowledged by the employee.
    Confirmed,
    /// Worked and closed out.
    Completed,
    /// Cancelled; contributes no hours to payroll.
    Cancelled,
}

/// A scheduled shift as seen by the payroll engine.
///
/// Start and end are absolute instants; the break is an unpaid duration in
/// minutes deducted from the worked time.
///
/// # Example
///
/// ```
/// use payrun_engine::models::{ShiftRecord, ShiftStatus};
/// use chrono::{TimeZone, Utc};
///
/// let shift = ShiftRecord {
///     id: "shift_001".to_string(),
///     tenant_id: "lakeside_care".to_string(),
///     employee_id: "emp_001".to_string(),
///     start: Utc.with_ymd_and_hms(2024, 3, 12, 22, 0, 0).unwrap(),
///     end: Utc.with_ymd_and_hms(2024, 3, 13, 6, 0, 0).unwrap(),
///     break_minutes: 30,
///     status: ShiftStatus::Completed,
/// };
/// assert!(shift.is_payable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRecord {
    /// Unique identifier for the shift.
    pub id: String,
    /// The tenant whose roster this shift belongs to.
    pub tenant_id: String,
    /// The employee assigned to the shift.
    pub employee_id: String,
    /// The instant the shift starts.
    pub start: DateTime<Utc>,
    /// The instant the shift ends.
    pub end: DateTime<Utc>,
    /// Unpaid break duration in minutes.
    #[serde(default)]
    pub break_minutes: u32,
    /// The shift's lifecycle status.
    pub status: ShiftStatus,
}

impl ShiftRecord {
    /// Returns true unless the shift has been cancelled.
    pub fn is_payable(&self) -> bool {
        self.status != ShiftStatus::Cancelled
    }
}
