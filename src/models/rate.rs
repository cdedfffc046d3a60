//! Effective-dated hourly rate history.
//!
//! An employee's pay rate over time is an append-only sequence of
//! [`RateHistoryEntry`] rows. The rate in effect at a given moment is the
//! entry with the latest effective date on or before that moment's calendar
//! date in the employer's timezone.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One effective-dated hourly rate for one employee.
///
/// At most one entry may exist per `(employee_id, effective_date)` pair; the
/// storage layer enforces this as a uniqueness constraint. Entries are never
/// updated, and may be deleted only while their effective date is still in
/// the future.
///
/// # Example
///
/// ```
/// use payrun_engine::models::RateHistoryEntry;
/// use chrono::{NaiveDate, Utc};
/// use rust_decimal::Decimal;
///
/// let entry = RateHistoryEntry {
///     employee_id: "emp_001".to_string(),
///     hourly_rate: Decimal::new(2475, 2), // 24.75
///     effective_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
///     notes: Some("annual review".to_string()),
///     created_by: "mgr_004".to_string(),
///     created_at: Utc::now(),
/// };
/// assert!(entry.hourly_rate >= Decimal::ZERO);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateHistoryEntry {
    /// The employee this rate belongs to.
    pub employee_id: String,
    /// The hourly rate, non-negative.
    pub hourly_rate: Decimal,
    /// The calendar date from which this rate applies.
    pub effective_date: NaiveDate,
    /// Optional free-text note recorded alongside the change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// The actor that recorded the entry.
    pub created_by: String,
    /// When the entry was recorded.
    pub created_at: DateTime<Utc>,
}
