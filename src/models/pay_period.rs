//! Pay period boundary model.
//!
//! This module contains the [`PayPeriod`] type: a half-open interval of
//! absolute time over which worked hours are aggregated for one pay run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A half-open `[start, end)` interval of absolute time.
///
/// The boundaries are UTC instants computed from wall-clock midnights in the
/// employer's timezone, so a period spanning a DST transition is not exactly
/// a whole number of 24-hour days. `end` is always strictly after `start`.
///
/// Pay periods are not persisted as their own entity; they are recomputed on
/// demand from the tenant's scheme, and the calendar dates of the boundaries
/// are stored denormalized on each pay run.
///
/// # Example
///
/// ```
/// use payrun_engine::models::PayPeriod;
/// use chrono::{TimeZone, Utc};
///
/// let period = PayPeriod {
///     start: Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap(),
///     end: Utc.with_ymd_and_hms(2024, 3, 18, 0, 0, 0).unwrap(),
/// };
/// assert!(period.contains(Utc.with_ymd_and_hms(2024, 3, 14, 9, 0, 0).unwrap()));
/// assert!(!period.contains(period.end));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The first instant of the period (inclusive).
    pub start: DateTime<Utc>,
    /// The first instant after the period (exclusive).
    pub end: DateTime<Utc>,
}

impl PayPeriod {
    /// Checks whether an instant falls within the half-open interval.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}
