//! Worked-hours arithmetic and schedule conflict detection.
//!
//! Pure functions over shift records: per-shift worked duration, the
//! two-decimal rounding applied at reporting boundaries, and detection of
//! overlapping shifts. No I/O.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::ShiftRecord;

/// Rounds a value to two decimal places, midpoints away from zero.
///
/// Applied only at defined boundaries (reported hour totals, per-line pay
/// amounts, recomputed gross pay), never at intermediate sums.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Worked hours for one shift: `(end - start) - break`, clamped at zero.
///
/// A malformed break longer than the shift (or an end before the start)
/// yields zero hours rather than negative pay.
///
/// # Examples
///
/// ```
/// use payrun_engine::calculation::shift_worked_hours;
/// use payrun_engine::models::{ShiftRecord, ShiftStatus};
/// use chrono::{TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let shift = ShiftRecord {
///     id: "shift_001".to_string(),
///     tenant_id: "lakeside_care".to_string(),
///     employee_id: "emp_001".to_string(),
///     start: Utc.with_ymd_and_hms(2024, 3, 12, 9, 0, 0).unwrap(),
///     end: Utc.with_ymd_and_hms(2024, 3, 12, 17, 30, 0).unwrap(),
///     break_minutes: 30,
///     status: ShiftStatus::Completed,
/// };
/// assert_eq!(shift_worked_hours(&shift), Decimal::new(8, 0));
/// ```
pub fn shift_worked_hours(shift: &ShiftRecord) -> Decimal {
    let worked_minutes =
        (shift.end - shift.start).num_minutes() - i64::from(shift.break_minutes);
    if worked_minutes <= 0 {
        return Decimal::ZERO;
    }
    Decimal::from(worked_minutes) / Decimal::from(60)
}

/// A pair of shifts for one employee whose intervals overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftConflict {
    /// The double-booked employee.
    pub employee_id: String,
    /// The earlier-starting shift.
    pub first_shift_id: String,
    /// The later-starting shift.
    pub second_shift_id: String,
}

/// Finds double-booked shifts: same employee, both non-cancelled, and
/// `start_a < end_b && start_b < end_a`.
///
/// Payroll aggregation does not exclude conflicting shifts; both count. This
/// function exists so the scheduling side can surface conflicts upstream.
pub fn find_schedule_conflicts(shifts: &[ShiftRecord]) -> Vec<ShiftConflict> {
    let mut payable: Vec<&ShiftRecord> = shifts.iter().filter(|s| s.is_payable()).collect();
    payable.sort_by(|a, b| {
        a.employee_id
            .cmp(&b.employee_id)
            .then(a.start.cmp(&b.start))
    });

    let mut conflicts = Vec::new();
    for (i, shift) in payable.iter().enumerate() {
        for later in payable[i + 1..]
            .iter()
            .take_while(|o| o.employee_id == shift.employee_id && o.start < shift.end)
        {
            conflicts.push(ShiftConflict {
                employee_id: shift.employee_id.clone(),
                first_shift_id: shift.id.clone(),
                second_shift_id: later.id.clone(),
            });
        }
    }
    conflicts
}
