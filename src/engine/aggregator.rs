//! Per-employee aggregation of worked time over a pay period.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::calculation::{round2, shift_worked_hours};
use crate::models::PayPeriod;
use crate::store::EngineStore;

/// One employee's aggregated worked time for a period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeHours {
    /// Total worked hours, rounded to two decimal places at this reporting
    /// boundary (individual shifts are summed at full precision first).
    pub total_hours: Decimal,
    /// The shifts that produced the total, earliest first, for traceability.
    pub shift_ids: Vec<String>,
}

/// Sums worked hours per employee for every non-cancelled shift whose start
/// falls inside the period.
///
/// Overlapping shifts both count; double-booking is surfaced upstream by
/// the scheduling side, not resolved here.
pub fn aggregate_shifts(
    store: &dyn EngineStore,
    tenant_id: &str,
    period: &PayPeriod,
) -> BTreeMap<String, EmployeeHours> {
    let mut shifts = store.payable_shifts_in_window(tenant_id, period.start, period.end);
    shifts.sort_by(|a, b| a.start.cmp(&b.start));

    let mut raw_totals: BTreeMap<String, (Decimal, Vec<String>)> = BTreeMap::new();
    for shift in shifts {
        let hours = shift_worked_hours(&shift);
        let (total, ids) = raw_totals
            .entry(shift.employee_id.clone())
            .or_insert_with(|| (Decimal::ZERO, Vec::new()));
        *total += hours;
        ids.push(shift.id);
    }

    raw_totals
        .into_iter()
        .map(|(employee_id, (total, shift_ids))| {
            (
                employee_id,
                EmployeeHours {
                    total_hours: round2(total),
                    shift_ids,
                },
            )
        })
        .collect()
}
