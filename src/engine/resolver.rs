//! Batched resolution of effective-dated hourly rates.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;

use crate::store::EngineStore;

/// Resolves the hourly rate in effect for each employee at `as_of`.
///
/// The instant is converted to a calendar date in the employer's timezone;
/// for each employee the entry with the latest effective date on or before
/// that date wins. Employees with no qualifying entry are absent from the
/// result, and callers must treat absence as "cannot run payroll for this
/// employee", never as a zero rate.
///
/// The underlying read is a single batched lookup keyed by the full id set;
/// there is deliberately no per-employee variant of this function.
pub fn resolve_rates(
    store: &dyn EngineStore,
    employee_ids: &[String],
    as_of: DateTime<Utc>,
    tz: Tz,
) -> HashMap<String, Decimal> {
    let as_of_date = as_of.with_timezone(&tz).date_naive();
    let mut best: HashMap<String, (NaiveDate, Decimal)> = HashMap::new();

    for entry in store.rate_entries_for(employee_ids) {
        if entry.effective_date > as_of_date {
            continue;
        }
        match best.get(&entry.employee_id) {
            Some((current, _)) if *current >= entry.effective_date => {}
            _ => {
                best.insert(
                    entry.employee_id.clone(),
                    (entry.effective_date, entry.hourly_rate),
                );
            }
        }
    }

    best.into_iter()
        .map(|(employee_id, (_, rate))| (employee_id, rate))
        .collect()
}
