//! In-memory transactional store.
//!
//! All state lives behind one mutex, so every trait method is atomic with
//! respect to every other: a uniqueness check and its insert cannot
//! interleave with a concurrent writer, and a line edit commits its audit
//! rows, line replacement, and totals refresh as one unit.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    OvertimePolicy, PayRun, PayRunChange, PayRunLine, PayRunTotals, RateHistoryEntry, ShiftRecord,
};

use super::{PolicyStore, RateStore, RunStore, ShiftStore};

/// The in-process implementation of the storage traits.
///
/// Shift records and overtime policies are seeded by the surrounding
/// application (scheduling is upstream of payroll); runs, lines, rate
/// entries, and audit rows are written by the engine itself.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    shifts: Vec<ShiftRecord>,
    rates: BTreeMap<(String, NaiveDate), RateHistoryEntry>,
    policies: HashMap<(String, String), OvertimePolicy>,
    runs: HashMap<Uuid, PayRun>,
    lines: HashMap<Uuid, PayRunLine>,
    changes: Vec<PayRunChange>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Seeds one shift record.
    pub fn add_shift(&self, shift: ShiftRecord) {
        self.inner.lock().shifts.push(shift);
    }

    /// Seeds many shift records.
    pub fn add_shifts(&self, shifts: impl IntoIterator<Item = ShiftRecord>) {
        self.inner.lock().shifts.extend(shifts);
    }

    /// Seeds a per-employee overtime policy override.
    pub fn set_overtime_policy(&self, tenant_id: &str, employee_id: &str, policy: OvertimePolicy) {
        self.inner
            .lock()
            .policies
            .insert((tenant_id.to_string(), employee_id.to_string()), policy);
    }
}

impl ShiftStore for MemoryStore {
    fn payable_shifts_in_window(
        &self,
        tenant_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<ShiftRecord> {
        self.inner
            .lock()
            .shifts
            .iter()
            .filter(|s| {
                s.tenant_id == tenant_id && s.is_payable() && s.start >= start && s.start < end
            })
            .cloned()
            .collect()
    }
}

impl RateStore for MemoryStore {
    fn rate_entries_for(&self, employee_ids: &[String]) -> Vec<RateHistoryEntry> {
        let inner = self.inner.lock();
        employee_ids
            .iter()
            .flat_map(|id| {
                inner
                    .rates
                    .range((id.clone(), NaiveDate::MIN)..=(id.clone(), NaiveDate::MAX))
                    .map(|(_, entry)| entry.clone())
            })
            .collect()
    }

    fn insert_rate_entry(&self, entry: RateHistoryEntry) -> EngineResult<()> {
        let mut inner = self.inner.lock();
        let key = (entry.employee_id.clone(), entry.effective_date);
        if inner.rates.contains_key(&key) {
            return Err(EngineError::conflict(format!(
                "a rate for employee '{}' effective {} already exists",
                entry.employee_id, entry.effective_date
            )));
        }
        inner.rates.insert(key, entry);
        Ok(())
    }

    fn remove_rate_entry(
        &self,
        employee_id: &str,
        effective_date: NaiveDate,
    ) -> EngineResult<RateHistoryEntry> {
        let mut inner = self.inner.lock();
        inner
            .rates
            .remove(&(employee_id.to_string(), effective_date))
            .ok_or_else(|| EngineError::NotFound {
                entity: "rate history entry".to_string(),
                id: format!("{}@{}", employee_id, effective_date),
            })
    }
}

impl PolicyStore for MemoryStore {
    fn overtime_policies_for(
        &self,
        tenant_id: &str,
        employee_ids: &[String],
    ) -> HashMap<String, OvertimePolicy> {
        let inner = self.inner.lock();
        employee_ids
            .iter()
            .filter_map(|id| {
                inner
                    .policies
                    .get(&(tenant_id.to_string(), id.clone()))
                    .map(|policy| (id.clone(), policy.clone()))
            })
            .collect()
    }
}

impl RunStore for MemoryStore {
    fn find_run_for_period(
        &self,
        tenant_id: &str,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Option<PayRun> {
        self.inner
            .lock()
            .runs
            .values()
            .find(|r| {
                r.tenant_id == tenant_id
                    && r.period_start == period_start
                    && r.period_end == period_end
            })
            .cloned()
    }

    fn insert_run(&self, run: PayRun, lines: Vec<PayRunLine>) -> EngineResult<()> {
        let mut inner = self.inner.lock();
        let duplicate = inner.runs.values().any(|r| {
            r.tenant_id == run.tenant_id
                && r.period_start == run.period_start
                && r.period_end == run.period_end
        });
        if duplicate {
            return Err(EngineError::conflict(format!(
                "a pay run for tenant '{}' covering {} to {} already exists",
                run.tenant_id, run.period_start, run.period_end
            )));
        }
        inner.runs.insert(run.id, run);
        for line in lines {
            inner.lines.insert(line.id, line);
        }
        Ok(())
    }

    fn run(&self, run_id: Uuid) -> EngineResult<PayRun> {
        self.inner
            .lock()
            .runs
            .get(&run_id)
            .cloned()
            .ok_or_else(|| not_found("pay run", run_id))
    }

    fn update_run(&self, run: PayRun) -> EngineResult<()> {
        let mut inner = self.inner.lock();
        if !inner.runs.contains_key(&run.id) {
            return Err(not_found("pay run", run.id));
        }
        inner.runs.insert(run.id, run);
        Ok(())
    }

    fn delete_run(&self, run_id: Uuid) -> EngineResult<()> {
        let mut inner = self.inner.lock();
        if inner.runs.remove(&run_id).is_none() {
            return Err(not_found("pay run", run_id));
        }
        inner.lines.retain(|_, line| line.pay_run_id != run_id);
        Ok(())
    }

    fn line(&self, line_id: Uuid) -> EngineResult<PayRunLine> {
        self.inner
            .lock()
            .lines
            .get(&line_id)
            .cloned()
            .ok_or_else(|| not_found("pay run line", line_id))
    }

    fn lines_for_run(&self, run_id: Uuid) -> Vec<PayRunLine> {
        let mut lines: Vec<PayRunLine> = self
            .inner
            .lock()
            .lines
            .values()
            .filter(|l| l.pay_run_id == run_id)
            .cloned()
            .collect();
        lines.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
        lines
    }

    fn apply_line_edit(
        &self,
        line: PayRunLine,
        totals: PayRunTotals,
        changes: Vec<PayRunChange>,
    ) -> EngineResult<()> {
        let mut inner = self.inner.lock();
        if !inner.lines.contains_key(&line.id) {
            return Err(not_found("pay run line", line.id));
        }
        let Some(mut run) = inner.runs.get(&line.pay_run_id).cloned() else {
            return Err(not_found("pay run", line.pay_run_id));
        };
        // Audit rows land before the line they describe.
        inner.changes.extend(changes);
        inner.lines.insert(line.id, line);
        run.totals = totals;
        inner.runs.insert(run.id, run);
        Ok(())
    }

    fn changes_for_line(&self, line_id: Uuid) -> Vec<PayRunChange> {
        self.inner
            .lock()
            .changes
            .iter()
            .filter(|c| c.pay_run_line_id == line_id)
            .cloned()
            .collect()
    }
}

fn not_found(entity: &str, id: Uuid) -> EngineError {
    EngineError::NotFound {
        entity: entity.to_string(),
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LineStatus, PayRunStatus, ShiftStatus};
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn entry(employee_id: &str, date: NaiveDate, rate: Decimal) -> RateHistoryEntry {
        RateHistoryEntry {
            employee_id: employee_id.to_string(),
            hourly_rate: rate,
            effective_date: date,
            notes: None,
            created_by: "mgr_004".to_string(),
            created_at: Utc::now(),
        }
    }

    fn sample_run(tenant_id: &str) -> PayRun {
        PayRun {
            id: Uuid::new_v4(),
            tenant_id: tenant_id.to_string(),
            period_start: NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2024, 3, 18).unwrap(),
            status: PayRunStatus::Draft,
            totals: PayRunTotals::zero(),
            created_by: "mgr_004".to_string(),
            approved_by: None,
            finalised_by: None,
            created_at: Utc::now(),
        }
    }

    fn sample_line(run: &PayRun, employee_id: &str) -> PayRunLine {
        PayRunLine {
            id: Uuid::new_v4(),
            pay_run_id: run.id,
            employee_id: employee_id.to_string(),
            regular_hours: Decimal::new(38, 0),
            overtime_hours: Decimal::ZERO,
            total_hours: Decimal::new(38, 0),
            hourly_rate: Decimal::new(20, 0),
            overtime_rate: Decimal::ZERO,
            regular_pay: Decimal::new(760, 0),
            overtime_pay: Decimal::ZERO,
            adjustments: Decimal::ZERO,
            adjustment_reason: None,
            gross_pay: Decimal::new(760, 0),
            status: LineStatus::Included,
            source_shift_ids: vec!["s1".to_string()],
        }
    }

    #[test]
    fn test_duplicate_rate_effective_date_rejected() {
        let store = MemoryStore::new();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        store
            .insert_rate_entry(entry("emp_001", date, Decimal::new(1500, 2)))
            .unwrap();
        let err = store
            .insert_rate_entry(entry("emp_001", date, Decimal::new(1600, 2)))
            .unwrap_err();
        assert!(matches!(err, EngineError::Conflict { .. }));
    }

    #[test]
    fn test_same_date_different_employees_allowed() {
        let store = MemoryStore::new();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        store
            .insert_rate_entry(entry("emp_001", date, Decimal::new(1500, 2)))
            .unwrap();
        store
            .insert_rate_entry(entry("emp_002", date, Decimal::new(1500, 2)))
            .unwrap();
    }

    #[test]
    fn test_rate_entries_for_returns_only_requested_employees() {
        let store = MemoryStore::new();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        store
            .insert_rate_entry(entry("emp_001", date, Decimal::new(1500, 2)))
            .unwrap();
        store
            .insert_rate_entry(entry("emp_002", date, Decimal::new(1700, 2)))
            .unwrap();

        let entries = store.rate_entries_for(&["emp_001".to_string()]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].employee_id, "emp_001");
    }

    #[test]
    fn test_duplicate_period_run_rejected() {
        let store = MemoryStore::new();
        store.insert_run(sample_run("lakeside_care"), vec![]).unwrap();
        let err = store
            .insert_run(sample_run("lakeside_care"), vec![])
            .unwrap_err();
        assert!(matches!(err, EngineError::Conflict { .. }));
    }

    #[test]
    fn test_same_period_different_tenants_allowed() {
        let store = MemoryStore::new();
        store.insert_run(sample_run("lakeside_care"), vec![]).unwrap();
        store.insert_run(sample_run("harbor_clinic"), vec![]).unwrap();
    }

    #[test]
    fn test_delete_run_cascades_lines_but_keeps_changes() {
        let store = MemoryStore::new();
        let run = sample_run("lakeside_care");
        let line = sample_line(&run, "emp_001");
        let line_id = line.id;
        store.insert_run(run.clone(), vec![line.clone()]).unwrap();

        let change = PayRunChange {
            id: Uuid::new_v4(),
            pay_run_line_id: line_id,
            field_changed: "adjustments".to_string(),
            old_value: "0".to_string(),
            new_value: "5".to_string(),
            reason: None,
            changed_by: "mgr_004".to_string(),
            changed_at: Utc::now(),
        };
        store
            .apply_line_edit(line, PayRunTotals::zero(), vec![change])
            .unwrap();

        store.delete_run(run.id).unwrap();
        assert!(store.line(line_id).is_err());
        assert_eq!(store.changes_for_line(line_id).len(), 1);
    }

    #[test]
    fn test_shift_window_is_half_open_on_start() {
        let store = MemoryStore::new();
        let start = Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 18, 0, 0, 0).unwrap();
        store.add_shifts([
            ShiftRecord {
                id: "at_start".to_string(),
                tenant_id: "lakeside_care".to_string(),
                employee_id: "emp_001".to_string(),
                start,
                end: start + chrono::Duration::hours(8),
                break_minutes: 0,
                status: ShiftStatus::Completed,
            },
            ShiftRecord {
                id: "at_end".to_string(),
                tenant_id: "lakeside_care".to_string(),
                employee_id: "emp_001".to_string(),
                start: end,
                end: end + chrono::Duration::hours(8),
                break_minutes: 0,
                status: ShiftStatus::Completed,
            },
        ]);

        let shifts = store.payable_shifts_in_window("lakeside_care", start, end);
        assert_eq!(shifts.len(), 1);
        assert_eq!(shifts[0].id, "at_start");
    }

    #[test]
    fn test_cancelled_shifts_are_not_returned() {
        let store = MemoryStore::new();
        let start = Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap();
        store.add_shift(ShiftRecord {
            id: "cancelled".to_string(),
            tenant_id: "lakeside_care".to_string(),
            employee_id: "emp_001".to_string(),
            start: start + chrono::Duration::hours(9),
            end: start + chrono::Duration::hours(17),
            break_minutes: 0,
            status: ShiftStatus::Cancelled,
        });

        let end = start + chrono::Duration::days(7);
        assert!(store
            .payable_shifts_in_window("lakeside_care", start, end)
            .is_empty());
    }
}
