//! Pay run generation.
//!
//! The builder orchestrates the whole pipeline for one requested period:
//! duplicate check, shift aggregation, one batched rate resolution over the
//! aggregated employees, per-employee overtime split, line pricing, and a
//! single atomic persist of the header plus lines.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{local_midnight, round2, split_overtime};
use crate::config::TenantDirectory;
use crate::error::{EngineError, EngineResult};
use crate::models::{LineStatus, PayPeriod, PayRun, PayRunLine, PayRunStatus};
use crate::store::EngineStore;

use super::{MutationAction, MutationGate, aggregate_shifts, resolve_rates, totals_over_included};

/// The result of generating a pay run.
///
/// `skipped_employee_ids` lists employees that had shifts in the period but
/// no resolvable rate; the caller is expected to alert an operator.
#[derive(Debug, Clone)]
pub struct PayRunOutcome {
    /// The persisted run header.
    pub run: PayRun,
    /// The persisted lines, one per priced employee.
    pub lines: Vec<PayRunLine>,
    /// Employees skipped for lack of a rate in effect.
    pub skipped_employee_ids: Vec<String>,
}

/// Generates draft pay runs.
pub struct PayRunBuilder {
    store: Arc<dyn EngineStore>,
    tenants: Arc<TenantDirectory>,
    gate: Arc<dyn MutationGate>,
}

impl PayRunBuilder {
    /// Creates a builder over a store, tenant directory, and gate.
    pub fn new(
        store: Arc<dyn EngineStore>,
        tenants: Arc<TenantDirectory>,
        gate: Arc<dyn MutationGate>,
    ) -> Self {
        PayRunBuilder {
            store,
            tenants,
            gate,
        }
    }

    /// Generates and persists a draft pay run for the given period.
    ///
    /// The period boundary arrives as calendar dates already resolved by the
    /// caller (from the tenant's scheme) and is converted once to UTC
    /// instants in the tenant's timezone for the shift query window.
    ///
    /// One misconfigured employee does not block payroll for the rest:
    /// employees without a resolvable rate are skipped, logged, and reported
    /// on the outcome.
    ///
    /// # Errors
    ///
    /// [`EngineError::Conflict`] when any run (draft or otherwise) already
    /// covers the period; [`EngineError::Validation`] for an unknown tenant
    /// or an inverted period.
    pub fn build(
        &self,
        tenant_id: &str,
        period_start: NaiveDate,
        period_end: NaiveDate,
        created_by: &str,
    ) -> EngineResult<PayRunOutcome> {
        self.gate.authorize(created_by, MutationAction::CreatePayRun)?;
        if period_end <= period_start {
            return Err(EngineError::validation(
                "period_end",
                format!("must be after period_start {}", period_start),
            ));
        }
        let settings = self.tenants.get(tenant_id)?.clone();
        let tz = self.tenants.timezone(tenant_id)?;

        // Pre-check for a friendly message; the store's uniqueness
        // constraint below is what actually holds under a race.
        if let Some(existing) = self
            .store
            .find_run_for_period(tenant_id, period_start, period_end)
        {
            let message = if existing.status == PayRunStatus::Draft {
                format!(
                    "a draft pay run already exists for {} to {}",
                    period_start, period_end
                )
            } else {
                format!(
                    "a pay run has already been generated for {} to {}",
                    period_start, period_end
                )
            };
            warn!(tenant_id = %tenant_id, %period_start, %period_end, "Duplicate pay run rejected");
            return Err(EngineError::conflict(message));
        }

        let period = PayPeriod {
            start: local_midnight(period_start, tz),
            end: local_midnight(period_end, tz),
        };
        let aggregated = aggregate_shifts(self.store.as_ref(), tenant_id, &period);
        let employee_ids: Vec<String> = aggregated.keys().cloned().collect();
        let rates = resolve_rates(self.store.as_ref(), &employee_ids, period.start, tz);
        let policies = self
            .store
            .overtime_policies_for(tenant_id, &employee_ids);

        let run_id = Uuid::new_v4();
        let mut lines = Vec::with_capacity(aggregated.len());
        let mut skipped_employee_ids = Vec::new();

        for (employee_id, hours) in aggregated {
            let Some(rate) = rates.get(&employee_id).copied() else {
                let err = EngineError::Computation {
                    employee_id: employee_id.clone(),
                    message: "no hourly rate in effect at the period start".to_string(),
                };
                warn!(tenant_id = %tenant_id, error = %err, "Skipping employee");
                skipped_employee_ids.push(employee_id);
                continue;
            };
            let policy = policies
                .get(&employee_id)
                .cloned()
                .unwrap_or_else(|| settings.default_overtime.clone());

            let split = split_overtime(hours.total_hours, &policy, rate);
            let regular_pay = round2(split.regular_hours * rate);
            let overtime_pay = round2(split.overtime_hours * split.overtime_rate);
            let adjustments = Decimal::ZERO;
            let gross_pay = round2(regular_pay + overtime_pay + adjustments);

            lines.push(PayRunLine {
                id: Uuid::new_v4(),
                pay_run_id: run_id,
                employee_id,
                regular_hours: split.regular_hours,
                overtime_hours: split.overtime_hours,
                total_hours: hours.total_hours,
                hourly_rate: rate,
                overtime_rate: split.overtime_rate,
                regular_pay,
                overtime_pay,
                adjustments,
                adjustment_reason: None,
                gross_pay,
                status: LineStatus::Included,
                source_shift_ids: hours.shift_ids,
            });
        }

        let run = PayRun {
            id: run_id,
            tenant_id: tenant_id.to_string(),
            period_start,
            period_end,
            status: PayRunStatus::Draft,
            totals: totals_over_included(&lines),
            created_by: created_by.to_string(),
            approved_by: None,
            finalised_by: None,
            created_at: Utc::now(),
        };

        // Header and lines commit together or not at all.
        self.store.insert_run(run.clone(), lines.clone())?;
        info!(
            tenant_id = %tenant_id,
            run_id = %run.id,
            staff_count = run.totals.staff_count,
            gross_pay = %run.totals.gross_pay,
            skipped = skipped_employee_ids.len(),
            "Pay run generated"
        );

        Ok(PayRunOutcome {
            run,
            lines,
            skipped_employee_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TenantSettings;
    use crate::engine::AllowAll;
    use crate::models::{OvertimePolicy, OvertimeRule, RateHistoryEntry, ShiftRecord, ShiftStatus};
    use crate::store::{MemoryStore, RateStore, RunStore};
    use chrono::{Duration, TimeZone};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn tenant_directory() -> TenantDirectory {
        TenantDirectory::from_settings(vec![TenantSettings {
            id: "lakeside_care".to_string(),
            name: "Lakeside Care".to_string(),
            timezone: "UTC".to_string(),
            default_overtime: OvertimePolicy {
                enabled: true,
                contracted_weekly_hours: Some(dec("40")),
                rule_type: OvertimeRule::Multiplier,
                multiplier: Some(dec("1.5")),
                flat_extra: None,
            },
        }])
        .unwrap()
    }

    fn builder(store: Arc<MemoryStore>) -> PayRunBuilder {
        PayRunBuilder::new(store, Arc::new(tenant_directory()), Arc::new(AllowAll))
    }

    fn seed_rate(store: &MemoryStore, employee_id: &str, rate: &str) {
        store
            .insert_rate_entry(RateHistoryEntry {
                employee_id: employee_id.to_string(),
                hourly_rate: dec(rate),
                effective_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                notes: None,
                created_by: "mgr_004".to_string(),
                created_at: Utc::now(),
            })
            .unwrap();
    }

    fn seed_shift(store: &MemoryStore, id: &str, employee_id: &str, day: u32, hours: i64) {
        let start = Utc.with_ymd_and_hms(2024, 3, day, 8, 0, 0).unwrap();
        store.add_shift(ShiftRecord {
            id: id.to_string(),
            tenant_id: "lakeside_care".to_string(),
            employee_id: employee_id.to_string(),
            start,
            end: start + Duration::hours(hours),
            break_minutes: 0,
            status: ShiftStatus::Completed,
        });
    }

    fn period_dates() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 18).unwrap(),
        )
    }

    #[test]
    fn test_build_prices_overtime_per_policy() {
        let store = Arc::new(MemoryStore::new());
        seed_rate(&store, "emp_001", "20");
        // 45 hours across the week against 40 contracted.
        for (i, day) in [11, 12, 13, 14, 15].iter().enumerate() {
            seed_shift(&store, &format!("s{}", i), "emp_001", *day, 9);
        }

        let (start, end) = period_dates();
        let outcome = builder(store).build("lakeside_care", start, end, "mgr_004").unwrap();

        assert_eq!(outcome.lines.len(), 1);
        let line = &outcome.lines[0];
        assert_eq!(line.regular_hours, dec("40"));
        assert_eq!(line.overtime_hours, dec("5"));
        assert_eq!(line.overtime_rate, dec("30"));
        assert_eq!(line.regular_pay, dec("800.00"));
        assert_eq!(line.overtime_pay, dec("150.00"));
        assert_eq!(line.gross_pay, dec("950.00"));
        assert_eq!(line.status, LineStatus::Included);
        assert_eq!(line.adjustments, Decimal::ZERO);
        assert_eq!(outcome.run.totals.staff_count, 1);
        assert_eq!(outcome.run.totals.gross_pay, dec("950.00"));
        assert_eq!(outcome.run.status, PayRunStatus::Draft);
    }

    #[test]
    fn test_employee_without_rate_is_skipped_not_fatal() {
        let store = Arc::new(MemoryStore::new());
        seed_rate(&store, "emp_001", "20");
        seed_shift(&store, "s1", "emp_001", 11, 8);
        seed_shift(&store, "s2", "emp_misconfigured", 12, 8);

        let (start, end) = period_dates();
        let outcome = builder(store).build("lakeside_care", start, end, "mgr_004").unwrap();

        assert_eq!(outcome.lines.len(), 1);
        assert_eq!(outcome.skipped_employee_ids, vec!["emp_misconfigured"]);
        assert_eq!(outcome.run.totals.staff_count, 1);
    }

    #[test]
    fn test_duplicate_draft_run_conflicts() {
        let store = Arc::new(MemoryStore::new());
        seed_rate(&store, "emp_001", "20");
        seed_shift(&store, "s1", "emp_001", 11, 8);

        let (start, end) = period_dates();
        let builder = builder(store);
        builder.build("lakeside_care", start, end, "mgr_004").unwrap();
        let err = builder
            .build("lakeside_care", start, end, "mgr_004")
            .unwrap_err();
        assert!(matches!(err, EngineError::Conflict { .. }));
        assert!(err.to_string().contains("draft"));
    }

    #[test]
    fn test_empty_period_produces_empty_run() {
        let store = Arc::new(MemoryStore::new());
        let (start, end) = period_dates();
        let outcome = builder(store).build("lakeside_care", start, end, "mgr_004").unwrap();
        assert!(outcome.lines.is_empty());
        assert_eq!(outcome.run.totals.staff_count, 0);
        assert_eq!(outcome.run.totals.gross_pay, Decimal::ZERO);
    }

    #[test]
    fn test_inverted_period_rejected() {
        let store = Arc::new(MemoryStore::new());
        let (start, end) = period_dates();
        let err = builder(store)
            .build("lakeside_care", end, start, "mgr_004")
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation { ref field, .. } if field == "period_end"));
    }

    #[test]
    fn test_unknown_tenant_rejected() {
        let store = Arc::new(MemoryStore::new());
        let (start, end) = period_dates();
        assert!(
            builder(store)
                .build("nowhere", start, end, "mgr_004")
                .is_err()
        );
    }

    #[test]
    fn test_per_employee_policy_overrides_tenant_default() {
        let store = Arc::new(MemoryStore::new());
        seed_rate(&store, "emp_001", "20");
        store.set_overtime_policy("lakeside_care", "emp_001", OvertimePolicy::disabled());
        for (i, day) in [11, 12, 13, 14, 15].iter().enumerate() {
            seed_shift(&store, &format!("s{}", i), "emp_001", *day, 9);
        }

        let (start, end) = period_dates();
        let outcome = builder(store).build("lakeside_care", start, end, "mgr_004").unwrap();
        let line = &outcome.lines[0];
        assert_eq!(line.regular_hours, dec("45"));
        assert_eq!(line.overtime_hours, Decimal::ZERO);
        assert_eq!(line.gross_pay, dec("900.00"));
    }

    #[test]
    fn test_lines_are_persisted_with_the_header() {
        let store = Arc::new(MemoryStore::new());
        seed_rate(&store, "emp_001", "20");
        seed_shift(&store, "s1", "emp_001", 11, 8);

        let (start, end) = period_dates();
        let outcome = builder(store.clone())
            .build("lakeside_care", start, end, "mgr_004")
            .unwrap();

        assert!(store.run(outcome.run.id).is_ok());
        assert_eq!(store.lines_for_run(outcome.run.id).len(), 1);
    }

    #[test]
    fn test_source_shift_ids_are_traceable() {
        let store = Arc::new(MemoryStore::new());
        seed_rate(&store, "emp_001", "20");
        seed_shift(&store, "s1", "emp_001", 11, 8);
        seed_shift(&store, "s2", "emp_001", 12, 8);

        let (start, end) = period_dates();
        let outcome = builder(store).build("lakeside_care", start, end, "mgr_004").unwrap();
        assert_eq!(outcome.lines[0].source_shift_ids, vec!["s1", "s2"]);
    }
}
