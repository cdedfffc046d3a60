//! Post-creation mutation of pay runs.
//!
//! The ledger is the only way a pay run changes after generation: line
//! adjustments and inclusion changes, forward status transitions, and
//! deletion of drafts. Every audited field change produces one immutable
//! [`PayRunChange`] row committed atomically with the line update, and a
//! finalised run rejects everything without writing a row.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::round2;
use crate::error::{EngineError, EngineResult};
use crate::models::{LineStatus, PayRun, PayRunChange, PayRunLine, PayRunStatus};
use crate::store::EngineStore;

use super::{MutationAction, MutationGate, totals_over_included};

/// The editable surface of a pay run line. Fields left `None` are untouched.
#[derive(Debug, Clone, Default)]
pub struct LineEdit {
    /// New adjustment amount, replacing the current one.
    pub adjustments: Option<Decimal>,
    /// Reason recorded with the adjustment.
    pub adjustment_reason: Option<String>,
    /// New inclusion status.
    pub status: Option<LineStatus>,
}

/// Governs every post-creation mutation of pay runs and their lines.
pub struct PayRunLedger {
    store: Arc<dyn EngineStore>,
    gate: Arc<dyn MutationGate>,
}

impl PayRunLedger {
    /// Creates a ledger over a store and gate.
    pub fn new(store: Arc<dyn EngineStore>, gate: Arc<dyn MutationGate>) -> Self {
        PayRunLedger { store, gate }
    }

    /// Applies an edit to one line.
    ///
    /// Gating depends on the owning run's status: Draft and Reviewing accept
    /// edits freely; Approved requires a non-empty reason whenever the
    /// adjustment amount changes; Finalised rejects everything.
    ///
    /// The gross pay is recomputed as `round2(regular_pay + overtime_pay +
    /// adjustments)`. Hours and the base pay components are never re-derived
    /// here; only the builder computes those, from shifts.
    pub fn edit_line(
        &self,
        line_id: Uuid,
        edit: LineEdit,
        actor: &str,
    ) -> EngineResult<PayRunLine> {
        self.gate.authorize(actor, MutationAction::EditPayRunLine)?;
        let mut line = self.store.line(line_id)?;
        let run = self.store.run(line.pay_run_id)?;

        if run.status == PayRunStatus::Finalised {
            warn!(line_id = %line_id, run_id = %run.id, "Edit rejected: run is finalised");
            return Err(EngineError::Immutability {
                message: format!("run {} accepts no further line edits", run.id),
            });
        }

        let adjustment_changed = edit
            .adjustments
            .is_some_and(|new| new != line.adjustments);
        if run.status == PayRunStatus::Approved && adjustment_changed {
            let has_reason = edit
                .adjustment_reason
                .as_deref()
                .is_some_and(|r| !r.trim().is_empty());
            if !has_reason {
                return Err(EngineError::validation(
                    "adjustment_reason",
                    "a reason is required when adjusting a line on an approved run",
                ));
            }
        }

        let now = Utc::now();
        let supplied_reason = edit.adjustment_reason.clone();
        let mut changes = Vec::new();

        if let Some(new_adjustments) = edit.adjustments {
            if new_adjustments != line.adjustments {
                changes.push(PayRunChange {
                    id: Uuid::new_v4(),
                    pay_run_line_id: line.id,
                    field_changed: "adjustments".to_string(),
                    old_value: line.adjustments.to_string(),
                    new_value: new_adjustments.to_string(),
                    reason: supplied_reason.clone(),
                    changed_by: actor.to_string(),
                    changed_at: now,
                });
                line.adjustments = new_adjustments;
                line.gross_pay = round2(line.regular_pay + line.overtime_pay + line.adjustments);
            }
        }
        if let Some(reason) = edit.adjustment_reason {
            line.adjustment_reason = Some(reason);
        }
        if let Some(new_status) = edit.status {
            if new_status != line.status {
                changes.push(PayRunChange {
                    id: Uuid::new_v4(),
                    pay_run_line_id: line.id,
                    field_changed: "status".to_string(),
                    old_value: line_status_label(line.status).to_string(),
                    new_value: line_status_label(new_status).to_string(),
                    reason: supplied_reason.clone(),
                    changed_by: actor.to_string(),
                    changed_at: now,
                });
                line.status = new_status;
            }
        }

        let mut lines = self.store.lines_for_run(run.id);
        for existing in &mut lines {
            if existing.id == line.id {
                *existing = line.clone();
            }
        }
        let totals = totals_over_included(&lines);

        self.store
            .apply_line_edit(line.clone(), totals, changes)?;
        info!(line_id = %line.id, run_id = %run.id, "Pay run line updated");
        Ok(line)
    }

    /// Moves a run forward along Draft → Reviewing → Approved → Finalised.
    ///
    /// Entering Approved or Finalised stamps the acting user on the header.
    /// Backward and repeated transitions are rejected; a finalised run
    /// rejects transitions as immutable.
    pub fn transition_run(
        &self,
        run_id: Uuid,
        new_status: PayRunStatus,
        actor: &str,
    ) -> EngineResult<PayRun> {
        self.gate.authorize(actor, MutationAction::TransitionPayRun)?;
        let mut run = self.store.run(run_id)?;

        if run.status == PayRunStatus::Finalised {
            return Err(EngineError::Immutability {
                message: format!("run {} is finalised and cannot change status", run.id),
            });
        }
        if !run.status.can_transition_to(new_status) {
            return Err(EngineError::validation(
                "new_status",
                format!(
                    "cannot move from {} to {}",
                    run_status_label(run.status),
                    run_status_label(new_status)
                ),
            ));
        }

        run.status = new_status;
        match new_status {
            PayRunStatus::Approved => run.approved_by = Some(actor.to_string()),
            PayRunStatus::Finalised => run.finalised_by = Some(actor.to_string()),
            _ => {}
        }
        self.store.update_run(run.clone())?;
        info!(run_id = %run.id, status = run_status_label(run.status), "Pay run transitioned");
        Ok(run)
    }

    /// Deletes a draft run, cascading to its lines. Audit rows survive.
    pub fn delete_run(&self, run_id: Uuid, actor: &str) -> EngineResult<()> {
        self.gate.authorize(actor, MutationAction::DeletePayRun)?;
        let run = self.store.run(run_id)?;
        match run.status {
            PayRunStatus::Draft => {
                self.store.delete_run(run_id)?;
                info!(run_id = %run_id, "Draft pay run deleted");
                Ok(())
            }
            PayRunStatus::Finalised => Err(EngineError::Immutability {
                message: format!("run {} is finalised and cannot be deleted", run_id),
            }),
            _ => Err(EngineError::conflict(format!(
                "run {} has left draft and cannot be deleted",
                run_id
            ))),
        }
    }

    /// Loads a run header together with its lines.
    pub fn run_detail(&self, run_id: Uuid) -> EngineResult<(PayRun, Vec<PayRunLine>)> {
        let run = self.store.run(run_id)?;
        let lines = self.store.lines_for_run(run_id);
        Ok((run, lines))
    }

    /// The audit trail of one line, oldest first.
    pub fn line_changes(&self, line_id: Uuid) -> EngineResult<Vec<PayRunChange>> {
        self.store.line(line_id)?;
        Ok(self.store.changes_for_line(line_id))
    }
}

fn line_status_label(status: LineStatus) -> &'static str {
    match status {
        LineStatus::Included => "included",
        LineStatus::Excluded => "excluded",
    }
}

fn run_status_label(status: PayRunStatus) -> &'static str {
    match status {
        PayRunStatus::Draft => "draft",
        PayRunStatus::Reviewing => "reviewing",
        PayRunStatus::Approved => "approved",
        PayRunStatus::Finalised => "finalised",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TenantDirectory, TenantSettings};
    use crate::engine::{AllowAll, PayRunBuilder};
    use crate::models::{OvertimePolicy, RateHistoryEntry, ShiftRecord, ShiftStatus};
    use crate::store::{MemoryStore, RateStore, RunStore};
    use chrono::{Duration, NaiveDate, TimeZone};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        ledger: PayRunLedger,
        run_id: Uuid,
        line_id: Uuid,
    }

    /// Builds a real draft run with one 8-hour line at $20.
    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_rate_entry(RateHistoryEntry {
                employee_id: "emp_001".to_string(),
                hourly_rate: dec("20"),
                effective_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                notes: None,
                created_by: "mgr_004".to_string(),
                created_at: Utc::now(),
            })
            .unwrap();
        let start = Utc.with_ymd_and_hms(2024, 3, 11, 9, 0, 0).unwrap();
        store.add_shift(ShiftRecord {
            id: "s1".to_string(),
            tenant_id: "lakeside_care".to_string(),
            employee_id: "emp_001".to_string(),
            start,
            end: start + Duration::hours(8),
            break_minutes: 0,
            status: ShiftStatus::Completed,
        });

        let tenants = TenantDirectory::from_settings(vec![TenantSettings {
            id: "lakeside_care".to_string(),
            name: "Lakeside Care".to_string(),
            timezone: "UTC".to_string(),
            default_overtime: OvertimePolicy::disabled(),
        }])
        .unwrap();
        let builder = PayRunBuilder::new(store.clone(), Arc::new(tenants), Arc::new(AllowAll));
        let outcome = builder
            .build(
                "lakeside_care",
                NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 18).unwrap(),
                "mgr_004",
            )
            .unwrap();

        Fixture {
            ledger: PayRunLedger::new(store.clone(), Arc::new(AllowAll)),
            store,
            run_id: outcome.run.id,
            line_id: outcome.lines[0].id,
        }
    }

    fn adjust(amount: &str, reason: Option<&str>) -> LineEdit {
        LineEdit {
            adjustments: Some(dec(amount)),
            adjustment_reason: reason.map(|r| r.to_string()),
            status: None,
        }
    }

    #[test]
    fn test_draft_adjustment_updates_gross_and_audits() {
        let f = fixture();
        let line = f.ledger.edit_line(f.line_id, adjust("25.00", None), "mgr_004").unwrap();

        assert_eq!(line.adjustments, dec("25.00"));
        assert_eq!(line.gross_pay, dec("185.00")); // 160 + 25
        let changes = f.ledger.line_changes(f.line_id).unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field_changed, "adjustments");
        assert_eq!(changes[0].old_value, "0");
        assert_eq!(changes[0].new_value, "25.00");
        assert_eq!(changes[0].changed_by, "mgr_004");
    }

    #[test]
    fn test_run_totals_follow_adjustment() {
        let f = fixture();
        f.ledger.edit_line(f.line_id, adjust("-10.00", None), "mgr_004").unwrap();
        let run = f.store.run(f.run_id).unwrap();
        assert_eq!(run.totals.gross_pay, dec("150.00"));
    }

    #[test]
    fn test_excluding_a_line_removes_it_from_totals() {
        let f = fixture();
        let edit = LineEdit {
            status: Some(LineStatus::Excluded),
            ..LineEdit::default()
        };
        let line = f.ledger.edit_line(f.line_id, edit, "mgr_004").unwrap();
        assert_eq!(line.status, LineStatus::Excluded);

        let run = f.store.run(f.run_id).unwrap();
        assert_eq!(run.totals.staff_count, 0);
        assert_eq!(run.totals.gross_pay, Decimal::ZERO);

        let changes = f.ledger.line_changes(f.line_id).unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field_changed, "status");
        assert_eq!(changes[0].old_value, "included");
        assert_eq!(changes[0].new_value, "excluded");
    }

    #[test]
    fn test_approved_run_requires_reason_for_adjustment() {
        let f = fixture();
        f.ledger.transition_run(f.run_id, PayRunStatus::Reviewing, "mgr_004").unwrap();
        f.ledger.transition_run(f.run_id, PayRunStatus::Approved, "own_002").unwrap();

        let err = f
            .ledger
            .edit_line(f.line_id, adjust("5.00", None), "mgr_004")
            .unwrap_err();
        assert!(
            matches!(err, EngineError::Validation { ref field, .. } if field == "adjustment_reason")
        );

        let line = f
            .ledger
            .edit_line(f.line_id, adjust("5.00", Some("missed shift loading")), "mgr_004")
            .unwrap();
        assert_eq!(line.adjustments, dec("5.00"));
        assert_eq!(line.adjustment_reason.as_deref(), Some("missed shift loading"));
    }

    #[test]
    fn test_blank_reason_does_not_satisfy_approved_rule() {
        let f = fixture();
        f.ledger.transition_run(f.run_id, PayRunStatus::Reviewing, "mgr_004").unwrap();
        f.ledger.transition_run(f.run_id, PayRunStatus::Approved, "own_002").unwrap();

        let err = f
            .ledger
            .edit_line(f.line_id, adjust("5.00", Some("   ")), "mgr_004")
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation { .. }));
    }

    #[test]
    fn test_finalised_run_rejects_edits_without_audit_rows() {
        let f = fixture();
        f.ledger.transition_run(f.run_id, PayRunStatus::Reviewing, "mgr_004").unwrap();
        f.ledger.transition_run(f.run_id, PayRunStatus::Approved, "own_002").unwrap();
        f.ledger.transition_run(f.run_id, PayRunStatus::Finalised, "own_002").unwrap();

        let err = f
            .ledger
            .edit_line(f.line_id, adjust("5.00", Some("too late")), "mgr_004")
            .unwrap_err();
        assert!(matches!(err, EngineError::Immutability { .. }));
        assert!(f.ledger.line_changes(f.line_id).unwrap().is_empty());
    }

    #[test]
    fn test_adjustment_audit_precedes_second_edit() {
        let f = fixture();
        f.ledger.edit_line(f.line_id, adjust("5.00", None), "mgr_004").unwrap();
        f.ledger.edit_line(f.line_id, adjust("7.50", None), "mgr_004").unwrap();

        let changes = f.ledger.line_changes(f.line_id).unwrap();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].new_value, "5.00");
        assert_eq!(changes[1].old_value, "5.00");
        assert_eq!(changes[1].new_value, "7.50");
    }

    #[test]
    fn test_setting_same_adjustment_writes_no_audit_row() {
        let f = fixture();
        f.ledger.edit_line(f.line_id, adjust("0", None), "mgr_004").unwrap();
        assert!(f.ledger.line_changes(f.line_id).unwrap().is_empty());
    }

    #[test]
    fn test_edit_never_rederives_hours() {
        let f = fixture();
        let before = f.store.line(f.line_id).unwrap();
        let after = f.ledger.edit_line(f.line_id, adjust("12.00", None), "mgr_004").unwrap();
        assert_eq!(after.regular_hours, before.regular_hours);
        assert_eq!(after.overtime_hours, before.overtime_hours);
        assert_eq!(after.regular_pay, before.regular_pay);
        assert_eq!(after.overtime_pay, before.overtime_pay);
    }

    #[test]
    fn test_transitions_stamp_actors() {
        let f = fixture();
        f.ledger.transition_run(f.run_id, PayRunStatus::Reviewing, "mgr_004").unwrap();
        let approved = f
            .ledger
            .transition_run(f.run_id, PayRunStatus::Approved, "own_002")
            .unwrap();
        assert_eq!(approved.approved_by.as_deref(), Some("own_002"));

        let finalised = f
            .ledger
            .transition_run(f.run_id, PayRunStatus::Finalised, "own_003")
            .unwrap();
        assert_eq!(finalised.finalised_by.as_deref(), Some("own_003"));
        assert_eq!(finalised.approved_by.as_deref(), Some("own_002"));
    }

    #[test]
    fn test_backward_transition_rejected() {
        let f = fixture();
        f.ledger.transition_run(f.run_id, PayRunStatus::Reviewing, "mgr_004").unwrap();
        let err = f
            .ledger
            .transition_run(f.run_id, PayRunStatus::Draft, "mgr_004")
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation { .. }));
    }

    #[test]
    fn test_finalised_run_cannot_transition() {
        let f = fixture();
        f.ledger.transition_run(f.run_id, PayRunStatus::Finalised, "own_002").unwrap();
        let err = f
            .ledger
            .transition_run(f.run_id, PayRunStatus::Approved, "own_002")
            .unwrap_err();
        assert!(matches!(err, EngineError::Immutability { .. }));
    }

    #[test]
    fn test_draft_run_can_be_deleted() {
        let f = fixture();
        f.ledger.delete_run(f.run_id, "mgr_004").unwrap();
        assert!(f.store.run(f.run_id).is_err());
        assert!(f.store.line(f.line_id).is_err());
    }

    #[test]
    fn test_non_draft_run_cannot_be_deleted() {
        let f = fixture();
        f.ledger.transition_run(f.run_id, PayRunStatus::Reviewing, "mgr_004").unwrap();
        let err = f.ledger.delete_run(f.run_id, "mgr_004").unwrap_err();
        assert!(matches!(err, EngineError::Conflict { .. }));
    }

    #[test]
    fn test_finalised_run_delete_is_immutable() {
        let f = fixture();
        f.ledger.transition_run(f.run_id, PayRunStatus::Finalised, "own_002").unwrap();
        let err = f.ledger.delete_run(f.run_id, "mgr_004").unwrap_err();
        assert!(matches!(err, EngineError::Immutability { .. }));
    }

    struct DenyAll;

    impl MutationGate for DenyAll {
        fn authorize(&self, actor: &str, action: MutationAction) -> crate::error::EngineResult<()> {
            Err(crate::engine::forbidden(actor, action))
        }
    }

    #[test]
    fn test_denied_actor_cannot_edit() {
        let f = fixture();
        let denying = PayRunLedger::new(f.store.clone(), Arc::new(DenyAll));
        let err = denying
            .edit_line(f.line_id, adjust("5.00", None), "intruder")
            .unwrap_err();
        assert!(matches!(err, EngineError::Forbidden { .. }));
        assert!(f.ledger.line_changes(f.line_id).unwrap().is_empty());
    }
}
