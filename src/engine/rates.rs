//! Maintenance of the append-only rate history.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::info;

use crate::config::TenantDirectory;
use crate::error::{EngineError, EngineResult};
use crate::models::RateHistoryEntry;
use crate::store::EngineStore;

use super::{MutationAction, MutationGate};

/// A request to append one rate history entry.
#[derive(Debug, Clone)]
pub struct NewRateEntry {
    /// The tenant the employee belongs to.
    pub tenant_id: String,
    /// The employee the rate applies to.
    pub employee_id: String,
    /// The hourly rate, non-negative.
    pub hourly_rate: Decimal,
    /// The calendar date from which the rate applies.
    pub effective_date: NaiveDate,
    /// Optional free-text note.
    pub notes: Option<String>,
}

/// Appends and deletes rate history entries under the append-only rules:
/// one entry per employee per effective date, and deletion only while the
/// effective date is still in the future in the tenant's timezone.
pub struct RateHistoryService {
    store: Arc<dyn EngineStore>,
    tenants: Arc<TenantDirectory>,
    gate: Arc<dyn MutationGate>,
}

impl RateHistoryService {
    /// Creates the service over a store, tenant directory, and gate.
    pub fn new(
        store: Arc<dyn EngineStore>,
        tenants: Arc<TenantDirectory>,
        gate: Arc<dyn MutationGate>,
    ) -> Self {
        RateHistoryService {
            store,
            tenants,
            gate,
        }
    }

    /// Appends an entry.
    ///
    /// # Errors
    ///
    /// [`EngineError::Validation`] for a negative rate or unknown tenant;
    /// [`EngineError::Conflict`] when an entry already exists for the
    /// employee on that effective date.
    pub fn add_entry(&self, request: NewRateEntry, actor: &str) -> EngineResult<RateHistoryEntry> {
        self.gate.authorize(actor, MutationAction::AddRateEntry)?;
        if request.hourly_rate < Decimal::ZERO {
            return Err(EngineError::validation(
                "hourly_rate",
                format!("must not be negative, got {}", request.hourly_rate),
            ));
        }
        self.tenants.get(&request.tenant_id)?;

        let entry = RateHistoryEntry {
            employee_id: request.employee_id,
            hourly_rate: request.hourly_rate,
            effective_date: request.effective_date,
            notes: request.notes,
            created_by: actor.to_string(),
            created_at: Utc::now(),
        };
        self.store.insert_rate_entry(entry.clone())?;
        info!(
            employee_id = %entry.employee_id,
            effective_date = %entry.effective_date,
            "Rate history entry recorded"
        );
        Ok(entry)
    }

    /// Deletes an entry whose effective date has not yet arrived.
    ///
    /// # Errors
    ///
    /// [`EngineError::Validation`] once the entry has taken effect;
    /// [`EngineError::NotFound`] when no such entry exists.
    pub fn delete_entry(
        &self,
        tenant_id: &str,
        employee_id: &str,
        effective_date: NaiveDate,
        actor: &str,
    ) -> EngineResult<()> {
        self.gate.authorize(actor, MutationAction::DeleteRateEntry)?;
        let tz = self.tenants.timezone(tenant_id)?;
        let today = Utc::now().with_timezone(&tz).date_naive();
        if effective_date <= today {
            return Err(EngineError::validation(
                "effective_date",
                format!(
                    "rate effective {} is already in effect and cannot be deleted",
                    effective_date
                ),
            ));
        }
        self.store.remove_rate_entry(employee_id, effective_date)?;
        info!(
            employee_id = %employee_id,
            effective_date = %effective_date,
            "Future rate history entry deleted"
        );
        Ok(())
    }
}
