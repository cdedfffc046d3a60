//! Request types for the pay-run engine API.
//!
//! This module defines the JSON request structures for the engine's
//! endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{LineStatus, PayRunStatus, PeriodScheme};

/// Request body for `POST /pay-periods/compute`.
#[derive(Debug, Clone, Deserialize)]
pub struct ComputePayPeriodRequest {
    /// Any instant inside the desired period.
    pub reference_date: DateTime<Utc>,
    /// The period scheme configuration.
    pub scheme: PeriodScheme,
    /// IANA timezone name the boundaries are anchored in.
    pub timezone: String,
}

/// Request body for `POST /pay-runs`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePayRunRequest {
    /// The tenant to generate the run for.
    pub tenant_id: String,
    /// First calendar day of the period (inclusive).
    pub period_start: NaiveDate,
    /// Day after the last calendar day of the period (exclusive).
    pub period_end: NaiveDate,
    /// The acting user.
    pub actor_id: String,
}

/// Request body for `PATCH /pay-run-lines/:line_id`.
#[derive(Debug, Clone, Deserialize)]
pub struct EditPayRunLineRequest {
    /// New adjustment amount, replacing the current one.
    #[serde(default)]
    pub adjustments: Option<Decimal>,
    /// Reason recorded with the adjustment.
    #[serde(default)]
    pub adjustment_reason: Option<String>,
    /// New inclusion status.
    #[serde(default)]
    pub status: Option<LineStatus>,
    /// The acting user.
    pub actor_id: String,
}

/// Request body for `POST /pay-runs/:run_id/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct TransitionPayRunRequest {
    /// The status to move the run to; forward only.
    pub new_status: PayRunStatus,
    /// The acting user.
    pub actor_id: String,
}

/// Request body for `POST /rate-history`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddRateEntryRequest {
    /// The tenant the employee belongs to.
    pub tenant_id: String,
    /// The employee the rate applies to.
    pub employee_id: String,
    /// The hourly rate, non-negative.
    pub hourly_rate: Decimal,
    /// The calendar date from which the rate applies.
    pub effective_date: NaiveDate,
    /// Optional free-text note.
    #[serde(default)]
    pub notes: Option<String>,
    /// The acting user.
    pub actor_id: String,
}

/// Query parameters for `DELETE /rate-history/:employee_id/:effective_date`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteRateEntryParams {
    /// The tenant the employee belongs to.
    pub tenant_id: String,
    /// The acting user.
    pub actor_id: String,
}

/// Query parameters for `DELETE /pay-runs/:run_id`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeletePayRunParams {
    /// The acting user; defaults to "system" when omitted.
    #[serde(default)]
    pub actor_id: Option<String>,
}
