//! Tenant settings types.
//!
//! This module contains the strongly-typed settings structures that are
//! deserialized from the tenant directory YAML file.

use serde::Deserialize;

use crate::models::OvertimePolicy;

/// Per-tenant settings the engine needs: the timezone every boundary and
/// calendar-day attribution is anchored in, and the overtime policy applied
/// to employees without a per-employee override.
#[derive(Debug, Clone, Deserialize)]
pub struct TenantSettings {
    /// The tenant identifier used throughout the engine.
    pub id: String,
    /// Human-readable tenant name.
    pub name: String,
    /// IANA timezone name (e.g., "Australia/Sydney").
    pub timezone: String,
    /// Overtime policy for employees without an override.
    pub default_overtime: OvertimePolicy,
}

/// Top-level structure of the tenant directory file.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TenantsFile {
    /// Every tenant the engine serves.
    pub tenants: Vec<TenantSettings>,
}
