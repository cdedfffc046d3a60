//! Tenant directory loading functionality.
//!
//! This module provides the [`TenantDirectory`] type for loading tenant
//! settings from a YAML file and answering per-tenant lookups.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono_tz::Tz;

use crate::calculation::parse_timezone;
use crate::error::{EngineError, EngineResult};

use super::types::{TenantSettings, TenantsFile};

/// Loads and provides access to tenant settings.
///
/// Every timezone name is validated at load, so a request-time lookup can
/// only fail for an unknown tenant, never for a malformed setting.
///
/// # File Structure
///
/// ```text
/// tenants:
///   - id: lakeside_care
///     name: Lakeside Care
///     timezone: Australia/Sydney
///     default_overtime:
///       enabled: true
///       contracted_weekly_hours: "38"
///       rule_type: multiplier
///       multiplier: "1.5"
/// ```
#[derive(Debug, Clone)]
pub struct TenantDirectory {
    tenants: HashMap<String, TenantSettings>,
}

impl TenantDirectory {
    /// Loads the directory from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigNotFound`] when the file is missing,
    /// [`EngineError::ConfigParseError`] for invalid YAML, and
    /// [`EngineError::Validation`] for an unknown timezone or duplicate
    /// tenant id.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path.display().to_string(),
        })?;
        let file: TenantsFile =
            serde_yaml::from_str(&raw).map_err(|err| EngineError::ConfigParseError {
                path: path.display().to_string(),
                message: err.to_string(),
            })?;
        Self::from_settings(file.tenants)
    }

    /// Builds the directory from already-constructed settings.
    pub fn from_settings(settings: Vec<TenantSettings>) -> EngineResult<Self> {
        let mut tenants = HashMap::new();
        for tenant in settings {
            parse_timezone(&tenant.timezone)?;
            if tenants.insert(tenant.id.clone(), tenant).is_some() {
                return Err(EngineError::validation(
                    "tenants",
                    "duplicate tenant id in settings",
                ));
            }
        }
        Ok(TenantDirectory { tenants })
    }

    /// Looks up one tenant's settings.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] for an unknown tenant.
    pub fn get(&self, tenant_id: &str) -> EngineResult<&TenantSettings> {
        self.tenants.get(tenant_id).ok_or_else(|| {
            EngineError::validation("tenant_id", format!("unknown tenant '{}'", tenant_id))
        })
    }

    /// The tenant's timezone, parsed.
    pub fn timezone(&self, tenant_id: &str) -> EngineResult<Tz> {
        parse_timezone(&self.get(tenant_id)?.timezone)
    }
}
