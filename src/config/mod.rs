//! Tenant settings loading and lookup.
//!
//! This module provides the tenant settings directory: per-tenant timezone
//! and overtime defaults, loaded once at startup from a YAML file and
//! validated before any request is served.
//!
//! # Example
//!
//! ```no_run
//! use payrun_engine::config::TenantDirectory;
//!
//! let tenants = TenantDirectory::load("./config/tenants.yaml").unwrap();
//! let settings = tenants.get("lakeside_care").unwrap();
//! println!("Tenant timezone: {}", settings.timezone);
//! ```

mod loader;
mod types;

pub use loader::TenantDirectory;
pub use types::TenantSettings;
