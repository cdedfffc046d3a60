//! Application state for the pay-run engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::TenantDirectory;
use crate::engine::{AllowAll, MutationGate, PayRunBuilder, PayRunLedger, RateHistoryService};
use crate::store::{EngineStore, MemoryStore};

/// Shared application state.
///
/// Holds the store, the tenant directory, and the mutation gate; handlers
/// assemble engine services from these per request.
#[derive(Clone)]
pub struct AppState {
    store: Arc<MemoryStore>,
    tenants: Arc<TenantDirectory>,
    gate: Arc<dyn MutationGate>,
}

impl AppState {
    /// Creates state with a permissive mutation gate.
    pub fn new(store: MemoryStore, tenants: TenantDirectory) -> Self {
        Self::with_gate(store, tenants, Arc::new(AllowAll))
    }

    /// Creates state with an application-supplied mutation gate.
    pub fn with_gate(
        store: MemoryStore,
        tenants: TenantDirectory,
        gate: Arc<dyn MutationGate>,
    ) -> Self {
        AppState {
            store: Arc::new(store),
            tenants: Arc::new(tenants),
            gate,
        }
    }

    /// The pay run builder.
    pub fn builder(&self) -> PayRunBuilder {
        PayRunBuilder::new(self.engine_store(), self.tenants.clone(), self.gate.clone())
    }

    /// The pay run ledger.
    pub fn ledger(&self) -> PayRunLedger {
        PayRunLedger::new(self.engine_store(), self.gate.clone())
    }

    /// The rate history service.
    pub fn rates(&self) -> RateHistoryService {
        RateHistoryService::new(self.engine_store(), self.tenants.clone(), self.gate.clone())
    }

    /// The tenant directory.
    pub fn tenants(&self) -> &TenantDirectory {
        &self.tenants
    }

    fn engine_store(&self) -> Arc<dyn EngineStore> {
        self.store.clone()
    }
}
