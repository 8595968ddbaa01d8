//! Application state for the payroll API.

use std::sync::Arc;

use crate::orchestration::PayrollService;
use crate::store::MemoryStore;

/// Shared application state.
///
/// Holds the payroll service every handler dispatches to.
#[derive(Clone)]
pub struct AppState {
    service: Arc<PayrollService>,
}

impl AppState {
    /// Creates a new application state around a service.
    pub fn new(service: PayrollService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Creates a state backed by an in-memory store.
    pub fn from_store(store: MemoryStore) -> Self {
        Self::new(PayrollService::from_store(store))
    }

    /// Returns the payroll service.
    pub fn service(&self) -> &PayrollService {
        &self.service
    }
}
