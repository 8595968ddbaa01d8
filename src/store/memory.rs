//! In-memory implementation of every repository trait.
//!
//! Payroll data is partitioned per tenant behind its own mutex. A unit of
//! work takes the tenant's lock for its whole lifetime and edits a staged
//! copy, so writers for one tenant are serialized and entry numbers are
//! allocated without races. Committing swaps the staged copy in; dropping
//! it leaves the published data untouched.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::config::{PayrollConfig, TenantSeed};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Employee, EmployerProfile, EntryStatus, PayrollEntry, PayrollPeriod, Provisions,
};

use super::{
    ConfigStore, EmployeeReader, EmployeeWriter, PayrollStore, TenantReader, UnitOfWork,
};

#[derive(Debug, Clone, Default)]
struct PayrollData {
    periods: HashMap<Uuid, PayrollPeriod>,
    entries: HashMap<Uuid, PayrollEntry>,
    last_entry_number: u64,
    numbering_floor: u64,
}

impl PayrollData {
    fn sorted_entries(&self, period_id: Uuid) -> Vec<PayrollEntry> {
        let mut entries: Vec<PayrollEntry> = self
            .entries
            .values()
            .filter(|e| e.period_id == period_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.entry_number);
        entries
    }
}

#[derive(Debug, Default)]
struct Registry {
    tenants: HashSet<Uuid>,
    employees: HashMap<Uuid, HashMap<Uuid, Employee>>,
    configs: HashMap<Uuid, Vec<PayrollConfig>>,
    authorities: HashMap<Uuid, EmployerProfile>,
}

/// Thread-safe in-memory store shared by the service and the HTTP layer.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    registry: Arc<RwLock<Registry>>,
    payroll: Arc<Mutex<HashMap<Uuid, Arc<Mutex<PayrollData>>>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tenant with an optional authority profile.
    pub async fn register_tenant(&self, tenant_id: Uuid, authority: Option<EmployerProfile>) {
        let mut registry = self.registry.write().await;
        registry.tenants.insert(tenant_id);
        match authority {
            Some(profile) => {
                registry.authorities.insert(tenant_id, profile);
            }
            None => {
                registry.authorities.remove(&tenant_id);
            }
        }
    }

    /// Loads a tenant seed: profile, configuration and employees.
    pub async fn seed(&self, seed: TenantSeed) -> EngineResult<()> {
        let tenant_id = seed.tenant_id;
        self.register_tenant(tenant_id, Some(seed.employer)).await;
        self.save_config(tenant_id, seed.config).await?;
        for employee in seed.employees {
            self.insert_employee(tenant_id, employee).await?;
        }
        Ok(())
    }

    async fn tenant_payroll(&self, tenant_id: Uuid) -> Arc<Mutex<PayrollData>> {
        let mut tenants = self.payroll.lock().await;
        tenants.entry(tenant_id).or_default().clone()
    }
}

#[async_trait]
impl EmployeeReader for MemoryStore {
    async fn find_employee(
        &self,
        tenant_id: Uuid,
        employee_id: Uuid,
    ) -> EngineResult<Option<Employee>> {
        let registry = self.registry.read().await;
        Ok(registry
            .employees
            .get(&tenant_id)
            .and_then(|employees| employees.get(&employee_id))
            .cloned())
    }

    async fn list_active_employees(&self, tenant_id: Uuid) -> EngineResult<Vec<Employee>> {
        let registry = self.registry.read().await;
        let mut active: Vec<Employee> = registry
            .employees
            .get(&tenant_id)
            .map(|employees| {
                employees
                    .values()
                    .filter(|e| e.is_active())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        active.sort_by(|a, b| a.document_number.cmp(&b.document_number));
        Ok(active)
    }
}

#[async_trait]
impl EmployeeWriter for MemoryStore {
    async fn insert_employee(&self, tenant_id: Uuid, employee: Employee) -> EngineResult<()> {
        let mut registry = self.registry.write().await;
        let employees = registry.employees.entry(tenant_id).or_default();
        if employees
            .values()
            .any(|e| e.document_number == employee.document_number)
        {
            return Err(EngineError::conflict(format!(
                "An employee with document number {} already exists",
                employee.document_number
            )));
        }
        if employees.contains_key(&employee.id) {
            return Err(EngineError::conflict(format!(
                "Employee {} already exists",
                employee.id
            )));
        }
        employees.insert(employee.id, employee);
        Ok(())
    }

    async fn update_employee(&self, tenant_id: Uuid, employee: Employee) -> EngineResult<()> {
        let mut registry = self.registry.write().await;
        let employees = registry.employees.entry(tenant_id).or_default();
        if employees.values().any(|e| {
            e.id != employee.id && e.document_number == employee.document_number
        }) {
            return Err(EngineError::conflict(format!(
                "An employee with document number {} already exists",
                employee.document_number
            )));
        }
        match employees.get_mut(&employee.id) {
            Some(existing) => {
                *existing = employee;
                Ok(())
            }
            None => Err(EngineError::not_found("Employee", employee.id)),
        }
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn active_config(&self, tenant_id: Uuid) -> EngineResult<Option<PayrollConfig>> {
        let registry = self.registry.read().await;
        Ok(registry
            .configs
            .get(&tenant_id)
            .and_then(|versions| versions.last())
            .cloned())
    }

    async fn save_config(&self, tenant_id: Uuid, config: PayrollConfig) -> EngineResult<()> {
        let floor = config.numbering.starting_number;
        {
            let mut registry = self.registry.write().await;
            registry.configs.entry(tenant_id).or_default().push(config);
        }
        let payroll = self.tenant_payroll(tenant_id).await;
        payroll.lock().await.numbering_floor = floor;
        Ok(())
    }
}

#[async_trait]
impl TenantReader for MemoryStore {
    async fn tenant_exists(&self, tenant_id: Uuid) -> EngineResult<bool> {
        Ok(self.registry.read().await.tenants.contains(&tenant_id))
    }

    async fn authority_profile(&self, tenant_id: Uuid) -> EngineResult<Option<EmployerProfile>> {
        Ok(self.registry.read().await.authorities.get(&tenant_id).cloned())
    }
}

#[async_trait]
impl PayrollStore for MemoryStore {
    async fn find_period(
        &self,
        tenant_id: Uuid,
        period_id: Uuid,
    ) -> EngineResult<Option<PayrollPeriod>> {
        let payroll = self.tenant_payroll(tenant_id).await;
        let data = payroll.lock().await;
        Ok(data.periods.get(&period_id).cloned())
    }

    async fn list_periods(&self, tenant_id: Uuid) -> EngineResult<Vec<PayrollPeriod>> {
        let payroll = self.tenant_payroll(tenant_id).await;
        let data = payroll.lock().await;
        let mut periods: Vec<PayrollPeriod> = data.periods.values().cloned().collect();
        periods.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(periods)
    }

    async fn find_entry(
        &self,
        tenant_id: Uuid,
        entry_id: Uuid,
    ) -> EngineResult<Option<PayrollEntry>> {
        let payroll = self.tenant_payroll(tenant_id).await;
        let data = payroll.lock().await;
        Ok(data.entries.get(&entry_id).cloned())
    }

    async fn list_entries(
        &self,
        tenant_id: Uuid,
        period_id: Uuid,
    ) -> EngineResult<Vec<PayrollEntry>> {
        let payroll = self.tenant_payroll(tenant_id).await;
        let data = payroll.lock().await;
        Ok(data.sorted_entries(period_id))
    }

    async fn sum_posted_provisions(
        &self,
        tenant_id: Uuid,
        employee_id: Uuid,
    ) -> EngineResult<Provisions> {
        let payroll = self.tenant_payroll(tenant_id).await;
        let data = payroll.lock().await;
        let mut total = Provisions::default();
        data.entries
            .values()
            .filter(|e| e.employee_id == employee_id && e.status.is_posted())
            .for_each(|e| total.accumulate(&e.breakdown.provisions));
        Ok(total)
    }

    async fn has_open_entries(&self, tenant_id: Uuid, employee_id: Uuid) -> EngineResult<bool> {
        let payroll = self.tenant_payroll(tenant_id).await;
        let data = payroll.lock().await;
        Ok(data
            .entries
            .values()
            .any(|e| e.employee_id == employee_id && e.status.is_editable()))
    }

    async fn begin(&self, tenant_id: Uuid) -> EngineResult<Box<dyn UnitOfWork>> {
        let payroll = self.tenant_payroll(tenant_id).await;
        let guard = payroll.lock_owned().await;
        let staged = guard.clone();
        debug!(tenant_id = %tenant_id, "Unit of work started");
        Ok(Box::new(MemoryUnitOfWork {
            tenant_id,
            guard,
            staged,
        }))
    }
}

struct MemoryUnitOfWork {
    tenant_id: Uuid,
    guard: OwnedMutexGuard<PayrollData>,
    staged: PayrollData,
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn find_period(&mut self, period_id: Uuid) -> EngineResult<Option<PayrollPeriod>> {
        Ok(self.staged.periods.get(&period_id).cloned())
    }

    async fn list_periods(&mut self) -> EngineResult<Vec<PayrollPeriod>> {
        Ok(self.staged.periods.values().cloned().collect())
    }

    async fn insert_period(&mut self, period: PayrollPeriod) -> EngineResult<()> {
        if period.tenant_id != self.tenant_id {
            return Err(EngineError::Storage {
                message: format!(
                    "Period {} belongs to another tenant than this unit of work",
                    period.id
                ),
            });
        }
        if self.staged.periods.contains_key(&period.id) {
            return Err(EngineError::conflict(format!(
                "Payroll period {} already exists",
                period.id
            )));
        }
        self.staged.periods.insert(period.id, period);
        Ok(())
    }

    async fn find_entry(&mut self, entry_id: Uuid) -> EngineResult<Option<PayrollEntry>> {
        Ok(self.staged.entries.get(&entry_id).cloned())
    }

    async fn find_entry_for_employee(
        &mut self,
        period_id: Uuid,
        employee_id: Uuid,
    ) -> EngineResult<Option<PayrollEntry>> {
        Ok(self
            .staged
            .entries
            .values()
            .find(|e| e.period_id == period_id && e.employee_id == employee_id)
            .cloned())
    }

    async fn list_entries(&mut self, period_id: Uuid) -> EngineResult<Vec<PayrollEntry>> {
        Ok(self.staged.sorted_entries(period_id))
    }

    async fn next_entry_number(&mut self) -> EngineResult<u64> {
        let next = (self.staged.last_entry_number + 1).max(self.staged.numbering_floor);
        self.staged.last_entry_number = next;
        Ok(next)
    }

    async fn upsert_entry(&mut self, entry: PayrollEntry) -> EngineResult<()> {
        if entry.tenant_id != self.tenant_id {
            return Err(EngineError::Storage {
                message: format!(
                    "Entry {} belongs to another tenant than this unit of work",
                    entry.id
                ),
            });
        }
        let duplicate = self
            .staged
            .entries
            .values()
            .find(|e| {
                e.id != entry.id
                    && e.period_id == entry.period_id
                    && e.employee_id == entry.employee_id
            })
            .map(|e| e.id);
        if let Some(old_id) = duplicate {
            self.staged.entries.remove(&old_id);
        }
        self.staged.entries.insert(entry.id, entry);
        Ok(())
    }

    async fn update_entry_statuses(
        &mut self,
        period_id: Uuid,
        status: EntryStatus,
    ) -> EngineResult<usize> {
        let now = chrono::Utc::now();
        let mut changed = 0;
        for entry in self
            .staged
            .entries
            .values_mut()
            .filter(|e| e.period_id == period_id && e.status != status)
        {
            entry.status = status;
            entry.updated_at = now;
            changed += 1;
        }
        Ok(changed)
    }

    async fn update_period(&mut self, period: PayrollPeriod) -> EngineResult<()> {
        if !self.staged.periods.contains_key(&period.id) {
            return Err(EngineError::not_found("Payroll period", period.id));
        }
        self.staged.periods.insert(period.id, period);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> EngineResult<()> {
        let MemoryUnitOfWork {
            tenant_id,
            mut guard,
            staged,
        } = *self;
        *guard = staged;
        debug!(tenant_id = %tenant_id, "Unit of work committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> EngineResult<()> {
        debug!(tenant_id = %self.tenant_id, "Unit of work rolled back");
        Ok(())
    }
}
