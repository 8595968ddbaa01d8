//! Repository interfaces consumed by the payroll core.
//!
//! One narrow trait per aggregate, exposing exactly the query shapes the
//! orchestrators need. Multi-row writes go through a [`UnitOfWork`] that
//! either commits every staged change or none of them.

mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::config::PayrollConfig;
use crate::error::EngineResult;
use crate::models::{
    Employee, EmployerProfile, EntryStatus, PayrollEntry, PayrollPeriod, Provisions,
};

pub use memory::MemoryStore;

/// Read access to the tenant's employees.
#[async_trait]
pub trait EmployeeReader: Send + Sync {
    /// Finds one employee of the tenant.
    async fn find_employee(&self, tenant_id: Uuid, employee_id: Uuid)
    -> EngineResult<Option<Employee>>;

    /// Lists the tenant's active employees.
    async fn list_active_employees(&self, tenant_id: Uuid) -> EngineResult<Vec<Employee>>;
}

/// Write access to the tenant's employees.
#[async_trait]
pub trait EmployeeWriter: Send + Sync {
    /// Registers a new employee. Fails with `Conflict` when the document
    /// number is already taken within the tenant.
    async fn insert_employee(&self, tenant_id: Uuid, employee: Employee) -> EngineResult<()>;

    /// Replaces an existing employee record.
    async fn update_employee(&self, tenant_id: Uuid, employee: Employee) -> EngineResult<()>;
}

/// Per-tenant payroll configuration, one active version at a time.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// The configuration currently in force for the tenant.
    async fn active_config(&self, tenant_id: Uuid) -> EngineResult<Option<PayrollConfig>>;

    /// Stores a new configuration version and makes it active.
    async fn save_config(&self, tenant_id: Uuid, config: PayrollConfig) -> EngineResult<()>;
}

/// Tenant directory: resolves the authority configuration record.
#[async_trait]
pub trait TenantReader: Send + Sync {
    /// Whether the tenant exists.
    async fn tenant_exists(&self, tenant_id: Uuid) -> EngineResult<bool>;

    /// The tenant's tax-authority profile, if one has been configured.
    async fn authority_profile(&self, tenant_id: Uuid) -> EngineResult<Option<EmployerProfile>>;
}

/// Periods and entries.
#[async_trait]
pub trait PayrollStore: Send + Sync {
    /// Finds one period of the tenant.
    async fn find_period(&self, tenant_id: Uuid, period_id: Uuid)
    -> EngineResult<Option<PayrollPeriod>>;

    /// Lists the tenant's periods, most recent start date first.
    async fn list_periods(&self, tenant_id: Uuid) -> EngineResult<Vec<PayrollPeriod>>;

    /// Finds one entry of the tenant.
    async fn find_entry(&self, tenant_id: Uuid, entry_id: Uuid)
    -> EngineResult<Option<PayrollEntry>>;

    /// Lists the entries of a period ordered by entry number.
    async fn list_entries(&self, tenant_id: Uuid, period_id: Uuid)
    -> EngineResult<Vec<PayrollEntry>>;

    /// Sums the provisions of the employee's APPROVED and CLOSED entries.
    async fn sum_posted_provisions(&self, tenant_id: Uuid, employee_id: Uuid)
    -> EngineResult<Provisions>;

    /// Whether the employee has DRAFT or CALCULATED entries.
    async fn has_open_entries(&self, tenant_id: Uuid, employee_id: Uuid) -> EngineResult<bool>;

    /// Starts an atomic unit of work scoped to one tenant.
    ///
    /// Only one unit of work per tenant is open at a time; a second caller
    /// waits until the first commits or rolls back.
    async fn begin(&self, tenant_id: Uuid) -> EngineResult<Box<dyn UnitOfWork>>;
}

/// An all-or-nothing batch of period/entry writes.
///
/// Dropping a unit of work without committing discards every staged change,
/// including entry numbers it allocated.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Reads a period, seeing this unit's staged writes.
    async fn find_period(&mut self, period_id: Uuid) -> EngineResult<Option<PayrollPeriod>>;

    /// Lists the tenant's periods, seeing this unit's staged writes.
    async fn list_periods(&mut self) -> EngineResult<Vec<PayrollPeriod>>;

    /// Stages a new period.
    async fn insert_period(&mut self, period: PayrollPeriod) -> EngineResult<()>;

    /// Reads an entry, seeing this unit's staged writes.
    async fn find_entry(&mut self, entry_id: Uuid) -> EngineResult<Option<PayrollEntry>>;

    /// Finds the entry for an employee within a period.
    async fn find_entry_for_employee(
        &mut self,
        period_id: Uuid,
        employee_id: Uuid,
    ) -> EngineResult<Option<PayrollEntry>>;

    /// Lists the entries of a period, seeing this unit's staged writes.
    async fn list_entries(&mut self, period_id: Uuid) -> EngineResult<Vec<PayrollEntry>>;

    /// Allocates the next tenant-unique entry number.
    async fn next_entry_number(&mut self) -> EngineResult<u64>;

    /// Inserts or replaces an entry, keyed by (tenant, period, employee).
    async fn upsert_entry(&mut self, entry: PayrollEntry) -> EngineResult<()>;

    /// Moves every entry of a period to `status`, returning how many changed.
    async fn update_entry_statuses(
        &mut self,
        period_id: Uuid,
        status: EntryStatus,
    ) -> EngineResult<usize>;

    /// Replaces a period.
    async fn update_period(&mut self, period: PayrollPeriod) -> EngineResult<()>;

    /// Publishes every staged change.
    async fn commit(self: Box<Self>) -> EngineResult<()>;

    /// Discards every staged change.
    async fn rollback(self: Box<Self>) -> EngineResult<()>;
}
