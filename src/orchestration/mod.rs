//! Payroll command orchestration.
//!
//! Orchestrators validate state-machine guards, call the pure calculation
//! engine and persist results through the repository traits in
//! [`crate::store`]. Every call takes an explicit [`TenantContext`].

mod context;
mod entry;
mod guards;
mod period;
mod service;

pub use context::{TenantContext, require_software};
pub use entry::EntryOrchestrator;
pub use guards::{
    MAX_INPUT_AMOUNT, MAX_OVERTIME_HOURS, ensure_all_entries_calculated,
    ensure_all_entries_documented, ensure_entry_approved, ensure_entry_editable,
    ensure_has_active_employees, ensure_no_open_entries, ensure_no_overlap, ensure_period_approved,
    ensure_period_transition, validate_entry_inputs, validate_period_range,
};
pub use period::{NewPeriod, PeriodOrchestrator, aggregate_totals};
pub(crate) use period::{find_period_in, finish};
pub use service::PayrollService;
