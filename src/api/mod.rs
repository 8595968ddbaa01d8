//! HTTP API for the payroll engine.
//!
//! A thin axum adapter over [`crate::orchestration::PayrollService`]; all
//! rules live in the core.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{TENANT_HEADER, create_router};
pub use request::{
    ApprovePeriodRequest, BenefitQuery, CreatePeriodRequest, LiquidationQuery,
    TerminateEmployeeRequest,
};
pub use response::{ApiError, ApiErrorResponse, PeriodDocumentsResponse};
pub use state::AppState;
