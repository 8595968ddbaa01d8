//! Request types for the payroll API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::PeriodType;
use crate::orchestration::NewPeriod;

/// Request body for `POST /periods`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePeriodRequest {
    /// Display name.
    pub name: String,
    /// Recurrence.
    pub period_type: PeriodType,
    /// First day (inclusive).
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
    /// Payment date.
    pub payment_date: NaiveDate,
}

impl From<CreatePeriodRequest> for NewPeriod {
    fn from(req: CreatePeriodRequest) -> Self {
        NewPeriod {
            name: req.name,
            period_type: req.period_type,
            start_date: req.start_date,
            end_date: req.end_date,
            payment_date: req.payment_date,
        }
    }
}

/// Request body for `POST /periods/:id/approve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovePeriodRequest {
    /// Who approves the period.
    pub approver_id: String,
}

/// Request body for `POST /employees/:id/terminate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminateEmployeeRequest {
    /// Last day of the contract.
    pub end_date: NaiveDate,
}

/// Query of `GET /employees/:id/benefits/:type`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BenefitQuery {
    /// Payment date; defaults to today.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Query of `GET /employees/:id/liquidation`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiquidationQuery {
    /// Termination date; defaults to today.
    #[serde(default)]
    pub termination_date: Option<NaiveDate>,
}
