//! HTTP request handlers for the payroll API.
//!
//! Handlers resolve the tenant from the `x-tenant-id` header, tag the
//! request with a correlation id and dispatch to [`PayrollService`].
//!
//! [`PayrollService`]: crate::orchestration::PayrollService

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dian::GeneratedDocument;
use crate::error::EngineResult;
use crate::models::{
    AdjustmentReference, BenefitPaymentResult, BenefitType, Employee, EntryUpdate,
    LiquidationPreview, PayrollEntry, PayrollPeriod,
};
use crate::orchestration::TenantContext;

use super::request::{
    ApprovePeriodRequest, BenefitQuery, CreatePeriodRequest, LiquidationQuery,
    TerminateEmployeeRequest,
};
use super::response::{ApiError, ApiErrorResponse, PeriodDocumentsResponse};
use super::state::AppState;

/// Header carrying the tenant id.
pub const TENANT_HEADER: &str = "x-tenant-id";

type ApiResult<T> = Result<Json<T>, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/periods", post(create_period).get(list_periods))
        .route("/periods/:id", get(get_period))
        .route("/periods/:id/entries", get(list_period_entries))
        .route("/periods/:id/calculate", post(calculate_period))
        .route("/periods/:id/approve", post(approve_period))
        .route("/periods/:id/close", post(close_period))
        .route("/periods/:id/send", post(mark_period_sent))
        .route("/periods/:id/xml", post(generate_period_xmls))
        .route("/entries/:id", get(get_entry).patch(update_entry))
        .route("/entries/:id/xml", post(generate_entry_xml))
        .route("/entries/:id/adjustment", put(mark_entry_adjustment))
        .route(
            "/employees/:id/benefits/:benefit_type",
            get(calculate_benefit_payment),
        )
        .route("/employees/:id/liquidation", get(liquidation_preview))
        .route("/employees/:id/terminate", post(terminate_employee))
        .with_state(state)
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Resolves the tenant named by the request headers.
async fn tenant_context(
    state: &AppState,
    headers: &HeaderMap,
    correlation_id: Uuid,
) -> Result<TenantContext, ApiErrorResponse> {
    let tenant_id = headers
        .get(TENANT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value.trim()).ok());
    let Some(tenant_id) = tenant_id else {
        warn!(correlation_id = %correlation_id, "Request without a valid tenant header");
        return Err(ApiErrorResponse::bad_request(ApiError::missing_tenant()));
    };
    state.service().resolve_tenant(tenant_id).await.map_err(|err| {
        warn!(correlation_id = %correlation_id, tenant_id = %tenant_id, error = %err, "Tenant resolution failed");
        err.into()
    })
}

fn body<T>(payload: Result<Json<T>, JsonRejection>, correlation_id: Uuid) -> Result<T, ApiErrorResponse> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        warn!(correlation_id = %correlation_id, error = %rejection, "Rejected request body");
        rejection.into()
    })
}

/// Logs the outcome of a command and converts it into a response.
fn respond<T: Serialize>(
    correlation_id: Uuid,
    operation: &'static str,
    result: EngineResult<T>,
) -> ApiResult<T> {
    match result {
        Ok(value) => {
            info!(correlation_id = %correlation_id, operation, "Request completed");
            Ok(Json(value))
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, operation, error = %err, "Request failed");
            Err(err.into())
        }
    }
}

async fn create_period(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreatePeriodRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PayrollPeriod>), ApiErrorResponse> {
    let correlation_id = Uuid::new_v4();
    let ctx = tenant_context(&state, &headers, correlation_id).await?;
    let request = body(payload, correlation_id)?;
    let result = state.service().periods.create(&ctx, request.into()).await;
    respond(correlation_id, "create_period", result).map(|json| (StatusCode::CREATED, json))
}

async fn list_periods(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Vec<PayrollPeriod>> {
    let correlation_id = Uuid::new_v4();
    let ctx = tenant_context(&state, &headers, correlation_id).await?;
    let result = state.service().periods.list(&ctx).await;
    respond(correlation_id, "list_periods", result)
}

async fn get_period(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(period_id): Path<Uuid>,
) -> ApiResult<PayrollPeriod> {
    let correlation_id = Uuid::new_v4();
    let ctx = tenant_context(&state, &headers, correlation_id).await?;
    let result = state.service().periods.get(&ctx, period_id).await;
    respond(correlation_id, "get_period", result)
}

async fn list_period_entries(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(period_id): Path<Uuid>,
) -> ApiResult<Vec<PayrollEntry>> {
    let correlation_id = Uuid::new_v4();
    let ctx = tenant_context(&state, &headers, correlation_id).await?;
    let result = state.service().periods.list_entries(&ctx, period_id).await;
    respond(correlation_id, "list_period_entries", result)
}

async fn calculate_period(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(period_id): Path<Uuid>,
) -> ApiResult<PayrollPeriod> {
    let correlation_id = Uuid::new_v4();
    let ctx = tenant_context(&state, &headers, correlation_id).await?;
    let result = state.service().periods.calculate(&ctx, period_id).await;
    respond(correlation_id, "calculate_period", result)
}

async fn approve_period(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(period_id): Path<Uuid>,
    payload: Result<Json<ApprovePeriodRequest>, JsonRejection>,
) -> ApiResult<PayrollPeriod> {
    let correlation_id = Uuid::new_v4();
    let ctx = tenant_context(&state, &headers, correlation_id).await?;
    let request = body(payload, correlation_id)?;
    let result = state
        .service()
        .periods
        .approve(&ctx, period_id, &request.approver_id)
        .await;
    respond(correlation_id, "approve_period", result)
}

async fn close_period(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(period_id): Path<Uuid>,
) -> ApiResult<PayrollPeriod> {
    let correlation_id = Uuid::new_v4();
    let ctx = tenant_context(&state, &headers, correlation_id).await?;
    let result = state.service().periods.close(&ctx, period_id).await;
    respond(correlation_id, "close_period", result)
}

async fn mark_period_sent(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(period_id): Path<Uuid>,
) -> ApiResult<PayrollPeriod> {
    let correlation_id = Uuid::new_v4();
    let ctx = tenant_context(&state, &headers, correlation_id).await?;
    let result = state.service().periods.mark_sent(&ctx, period_id).await;
    respond(correlation_id, "mark_period_sent", result)
}

async fn generate_period_xmls(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(period_id): Path<Uuid>,
) -> ApiResult<PeriodDocumentsResponse> {
    let correlation_id = Uuid::new_v4();
    let ctx = tenant_context(&state, &headers, correlation_id).await?;
    let result = state
        .service()
        .documents
        .generate_period_xmls(&ctx, period_id)
        .await
        .map(|documents| PeriodDocumentsResponse { documents });
    respond(correlation_id, "generate_period_xmls", result)
}

async fn get_entry(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(entry_id): Path<Uuid>,
) -> ApiResult<PayrollEntry> {
    let correlation_id = Uuid::new_v4();
    let ctx = tenant_context(&state, &headers, correlation_id).await?;
    let result = state.service().entries.get_entry(&ctx, entry_id).await;
    respond(correlation_id, "get_entry", result)
}

async fn update_entry(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(entry_id): Path<Uuid>,
    payload: Result<Json<EntryUpdate>, JsonRejection>,
) -> ApiResult<PayrollEntry> {
    let correlation_id = Uuid::new_v4();
    let ctx = tenant_context(&state, &headers, correlation_id).await?;
    let update = body(payload, correlation_id)?;
    let result = state
        .service()
        .entries
        .update_entry(&ctx, entry_id, update)
        .await;
    respond(correlation_id, "update_entry", result)
}

async fn generate_entry_xml(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(entry_id): Path<Uuid>,
) -> ApiResult<GeneratedDocument> {
    let correlation_id = Uuid::new_v4();
    let ctx = tenant_context(&state, &headers, correlation_id).await?;
    let result = state
        .service()
        .documents
        .generate_entry_xml(&ctx, entry_id)
        .await;
    respond(correlation_id, "generate_entry_xml", result)
}

async fn mark_entry_adjustment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(entry_id): Path<Uuid>,
    payload: Result<Json<AdjustmentReference>, JsonRejection>,
) -> ApiResult<PayrollEntry> {
    let correlation_id = Uuid::new_v4();
    let ctx = tenant_context(&state, &headers, correlation_id).await?;
    let reference = body(payload, correlation_id)?;
    let result = state
        .service()
        .entries
        .mark_as_adjustment(&ctx, entry_id, reference)
        .await;
    respond(correlation_id, "mark_entry_adjustment", result)
}

async fn calculate_benefit_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((employee_id, benefit_type)): Path<(Uuid, BenefitType)>,
    Query(query): Query<BenefitQuery>,
) -> ApiResult<BenefitPaymentResult> {
    let correlation_id = Uuid::new_v4();
    let ctx = tenant_context(&state, &headers, correlation_id).await?;
    let payment_date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let result = state
        .service()
        .benefits
        .calculate_benefit_payment(&ctx, employee_id, benefit_type, payment_date)
        .await;
    respond(correlation_id, "calculate_benefit_payment", result)
}

async fn liquidation_preview(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(employee_id): Path<Uuid>,
    Query(query): Query<LiquidationQuery>,
) -> ApiResult<LiquidationPreview> {
    let correlation_id = Uuid::new_v4();
    let ctx = tenant_context(&state, &headers, correlation_id).await?;
    let result = state
        .service()
        .benefits
        .liquidation_preview(&ctx, employee_id, query.termination_date)
        .await;
    respond(correlation_id, "liquidation_preview", result)
}

async fn terminate_employee(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(employee_id): Path<Uuid>,
    payload: Result<Json<TerminateEmployeeRequest>, JsonRejection>,
) -> ApiResult<Employee> {
    let correlation_id = Uuid::new_v4();
    let ctx = tenant_context(&state, &headers, correlation_id).await?;
    let request = body(payload, correlation_id)?;
    let result = state
        .service()
        .terminate_employee(&ctx, employee_id, request.end_date)
        .await;
    respond(correlation_id, "terminate_employee", result)
}
