//! Prepares approved entries for delivery to the tax authority.
//!
//! Generation stores the CUNE and XML on the entry but never changes its
//! status; the period moves to SENT_TO_DIAN through its own command.
//! Artifacts are attached inside a unit of work after re-reading the entry,
//! so a period closed or sent meanwhile rejects the write.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::{PayrollConfig, SoftwareCredentials};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    DocumentType, EmployerProfile, EntryStatus, PayrollEntry, PayrollPeriod,
};
use crate::orchestration::{
    TenantContext, ensure_entry_approved, ensure_period_approved, find_period_in, finish,
    require_software,
};
use crate::store::{ConfigStore, EmployeeReader, PayrollStore, UnitOfWork};

use super::cune::{CuneInput, generate_cune};
use super::xml::{XmlDocumentInput, generate_payroll_xml};

/// Colombia is UTC-5 all year.
const COLOMBIA_UTC_OFFSET_SECONDS: i32 = 5 * 3600;

/// The current time in Colombia.
pub fn colombia_now() -> DateTime<FixedOffset> {
    match FixedOffset::west_opt(COLOMBIA_UTC_OFFSET_SECONDS) {
        Some(offset) => Utc::now().with_timezone(&offset),
        None => Utc::now().fixed_offset(),
    }
}

/// A generated document for one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDocument {
    /// The documented entry.
    pub entry_id: Uuid,
    /// Document number, e.g. `NOM-000001`.
    pub document_number: String,
    /// The document's CUNE.
    pub cune: String,
    /// The XML payload.
    pub xml_document: String,
}

/// Summary of one document generated during a period run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodDocument {
    /// The documented entry.
    pub entry_id: Uuid,
    /// Document number.
    pub document_number: String,
    /// The document's CUNE.
    pub cune: String,
}

/// Numbering prefix for an entry's document type.
pub fn document_prefix(config: &PayrollConfig, document_type: DocumentType) -> &str {
    match document_type {
        DocumentType::Individual => &config.numbering.individual_prefix,
        DocumentType::Adjustment => &config.numbering.adjustment_prefix,
    }
}

/// Generates CUNEs and XML documents for approved entries.
#[derive(Clone)]
pub struct DianSubmissionPreparer {
    employees: Arc<dyn EmployeeReader>,
    configs: Arc<dyn ConfigStore>,
    payroll: Arc<dyn PayrollStore>,
}

impl DianSubmissionPreparer {
    /// Creates a preparer over the given repositories.
    pub fn new(
        employees: Arc<dyn EmployeeReader>,
        configs: Arc<dyn ConfigStore>,
        payroll: Arc<dyn PayrollStore>,
    ) -> Self {
        Self {
            employees,
            configs,
            payroll,
        }
    }

    /// Generates and stores the document of one APPROVED entry.
    pub async fn generate_entry_xml(
        &self,
        ctx: &TenantContext,
        entry_id: Uuid,
    ) -> EngineResult<GeneratedDocument> {
        let entry = self
            .payroll
            .find_entry(ctx.tenant_id, entry_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Payroll entry", entry_id))?;
        ensure_entry_approved(&entry)?;
        let employer = ctx.require_authority()?;
        let config = ctx.require_config(self.configs.as_ref()).await?;
        let software = require_software(&config)?;
        let period = self
            .payroll
            .find_period(ctx.tenant_id, entry.period_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Payroll period", entry.period_id))?;
        ensure_period_approved(&period)?;

        let document = self
            .document_for(ctx, entry, &period, employer, &config, software)
            .await?;
        info!(
            tenant_id = %ctx.tenant_id,
            entry_id = %entry_id,
            document_number = %document.document_number,
            "Payroll document generated"
        );
        Ok(document)
    }

    /// Generates documents for every approved entry of an APPROVED period
    /// that does not have one yet.
    pub async fn generate_period_xmls(
        &self,
        ctx: &TenantContext,
        period_id: Uuid,
    ) -> EngineResult<Vec<PeriodDocument>> {
        let period = self
            .payroll
            .find_period(ctx.tenant_id, period_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Payroll period", period_id))?;
        ensure_period_approved(&period)?;
        let employer = ctx.require_authority()?;
        let config = ctx.require_config(self.configs.as_ref()).await?;
        let software = require_software(&config)?;

        let pending: Vec<PayrollEntry> = self
            .payroll
            .list_entries(ctx.tenant_id, period_id)
            .await?
            .into_iter()
            .filter(|e| e.status == EntryStatus::Approved && e.cune.is_none())
            .collect();

        let mut documents = Vec::with_capacity(pending.len());
        for entry in pending {
            let document = self
                .document_for(ctx, entry, &period, employer, &config, software)
                .await?;
            documents.push(PeriodDocument {
                entry_id: document.entry_id,
                document_number: document.document_number,
                cune: document.cune,
            });
        }

        info!(
            tenant_id = %ctx.tenant_id,
            period_id = %period_id,
            documents = documents.len(),
            "Period documents generated"
        );
        Ok(documents)
    }

    async fn document_for(
        &self,
        ctx: &TenantContext,
        entry: PayrollEntry,
        period: &PayrollPeriod,
        employer: &EmployerProfile,
        config: &PayrollConfig,
        software: &SoftwareCredentials,
    ) -> EngineResult<GeneratedDocument> {
        let employee = self
            .employees
            .find_employee(ctx.tenant_id, entry.employee_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Employee", entry.employee_id))?;

        let generated_at = colombia_now();
        let prefix = document_prefix(config, entry.document_type);
        let document_number = entry.document_number(prefix);
        let breakdown = &entry.breakdown;

        let cune = generate_cune(&CuneInput {
            document_number: document_number.clone(),
            generated_at,
            total_earned: breakdown.earnings.total,
            total_deductions: breakdown.deductions.total,
            total_net: breakdown.net_pay,
            employer_nit: employer.nit.clone(),
            employee_document: employee.document_number.clone(),
            environment: software.environment,
            software_pin: software.pin.clone(),
            document_type: entry.document_type,
        });
        let xml_document = generate_payroll_xml(&XmlDocumentInput {
            entry: &entry,
            period,
            employee: &employee,
            employer,
            software,
            prefix,
            document_number: &document_number,
            cune: &cune,
            generated_at,
        });

        let mut uow: Box<dyn UnitOfWork> = self.payroll.begin(ctx.tenant_id).await?;
        let result = async {
            let mut current = uow
                .find_entry(entry.id)
                .await?
                .ok_or_else(|| EngineError::not_found("Payroll entry", entry.id))?;
            ensure_entry_approved(&current)?;
            let period = find_period_in(uow.as_mut(), current.period_id).await?;
            ensure_period_approved(&period)?;
            current.cune = Some(cune.clone());
            current.xml_document = Some(xml_document.clone());
            current.document_generated_at = Some(generated_at);
            current.updated_at = Utc::now();
            uow.upsert_entry(current).await?;
            Ok::<_, EngineError>(())
        }
        .await;
        finish(uow, result).await?;

        debug!(
            entry_id = %entry.id,
            document_number = %document_number,
            cune = %cune,
            "Entry document stored"
        );
        Ok(GeneratedDocument {
            entry_id: entry.id,
            document_number,
            cune,
            xml_document,
        })
    }
}
