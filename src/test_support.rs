//! Fixtures shared by unit tests across modules.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::{
    DocumentNumbering, Environment, PayrollConfig, SoftwareCredentials, StatutoryConstants,
};
use crate::models::{
    ContractType, DocumentType, Employee, EmployeeStatus, EmployerProfile, EntryInputs,
    EntryStatus, IdentificationType, PaymentInfo, PayrollBreakdown, PayrollEntry, PayrollPeriod,
    PeriodStatus, PeriodTotals, PeriodType, RiskLevel, SalaryType, WorkLocation,
};

pub fn sample_employee(base_salary: Decimal, salary_type: SalaryType, start_date: NaiveDate) -> Employee {
    Employee {
        id: Uuid::new_v4(),
        document_type: IdentificationType::CitizenshipCard,
        document_number: "1234567890".to_string(),
        first_name: "Ana".to_string(),
        other_names: Some("María".to_string()),
        first_surname: "Gómez".to_string(),
        second_surname: Some("Ruiz".to_string()),
        base_salary,
        salary_type,
        risk_level: RiskLevel::Level1,
        has_transport_allowance: salary_type == SalaryType::Ordinary
            && base_salary <= Decimal::from(2_847_000),
        contract_type: ContractType::Indefinite,
        worker_type_code: "01".to_string(),
        worker_subtype_code: "00".to_string(),
        high_pension_risk: false,
        work_location: WorkLocation {
            country_code: "CO".to_string(),
            department_code: "11".to_string(),
            municipality_code: "11001".to_string(),
            address: "Calle 100 # 10-20".to_string(),
        },
        payment: PaymentInfo {
            form_code: "1".to_string(),
            method_code: "42".to_string(),
            bank_name: Some("Banco de Bogotá".to_string()),
            account_type: Some("Ahorros".to_string()),
            account_number: Some("0011223344".to_string()),
        },
        start_date,
        end_date: None,
        status: EmployeeStatus::Active,
    }
}

pub fn sample_employer() -> EmployerProfile {
    EmployerProfile {
        nit: "900123456".to_string(),
        check_digit: "7".to_string(),
        legal_name: "Comercializadora Andina S.A.S.".to_string(),
        country_code: "CO".to_string(),
        department_code: "11".to_string(),
        municipality_code: "11001".to_string(),
        address: "Carrera 7 # 71-21".to_string(),
    }
}

pub fn sample_config() -> PayrollConfig {
    PayrollConfig {
        effective_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        constants: StatutoryConstants {
            minimum_wage: Decimal::from(1_423_500),
            transport_allowance: Decimal::from(200_000),
            uvt_value: Decimal::from(49_799),
        },
        numbering: DocumentNumbering {
            individual_prefix: "NOM".to_string(),
            adjustment_prefix: "NAJ".to_string(),
            starting_number: 1,
        },
        software: Some(SoftwareCredentials {
            software_id: "56f2ae4e-9812-4fad-9255-643fc3e7c9e1".to_string(),
            pin: "12345".to_string(),
            test_set_id: None,
            environment: Environment::Test,
        }),
    }
}

pub fn sample_period(tenant_id: Uuid, start_date: NaiveDate, end_date: NaiveDate) -> PayrollPeriod {
    let now = Utc::now();
    PayrollPeriod {
        id: Uuid::new_v4(),
        tenant_id,
        name: format!("Nómina {}", start_date.format("%Y-%m")),
        period_type: PeriodType::Monthly,
        start_date,
        end_date,
        payment_date: end_date,
        status: PeriodStatus::Open,
        totals: PeriodTotals::default(),
        employee_count: 0,
        approved_by: None,
        approved_at: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_entry(tenant_id: Uuid, period_id: Uuid, employee_id: Uuid, entry_number: u64) -> PayrollEntry {
    let now = Utc::now();
    PayrollEntry {
        id: Uuid::new_v4(),
        tenant_id,
        period_id,
        employee_id,
        entry_number,
        document_type: DocumentType::Individual,
        status: EntryStatus::Calculated,
        inputs: EntryInputs::for_days(30),
        breakdown: PayrollBreakdown::default(),
        adjustment: None,
        cune: None,
        xml_document: None,
        document_generated_at: None,
        created_at: now,
        updated_at: now,
    }
}
