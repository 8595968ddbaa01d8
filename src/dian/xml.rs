//! Electronic payroll XML documents.
//!
//! Two root variants: `NominaIndividual` (type 102) and
//! `NominaIndividualDeAjuste` (type 103, with the predecessor block). Optional
//! line items are omitted when zero; every amount is rendered with two
//! decimals and every text value is entity-escaped.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;

use crate::calculation::{EMPLOYEE_HEALTH_RATE, EMPLOYEE_PENSION_RATE};
use crate::config::SoftwareCredentials;
use crate::models::{
    AdjustmentNoteType, DocumentType, Employee, EmployerProfile, PayrollEntry, PayrollPeriod,
    SalaryType,
};

use super::cune::format_amount;

const NAMESPACE_INDIVIDUAL: &str = "dian:gov:co:facturaelectronica:NominaIndividual";
const NAMESPACE_ADJUSTMENT: &str = "dian:gov:co:facturaelectronica:NominaIndividualDeAjuste";
const NAMESPACE_EXTENSIONS: &str =
    "urn:oasis:names:specification:ubl:schema:xsd:CommonExtensionComponents-2";
const SCHEMA_VERSION: &str = "V1.0: Documento Soporte de Pago de Nómina Electrónica";
const CURRENCY: &str = "COP";

/// Everything needed to render one entry's document.
#[derive(Debug, Clone, Copy)]
pub struct XmlDocumentInput<'a> {
    /// The entry being documented.
    pub entry: &'a PayrollEntry,
    /// The entry's period.
    pub period: &'a PayrollPeriod,
    /// The employee paid.
    pub employee: &'a Employee,
    /// The employer's authority profile.
    pub employer: &'a EmployerProfile,
    /// Registered software credentials.
    pub software: &'a SoftwareCredentials,
    /// Numbering prefix, e.g. `NOM`.
    pub prefix: &'a str,
    /// Full document number, e.g. `NOM-000001`.
    pub document_number: &'a str,
    /// The CUNE computed for this document.
    pub cune: &'a str,
    /// Generation timestamp in UTC-5.
    pub generated_at: DateTime<FixedOffset>,
}

/// Escapes the five XML special characters.
///
/// ```
/// use nomina_engine::dian::escape_xml;
///
/// assert_eq!(escape_xml("Pérez & Cía <S.A.S>"), "Pérez &amp; Cía &lt;S.A.S&gt;");
/// assert_eq!(escape_xml("O'Neil \"Jr\""), "O&apos;Neil &quot;Jr&quot;");
/// ```
pub fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn percent(rate: Decimal) -> String {
    format_amount(rate * Decimal::ONE_HUNDRED)
}

/// Minimal indented element writer.
struct XmlBuilder {
    out: String,
    depth: usize,
}

impl XmlBuilder {
    fn new() -> Self {
        Self {
            out: String::from("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n"),
            depth: 0,
        }
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
    }

    fn push_attributes(&mut self, attributes: &[(&str, String)]) {
        for (name, value) in attributes {
            self.out.push(' ');
            self.out.push_str(name);
            self.out.push_str("=\"");
            self.out.push_str(&escape_xml(value));
            self.out.push('"');
        }
    }

    fn open(&mut self, tag: &str, attributes: &[(&str, String)]) {
        self.indent();
        self.out.push('<');
        self.out.push_str(tag);
        self.push_attributes(attributes);
        self.out.push_str(">\n");
        self.depth += 1;
    }

    fn close(&mut self, tag: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push_str(">\n");
    }

    fn empty(&mut self, tag: &str, attributes: &[(&str, String)]) {
        self.indent();
        self.out.push('<');
        self.out.push_str(tag);
        self.push_attributes(attributes);
        self.out.push_str("/>\n");
    }

    fn text(&mut self, tag: &str, value: &str) {
        self.indent();
        self.out.push('<');
        self.out.push_str(tag);
        self.out.push('>');
        self.out.push_str(&escape_xml(value));
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push_str(">\n");
    }

    /// `<group><item attrs/></group>`, skipped when `amount` is zero.
    fn wrapped_if_positive(
        &mut self,
        amount: Decimal,
        group: &str,
        item: &str,
        attributes: &[(&str, String)],
    ) {
        if amount > Decimal::ZERO {
            self.open(group, &[]);
            self.empty(item, attributes);
            self.close(group);
        }
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Renders the payroll document for one entry.
pub fn generate_payroll_xml(input: &XmlDocumentInput<'_>) -> String {
    let entry = input.entry;
    let root = match entry.document_type {
        DocumentType::Individual => "NominaIndividual",
        DocumentType::Adjustment => "NominaIndividualDeAjuste",
    };
    let namespace = match entry.document_type {
        DocumentType::Individual => NAMESPACE_INDIVIDUAL,
        DocumentType::Adjustment => NAMESPACE_ADJUSTMENT,
    };

    let mut xml = XmlBuilder::new();
    xml.open(
        root,
        &[
            ("xmlns", namespace.to_string()),
            ("xmlns:ext", NAMESPACE_EXTENSIONS.to_string()),
        ],
    );

    // Signature placeholder
    xml.open("ext:UBLExtensions", &[]);
    xml.open("ext:UBLExtension", &[]);
    xml.empty("ext:ExtensionContent", &[]);
    xml.close("ext:UBLExtension");
    xml.close("ext:UBLExtensions");

    if entry.document_type == DocumentType::Adjustment {
        write_predecessor(&mut xml, entry);
    }

    write_header(&mut xml, input);
    write_period(&mut xml, input);
    xml.text("TipoMoneda", CURRENCY);
    write_employer(&mut xml, input.employer);
    write_employee(&mut xml, input.employee);
    write_payment(&mut xml, input.employee);
    write_earnings(&mut xml, entry);
    write_deductions(&mut xml, entry);

    let b = &entry.breakdown;
    xml.text("DevengadosTotal", &format_amount(b.earnings.total));
    xml.text("DeduccionesTotal", &format_amount(b.deductions.total));
    xml.text("ComprobanteTotal", &format_amount(b.net_pay));

    xml.empty(
        "InformacionAdicional",
        &[
            ("SoftwareID", input.software.software_id.clone()),
            ("Ambiente", input.software.environment.code().to_string()),
            ("CUNE", input.cune.to_string()),
        ],
    );

    xml.close(root);
    xml.finish()
}

fn write_predecessor(xml: &mut XmlBuilder, entry: &PayrollEntry) {
    let Some(reference) = &entry.adjustment else {
        return;
    };
    xml.text("TipoNota", reference.note_type.code());
    let (group, item) = match reference.note_type {
        AdjustmentNoteType::Replace => ("Reemplazar", "ReemplazandoPredecesor"),
        AdjustmentNoteType::Delete => ("Eliminar", "EliminandoPredecesor"),
    };
    xml.open(group, &[]);
    xml.empty(
        item,
        &[
            ("NumeroPred", reference.predecessor_number.clone()),
            ("CUNEPred", reference.predecessor_cune.clone()),
            ("FechaGenPred", reference.predecessor_date.to_string()),
        ],
    );
    xml.close(group);
}

fn write_header(xml: &mut XmlBuilder, input: &XmlDocumentInput<'_>) {
    let consecutive = input.entry.entry_number.to_string();
    xml.empty(
        "InformacionGeneral",
        &[
            ("Version", SCHEMA_VERSION.to_string()),
            ("Ambiente", input.software.environment.code().to_string()),
            ("TipoXML", input.entry.document_type.code().to_string()),
            ("CUNE", input.cune.to_string()),
            ("EncripCUNE", "CUNE-SHA384".to_string()),
            ("FechaGen", input.generated_at.format("%Y-%m-%d").to_string()),
            ("HoraGen", input.generated_at.format("%H:%M:%S%:z").to_string()),
            ("PeriodoNomina", input.period.period_type.code().to_string()),
        ],
    );
    xml.empty(
        "NumeroSecuenciaXML",
        &[
            ("Prefijo", input.prefix.to_string()),
            ("Consecutivo", consecutive),
            ("Numero", input.document_number.to_string()),
        ],
    );
}

fn write_period(xml: &mut XmlBuilder, input: &XmlDocumentInput<'_>) {
    let mut attributes = vec![("FechaIngreso", input.employee.start_date.to_string())];
    if let Some(end_date) = input.employee.end_date {
        attributes.push(("FechaRetiro", end_date.to_string()));
    }
    attributes.extend([
        ("FechaLiquidacionInicio", input.period.start_date.to_string()),
        ("FechaLiquidacionFin", input.period.end_date.to_string()),
        ("TiempoLaborado", input.entry.breakdown.days_worked.to_string()),
        ("FechaGen", input.generated_at.format("%Y-%m-%d").to_string()),
    ]);
    xml.empty("Periodo", &attributes);

    xml.open("FechasPagos", &[]);
    xml.text("FechaPago", &input.period.payment_date.to_string());
    xml.close("FechasPagos");
}

fn write_employer(xml: &mut XmlBuilder, employer: &EmployerProfile) {
    xml.empty(
        "Empleador",
        &[
            ("RazonSocial", employer.legal_name.clone()),
            ("NIT", employer.nit.clone()),
            ("DV", employer.check_digit.clone()),
            ("Pais", employer.country_code.clone()),
            ("DepartamentoEstado", employer.department_code.clone()),
            ("MunicipioCiudad", employer.municipality_code.clone()),
            ("Direccion", employer.address.clone()),
        ],
    );
}

fn write_employee(xml: &mut XmlBuilder, employee: &Employee) {
    let mut attributes = vec![
        ("TipoTrabajador", employee.worker_type_code.clone()),
        ("SubTipoTrabajador", employee.worker_subtype_code.clone()),
        ("AltoRiesgoPension", employee.high_pension_risk.to_string()),
        ("TipoDocumento", employee.document_type.code().to_string()),
        ("NumeroDocumento", employee.document_number.clone()),
        ("PrimerApellido", employee.first_surname.clone()),
    ];
    if let Some(second) = &employee.second_surname {
        attributes.push(("SegundoApellido", second.clone()));
    }
    attributes.push(("PrimerNombre", employee.first_name.clone()));
    if let Some(others) = &employee.other_names {
        attributes.push(("OtrosNombres", others.clone()));
    }
    let location = &employee.work_location;
    attributes.extend([
        ("LugarTrabajoPais", location.country_code.clone()),
        ("LugarTrabajoDepartamentoEstado", location.department_code.clone()),
        ("LugarTrabajoMunicipioCiudad", location.municipality_code.clone()),
        ("LugarTrabajoDireccion", location.address.clone()),
        (
            "SalarioIntegral",
            (employee.salary_type == SalaryType::Integral).to_string(),
        ),
        ("TipoContrato", employee.contract_type.code().to_string()),
        ("Sueldo", format_amount(employee.base_salary)),
        ("FechaIngreso", employee.start_date.to_string()),
    ]);
    if let Some(end_date) = employee.end_date {
        attributes.push(("FechaRetiro", end_date.to_string()));
    }
    xml.empty("Trabajador", &attributes);
}

fn write_payment(xml: &mut XmlBuilder, employee: &Employee) {
    let payment = &employee.payment;
    let mut attributes = vec![
        ("Forma", payment.form_code.clone()),
        ("Metodo", payment.method_code.clone()),
    ];
    let optional = [
        ("Banco", &payment.bank_name),
        ("TipoCuenta", &payment.account_type),
        ("NumeroCuenta", &payment.account_number),
    ];
    for (name, value) in optional {
        if let Some(value) = value {
            attributes.push((name, value.clone()));
        }
    }
    xml.empty("Pago", &attributes);
}

fn write_earnings(xml: &mut XmlBuilder, entry: &PayrollEntry) {
    let b = &entry.breakdown;
    let e = &b.earnings;
    xml.open("Devengados", &[]);
    xml.empty(
        "Basico",
        &[
            ("DiasTrabajados", b.days_worked.to_string()),
            ("SueldoTrabajado", format_amount(e.salary)),
        ],
    );
    if e.transport_allowance > Decimal::ZERO {
        xml.empty(
            "Transporte",
            &[("AuxilioTransporte", format_amount(e.transport_allowance))],
        );
    }
    if e.per_diem > Decimal::ZERO {
        xml.empty(
            "Transporte",
            &[("ViaticoManutAlojS", format_amount(e.per_diem))],
        );
    }

    for line in e.overtime.iter().filter(|l| l.amount > Decimal::ZERO) {
        let code = line.overtime_type.code();
        let group = format!("{}s", code);
        xml.open(&group, &[]);
        xml.empty(
            code,
            &[
                ("Cantidad", format_amount(line.hours)),
                ("Porcentaje", format_amount(line.overtime_type.surcharge_percent())),
                ("Pago", format_amount(line.amount)),
            ],
        );
        xml.close(&group);
    }

    xml.wrapped_if_positive(
        e.vacation,
        "Vacaciones",
        "VacacionesComunes",
        &[
            ("Cantidad", entry.inputs.vacation_days.to_string()),
            ("Pago", format_amount(e.vacation)),
        ],
    );
    xml.wrapped_if_positive(
        e.incapacity,
        "Incapacidades",
        "Incapacidad",
        &[
            ("Cantidad", entry.inputs.incapacity_days.to_string()),
            ("Tipo", "1".to_string()),
            ("Pago", format_amount(e.incapacity)),
        ],
    );
    xml.wrapped_if_positive(
        e.leave,
        "Licencias",
        "LicenciaR",
        &[
            ("Cantidad", entry.inputs.leave_days.to_string()),
            ("Pago", format_amount(e.leave)),
        ],
    );
    xml.wrapped_if_positive(
        e.bonuses,
        "Bonificaciones",
        "Bonificacion",
        &[("BonificacionS", format_amount(e.bonuses))],
    );
    if e.commissions > Decimal::ZERO {
        xml.open("Comisiones", &[]);
        xml.text("Comision", &format_amount(e.commissions));
        xml.close("Comisiones");
    }
    xml.wrapped_if_positive(
        e.other_earnings,
        "OtrosConceptos",
        "OtroConcepto",
        &[
            ("DescripcionConcepto", "Otros devengados".to_string()),
            ("ConceptoS", format_amount(e.other_earnings)),
        ],
    );
    xml.close("Devengados");
}

fn write_deductions(xml: &mut XmlBuilder, entry: &PayrollEntry) {
    let d = &entry.breakdown.deductions;
    xml.open("Deducciones", &[]);
    xml.empty(
        "Salud",
        &[
            ("Porcentaje", percent(EMPLOYEE_HEALTH_RATE)),
            ("Deduccion", format_amount(d.health)),
        ],
    );
    xml.empty(
        "FondoPension",
        &[
            ("Porcentaje", percent(EMPLOYEE_PENSION_RATE)),
            ("Deduccion", format_amount(d.pension)),
        ],
    );
    if d.solidarity_fund > Decimal::ZERO {
        xml.empty(
            "FondoSP",
            &[
                ("Porcentaje", percent(d.solidarity_rate)),
                ("DeduccionSP", format_amount(d.solidarity_fund)),
            ],
        );
    }
    xml.wrapped_if_positive(
        d.union_dues,
        "Sindicatos",
        "Sindicato",
        &[("Deduccion", format_amount(d.union_dues))],
    );
    xml.wrapped_if_positive(
        d.loans,
        "Libranzas",
        "Libranza",
        &[
            ("Descripcion", "Libranza".to_string()),
            ("Deduccion", format_amount(d.loans)),
        ],
    );
    if d.withholding > Decimal::ZERO {
        xml.text("RetencionFuente", &format_amount(d.withholding));
    }
    if d.other_deductions > Decimal::ZERO {
        xml.open("OtrasDeducciones", &[]);
        xml.text("OtraDeduccion", &format_amount(d.other_deductions));
        xml.close("OtrasDeducciones");
    }
    xml.close("Deducciones");
}
