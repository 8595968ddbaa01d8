//! Electronic payroll documents for the Colombian tax authority (DIAN).
//!
//! [`generate_cune`] and [`generate_payroll_xml`] are pure and can run in
//! parallel across entries. [`DianSubmissionPreparer`] loads what they need
//! and stores the results on the entry.

mod cune;
mod submission;
mod xml;

pub use cune::{CUNE_LENGTH, CuneInput, format_amount, generate_cune};
pub use submission::{
    DianSubmissionPreparer, GeneratedDocument, PeriodDocument, colombia_now, document_prefix,
};
pub use xml::{XmlDocumentInput, escape_xml, generate_payroll_xml};
