//! Employer authority profile.

use serde::{Deserialize, Serialize};

/// The employer data the tax authority requires on every payroll document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerProfile {
    /// Tax identification number (NIT), without check digit.
    pub nit: String,
    /// NIT check digit.
    pub check_digit: String,
    /// Registered legal name.
    pub legal_name: String,
    /// ISO country code.
    pub country_code: String,
    /// Department code.
    pub department_code: String,
    /// Municipality code.
    pub municipality_code: String,
    /// Street address.
    pub address: String,
}

impl EmployerProfile {
    /// Returns true when every field the document generator needs is filled in.
    pub fn is_complete(&self) -> bool {
        [
            &self.nit,
            &self.check_digit,
            &self.legal_name,
            &self.country_code,
            &self.department_code,
            &self.municipality_code,
            &self.address,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> EmployerProfile {
        EmployerProfile {
            nit: "900123456".to_string(),
            check_digit: "7".to_string(),
            legal_name: "Acme S.A.S.".to_string(),
            country_code: "CO".to_string(),
            department_code: "11".to_string(),
            municipality_code: "11001".to_string(),
            address: "Carrera 7 # 71-21".to_string(),
        }
    }

    #[test]
    fn test_complete_profile() {
        assert!(profile().is_complete());
    }

    #[test]
    fn test_blank_field_makes_profile_incomplete() {
        let mut p = profile();
        p.check_digit = "  ".to_string();
        assert!(!p.is_complete());
    }
}
