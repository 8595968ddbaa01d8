//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading a tenant's
//! payroll configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::EmployerProfile;

use super::types::{EmployeesFile, EmployerFile, PayrollConfig, TenantSeed};

/// Loads and provides access to a tenant's payroll configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// and exposes the statutory constants, the employer authority profile
/// and any seed employees.
///
/// # Directory Structure
///
/// ```text
/// config/colombia/
/// ├── statutory.yaml   # Minimum wage, transport allowance, UVT, numbering, software
/// ├── employer.yaml    # Tenant id and employer authority profile
/// └── employees.yaml   # Optional seed employees
/// ```
///
/// # Example
///
/// ```no_run
/// use nomina_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/colombia").unwrap();
/// println!("Minimum wage: {}", loader.config().constants.minimum_wage);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    seed: TenantSeed,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `statutory.yaml` or `employer.yaml` is missing
    /// - Any file contains invalid YAML
    /// - Any required field is missing from the configuration
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let config = Self::load_yaml::<PayrollConfig>(&path.join("statutory.yaml"))?;
        let employer_file = Self::load_yaml::<EmployerFile>(&path.join("employer.yaml"))?;

        // employees.yaml is optional
        let employees_path = path.join("employees.yaml");
        let employees = if employees_path.exists() {
            Self::load_yaml::<EmployeesFile>(&employees_path)?.employees
        } else {
            Vec::new()
        };

        tracing::info!(
            tenant_id = %employer_file.tenant_id,
            effective_date = %config.effective_date,
            employees = employees.len(),
            "Loaded payroll configuration"
        );

        Ok(Self {
            seed: TenantSeed {
                tenant_id: employer_file.tenant_id,
                employer: employer_file.employer,
                config,
                employees,
            },
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the tenant's payroll configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.seed.config
    }

    /// Returns the employer authority profile.
    pub fn employer(&self) -> &EmployerProfile {
        &self.seed.employer
    }

    /// Returns the full tenant seed.
    pub fn seed(&self) -> &TenantSeed {
        &self.seed
    }

    /// Consumes the loader and returns the tenant seed.
    pub fn into_seed(self) -> TenantSeed {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use rust_decimal::Decimal;

    fn config_path() -> &'static str {
        "./config/colombia"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(
            loader.config().constants.minimum_wage,
            Decimal::from(1_423_500)
        );
        assert_eq!(loader.config().numbering.individual_prefix, "NOM");
    }

    #[test]
    fn test_software_credentials_loaded() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let software = loader.config().software.as_ref().unwrap();
        assert_eq!(software.environment, Environment::Test);
        assert!(!software.pin.is_empty());
    }

    #[test]
    fn test_employer_profile_loaded() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(loader.employer().nit, "900123456");
        assert_eq!(loader.employer().check_digit, "7");
    }

    #[test]
    fn test_seed_employees_loaded() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert!(!loader.seed().employees.is_empty());
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("statutory.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }
}
