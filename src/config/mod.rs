//! Configuration loading and management for the payroll engine.
//!
//! This module provides functionality to load a tenant's payroll configuration
//! from YAML files: statutory constants, document numbering, software
//! credentials and the employer's authority profile.
//!
//! # Example
//!
//! ```no_run
//! use nomina_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/colombia").unwrap();
//! println!("UVT: {}", loader.config().constants.uvt_value);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DocumentNumbering, EmployeesFile, EmployerFile, Environment, PayrollConfig,
    SoftwareCredentials, StatutoryConstants, TenantSeed,
};
