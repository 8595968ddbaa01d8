//! Payroll compliance engine for Colombian electronic payroll.
//!
//! This crate calculates monthly payroll (earnings, social-security
//! deductions, withholding, employer contributions and benefit provisions),
//! drives the payroll-period lifecycle, computes statutory benefit payments
//! and termination liquidations, and produces the CUNE-identified XML
//! documents the tax authority (DIAN) expects.

#![warn(missing_docs)]

pub mod api;
pub mod benefits;
pub mod calculation;
pub mod config;
pub mod dian;
pub mod error;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod store;

#[cfg(test)]
mod test_support;
