//! seiva-core
//!
//! Business logic for the school ledger: status rules, the in-memory store,
//! tuition reconciliation, KPI and payroll aggregation and the persistence contract.
//! Depends on seiva-domain. No CLI, no terminal I/O, no direct file access.

pub mod error;
pub mod format;
pub mod kpi_service;
pub mod payroll_service;
pub mod school_store;
pub mod seed;
pub mod session;
pub mod status_rules;
pub mod storage;
pub mod time;


pub use error::CoreError;
pub use format::*;
pub use kpi_service::*;
pub use payroll_service::*;
pub use school_store::*;
pub use session::*;
pub use status_rules::*;
pub use storage::*;
pub use time::*;
