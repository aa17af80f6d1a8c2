//! seiva-domain
//!
//! Pure domain models (Student, Transaction, CalendarEvent, Employee, payroll, KPI snapshots).
//! No I/O, no CLI, no storage. Only data types, patches and the academic calendar.

pub mod calendar;
pub mod common;
pub mod event;
pub mod kpi;
pub mod staff;
pub mod student;
pub mod transaction;

pub use calendar::*;
pub use common::*;
pub use event::*;
pub use kpi::*;
pub use staff::*;
pub use student::*;
pub use transaction::*;
