//! Schedule resolution and leave ledger engine for employee rosters.
//!
//! This crate reconciles an employee's standing assignments, temporary
//! schedule variations and leave into a single answer for what the employee
//! was, or should be, doing on a given day. It also runs the leave request
//! approval workflow that writes approved leave into the ledger.
//!
//! All core operations are methods on the [`models::Employee`] aggregate and
//! run in memory. [`service::EmployeeService`] wraps them with an audit trail
//! and notice delivery.
//!
//! # Example
//!
//! ```
//! use leave_engine::models::{Employee, EmployeeName};
//! use chrono::NaiveDate;
//! use rust_decimal::Decimal;
//!
//! let mut employee = Employee::new("emp_001", EmployeeName::new("Ada", "Lovelace"), "DGS");
//! employee.add_assignment("DGS", "GEOINT", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
//!
//! // Monday 4 March 2024
//! let workday = employee
//!     .resolve_workday(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(), Decimal::ZERO)
//!     .unwrap();
//! assert_eq!(workday.code, "D");
//! assert_eq!(workday.hours, Decimal::new(8, 0));
//! ```

#![warn(missing_docs)]

pub mod audit;
pub mod config;
pub mod error;
pub mod leave;
pub mod models;
pub mod schedule;
pub mod service;
