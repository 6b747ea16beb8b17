//! Core data models for the leave engine.
//!
//! This module contains the domain records exchanged with the persistence
//! collaborator. Behaviour that spans several records lives on [`Employee`].

mod assignment;
mod employee;
mod leave;
mod leave_request;
mod profile;
mod variation;
mod work;

pub use assignment::{
    Assignment, COMPRESSED_WORKDAY_HOURS, DEFAULT_SHIFT_CODE, FULL_WEEK_WORKDAYS, LaborCode,
    STANDARD_WORKDAY_HOURS, Schedule, Workday, standard_day_for,
};
pub use employee::{Employee, EmployeeData};
pub use leave::{AnnualLeave, LeaveDay, LeaveStatus};
pub use leave_request::{LeaveRequest, LeaveRequestComment, RequestStatus};
pub use profile::{CompanyInfo, Contact, EmployeeName, Specialty};
pub use variation::Variation;
pub use work::{ForecastLaborCode, Work, WorkCode};
