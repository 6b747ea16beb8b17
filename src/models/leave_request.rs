//! Leave request model.
//!
//! A [`LeaveRequest`] proposes leave over an inclusive date range and moves
//! through `DRAFT → REQUESTED → APPROVED`. Its materialized days mirror what
//! the ledger will hold once the request is approved.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{LeaveDay, LeaveStatus};
use crate::error::EngineError;
use crate::schedule::interval;

/// Workflow status of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum RequestStatus {
    /// Being drafted by the employee.
    Draft,
    /// Submitted for approval.
    Requested,
    /// Approved by a supervisor.
    Approved,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestStatus::Draft => write!(f, "DRAFT"),
            RequestStatus::Requested => write!(f, "REQUESTED"),
            RequestStatus::Approved => write!(f, "APPROVED"),
        }
    }
}

impl FromStr for RequestStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DRAFT" => Ok(RequestStatus::Draft),
            "REQUESTED" => Ok(RequestStatus::Requested),
            "APPROVED" => Ok(RequestStatus::Approved),
            _ => Err(EngineError::InvalidValue {
                field: "status".to_string(),
                message: format!("unknown request status '{}'", s),
            }),
        }
    }
}

impl TryFrom<String> for RequestStatus {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RequestStatus> for LeaveStatus {
    fn from(status: RequestStatus) -> Self {
        match status {
            RequestStatus::Draft => LeaveStatus::Draft,
            RequestStatus::Requested => LeaveStatus::Requested,
            RequestStatus::Approved => LeaveStatus::Approved,
        }
    }
}

/// A timestamped note attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequestComment {
    /// When the comment was made.
    pub comment_date: DateTime<Utc>,
    /// The comment text.
    pub comment: String,
}

/// A request for leave over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Identifier of the request.
    pub id: String,
    /// The owning employee.
    pub employee_id: String,
    /// When the request was created.
    pub request_date: DateTime<Utc>,
    /// The leave code the request is for.
    pub primary_code: String,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Workflow status.
    pub status: RequestStatus,
    /// Who approved the request; empty until approved.
    #[serde(default)]
    pub approved_by: String,
    /// When the request was approved.
    #[serde(default)]
    pub approval_date: Option<DateTime<Utc>>,
    /// Comment log.
    #[serde(default)]
    pub comments: Vec<LeaveRequestComment>,
    /// The days of leave the request materializes to.
    #[serde(default)]
    pub requested_days: Vec<LeaveDay>,
}

impl LeaveRequest {
    /// Creates an empty draft request with a fresh id.
    pub fn new(employee_id: &str, code: &str, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            employee_id: employee_id.to_string(),
            request_date: Utc::now(),
            primary_code: code.to_string(),
            start_date,
            end_date,
            status: RequestStatus::Draft,
            approved_by: String::new(),
            approval_date: None,
            comments: Vec::new(),
            requested_days: Vec::new(),
        }
    }

    /// Returns true if `date` falls within the request's range.
    pub fn covers(&self, date: NaiveDate) -> bool {
        interval::contains(self.start_date, self.end_date, date)
    }

    /// Returns true if the request has been approved.
    pub fn is_approved(&self) -> bool {
        self.status == RequestStatus::Approved
    }

    /// Sums the hours of the materialized days.
    pub fn requested_hours(&self) -> Decimal {
        self.requested_days.iter().map(|d| d.hours).sum()
    }

    /// Moves the request and every materialized day to `status`.
    pub(crate) fn set_status(&mut self, status: RequestStatus, day_status: LeaveStatus) {
        self.status = status;
        for day in self.requested_days.iter_mut() {
            day.status = day_status;
        }
    }

    /// Forgets who approved the request and when.
    pub(crate) fn clear_approval(&mut self) {
        self.approved_by.clear();
        self.approval_date = None;
    }
}
