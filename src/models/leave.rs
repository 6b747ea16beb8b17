//! Leave ledger entry and balance models.
//!
//! This module defines [`LeaveDay`], the day-level record kept in the leave
//! ledger, its [`LeaveStatus`], and the yearly [`AnnualLeave`] balance.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::EngineError;
use crate::schedule::interval;

/// Status of a leave ledger entry.
///
/// Parsing is case-insensitive so documents written as `"actual"` or
/// `"Approved"` decode cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum LeaveStatus {
    /// Part of a request that has not been submitted.
    Draft,
    /// Submitted and awaiting approval.
    Requested,
    /// Approved by a supervisor.
    Approved,
    /// Confirmed history from timekeeping.
    Actual,
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaveStatus::Draft => write!(f, "DRAFT"),
            LeaveStatus::Requested => write!(f, "REQUESTED"),
            LeaveStatus::Approved => write!(f, "APPROVED"),
            LeaveStatus::Actual => write!(f, "ACTUAL"),
        }
    }
}

impl FromStr for LeaveStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DRAFT" => Ok(LeaveStatus::Draft),
            "REQUESTED" => Ok(LeaveStatus::Requested),
            "APPROVED" => Ok(LeaveStatus::Approved),
            "ACTUAL" => Ok(LeaveStatus::Actual),
            _ => Err(EngineError::InvalidValue {
                field: "status".to_string(),
                message: format!("unknown leave status '{}'", s),
            }),
        }
    }
}

impl TryFrom<String> for LeaveStatus {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One day of leave in the ledger or in a request's materialized days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveDay {
    /// Identifier unique within the employee's ledger.
    #[serde(default)]
    pub id: u32,
    /// The day of leave. Midnight unless the source recorded an hour-of-day.
    #[serde(deserialize_with = "date_or_datetime")]
    pub leave_date: NaiveDateTime,
    /// Leave code, e.g. `V` for vacation or `H` for holiday.
    pub code: String,
    /// Hours of leave.
    pub hours: Decimal,
    /// Ledger status.
    pub status: LeaveStatus,
    /// Id of the originating leave request; empty for manual entries.
    #[serde(default)]
    pub request_id: String,
}

impl LeaveDay {
    /// Creates a day-granular entry.
    pub fn new(date: NaiveDate, code: &str, hours: Decimal, status: LeaveStatus) -> Self {
        Self {
            id: 0,
            leave_date: interval::midnight(date),
            code: code.to_string(),
            hours,
            status,
            request_id: String::new(),
        }
    }

    /// Returns the calendar day of the entry.
    pub fn day(&self) -> NaiveDate {
        interval::normalize(self.leave_date)
    }

    /// Returns true if the entry is confirmed history.
    pub fn is_actual(&self) -> bool {
        self.status == LeaveStatus::Actual
    }

    /// Returns true if the entry was entered by hand rather than by a request.
    pub fn is_manual(&self) -> bool {
        self.request_id.is_empty()
    }

    /// Returns true if the entry was produced by the request `request_id`.
    pub fn belongs_to(&self, request_id: &str) -> bool {
        !self.request_id.is_empty() && self.request_id == request_id
    }

    /// Returns true if the entry is on `date` with a matching code.
    pub fn matches(&self, date: NaiveDate, code: &str) -> bool {
        self.day() == date && self.code.eq_ignore_ascii_case(code)
    }
}

/// Accepts `2024-03-04`, `2024-03-04T08:00:00` or an RFC 3339 timestamp.
fn date_or_datetime<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(stamp) = raw.parse::<NaiveDateTime>() {
        return Ok(stamp);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(stamp.naive_utc());
    }
    raw.parse::<NaiveDate>()
        .map(interval::midnight)
        .map_err(serde::de::Error::custom)
}

/// A yearly leave balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualLeave {
    /// The leave year.
    pub year: i32,
    /// Hours accrued for the year.
    pub annual: Decimal,
    /// Hours carried over from the prior year.
    pub carryover: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_status_parses_case_insensitively() {
        assert_eq!("actual".parse::<LeaveStatus>().unwrap(), LeaveStatus::Actual);
        assert_eq!("Approved".parse::<LeaveStatus>().unwrap(), LeaveStatus::Approved);
        assert!("cancelled".parse::<LeaveStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_upper_case() {
        assert_eq!(
            serde_json::to_string(&LeaveStatus::Requested).unwrap(),
            "\"REQUESTED\""
        );
        let status: LeaveStatus = serde_json::from_str("\"draft\"").unwrap();
        assert_eq!(status, LeaveStatus::Draft);
    }

    #[test]
    fn test_deserialize_leave_day_from_plain_date() {
        let json = r#"{
            "id": 3,
            "leave_date": "2024-03-04",
            "code": "V",
            "hours": "8",
            "status": "actual"
        }"#;
        let day: LeaveDay = serde_json::from_str(json).unwrap();
        assert_eq!(day.day(), make_date("2024-03-04"));
        assert!(day.is_actual());
        assert!(day.is_manual());
    }

    #[test]
    fn test_deserialize_leave_day_from_rfc3339() {
        let json = r#"{
            "leave_date": "2024-03-04T18:00:00Z",
            "code": "V",
            "hours": 4,
            "status": "APPROVED",
            "request_id": "req-1"
        }"#;
        let day: LeaveDay = serde_json::from_str(json).unwrap();
        assert_eq!(day.leave_date.to_string(), "2024-03-04 18:00:00");
        assert!(day.belongs_to("req-1"));
        assert!(!day.belongs_to(""));
    }

    #[test]
    fn test_matches_ignores_code_case_and_time() {
        let mut day = LeaveDay::new(make_date("2024-03-04"), "V", Decimal::new(8, 0), LeaveStatus::Approved);
        day.leave_date = make_date("2024-03-04").and_hms_opt(9, 0, 0).unwrap();
        assert!(day.matches(make_date("2024-03-04"), "v"));
        assert!(!day.matches(make_date("2024-03-05"), "V"));
        assert!(!day.matches(make_date("2024-03-04"), "S"));
    }
}
