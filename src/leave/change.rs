//! Typed leave request mutations.
//!
//! Callers describe an edit as a `(field, value)` pair; [`LeaveRequestChange::parse`]
//! turns it into a [`LeaveRequestChange`] before any state is touched, so a
//! malformed edit never leaves a request half-changed.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

/// One edit to a leave request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveRequestChange {
    /// Move the first day of leave.
    StartDate(NaiveDate),
    /// Move the last day of leave.
    EndDate(NaiveDate),
    /// Move both ends of the range.
    Dates {
        /// New first day.
        start: NaiveDate,
        /// New last day.
        end: NaiveDate,
    },
    /// Change the leave code the request is for.
    PrimaryCode(String),
    /// Submit the request for approval.
    Submit,
    /// Approve the request.
    Approve {
        /// Who approved it.
        approver: String,
    },
    /// Withdraw approval, with the reason.
    Unapprove {
        /// Why approval was withdrawn.
        comment: String,
    },
    /// Set the code and hours of one requested day.
    Day {
        /// The day to edit.
        date: NaiveDate,
        /// New leave code; empty clears the day's hours.
        code: String,
        /// New hours.
        hours: Decimal,
    },
}

impl LeaveRequestChange {
    /// Parses a `(field, value)` edit.
    ///
    /// Field names are case-insensitive. Dates are `YYYY-MM-DD`; `dates`
    /// takes `start|end` and `day` takes `date|code|hours`.
    ///
    /// # Example
    ///
    /// ```
    /// use leave_engine::leave::LeaveRequestChange;
    /// use chrono::NaiveDate;
    ///
    /// let change = LeaveRequestChange::parse("EndDate", "2024-03-06").unwrap();
    /// assert_eq!(
    ///     change,
    ///     LeaveRequestChange::EndDate(NaiveDate::from_ymd_opt(2024, 3, 6).unwrap())
    /// );
    /// assert!(LeaveRequestChange::parse("colour", "blue").is_err());
    /// ```
    pub fn parse(field: &str, value: &str) -> EngineResult<Self> {
        match field.trim().to_ascii_lowercase().as_str() {
            "startdate" | "start" => Ok(Self::StartDate(parse_date(value)?)),
            "enddate" | "end" => Ok(Self::EndDate(parse_date(value)?)),
            "dates" => {
                let (start, end) = value.split_once('|').ok_or_else(|| EngineError::InvalidValue {
                    field: "dates".to_string(),
                    message: format!("expected 'start|end', got '{}'", value),
                })?;
                Ok(Self::Dates {
                    start: parse_date(start)?,
                    end: parse_date(end)?,
                })
            }
            "code" | "primarycode" => Ok(Self::PrimaryCode(value.to_string())),
            "requested" => Ok(Self::Submit),
            "approve" => Ok(Self::Approve {
                approver: value.to_string(),
            }),
            "unapprove" => Ok(Self::Unapprove {
                comment: value.to_string(),
            }),
            "day" | "requestday" => {
                let parts: Vec<&str> = value.split('|').collect();
                let [date, code, hours] = parts.as_slice() else {
                    return Err(EngineError::InvalidValue {
                        field: "day".to_string(),
                        message: format!("expected 'date|code|hours', got '{}'", value),
                    });
                };
                let hours = if hours.trim().is_empty() {
                    Decimal::ZERO
                } else {
                    hours.trim().parse().map_err(|_| EngineError::InvalidValue {
                        field: "day".to_string(),
                        message: format!("'{}' is not a number of hours", hours),
                    })?
                };
                Ok(Self::Day {
                    date: parse_date(date)?,
                    code: code.to_string(),
                    hours,
                })
            }
            _ => Err(EngineError::InvalidField {
                field: field.to_string(),
            }),
        }
    }

    /// Returns true if the change moves the request's date range.
    pub fn moves_dates(&self) -> bool {
        matches!(
            self,
            Self::StartDate(_) | Self::EndDate(_) | Self::Dates { .. }
        )
    }
}

fn parse_date(value: &str) -> EngineResult<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| EngineError::invalid_date(value, e))
}
