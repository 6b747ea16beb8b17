//! The leave request workflow.
//!
//! Requests move `DRAFT → REQUESTED → APPROVED`. Whenever a request's dates
//! change its days are re-materialized from the schedule, and an approved
//! request keeps the ledger in step with its days. Moving a date outside
//! the original range drops an approved request back to `REQUESTED`.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::change::LeaveRequestChange;
use super::ledger::LeaveEntry;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Employee, LeaveDay, LeaveRequest, LeaveRequestComment, LeaveStatus, RequestStatus,
    STANDARD_WORKDAY_HOURS,
};
use crate::schedule::interval;

/// Leave code for a holiday, which is always booked as a standard day.
pub const HOLIDAY_CODE: &str = "H";

/// Hours booked for each day of a holiday request.
pub const HOLIDAY_HOURS: Decimal = STANDARD_WORKDAY_HOURS;

/// The result of a leave request mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOutcome {
    /// A message for the employee or approver, if the change warrants one.
    pub notice: Option<String>,
    /// The request as it stands after the change.
    pub request: LeaveRequest,
}

impl Employee {
    /// Looks up a leave request by id.
    pub fn leave_request(&self, id: &str) -> Option<&LeaveRequest> {
        self.requests.iter().find(|r| r.id == id)
    }

    /// Opens a draft leave request and materializes its days.
    ///
    /// # Example
    ///
    /// ```
    /// use leave_engine::models::{Employee, EmployeeName, RequestStatus};
    /// use chrono::NaiveDate;
    ///
    /// let mut employee = Employee::new("emp_001", EmployeeName::new("Ada", "Lovelace"), "DGS");
    /// employee.add_assignment("DGS", "GEOINT", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    ///
    /// let request = employee
    ///     .create_leave_request(
    ///         "V",
    ///         NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
    ///         NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
    ///     )
    ///     .unwrap();
    /// assert_eq!(request.status, RequestStatus::Draft);
    /// // The weekend is not materialized
    /// assert_eq!(request.requested_days.len(), 5);
    /// ```
    pub fn create_leave_request(
        &mut self,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<&LeaveRequest> {
        check_range(start, end)?;
        let mut request = LeaveRequest::new(&self.id, code, start, end);
        request.requested_days = self.materialize(&request);
        info!(
            employee_id = %self.id,
            request_id = %request.id,
            code,
            %start,
            %end,
            days = request.requested_days.len(),
            "Created leave request"
        );
        let id = request.id.clone();
        self.requests.push(request);
        self.requests.sort_by_key(|r| r.start_date);
        self.requests
            .iter()
            .find(|r| r.id == id)
            .ok_or(EngineError::RequestNotFound { id })
    }

    /// Applies one change to the leave request `id`.
    ///
    /// Errors leave the request and ledger untouched.
    pub fn update_leave_request(
        &mut self,
        id: &str,
        change: LeaveRequestChange,
    ) -> EngineResult<RequestOutcome> {
        let pos = self
            .requests
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| EngineError::RequestNotFound { id: id.to_string() })?;
        let mut request = self.requests[pos].clone();

        let (start, end) = (request.start_date, request.end_date);
        let notice = match change {
            LeaveRequestChange::StartDate(date) => {
                self.change_dates(&mut request, date, end, "Starting date")?
            }
            LeaveRequestChange::EndDate(date) => {
                self.change_dates(&mut request, start, date, "Ending Date")?
            }
            LeaveRequestChange::Dates { start, end } => {
                self.change_dates(&mut request, start, end, "dates")?
            }
            LeaveRequestChange::PrimaryCode(code) => {
                request.primary_code = code;
                None
            }
            LeaveRequestChange::Submit => Some(self.submit(&mut request)?),
            LeaveRequestChange::Approve { approver } => {
                Some(self.approve(&mut request, &approver)?)
            }
            LeaveRequestChange::Unapprove { comment } => {
                Some(self.unapprove(&mut request, &comment)?)
            }
            LeaveRequestChange::Day { date, code, hours } => {
                edit_day(&mut request, date, &code, hours);
                None
            }
        };

        self.requests[pos] = request.clone();
        Ok(RequestOutcome { notice, request })
    }

    /// Deletes the leave request `id` and the unconfirmed ledger entries it produced.
    pub fn delete_leave_request(&mut self, id: &str) -> EngineResult<LeaveRequest> {
        let pos = self
            .requests
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| EngineError::RequestNotFound { id: id.to_string() })?;
        let request = self.requests.remove(pos);
        let removed = self.leaves.remove_owned_by(id);
        info!(
            employee_id = %self.id,
            request_id = id,
            ledger_entries = removed.len(),
            "Deleted leave request"
        );
        Ok(request)
    }

    /// Computes the days of leave `request` would take.
    ///
    /// Every day in range with a scheduled code becomes one day of leave at
    /// the scheduled hours, or at the standard workday length when the
    /// schedule gives none. Holiday requests always book a standard day.
    fn materialize(&self, request: &LeaveRequest) -> Vec<LeaveDay> {
        let standard_day = self.standard_workday_length(request.start_date);
        let status = LeaveStatus::from(request.status);
        let days: Vec<LeaveDay> = interval::days_between(request.start_date, request.end_date)
            .filter_map(|day| {
                let workday = self.resolve_without_leave(day).filter(|w| w.is_worked())?;
                let hours = if request.primary_code.eq_ignore_ascii_case(HOLIDAY_CODE) {
                    HOLIDAY_HOURS
                } else if workday.hours.is_zero() {
                    standard_day
                } else {
                    workday.hours
                };
                let mut leave = LeaveDay::new(day, &request.primary_code, hours, status);
                leave.request_id = request.id.clone();
                Some(leave)
            })
            .collect();
        debug!(request_id = %request.id, days = days.len(), "Materialized leave request");
        days
    }

    /// Replaces the ledger entries `request` owns with its current days.
    ///
    /// Confirmed entries already in the ledger for a day and code are kept
    /// as they are.
    fn sync_ledger(&mut self, request: &LeaveRequest) {
        self.leaves.remove_owned_by(&request.id);
        for day in request.requested_days.iter().filter(|d| !d.code.is_empty()) {
            let confirmed = self
                .leaves
                .iter()
                .any(|e| e.is_actual() && e.matches(day.day(), &day.code));
            if confirmed {
                continue;
            }
            self.leaves.upsert(LeaveEntry {
                id: None,
                date: day.leave_date,
                code: day.code.clone(),
                hours: day.hours,
                status: LeaveStatus::Approved,
                request_id: Some(request.id.clone()),
            });
        }
        debug!(request_id = %request.id, days = request.requested_days.len(), "Synced ledger");
    }

    fn change_dates(
        &mut self,
        request: &mut LeaveRequest,
        start: NaiveDate,
        end: NaiveDate,
        label: &str,
    ) -> EngineResult<Option<String>> {
        check_range(start, end)?;
        let mut notice = None;
        if !request.covers(start) || !request.covers(end) {
            self.leaves.remove_owned_by(&request.id);
            if request.is_approved() {
                request.set_status(RequestStatus::Requested, LeaveStatus::Requested);
                request.clear_approval();
                notice = Some(format!(
                    "Leave Request from {}: {} changed needs reapproval",
                    self.name.last_first(),
                    label
                ));
                info!(request_id = %request.id, "Leave request needs reapproval");
            }
        }
        request.start_date = start;
        request.end_date = end;
        request.requested_days = self.materialize(request);
        if request.is_approved() {
            self.sync_ledger(request);
        }
        Ok(notice)
    }

    fn submit(&self, request: &mut LeaveRequest) -> EngineResult<String> {
        if request.status == RequestStatus::Approved {
            return Err(EngineError::InvalidTransition {
                from: request.status.to_string(),
                action: "submit".to_string(),
            });
        }
        request.set_status(RequestStatus::Requested, LeaveStatus::Requested);
        info!(request_id = %request.id, "Leave request submitted");
        Ok(format!(
            "Leave Request: Leave Request from {} submitted for approval.  \
             Requested Leave Date: {} - {}.",
            self.name.last_first(),
            request.start_date.format("%d %b %y"),
            request.end_date.format("%d %b %y")
        ))
    }

    fn approve(&mut self, request: &mut LeaveRequest, approver: &str) -> EngineResult<String> {
        if approver.trim().is_empty() {
            return Err(EngineError::InvalidValue {
                field: "approve".to_string(),
                message: "an approver is required".to_string(),
            });
        }
        if request.status == RequestStatus::Draft {
            return Err(EngineError::InvalidTransition {
                from: request.status.to_string(),
                action: "approve".to_string(),
            });
        }
        request.approved_by = approver.to_string();
        request.approval_date = Some(Utc::now());
        request.set_status(RequestStatus::Approved, LeaveStatus::Approved);
        self.sync_ledger(request);
        info!(request_id = %request.id, approver, "Leave request approved");
        Ok("Leave Request: Leave Request approved.".to_string())
    }

    fn unapprove(&mut self, request: &mut LeaveRequest, comment: &str) -> EngineResult<String> {
        if comment.trim().is_empty() {
            return Err(EngineError::InvalidValue {
                field: "unapprove".to_string(),
                message: "a comment is required".to_string(),
            });
        }
        if request.status == RequestStatus::Draft {
            return Err(EngineError::InvalidTransition {
                from: request.status.to_string(),
                action: "unapprove".to_string(),
            });
        }
        request.clear_approval();
        request.set_status(RequestStatus::Draft, LeaveStatus::Requested);
        request.comments.push(LeaveRequestComment {
            comment_date: Utc::now(),
            comment: comment.to_string(),
        });
        self.leaves.remove_owned_by(&request.id);
        info!(request_id = %request.id, "Leave request unapproved");
        Ok(format!(
            "Leave Request: Leave Request unapproved.\nComment: {}",
            comment
        ))
    }
}

fn check_range(start: NaiveDate, end: NaiveDate) -> EngineResult<()> {
    if start > end {
        return Err(EngineError::InvalidValue {
            field: "dates".to_string(),
            message: format!("start {} is after end {}", start, end),
        });
    }
    Ok(())
}

fn edit_day(request: &mut LeaveRequest, date: NaiveDate, code: &str, hours: Decimal) {
    let hours = if code.is_empty() { Decimal::ZERO } else { hours };
    if let Some(day) = request.requested_days.iter_mut().find(|d| d.day() == date) {
        day.code = code.to_string();
        day.hours = hours;
        return;
    }
    let mut day = LeaveDay::new(date, code, hours, LeaveStatus::from(request.status));
    day.request_id = request.id.clone();
    request.requested_days.push(day);
    request.requested_days.sort_by_key(|d| d.leave_date);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmployeeName, Schedule, Variation};

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn dec(hours: i64) -> Decimal {
        Decimal::new(hours, 0)
    }

    fn make_employee() -> Employee {
        let mut employee = Employee::new("emp_001", EmployeeName::new("Ada", "Lovelace"), "DGS");
        employee.add_assignment("DGS", "GEOINT", make_date("2024-01-01"));
        employee
    }

    fn open_request(employee: &mut Employee, start: &str, end: &str) -> String {
        employee
            .create_leave_request("V", make_date(start), make_date(end))
            .unwrap()
            .id
            .clone()
    }

    fn approved_request(employee: &mut Employee, start: &str, end: &str) -> String {
        let id = open_request(employee, start, end);
        employee.update_leave_request(&id, LeaveRequestChange::Submit).unwrap();
        employee
            .update_leave_request(
                &id,
                LeaveRequestChange::Approve {
                    approver: "Grace Hopper".to_string(),
                },
            )
            .unwrap();
        id
    }

    #[test]
    fn test_create_materializes_scheduled_days() {
        let mut employee = make_employee();
        let id = open_request(&mut employee, "2024-03-04", "2024-03-08");
        let request = employee.leave_request(&id).unwrap();
        assert_eq!(request.requested_days.len(), 5);
        for day in &request.requested_days {
            assert_eq!(day.code, "V");
            assert_eq!(day.hours, dec(8));
            assert_eq!(day.status, LeaveStatus::Draft);
            assert!(day.belongs_to(&id));
        }
        assert!(employee.leaves.is_empty());
    }

    #[test]
    fn test_create_rejects_inverted_range() {
        let mut employee = make_employee();
        let result = employee.create_leave_request("V", make_date("2024-03-08"), make_date("2024-03-04"));
        assert!(matches!(result, Err(EngineError::InvalidValue { .. })));
        assert!(employee.requests.is_empty());
    }

    #[test]
    fn test_materialize_ignores_existing_leave() {
        let mut employee = make_employee();
        employee.add_leave(LeaveEntry::new(make_date("2024-03-05"), "S", dec(8), LeaveStatus::Actual));
        let id = open_request(&mut employee, "2024-03-04", "2024-03-05");
        assert_eq!(employee.leave_request(&id).unwrap().requested_days.len(), 2);
    }

    #[test]
    fn test_holiday_request_books_eight_hours() {
        let mut employee = make_employee();
        let mut schedule = Schedule::new(0, 7);
        schedule.workdays[1].code = "N".to_string();
        schedule.workdays[1].hours = dec(12);
        employee.variations.push(Variation {
            id: 1,
            site: "DGS".to_string(),
            is_mids: false,
            start_date: make_date("2024-03-04"),
            end_date: make_date("2024-03-04"),
            schedule,
        });
        let request = employee
            .create_leave_request("h", make_date("2024-03-04"), make_date("2024-03-04"))
            .unwrap();
        assert_eq!(request.requested_days[0].hours, dec(8));
    }

    #[test]
    fn test_zero_hour_day_uses_standard_length() {
        let mut employee = make_employee();
        if let Some(asgmt) = employee.assignments.get_mut(1) {
            asgmt.schedules[0].workdays[2].hours = Decimal::ZERO;
        }
        let request = employee
            .create_leave_request("V", make_date("2024-03-05"), make_date("2024-03-05"))
            .unwrap();
        assert_eq!(request.requested_days[0].hours, dec(8));
    }

    #[test]
    fn test_submit_moves_to_requested_with_notice() {
        let mut employee = make_employee();
        let id = open_request(&mut employee, "2024-03-04", "2024-03-08");
        let outcome = employee.update_leave_request(&id, LeaveRequestChange::Submit).unwrap();
        assert_eq!(outcome.request.status, RequestStatus::Requested);
        assert!(outcome.request.requested_days.iter().all(|d| d.status == LeaveStatus::Requested));
        assert_eq!(
            outcome.notice.unwrap(),
            "Leave Request: Leave Request from Lovelace, Ada submitted for approval.  \
             Requested Leave Date: 04 Mar 24 - 08 Mar 24."
        );
    }

    #[test]
    fn test_approve_copies_days_into_ledger() {
        let mut employee = make_employee();
        let id = approved_request(&mut employee, "2024-03-04", "2024-03-08");
        let request = employee.leave_request(&id).unwrap();
        assert_eq!(request.approved_by, "Grace Hopper");
        assert!(request.approval_date.is_some());
        assert_eq!(employee.leaves.len(), 5);
        assert!(employee
            .leaves
            .iter()
            .all(|e| e.status == LeaveStatus::Approved && e.belongs_to(&id)));
    }

    #[test]
    fn test_approve_draft_is_rejected() {
        let mut employee = make_employee();
        let id = open_request(&mut employee, "2024-03-04", "2024-03-08");
        let result = employee.update_leave_request(
            &id,
            LeaveRequestChange::Approve {
                approver: "boss".to_string(),
            },
        );
        assert!(matches!(result, Err(EngineError::InvalidTransition { .. })));
        assert!(employee.leaves.is_empty());
        assert_eq!(employee.leave_request(&id).unwrap().status, RequestStatus::Draft);
    }

    #[test]
    fn test_submit_approved_is_rejected() {
        let mut employee = make_employee();
        let id = approved_request(&mut employee, "2024-03-04", "2024-03-08");
        let result = employee.update_leave_request(&id, LeaveRequestChange::Submit);
        assert!(matches!(result, Err(EngineError::InvalidTransition { .. })));
    }

    #[test]
    fn test_approval_never_overwrites_actual_entry() {
        let mut employee = make_employee();
        employee.add_leave(LeaveEntry::new(make_date("2024-03-05"), "V", dec(4), LeaveStatus::Actual));
        let id = approved_request(&mut employee, "2024-03-04", "2024-03-06");
        let actual = employee
            .leaves
            .iter()
            .find(|e| e.day() == make_date("2024-03-05"))
            .unwrap();
        assert_eq!(actual.status, LeaveStatus::Actual);
        assert_eq!(actual.hours, dec(4));
        assert!(actual.is_manual());
        assert_eq!(employee.leaves.iter().filter(|e| e.belongs_to(&id)).count(), 2);
    }

    #[test]
    fn test_unapprove_requires_comment_and_clears_ledger() {
        let mut employee = make_employee();
        let id = approved_request(&mut employee, "2024-03-04", "2024-03-08");

        let result = employee.update_leave_request(
            &id,
            LeaveRequestChange::Unapprove {
                comment: " ".to_string(),
            },
        );
        assert!(matches!(result, Err(EngineError::InvalidValue { .. })));

        let outcome = employee
            .update_leave_request(
                &id,
                LeaveRequestChange::Unapprove {
                    comment: "Coverage needed".to_string(),
                },
            )
            .unwrap();
        assert_eq!(outcome.request.status, RequestStatus::Draft);
        assert!(outcome.request.approved_by.is_empty());
        assert!(outcome.request.approval_date.is_none());
        assert_eq!(outcome.request.comments.len(), 1);
        assert!(outcome.request.requested_days.iter().all(|d| d.status == LeaveStatus::Requested));
        assert_eq!(
            outcome.notice.unwrap(),
            "Leave Request: Leave Request unapproved.\nComment: Coverage needed"
        );
        assert!(employee.leaves.is_empty());
    }

    #[test]
    fn test_date_change_outside_range_needs_reapproval() {
        let mut employee = make_employee();
        let id = approved_request(&mut employee, "2024-03-04", "2024-03-08");
        let outcome = employee
            .update_leave_request(&id, LeaveRequestChange::EndDate(make_date("2024-03-12")))
            .unwrap();
        assert_eq!(outcome.request.status, RequestStatus::Requested);
        assert!(outcome.request.approved_by.is_empty());
        assert!(outcome.request.approval_date.is_none());
        assert_eq!(outcome.request.requested_days.len(), 7);
        assert_eq!(
            outcome.notice.unwrap(),
            "Leave Request from Lovelace, Ada: Ending Date changed needs reapproval"
        );
        assert!(employee.leaves.is_empty());
    }

    #[test]
    fn test_date_change_inside_range_stays_approved() {
        let mut employee = make_employee();
        let id = approved_request(&mut employee, "2024-03-04", "2024-03-08");
        let outcome = employee
            .update_leave_request(&id, LeaveRequestChange::StartDate(make_date("2024-03-06")))
            .unwrap();
        assert_eq!(outcome.notice, None);
        assert_eq!(outcome.request.status, RequestStatus::Approved);
        assert_eq!(outcome.request.requested_days.len(), 3);
        assert_eq!(employee.leaves.len(), 3);
        assert!(employee.leaves.iter().all(|e| e.day() >= make_date("2024-03-06")));
    }

    #[test]
    fn test_dates_change_on_draft_rematerializes_without_notice() {
        let mut employee = make_employee();
        let id = open_request(&mut employee, "2024-03-04", "2024-03-08");
        let outcome = employee
            .update_leave_request(
                &id,
                LeaveRequestChange::Dates {
                    start: make_date("2024-03-11"),
                    end: make_date("2024-03-12"),
                },
            )
            .unwrap();
        assert_eq!(outcome.notice, None);
        assert_eq!(outcome.request.requested_days.len(), 2);
        assert_eq!(outcome.request.requested_days[0].day(), make_date("2024-03-11"));
    }

    #[test]
    fn test_date_change_to_inverted_range_is_rejected() {
        let mut employee = make_employee();
        let id = approved_request(&mut employee, "2024-03-04", "2024-03-08");
        let result = employee.update_leave_request(&id, LeaveRequestChange::EndDate(make_date("2024-03-01")));
        assert!(matches!(result, Err(EngineError::InvalidValue { .. })));
        let request = employee.leave_request(&id).unwrap();
        assert_eq!(request.status, RequestStatus::Approved);
        assert_eq!(employee.leaves.len(), 5);
    }

    #[test]
    fn test_day_edit_touches_only_requested_days() {
        let mut employee = make_employee();
        let id = approved_request(&mut employee, "2024-03-04", "2024-03-08");
        let outcome = employee
            .update_leave_request(
                &id,
                LeaveRequestChange::Day {
                    date: make_date("2024-03-05"),
                    code: String::new(),
                    hours: dec(8),
                },
            )
            .unwrap();
        let day = outcome
            .request
            .requested_days
            .iter()
            .find(|d| d.day() == make_date("2024-03-05"))
            .unwrap();
        assert_eq!(day.hours, Decimal::ZERO);
        assert_eq!(employee.leaves.len(), 5);

        let outcome = employee
            .update_leave_request(
                &id,
                LeaveRequestChange::Day {
                    date: make_date("2024-03-09"),
                    code: "V".to_string(),
                    hours: dec(4),
                },
            )
            .unwrap();
        assert_eq!(outcome.request.requested_days.len(), 6);
        assert_eq!(outcome.request.requested_days[5].status, LeaveStatus::Approved);
    }

    #[test]
    fn test_primary_code_change_is_field_only() {
        let mut employee = make_employee();
        let id = open_request(&mut employee, "2024-03-04", "2024-03-08");
        let outcome = employee
            .update_leave_request(&id, LeaveRequestChange::PrimaryCode("S".to_string()))
            .unwrap();
        assert_eq!(outcome.request.primary_code, "S");
        assert!(outcome.request.requested_days.iter().all(|d| d.code == "V"));
    }

    #[test]
    fn test_delete_request_keeps_actual_entries() {
        let mut employee = make_employee();
        let id = approved_request(&mut employee, "2024-03-04", "2024-03-08");
        employee.update_leave(1, "status", "ACTUAL").unwrap();

        let deleted = employee.delete_leave_request(&id).unwrap();
        assert_eq!(deleted.id, id);
        assert!(employee.leave_request(&id).is_none());
        assert_eq!(employee.leaves.len(), 1);
        assert!(employee.leaves.iter().all(|e| e.is_actual()));
    }

    #[test]
    fn test_unknown_request_is_not_found() {
        let mut employee = make_employee();
        assert!(matches!(
            employee.update_leave_request("nope", LeaveRequestChange::Submit),
            Err(EngineError::RequestNotFound { .. })
        ));
        assert!(matches!(
            employee.delete_leave_request("nope"),
            Err(EngineError::RequestNotFound { .. })
        ));
    }
}
