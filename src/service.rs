//! Employee operations with their collaborators attached.
//!
//! [`EmployeeService`] runs an operation on an [`Employee`], records an
//! audit event for it, and hands any workflow notice to a
//! [`NotificationSink`]. The aggregate itself never talks to collaborators.

use std::sync::RwLock;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::audit::{AuditEvent, AuditSink};
use crate::config::{ApplicationConfig, AuditCategory};
use crate::error::{EngineError, EngineResult};
use crate::leave::{LeaveEntry, LeaveRequestChange, RequestOutcome};
use crate::models::{Assignment, Employee, LeaveRequest};

/// A workflow notice addressed about one leave request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// The employee the request belongs to.
    pub employee_id: String,
    /// The request the notice is about.
    pub request_id: String,
    /// The notice text.
    pub message: String,
}

/// Destination for workflow notices, e.g. an outbound mailer.
pub trait NotificationSink: Send + Sync {
    /// Delivers one notice.
    fn deliver(&self, notification: Notification);
}

/// Writes notices to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn deliver(&self, notification: Notification) {
        info!(
            employee_id = %notification.employee_id,
            request_id = %notification.request_id,
            "{}",
            notification.message
        );
    }
}

/// Keeps notices in memory.
#[derive(Debug, Default)]
pub struct MemoryNotificationSink {
    delivered: RwLock<Vec<Notification>>,
}

impl MemoryNotificationSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the delivered notices, oldest first.
    pub fn delivered(&self) -> Vec<Notification> {
        self.delivered
            .read()
            .map(|delivered| delivered.clone())
            .unwrap_or_default()
    }
}

impl NotificationSink for MemoryNotificationSink {
    fn deliver(&self, notification: Notification) {
        if let Ok(mut delivered) = self.delivered.write() {
            delivered.push(notification);
        }
    }
}

/// Runs employee operations and informs the audit and notification sinks.
///
/// # Example
///
/// ```
/// use leave_engine::audit::MemoryAuditSink;
/// use leave_engine::config::{ApplicationConfig, AuditConfig};
/// use leave_engine::models::{Employee, EmployeeName};
/// use leave_engine::service::{EmployeeService, MemoryNotificationSink};
/// use chrono::NaiveDate;
///
/// let service = EmployeeService::new(
///     ApplicationConfig::default(),
///     MemoryAuditSink::new(AuditConfig::default()),
///     MemoryNotificationSink::new(),
/// );
/// let mut employee = Employee::new("emp_001", EmployeeName::new("Ada", "Lovelace"), "DGS");
/// service.add_assignment(&mut employee, "DGS", "GEOINT", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
///
/// assert_eq!(service.audit_sink().events()[0].title, "Assignment Added");
/// ```
pub struct EmployeeService<A: AuditSink, N: NotificationSink> {
    application: ApplicationConfig,
    audit: A,
    notifier: N,
}

impl<A: AuditSink, N: NotificationSink> EmployeeService<A, N> {
    /// Creates a service with the given collaborators.
    pub fn new(application: ApplicationConfig, audit: A, notifier: N) -> Self {
        Self {
            application,
            audit,
            notifier,
        }
    }

    /// The audit sink.
    pub fn audit_sink(&self) -> &A {
        &self.audit
    }

    /// The notification sink.
    pub fn notification_sink(&self) -> &N {
        &self.notifier
    }

    /// Decodes an employee document, expanding any legacy payload.
    pub fn load_employee(&self, document: &str) -> EngineResult<Employee> {
        match Employee::from_json(document) {
            Ok(employee) => {
                self.record(
                    Some(&employee),
                    AuditCategory::Debug,
                    "Employee Loaded",
                    format!("{} assignments", employee.assignments.len()),
                );
                Ok(employee)
            }
            Err(err) => Err(self.refused(None, "Employee Load Failed", err)),
        }
    }

    /// Appends an assignment. See [`Employee::add_assignment`].
    pub fn add_assignment(
        &self,
        employee: &mut Employee,
        site: &str,
        workcenter: &str,
        start: NaiveDate,
    ) -> Option<u32> {
        let id = employee.add_assignment(site, workcenter, start)?;
        self.record(
            Some(&*employee),
            AuditCategory::Info,
            "Assignment Added",
            format!("{} {}/{} from {}", id, site, workcenter, start),
        );
        Some(id)
    }

    /// Removes an assignment. See [`Employee::remove_assignment`].
    pub fn remove_assignment(&self, employee: &mut Employee, id: u32) -> Option<Assignment> {
        let removed = employee.remove_assignment(id)?;
        self.record(
            Some(&*employee),
            AuditCategory::Info,
            "Assignment Removed",
            format!("{} {}/{}", removed.id, removed.site, removed.workcenter),
        );
        Some(removed)
    }

    /// Writes a ledger entry. See [`Employee::add_leave`].
    pub fn record_leave(&self, employee: &mut Employee, entry: LeaveEntry) -> u32 {
        let message = format!(
            "{} {} {} {}",
            entry.date.date(),
            entry.code,
            entry.hours,
            entry.status
        );
        let id = employee.add_leave(entry);
        self.record(
            Some(&*employee),
            AuditCategory::Info,
            "Leave Added",
            format!("{}: {}", id, message),
        );
        id
    }

    /// Opens a draft leave request. See [`Employee::create_leave_request`].
    pub fn create_leave_request(
        &self,
        employee: &mut Employee,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<LeaveRequest> {
        match employee.create_leave_request(code, start, end) {
            Ok(request) => {
                let request = request.clone();
                self.record(
                    Some(&*employee),
                    AuditCategory::Info,
                    "Leave Request Created",
                    format!("{} {} {} - {}", request.id, code, start, end),
                );
                Ok(request)
            }
            Err(err) => Err(self.refused(Some(&*employee), "Leave Request Refused", err)),
        }
    }

    /// Applies a `(field, value)` edit to a leave request.
    ///
    /// The edit is parsed with [`LeaveRequestChange::parse`]; any notice the
    /// workflow produces is delivered to the notification sink.
    pub fn change_leave_request(
        &self,
        employee: &mut Employee,
        id: &str,
        field: &str,
        value: &str,
    ) -> EngineResult<RequestOutcome> {
        let correlation_id = Uuid::new_v4();
        info!(
            correlation_id = %correlation_id,
            employee_id = %employee.id,
            request_id = id,
            field,
            "Processing leave request change"
        );

        let change = match LeaveRequestChange::parse(field, value) {
            Ok(change) => change,
            Err(err) => return Err(self.refused(Some(&*employee), "Leave Request Refused", err)),
        };
        let title = change_title(&change);
        let outcome = match employee.update_leave_request(id, change) {
            Ok(outcome) => outcome,
            Err(err) => return Err(self.refused(Some(&*employee), "Leave Request Refused", err)),
        };

        self.record(
            Some(&*employee),
            AuditCategory::Info,
            title,
            format!("{} {} = {}", id, field, value),
        );
        if let Some(message) = outcome.notice.as_deref().filter(|m| !m.is_empty()) {
            self.notifier.deliver(Notification {
                employee_id: employee.id.clone(),
                request_id: outcome.request.id.clone(),
                message: message.to_string(),
            });
        }
        info!(
            correlation_id = %correlation_id,
            status = %outcome.request.status,
            days = outcome.request.requested_days.len(),
            "Leave request change applied"
        );
        Ok(outcome)
    }

    /// Deletes a leave request. See [`Employee::delete_leave_request`].
    pub fn delete_leave_request(
        &self,
        employee: &mut Employee,
        id: &str,
    ) -> EngineResult<LeaveRequest> {
        match employee.delete_leave_request(id) {
            Ok(request) => {
                self.record(
                    Some(&*employee),
                    AuditCategory::Info,
                    "Leave Request Deleted",
                    format!(
                        "{} {} {} - {}",
                        request.id, request.primary_code, request.start_date, request.end_date
                    ),
                );
                Ok(request)
            }
            Err(err) => Err(self.refused(Some(&*employee), "Leave Request Delete Refused", err)),
        }
    }

    fn record(
        &self,
        employee: Option<&Employee>,
        category: AuditCategory,
        title: &str,
        message: String,
    ) {
        let event = AuditEvent::new(&self.application.name, category, title, &message)
            .with_site(&self.application.default_site);
        let event = match employee {
            Some(employee) => event.for_employee(employee),
            None => event,
        };
        self.audit.record(event);
    }

    fn refused(&self, employee: Option<&Employee>, title: &str, err: EngineError) -> EngineError {
        warn!(
            employee_id = employee.map(|e| e.id.as_str()).unwrap_or_default(),
            error = %err,
            "{}",
            title
        );
        self.record(employee, AuditCategory::Error, title, err.to_string());
        err
    }
}

fn change_title(change: &LeaveRequestChange) -> &'static str {
    match change {
        LeaveRequestChange::Submit => "Leave Request Submitted",
        LeaveRequestChange::Approve { .. } => "Leave Request Approved",
        LeaveRequestChange::Unapprove { .. } => "Leave Request Unapproved",
        change if change.moves_dates() => "Leave Request Dates Changed",
        _ => "Leave Request Updated",
    }
}
