//! Employee aggregate root.
//!
//! The [`Employee`] owns every time-indexed record the engine reconciles:
//! the assignment timeline, variations, the leave ledger, leave requests and
//! balances. Work history is attached by the caller as a read-only snapshot.
//!
//! Scheduling, ledger and workflow behaviour live in the `schedule` and
//! `leave` modules as further `impl Employee` blocks; this module holds the
//! record itself, document decoding, the legacy payload migration and the
//! contact/specialty profile operations.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    AnnualLeave, Assignment, CompanyInfo, Contact, EmployeeName, LaborCode, LeaveDay,
    LeaveRequest, Specialty, Variation, Work,
};
use crate::error::{EngineError, EngineResult};
use crate::leave::LeaveLedger;
use crate::schedule::AssignmentTimeline;

/// The legacy collapsed payload older documents carry in place of the live fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeData {
    /// Company-side details.
    #[serde(default)]
    pub company_info: CompanyInfo,
    /// Assignments.
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    /// Variations.
    #[serde(default)]
    pub variations: Vec<Variation>,
    /// Annual balances.
    #[serde(default)]
    pub balances: Vec<AnnualLeave>,
    /// Leave ledger entries.
    #[serde(default)]
    pub leaves: Vec<LeaveDay>,
    /// Leave requests.
    #[serde(default)]
    pub requests: Vec<LeaveRequest>,
    /// Labor codes, applied to every assignment on migration.
    #[serde(default)]
    pub labor_codes: Vec<LaborCode>,
}

/// An employee and every record the engine reconciles for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Identifier of the employee document.
    pub id: String,
    /// The team the employee belongs to.
    #[serde(default)]
    pub team_id: String,
    /// The employee's home site.
    #[serde(default)]
    pub site_id: String,
    /// The linked user account.
    #[serde(default)]
    pub user_id: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// The employee's name.
    #[serde(default)]
    pub name: EmployeeName,
    /// Legacy collapsed payload; cleared by [`Employee::migrate_legacy_payload`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<EmployeeData>,
    /// Company-side details.
    #[serde(default)]
    pub company_info: CompanyInfo,
    /// Work placements, ordered by start date.
    #[serde(default)]
    pub assignments: AssignmentTimeline,
    /// Temporary schedule overrides.
    #[serde(default)]
    pub variations: Vec<Variation>,
    /// Annual leave balances.
    #[serde(default)]
    pub balances: Vec<AnnualLeave>,
    /// The leave ledger.
    #[serde(default)]
    pub leaves: LeaveLedger,
    /// Leave requests.
    #[serde(default)]
    pub requests: Vec<LeaveRequest>,
    /// Actual work history, supplied by timekeeping and never persisted here.
    #[serde(default, skip_serializing)]
    pub work: Vec<Work>,
    /// Contact information.
    #[serde(default)]
    pub contact_info: Vec<Contact>,
    /// Specialties.
    #[serde(default)]
    pub specialties: Vec<Specialty>,
}

impl Employee {
    /// Creates an employee with no records.
    ///
    /// # Example
    ///
    /// ```
    /// use leave_engine::models::{Employee, EmployeeName};
    ///
    /// let employee = Employee::new("emp_001", EmployeeName::new("Ada", "Lovelace"), "DGS");
    /// assert!(employee.assignments.is_empty());
    /// assert!(employee.leaves.is_empty());
    /// ```
    pub fn new(id: &str, name: EmployeeName, site_id: &str) -> Self {
        Self {
            id: id.to_string(),
            name,
            site_id: site_id.to_string(),
            ..Self::default()
        }
    }

    /// Decodes an employee document and expands any legacy payload.
    ///
    /// This is the load-time entry point for the persistence collaborator:
    /// the aggregate it returns never carries a collapsed payload.
    pub fn from_json(document: &str) -> EngineResult<Self> {
        let mut employee: Employee =
            serde_json::from_str(document).map_err(|e| EngineError::Document {
                message: e.to_string(),
            })?;
        employee.migrate_legacy_payload();
        Ok(employee)
    }

    /// Expands the legacy collapsed payload into the live fields.
    ///
    /// Labor codes from the payload are attached to every assignment. The
    /// payload is cleared afterwards, so a second call does nothing.
    /// Returns true if a payload was migrated.
    pub fn migrate_legacy_payload(&mut self) -> bool {
        let Some(data) = self.data.take() else {
            return false;
        };
        debug!(
            employee_id = %self.id,
            assignments = data.assignments.len(),
            leaves = data.leaves.len(),
            requests = data.requests.len(),
            "Expanding legacy employee payload"
        );
        self.company_info = data.company_info;
        self.assignments = AssignmentTimeline::new(data.assignments);
        self.variations = data.variations;
        self.balances = data.balances;
        self.leaves = LeaveLedger::new(data.leaves);
        self.requests = data.requests;
        for labor_code in &data.labor_codes {
            for asgmt in self.assignments.iter_mut() {
                if !asgmt.has_labor_code(&labor_code.charge_number, &labor_code.extension) {
                    asgmt.labor_codes.push(labor_code.clone());
                }
            }
        }
        true
    }

    /// Sets the contact value for `type_id`, adding a contact if none exists.
    pub fn add_contact(&mut self, type_id: i32, value: &str, sort_id: i32) {
        if let Some(contact) = self.contact_info.iter_mut().find(|c| c.type_id == type_id) {
            contact.value = value.to_string();
        } else {
            let id = self.contact_info.iter().map(|c| c.id + 1).max().unwrap_or(0);
            self.contact_info.push(Contact {
                id,
                type_id,
                value: value.to_string(),
                sort_id,
            });
        }
        self.contact_info.sort_by_key(|c| c.sort_id);
    }

    /// Re-applies team sort orders keyed by contact type.
    pub fn resort_contacts(&mut self, sort_by_type: &HashMap<i32, i32>) {
        for contact in self.contact_info.iter_mut() {
            if let Some(sort_id) = sort_by_type.get(&contact.type_id) {
                contact.sort_id = *sort_id;
            }
        }
        self.contact_info.sort_by_key(|c| c.sort_id);
    }

    /// Removes the contact with `id`, if present.
    pub fn delete_contact(&mut self, id: i32) {
        self.contact_info.retain(|c| c.id != id);
    }

    /// Removes the contact of `type_id`, if present.
    pub fn delete_contact_by_type(&mut self, type_id: i32) {
        self.contact_info.retain(|c| c.type_id != type_id);
    }

    /// Sets the qualification for `specialty_id`, adding the specialty if needed.
    pub fn add_specialty(&mut self, specialty_id: i32, qualified: bool, sort_id: i32) {
        if let Some(specialty) = self
            .specialties
            .iter_mut()
            .find(|s| s.specialty_id == specialty_id)
        {
            specialty.qualified = qualified;
        } else {
            let id = self.specialties.iter().map(|s| s.id + 1).max().unwrap_or(0);
            self.specialties.push(Specialty {
                id,
                specialty_id,
                qualified,
                sort_id,
            });
        }
        self.specialties.sort_by_key(|s| s.sort_id);
    }

    /// Re-applies team sort orders keyed by specialty type.
    pub fn resort_specialties(&mut self, sort_by_type: &HashMap<i32, i32>) {
        for specialty in self.specialties.iter_mut() {
            if let Some(sort_id) = sort_by_type.get(&specialty.specialty_id) {
                specialty.sort_id = *sort_id;
            }
        }
        self.specialties.sort_by_key(|s| s.sort_id);
    }

    /// Removes the specialty with `id`, if present.
    pub fn delete_specialty(&mut self, id: i32) {
        self.specialties.retain(|s| s.id != id);
    }

    /// Removes the specialty of `specialty_id`, if present.
    pub fn delete_specialty_by_type(&mut self, specialty_id: i32) {
        self.specialties.retain(|s| s.specialty_id != specialty_id);
    }

    /// Returns true if the employee holds `specialty_id`.
    pub fn has_specialty(&self, specialty_id: i32) -> bool {
        self.specialties.iter().any(|s| s.specialty_id == specialty_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn legacy_document() -> &'static str {
        r#"{
            "id": "emp_001",
            "site_id": "DGS",
            "name": {"first": "Ada", "last": "Lovelace"},
            "data": {
                "company_info": {"company": "rtx", "employee_id": "E100"},
                "assignments": [
                    {"id": 1, "site": "DGS", "workcenter": "GEOINT",
                     "start_date": "2024-01-01", "end_date": "9999-12-30"}
                ],
                "balances": [{"year": 2024, "annual": "120", "carryover": "0"}],
                "leaves": [
                    {"id": 1, "leave_date": "2024-02-01", "code": "V",
                     "hours": "8", "status": "ACTUAL"}
                ],
                "labor_codes": [{"charge_number": "C100", "extension": "A"}]
            }
        }"#
    }

    #[test]
    fn test_from_json_expands_legacy_payload() {
        let employee = Employee::from_json(legacy_document()).unwrap();
        assert!(employee.data.is_none());
        assert_eq!(employee.company_info.employee_id, "E100");
        assert_eq!(employee.assignments.len(), 1);
        assert_eq!(employee.balances.len(), 1);
        assert_eq!(employee.leaves.len(), 1);
        let asgmt = employee.assignments.get(1).unwrap();
        assert!(asgmt.has_labor_code("c100", "a"));
    }

    #[test]
    fn test_migration_is_idempotent() {
        let mut employee = Employee::from_json(legacy_document()).unwrap();
        assert!(!employee.migrate_legacy_payload());
        assert_eq!(employee.assignments.len(), 1);
        assert_eq!(employee.assignments.get(1).unwrap().labor_codes.len(), 1);
    }

    #[test]
    fn test_from_json_sorts_assignments_before_append() {
        let document = r#"{
            "id": "emp_002",
            "site_id": "DGS",
            "name": {"first": "Ada", "last": "Lovelace"},
            "assignments": [
                {"id": 2, "site": "DGS", "workcenter": "OPS",
                 "start_date": "2024-06-01", "end_date": "9999-12-30"},
                {"id": 1, "site": "DGS", "workcenter": "GEOINT",
                 "start_date": "2024-01-01", "end_date": "2024-05-31"}
            ]
        }"#;
        let mut employee = Employee::from_json(document).unwrap();
        employee.add_assignment("DGS", "ADM", make_date("2024-09-01"));

        assert!(employee.assignments.is_contiguous());
        let open: Vec<u32> = employee
            .assignments
            .iter()
            .filter(|a| a.is_open())
            .map(|a| a.id)
            .collect();
        assert_eq!(open, vec![3]);
        assert_eq!(
            employee.assignments.get(2).unwrap().end_date,
            make_date("2024-08-31")
        );
    }

    #[test]
    fn test_from_json_rejects_bad_document() {
        let result = Employee::from_json("{\"site_id\": 5}");
        assert!(matches!(result, Err(EngineError::Document { .. })));
    }

    #[test]
    fn test_work_is_not_serialized() {
        let mut employee = Employee::new("emp", EmployeeName::new("A", "B"), "DGS");
        employee.work.push(Work {
            date_worked: make_date("2024-01-02"),
            charge_number: String::new(),
            extension: String::new(),
            pay_code: String::new(),
            hours: rust_decimal::Decimal::new(8, 0),
        });
        let json = serde_json::to_string(&employee).unwrap();
        assert!(!json.contains("date_worked"));
        assert!(!json.contains("\"data\""));
    }

    #[test]
    fn test_add_contact_upserts_by_type() {
        let mut employee = Employee::new("emp", EmployeeName::new("A", "B"), "DGS");
        employee.add_contact(2, "555-0100", 1);
        employee.add_contact(2, "555-0199", 1);
        employee.add_contact(3, "a@b.c", 0);
        assert_eq!(employee.contact_info.len(), 2);
        assert_eq!(employee.contact_info[0].type_id, 3);
        assert_eq!(employee.contact_info[1].value, "555-0199");
    }

    #[test]
    fn test_delete_contact_missing_is_no_op() {
        let mut employee = Employee::new("emp", EmployeeName::new("A", "B"), "DGS");
        employee.add_contact(2, "555-0100", 1);
        employee.delete_contact_by_type(9);
        employee.delete_contact(42);
        assert_eq!(employee.contact_info.len(), 1);
        employee.delete_contact_by_type(2);
        assert!(employee.contact_info.is_empty());
    }

    #[test]
    fn test_resort_contacts_reorders() {
        let mut employee = Employee::new("emp", EmployeeName::new("A", "B"), "DGS");
        employee.add_contact(1, "first", 0);
        employee.add_contact(2, "second", 1);
        let mut order = HashMap::new();
        order.insert(1, 5);
        employee.resort_contacts(&order);
        assert_eq!(employee.contact_info[0].type_id, 2);
    }

    #[test]
    fn test_specialties_upsert_and_delete() {
        let mut employee = Employee::new("emp", EmployeeName::new("A", "B"), "DGS");
        employee.add_specialty(7, false, 2);
        employee.add_specialty(7, true, 2);
        employee.add_specialty(8, true, 1);
        assert_eq!(employee.specialties.len(), 2);
        assert!(employee.has_specialty(7));
        assert!(employee.specialties.iter().any(|s| s.specialty_id == 7 && s.qualified));

        let mut order = HashMap::new();
        order.insert(7, 0);
        employee.resort_specialties(&order);
        assert_eq!(employee.specialties[0].specialty_id, 7);

        employee.delete_specialty_by_type(7);
        employee.delete_specialty(99);
        assert!(!employee.has_specialty(7));
        assert_eq!(employee.specialties.len(), 1);
    }
}
