//! Employee identity and profile records.

use serde::{Deserialize, Serialize};

/// An employee's name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeName {
    /// Given name.
    #[serde(default)]
    pub first: String,
    /// Middle name.
    #[serde(default)]
    pub middle: String,
    /// Family name.
    #[serde(default)]
    pub last: String,
    /// Suffix such as "Jr".
    #[serde(default)]
    pub suffix: String,
}

impl EmployeeName {
    /// Creates a name without middle name or suffix.
    pub fn new(first: &str, last: &str) -> Self {
        Self {
            first: first.to_string(),
            last: last.to_string(),
            ..Self::default()
        }
    }

    /// Formats the name as `Last, First`.
    ///
    /// # Example
    ///
    /// ```
    /// use leave_engine::models::EmployeeName;
    ///
    /// let name = EmployeeName::new("Ada", "Lovelace");
    /// assert_eq!(name.last_first(), "Lovelace, Ada");
    /// ```
    pub fn last_first(&self) -> String {
        format!("{}, {}", self.last, self.first)
    }

    /// Formats the name as `Last, First M`.
    pub fn last_first_mi(&self) -> String {
        match self.middle.chars().next() {
            Some(initial) => format!("{}, {} {}", self.last, self.first, initial),
            None => self.last_first(),
        }
    }
}

/// Company-side employment details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    /// Employing company code.
    #[serde(default)]
    pub company: String,
    /// Company employee number.
    #[serde(default)]
    pub employee_id: String,
    /// Alternate employee number.
    #[serde(default)]
    pub alternate_id: String,
    /// Job title.
    #[serde(default)]
    pub job_title: String,
    /// Rank or grade.
    #[serde(default)]
    pub rank: String,
    /// Cost center.
    #[serde(default)]
    pub cost_center: String,
    /// Division.
    #[serde(default)]
    pub division: String,
}

/// One piece of contact information, typed by the team's contact types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Identifier within the employee.
    pub id: i32,
    /// The team contact type.
    pub type_id: i32,
    /// The contact value, e.g. a phone number.
    pub value: String,
    /// Display order.
    #[serde(default)]
    pub sort_id: i32,
}

/// A specialty the employee holds or is training for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialty {
    /// Identifier within the employee.
    pub id: i32,
    /// The team specialty type.
    pub specialty_id: i32,
    /// True if the employee is qualified.
    pub qualified: bool,
    /// Display order.
    #[serde(default)]
    pub sort_id: i32,
}
