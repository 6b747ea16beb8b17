//! The leave ledger.
//!
//! [`LeaveLedger`] is the authoritative day-by-day leave record of one
//! employee. Entries stay sorted by date; ids are allocated one past the
//! highest id in use. Range operations are half-open `[start, end)`.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, LeaveDay, LeaveStatus};
use crate::schedule::interval;

/// Leave code for vacation.
pub const VACATION_CODE: &str = "V";

/// A leave record to merge into the ledger.
///
/// # Example
///
/// ```
/// use leave_engine::leave::{LeaveEntry, LeaveLedger};
/// use leave_engine::models::LeaveStatus;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
/// let mut ledger = LeaveLedger::default();
/// let id = ledger.upsert(LeaveEntry::new(date, "V", Decimal::new(8, 0), LeaveStatus::Approved));
/// let again = ledger.upsert(LeaveEntry::new(date, "v", Decimal::new(4, 0), LeaveStatus::Actual));
/// assert_eq!(id, again);
/// assert_eq!(ledger.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveEntry {
    /// Existing entry to update, if known.
    pub id: Option<u32>,
    /// Day of leave, with an hour-of-day if the source supplied one.
    pub date: NaiveDateTime,
    /// Leave code.
    pub code: String,
    /// Hours of leave.
    pub hours: Decimal,
    /// Ledger status.
    pub status: LeaveStatus,
    /// Originating leave request; `None` leaves an existing link alone.
    pub request_id: Option<String>,
}

impl LeaveEntry {
    /// Creates a day-granular entry with no id or request link.
    pub fn new(date: NaiveDate, code: &str, hours: Decimal, status: LeaveStatus) -> Self {
        Self {
            id: None,
            date: interval::midnight(date),
            code: code.to_string(),
            hours,
            status,
            request_id: None,
        }
    }

    /// Targets an existing entry by id.
    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    /// Links the entry to the leave request `request_id`.
    pub fn for_request(mut self, request_id: &str) -> Self {
        self.request_id = Some(request_id.to_string());
        self
    }
}

/// An employee's leave entries in date order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<LeaveDay>", into = "Vec<LeaveDay>")]
pub struct LeaveLedger(Vec<LeaveDay>);

impl From<Vec<LeaveDay>> for LeaveLedger {
    fn from(entries: Vec<LeaveDay>) -> Self {
        Self::new(entries)
    }
}

impl From<LeaveLedger> for Vec<LeaveDay> {
    fn from(ledger: LeaveLedger) -> Self {
        ledger.0
    }
}

impl LeaveLedger {
    /// Builds a ledger from entries in any order.
    pub fn new(mut entries: Vec<LeaveDay>) -> Self {
        entries.sort_by_key(|e| e.leave_date);
        Self(entries)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the ledger holds no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in date order.
    pub fn iter(&self) -> std::slice::Iter<'_, LeaveDay> {
        self.0.iter()
    }

    /// Looks up an entry by id.
    pub fn get(&self, id: u32) -> Option<&LeaveDay> {
        self.0.iter().find(|e| e.id == id)
    }

    /// Merges `entry` into the ledger and returns the id it landed on.
    ///
    /// An entry on the same day with the same code (ignoring case), or with
    /// the explicit id, is updated in place: its status, hours and, when
    /// supplied, request link. Otherwise a new entry is appended with the
    /// next id.
    pub fn upsert(&mut self, entry: LeaveEntry) -> u32 {
        let day = interval::normalize(entry.date);
        let existing = self
            .0
            .iter_mut()
            .find(|e| e.matches(day, &entry.code) || entry.id.is_some_and(|id| id == e.id));
        if let Some(existing) = existing {
            existing.status = entry.status;
            existing.hours = entry.hours;
            if let Some(request_id) = entry.request_id {
                existing.request_id = request_id;
            }
            debug!(leave_id = existing.id, %day, code = %existing.code, "Updated leave entry");
            return existing.id;
        }

        let id = self.next_id();
        self.0.push(LeaveDay {
            id,
            leave_date: entry.date,
            code: entry.code,
            hours: entry.hours,
            status: entry.status,
            request_id: entry.request_id.unwrap_or_default(),
        });
        self.sort();
        debug!(leave_id = id, %day, "Added leave entry");
        id
    }

    /// Removes the entry `id`, returning it.
    pub fn delete_by_id(&mut self, id: u32) -> Option<LeaveDay> {
        let pos = self.0.iter().position(|e| e.id == id)?;
        Some(self.0.remove(pos))
    }

    /// Removes every entry dated in `[start, end)`, returning them.
    ///
    /// Pass the day after the last day to remove.
    pub fn delete_range(&mut self, start: NaiveDate, end: NaiveDate) -> Vec<LeaveDay> {
        self.extract(|e| interval::contains_half_open(start, end, e.day()))
    }

    /// Removes the entries a leave request produced, except confirmed ones.
    pub fn remove_owned_by(&mut self, request_id: &str) -> Vec<LeaveDay> {
        self.extract(|e| e.belongs_to(request_id) && !e.is_actual())
    }

    /// Removes entries dated before `date`, returning how many were dropped.
    pub fn purge_before(&mut self, date: NaiveDate) -> usize {
        self.extract(|e| e.day() < date).len()
    }

    /// Sums hours in `[start, end)`, optionally filtered by status and code.
    ///
    /// The code filter ignores case.
    pub fn hours_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        status: Option<LeaveStatus>,
        code: Option<&str>,
    ) -> Decimal {
        self.0
            .iter()
            .filter(|e| interval::contains_half_open(start, end, e.day()))
            .filter(|e| status.is_none_or(|s| e.status == s))
            .filter(|e| code.is_none_or(|c| e.code.eq_ignore_ascii_case(c)))
            .map(|e| e.hours)
            .sum()
    }

    /// Confirmed leave hours of any code in `[start, end)`.
    pub fn actual_hours(&self, start: NaiveDate, end: NaiveDate) -> Decimal {
        self.hours_in_range(start, end, Some(LeaveStatus::Actual), None)
    }

    /// Confirmed vacation hours in `[start, end)`.
    pub fn pto_hours(&self, start: NaiveDate, end: NaiveDate) -> Decimal {
        self.hours_in_range(start, end, Some(LeaveStatus::Actual), Some(VACATION_CODE))
    }

    fn next_id(&self) -> u32 {
        self.0.iter().map(|e| e.id).max().unwrap_or(0) + 1
    }

    fn sort(&mut self) {
        self.0.sort_by_key(|e| e.leave_date);
    }

    fn extract(&mut self, mut remove: impl FnMut(&LeaveDay) -> bool) -> Vec<LeaveDay> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.0)
            .into_iter()
            .partition(|e| remove(e));
        self.0 = kept;
        removed
    }
}

impl<'a> IntoIterator for &'a LeaveLedger {
    type Item = &'a LeaveDay;
    type IntoIter = std::slice::Iter<'a, LeaveDay>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Employee {
    /// Records a day of leave. See [`LeaveLedger::upsert`].
    pub fn add_leave(&mut self, entry: LeaveEntry) -> u32 {
        self.leaves.upsert(entry)
    }

    /// Removes a ledger entry by id, returning it.
    pub fn delete_leave(&mut self, id: u32) -> Option<LeaveDay> {
        self.leaves.delete_by_id(id)
    }

    /// Corrects one field of a ledger entry and returns the entry as it was.
    ///
    /// Fields (case-insensitive): `date` as `MM/DD/YYYY`, `code`, `hours`,
    /// `status` and `requestid`.
    pub fn update_leave(&mut self, id: u32, field: &str, value: &str) -> EngineResult<LeaveDay> {
        if id == 0 {
            return Err(EngineError::InvalidDayId { id });
        }
        let entry = self
            .leaves
            .0
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(EngineError::LeaveNotFound { id })?;
        let prior = entry.clone();

        match field.to_ascii_lowercase().as_str() {
            "date" => {
                let date = NaiveDate::parse_from_str(value, "%m/%d/%Y")
                    .map_err(|e| EngineError::invalid_date(value, e))?;
                entry.leave_date = interval::midnight(date);
            }
            "code" => entry.code = value.to_string(),
            "hours" => {
                entry.hours = value.trim().parse().map_err(|_| EngineError::InvalidValue {
                    field: "hours".to_string(),
                    message: format!("'{}' is not a number of hours", value),
                })?;
            }
            "status" => entry.status = value.parse()?,
            "requestid" => entry.request_id = value.to_string(),
            _ => {
                return Err(EngineError::InvalidField {
                    field: field.to_string(),
                });
            }
        }
        self.leaves.sort();
        debug!(employee_id = %self.id, leave_id = id, field, "Corrected leave entry");
        Ok(prior)
    }
}
