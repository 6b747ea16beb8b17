//! The ordered, non-overlapping assignment timeline.
//!
//! Assignments are kept sorted by start date. Every one but the last ends the
//! day before its successor starts; the last ends at [`open_end`] while the
//! employee is active.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::interval::open_end;
use crate::models::{Assignment, Employee};

/// An employee's assignments in start-date order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Assignment>", into = "Vec<Assignment>")]
pub struct AssignmentTimeline(Vec<Assignment>);

impl From<Vec<Assignment>> for AssignmentTimeline {
    fn from(assignments: Vec<Assignment>) -> Self {
        Self::new(assignments)
    }
}

impl From<AssignmentTimeline> for Vec<Assignment> {
    fn from(timeline: AssignmentTimeline) -> Self {
        timeline.0
    }
}

impl AssignmentTimeline {
    /// Builds a timeline from assignments in any order.
    pub fn new(mut assignments: Vec<Assignment>) -> Self {
        assignments.sort_by_key(|a| a.start_date);
        Self(assignments)
    }

    /// Number of assignments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the employee has never been assigned.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates assignments in start-date order.
    pub fn iter(&self) -> std::slice::Iter<'_, Assignment> {
        self.0.iter()
    }

    /// Iterates assignments mutably. Callers must not move start or end dates.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Assignment> {
        self.0.iter_mut()
    }

    /// Looks up an assignment by id.
    pub fn get(&self, id: u32) -> Option<&Assignment> {
        self.0.iter().find(|a| a.id == id)
    }

    /// Looks up an assignment by id for schedule or labor code edits.
    pub fn get_mut(&mut self, id: u32) -> Option<&mut Assignment> {
        self.0.iter_mut().find(|a| a.id == id)
    }

    /// The latest assignment.
    pub fn last(&self) -> Option<&Assignment> {
        self.0.last()
    }

    /// The assignment whose range contains `date`.
    pub fn covering(&self, date: NaiveDate) -> Option<&Assignment> {
        self.0.iter().rev().find(|a| a.covers(date))
    }

    /// Starts a new open-ended assignment on `start`.
    ///
    /// The current last assignment is closed the day before `start`, and the
    /// new one gets the next id and the default weekday schedule. Returns
    /// `None` without changing anything when `start` does not fall after the
    /// last assignment's start, since closing it would leave it inverted.
    ///
    /// # Example
    ///
    /// ```
    /// use leave_engine::schedule::AssignmentTimeline;
    /// use chrono::NaiveDate;
    ///
    /// let mut timeline = AssignmentTimeline::default();
    /// let jan = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    /// let jun = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    /// assert_eq!(timeline.append("DGS", "GEOINT", jan), Some(1));
    /// assert_eq!(timeline.append("DGS", "OPS", jun), Some(2));
    /// assert_eq!(
    ///     timeline.get(1).unwrap().end_date,
    ///     NaiveDate::from_ymd_opt(2024, 5, 31).unwrap()
    /// );
    /// assert!(timeline.is_contiguous());
    /// ```
    pub fn append(&mut self, site: &str, workcenter: &str, start: NaiveDate) -> Option<u32> {
        if let Some(last) = self.0.last_mut() {
            if start <= last.start_date {
                return None;
            }
            last.end_date = start - Duration::days(1);
        }
        let id = self.0.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        self.0.push(Assignment::new(id, site, workcenter, start));
        self.0.sort_by_key(|a| a.start_date);
        debug!(assignment_id = id, site, workcenter, %start, "Appended assignment");
        Some(id)
    }

    /// Splices out the assignment `id`, handing its end date to its predecessor.
    ///
    /// The first assignment anchors history and is never removed; an id of
    /// one or less, or one that does not exist, leaves the timeline untouched.
    pub fn remove(&mut self, id: u32) -> Option<Assignment> {
        if id <= 1 {
            return None;
        }
        let pos = self.0.iter().position(|a| a.id == id)?;
        if pos == 0 {
            return None;
        }
        let removed = self.0.remove(pos);
        self.0[pos - 1].end_date = if pos == self.0.len() {
            open_end()
        } else {
            removed.end_date
        };
        debug!(assignment_id = id, "Removed assignment");
        Some(removed)
    }

    /// Checks the ordering invariant.
    ///
    /// Each assignment must end the day before the next one starts, and no
    /// assignment may end before it starts.
    pub fn is_contiguous(&self) -> bool {
        self.0.iter().all(|a| a.start_date <= a.end_date)
            && self
                .0
                .windows(2)
                .all(|pair| pair[0].end_date + Duration::days(1) == pair[1].start_date)
    }
}

impl<'a> IntoIterator for &'a AssignmentTimeline {
    type Item = &'a Assignment;
    type IntoIter = std::slice::Iter<'a, Assignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Employee {
    /// Appends an assignment to the employee's timeline. See [`AssignmentTimeline::append`].
    pub fn add_assignment(&mut self, site: &str, workcenter: &str, start: NaiveDate) -> Option<u32> {
        self.assignments.append(site, workcenter, start)
    }

    /// Removes an assignment from the employee's timeline. See [`AssignmentTimeline::remove`].
    pub fn remove_assignment(&mut self, id: u32) -> Option<Assignment> {
        self.assignments.remove(id)
    }

    /// Drops history older than `date`.
    ///
    /// Removes variations and requests that ended before `date`, ledger
    /// entries dated before it and balances for earlier years. Returns true
    /// if the employee's last assignment ended before `date`, meaning the
    /// record can be archived.
    pub fn purge_before(&mut self, date: NaiveDate) -> bool {
        self.variations.retain(|v| v.end_date >= date);
        self.requests.retain(|r| r.end_date >= date);
        let purged = self.leaves.purge_before(date);
        self.balances.retain(|b| b.year >= date.year());
        debug!(employee_id = %self.id, %date, leaves = purged, "Purged old records");
        self.assignments
            .last()
            .is_some_and(|last| last.end_date < date)
    }
}
