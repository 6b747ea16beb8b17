//! Schedule variation model.
//!
//! A [`Variation`] temporarily replaces an assignment's template for a
//! sub-range of dates at one site.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Schedule, Workday};
use crate::schedule::interval;

/// A dated override of an assignment's base schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variation {
    /// Identifier of the variation.
    pub id: u32,
    /// The site the variation applies to.
    pub site: String,
    /// True if the variation moves the employee onto mid shifts.
    #[serde(default)]
    pub is_mids: bool,
    /// First day of the variation.
    pub start_date: NaiveDate,
    /// Last day of the variation (inclusive).
    pub end_date: NaiveDate,
    /// The replacement template, indexed by weekday.
    pub schedule: Schedule,
}

impl Variation {
    /// Returns true if `date` falls inside the variation.
    pub fn covers(&self, date: NaiveDate) -> bool {
        interval::contains(self.start_date, self.end_date, date)
    }

    /// Returns true if the variation overrides `site` on `date`.
    pub fn applies_to(&self, site: &str, date: NaiveDate) -> bool {
        self.site.eq_ignore_ascii_case(site) && self.covers(date)
    }

    /// Returns the variation's workday for the weekday of `date`.
    pub fn workday(&self, date: NaiveDate) -> Option<Workday> {
        self.schedule.for_weekday(date).cloned()
    }
}
