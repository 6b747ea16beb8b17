//! Assignment, schedule and workday models.
//!
//! An [`Assignment`] places an employee at a site and workcenter for an
//! inclusive date range. Its [`Schedule`]s are seven-slot templates indexed
//! from Sunday (slot 0) to Saturday (slot 6).

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::schedule::interval::{self, epoch, open_end};

/// Standard workday length in hours for a five-day week.
pub const STANDARD_WORKDAY_HOURS: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Workday length in hours for a compressed (four-day) week.
pub const COMPRESSED_WORKDAY_HOURS: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// Number of worked days in a week below which the week counts as compressed.
pub const FULL_WEEK_WORKDAYS: usize = 5;

/// Code given to every weekday of a freshly created assignment.
pub const DEFAULT_SHIFT_CODE: &str = "D";

/// Returns the standard day length implied by `worked_days` in one week.
///
/// # Example
///
/// ```
/// use leave_engine::models::{standard_day_for, COMPRESSED_WORKDAY_HOURS, STANDARD_WORKDAY_HOURS};
///
/// assert_eq!(standard_day_for(5), STANDARD_WORKDAY_HOURS);
/// assert_eq!(standard_day_for(4), COMPRESSED_WORKDAY_HOURS);
/// ```
pub fn standard_day_for(worked_days: usize) -> Decimal {
    if worked_days < FULL_WEEK_WORKDAYS {
        COMPRESSED_WORKDAY_HOURS
    } else {
        STANDARD_WORKDAY_HOURS
    }
}

/// A single day's intended work: what code, at which workcenter, for how long.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workday {
    /// Position of the day within its schedule.
    #[serde(default)]
    pub id: u32,
    /// The workcenter the day is spent at (empty for leave).
    #[serde(default)]
    pub workcenter: String,
    /// Shift or leave code; empty means a day off.
    #[serde(default)]
    pub code: String,
    /// Scheduled hours.
    #[serde(default)]
    pub hours: Decimal,
}

impl Workday {
    /// Builds the workday that a leave entry produces.
    pub fn leave(code: &str, hours: Decimal) -> Self {
        Self {
            id: 0,
            workcenter: String::new(),
            code: code.to_string(),
            hours,
        }
    }

    /// Returns true if the day carries a code, i.e. is not a day off.
    pub fn is_worked(&self) -> bool {
        !self.code.is_empty()
    }
}

/// A repeating template of workdays, normally seven long.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Identifier of the schedule within its assignment.
    #[serde(default)]
    pub id: u32,
    /// The days of the template.
    #[serde(default)]
    pub workdays: Vec<Workday>,
}

impl Schedule {
    /// Creates an empty schedule with `days` blank workdays.
    pub fn new(id: u32, days: u32) -> Self {
        Self {
            id,
            workdays: (0..days)
                .map(|slot| Workday {
                    id: slot,
                    ..Workday::default()
                })
                .collect(),
        }
    }

    /// Creates the default Monday–Friday template at `workcenter`.
    pub fn weekdays(id: u32, workcenter: &str, hours: Decimal) -> Self {
        let mut schedule = Self::new(id, 7);
        for workday in schedule.workdays.iter_mut() {
            if workday.id != 0 && workday.id != 6 {
                workday.code = DEFAULT_SHIFT_CODE.to_string();
                workday.workcenter = workcenter.to_string();
                workday.hours = hours;
            }
        }
        schedule
    }

    /// Returns the template slot at `slot`, if the template is long enough.
    pub fn workday(&self, slot: usize) -> Option<&Workday> {
        self.workdays.get(slot)
    }

    /// Returns the template slot for the weekday of `date`.
    pub fn for_weekday(&self, date: NaiveDate) -> Option<&Workday> {
        self.workday(date.weekday().num_days_from_sunday() as usize)
    }

    /// Counts the slots that carry a code.
    pub fn worked_days(&self) -> usize {
        self.workdays.iter().filter(|w| w.is_worked()).count()
    }
}

/// A charge number and extension that work can be booked against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaborCode {
    /// The charge number.
    pub charge_number: String,
    /// The charge number extension.
    #[serde(default)]
    pub extension: String,
}

impl LaborCode {
    /// Creates a labor code.
    pub fn new(charge_number: &str, extension: &str) -> Self {
        Self {
            charge_number: charge_number.to_string(),
            extension: extension.to_string(),
        }
    }

    /// Case-insensitive identity check.
    pub fn matches(&self, charge_number: &str, extension: &str) -> bool {
        self.charge_number.eq_ignore_ascii_case(charge_number)
            && self.extension.eq_ignore_ascii_case(extension)
    }
}

/// A dated work placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Identifier, monotonic per employee and never reused.
    pub id: u32,
    /// The site the employee works at.
    pub site: String,
    /// The workcenter within the site.
    pub workcenter: String,
    /// First day of the assignment.
    pub start_date: NaiveDate,
    /// Last day of the assignment (inclusive); [`open_end`] while active.
    pub end_date: NaiveDate,
    /// Anchor day of a rotating schedule.
    #[serde(default = "epoch")]
    pub rotation_date: NaiveDate,
    /// Length in days of a rotation cycle; zero for a plain weekly template.
    #[serde(default)]
    pub rotation_days: u32,
    /// Schedule templates.
    #[serde(default)]
    pub schedules: Vec<Schedule>,
    /// Labor codes the assignment may book to.
    #[serde(default)]
    pub labor_codes: Vec<LaborCode>,
}

impl Assignment {
    /// Creates an open-ended assignment with the default weekday schedule.
    ///
    /// # Example
    ///
    /// ```
    /// use leave_engine::models::Assignment;
    /// use chrono::NaiveDate;
    ///
    /// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    /// let asgmt = Assignment::new(1, "DGS", "GEOINT", start);
    /// assert!(asgmt.is_open());
    /// // 2024-01-01 is a Monday
    /// assert_eq!(asgmt.workday(start).unwrap().code, "D");
    /// ```
    pub fn new(id: u32, site: &str, workcenter: &str, start_date: NaiveDate) -> Self {
        Self {
            id,
            site: site.to_string(),
            workcenter: workcenter.to_string(),
            start_date,
            end_date: open_end(),
            rotation_date: epoch(),
            rotation_days: 0,
            schedules: vec![Schedule::weekdays(0, workcenter, STANDARD_WORKDAY_HOURS)],
            labor_codes: Vec::new(),
        }
    }

    /// Returns true if the assignment has not been closed.
    pub fn is_open(&self) -> bool {
        self.end_date == open_end()
    }

    /// Returns true if `date` falls inside the assignment.
    pub fn covers(&self, date: NaiveDate) -> bool {
        interval::contains(self.start_date, self.end_date, date)
    }

    /// Returns true if the assignment is at `site` and covers `date`.
    pub fn use_assignment(&self, site: &str, date: NaiveDate) -> bool {
        self.site.eq_ignore_ascii_case(site) && self.covers(date)
    }

    /// Appends a blank schedule of `days` slots and returns its id.
    pub fn add_schedule(&mut self, days: u32) -> u32 {
        let id = self
            .schedules
            .iter()
            .map(|s| s.id + 1)
            .max()
            .unwrap_or(0);
        self.schedules.push(Schedule::new(id, days));
        id
    }

    /// Derives the template workday for `date`.
    ///
    /// Without a rotation the first schedule is indexed by weekday. With a
    /// rotation, schedules are laid end to end into a `rotation_days` cycle
    /// anchored at `rotation_date`.
    pub fn workday(&self, date: NaiveDate) -> Option<Workday> {
        if self.rotation_days == 0 {
            return self
                .schedules
                .first()
                .and_then(|s| s.for_weekday(date))
                .cloned();
        }
        if self.schedules.is_empty() {
            return None;
        }
        let since = (date - self.rotation_date).num_days();
        let position = since.rem_euclid(i64::from(self.rotation_days)) as usize;
        let schedule = self.schedules.get((position / 7) % self.schedules.len())?;
        schedule.workday(position % 7).cloned()
    }

    /// Returns the standard day length implied by the first schedule.
    pub fn standard_workday(&self) -> Decimal {
        self.schedules
            .first()
            .map(|s| standard_day_for(s.worked_days()))
            .unwrap_or(STANDARD_WORKDAY_HOURS)
    }

    /// Returns true if the assignment carries the labor code.
    pub fn has_labor_code(&self, charge_number: &str, extension: &str) -> bool {
        self.labor_codes
            .iter()
            .any(|lc| lc.matches(charge_number, extension))
    }
}
