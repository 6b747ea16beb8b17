//! Workforce queries: where an employee works, what they book to, and how
//! many hours they have worked or are forecast to work.
//!
//! Hour sums here use half-open `[start, end)` ranges; site and workcenter
//! checks use inclusive assignment ranges.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use super::interval;
use crate::models::{Employee, ForecastLaborCode, LaborCode, WorkCode};

impl Employee {
    /// Returns true if an assignment at the employee's own site covers `date`.
    pub fn is_active(&self, date: NaiveDate) -> bool {
        self.assignments
            .iter()
            .any(|a| a.use_assignment(&self.site_id, date))
    }

    /// Returns true if any assignment at `site` overlaps `[start, end]`.
    pub fn at_site(&self, site: &str, start: NaiveDate, end: NaiveDate) -> bool {
        self.assignments.iter().any(|a| {
            a.site.eq_ignore_ascii_case(site)
                && interval::overlaps(a.start_date, a.end_date, start, end)
        })
    }

    /// Returns true if an assignment at `site` and `workcenter` overlaps `[start, end]`.
    pub fn is_assigned(&self, site: &str, workcenter: &str, start: NaiveDate, end: NaiveDate) -> bool {
        self.assignments.iter().any(|a| {
            a.site.eq_ignore_ascii_case(site)
                && a.workcenter.eq_ignore_ascii_case(workcenter)
                && interval::overlaps(a.start_date, a.end_date, start, end)
        })
    }

    /// The most frequent workcenter and code scheduled over `[start, end)`.
    ///
    /// Days are resolved without leave. Ties go to the pairing seen first.
    pub fn primary_assignment(&self, start: NaiveDate, end: NaiveDate) -> Option<(String, String)> {
        let mut counts: HashMap<(String, String), (usize, usize)> = HashMap::new();
        for (seen, day) in start.iter_days().take_while(|d| *d < end).enumerate() {
            let Some(workday) = self.resolve_without_leave(day) else {
                continue;
            };
            if workday.workcenter.is_empty() && workday.code.is_empty() {
                continue;
            }
            counts
                .entry((workday.workcenter, workday.code))
                .or_insert((0, seen))
                .0 += 1;
        }
        counts
            .into_iter()
            .max_by(|(_, (a_count, a_seen)), (_, (b_count, b_seen))| {
                a_count.cmp(b_count).then(b_seen.cmp(a_seen))
            })
            .map(|(pair, _)| pair)
    }

    /// Returns true if any assignment carries the labor code.
    pub fn has_labor_code(&self, charge_number: &str, extension: &str) -> bool {
        self.assignments
            .iter()
            .any(|a| a.has_labor_code(charge_number, extension))
    }

    /// Attaches a labor code to the assignment `assignment_id`.
    ///
    /// Unknown assignments and codes the assignment already carries are ignored.
    pub fn add_labor_code(&mut self, assignment_id: u32, labor_code: LaborCode) {
        if let Some(asgmt) = self.assignments.get_mut(assignment_id) {
            if !asgmt.has_labor_code(&labor_code.charge_number, &labor_code.extension) {
                debug!(
                    assignment_id,
                    charge_number = %labor_code.charge_number,
                    extension = %labor_code.extension,
                    "Added labor code"
                );
                asgmt.labor_codes.push(labor_code);
            }
        }
    }

    /// Removes the labor code from every assignment.
    pub fn delete_labor_code(&mut self, charge_number: &str, extension: &str) {
        for asgmt in self.assignments.iter_mut() {
            asgmt
                .labor_codes
                .retain(|lc| !lc.matches(charge_number, extension));
        }
    }

    /// Hours of recorded work on `date`.
    pub fn hours_worked_on(&self, date: NaiveDate) -> Decimal {
        self.work
            .iter()
            .filter(|w| w.date_worked == date)
            .map(|w| w.hours)
            .sum()
    }

    /// Hours of recorded work over `[start, end)`.
    pub fn worked_hours(&self, start: NaiveDate, end: NaiveDate) -> Decimal {
        self.work
            .iter()
            .filter(|w| interval::contains_half_open(start, end, w.date_worked))
            .map(|w| w.hours)
            .sum()
    }

    /// Hours booked to one labor code over `[start, end)`.
    pub fn worked_hours_for_labor(
        &self,
        charge_number: &str,
        extension: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Decimal {
        let labor_code = LaborCode::new(charge_number, extension);
        self.work
            .iter()
            .filter(|w| interval::contains_half_open(start, end, w.date_worked) && w.is_for(&labor_code))
            .map(|w| w.hours)
            .sum()
    }

    /// The most recent day with recorded work, or 1970-01-01 if there is none.
    pub fn last_workday(&self) -> NaiveDate {
        self.work
            .iter()
            .map(|w| w.date_worked)
            .max()
            .unwrap_or_else(interval::epoch)
    }

    /// Hours the employee is expected to book to `labor_code` over `[start, end)`.
    ///
    /// Only days after the last recorded work count. A day contributes its
    /// standard workday length once for every covering assignment carrying
    /// the code, provided nothing was worked that day, the day lies inside
    /// the code's own window, and the resolved code is a non-leave work code.
    pub fn forecast_hours(
        &self,
        labor_code: &ForecastLaborCode,
        start: NaiveDate,
        end: NaiveDate,
        work_codes: &[WorkCode],
        hour_offset: Decimal,
    ) -> Decimal {
        let code = &labor_code.code;
        if !self.has_labor_code(&code.charge_number, &code.extension) {
            return Decimal::ZERO;
        }
        if !interval::overlaps(labor_code.start_date, labor_code.end_date, start, end) {
            return Decimal::ZERO;
        }

        let last_work = self.last_workday();
        let mut total = Decimal::ZERO;
        for day in start.iter_days().take_while(|d| *d < end) {
            if day <= last_work
                || !self.hours_worked_on(day).is_zero()
                || !interval::contains(labor_code.start_date, labor_code.end_date, day)
            {
                continue;
            }
            let Some(workday) = self.resolve_workday(day, hour_offset) else {
                continue;
            };
            let is_work = workday.is_worked()
                && work_codes
                    .iter()
                    .any(|wc| !wc.is_leave && wc.code.eq_ignore_ascii_case(&workday.code));
            if !is_work {
                continue;
            }
            let carriers = self
                .assignments
                .iter()
                .filter(|a| a.covers(day) && a.has_labor_code(&code.charge_number, &code.extension))
                .count();
            if carriers > 0 {
                total += self.standard_workday_length(day) * Decimal::from(carriers);
            }
        }
        total
    }
}
