//! Workday resolution.
//!
//! Resolving a date runs an ordered list of [`ResolverStage`]s. A stage may
//! pass, replace the result so far, or settle it so that no later stage
//! runs. The three pipelines the engine uses are:
//!
//! - [`FULL_PIPELINE`]: assignment, variation, actual-work suppression, leave.
//! - [`ACTUAL_PIPELINE`]: assignment, variation, confirmed leave only.
//! - [`SCHEDULE_PIPELINE`]: assignment and variation, with no ledger lookup.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::interval;
use crate::models::{Employee, LeaveDay, STANDARD_WORKDAY_HOURS, Workday, standard_day_for};

/// One step of the resolution pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolverStage {
    /// Template workday of the covering assignment.
    Assignment,
    /// Override from a variation at the assignment's site.
    Variation,
    /// Stops resolution if actual work was recorded on the date.
    WorkSuppression,
    /// Leave ledger entries admitted by the [`PartialDayLeavePolicy`].
    Leave,
    /// Confirmed (`ACTUAL`) leave entries, merged by summing hours.
    ActualLeave,
}

impl std::fmt::Display for ResolverStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolverStage::Assignment => write!(f, "Assignment"),
            ResolverStage::Variation => write!(f, "Variation"),
            ResolverStage::WorkSuppression => write!(f, "WorkSuppression"),
            ResolverStage::Leave => write!(f, "Leave"),
            ResolverStage::ActualLeave => write!(f, "ActualLeave"),
        }
    }
}

/// Assignment, variation, work suppression, then leave.
pub const FULL_PIPELINE: &[ResolverStage] = &[
    ResolverStage::Assignment,
    ResolverStage::Variation,
    ResolverStage::WorkSuppression,
    ResolverStage::Leave,
];

/// Assignment, variation, then confirmed leave.
pub const ACTUAL_PIPELINE: &[ResolverStage] = &[
    ResolverStage::Assignment,
    ResolverStage::Variation,
    ResolverStage::ActualLeave,
];

/// Assignment and variation only.
pub const SCHEDULE_PIPELINE: &[ResolverStage] =
    &[ResolverStage::Assignment, ResolverStage::Variation];

/// The result of resolving a date, with the stage that decided it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The resolved workday; `None` if no assignment covers the date.
    pub workday: Option<Workday>,
    /// The last stage that replaced or settled the workday.
    pub decided_by: Option<ResolverStage>,
}

/// Decides whether a leave entry displaces the scheduled workday.
///
/// A leave entry wins when it covers more than half the standard day, or
/// when its timestamp falls before the most recent day of recorded work.
/// A partial day of leave therefore leaves the assignment in place until
/// work history has moved past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialDayLeavePolicy {
    /// Standard workday length in hours.
    pub standard_day: Decimal,
    /// The most recent day with recorded work.
    pub last_work: NaiveDate,
}

impl PartialDayLeavePolicy {
    /// Returns true if the leave entry at `adjusted` overrides the workday.
    ///
    /// # Example
    ///
    /// ```
    /// use leave_engine::models::{LeaveDay, LeaveStatus};
    /// use leave_engine::schedule::PartialDayLeavePolicy;
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let policy = PartialDayLeavePolicy {
    ///     standard_day: Decimal::new(8, 0),
    ///     last_work: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
    /// };
    /// let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
    /// let full = LeaveDay::new(date, "V", Decimal::new(8, 0), LeaveStatus::Approved);
    /// let partial = LeaveDay::new(date, "V", Decimal::new(2, 0), LeaveStatus::Approved);
    /// assert!(policy.overrides(&full, full.leave_date));
    /// assert!(!policy.overrides(&partial, partial.leave_date));
    /// ```
    pub fn overrides(&self, entry: &LeaveDay, adjusted: NaiveDateTime) -> bool {
        entry.hours > self.standard_day / Decimal::TWO || adjusted < interval::midnight(self.last_work)
    }
}

enum StageOutcome {
    Pass,
    Replace(Option<Workday>),
    Settle,
}

struct ResolutionContext<'a> {
    employee: &'a Employee,
    date: NaiveDate,
    hour_offset: Decimal,
    site: Option<&'a str>,
}

impl ResolutionContext<'_> {
    /// Ledger entries that fall on the date once the hour offset is applied.
    fn leaves_on_date(&self) -> impl Iterator<Item = (&LeaveDay, NaiveDateTime)> {
        self.employee.leaves.iter().filter_map(|entry| {
            let adjusted = interval::apply_hour_offset(entry.leave_date, self.hour_offset);
            (interval::normalize(adjusted) == self.date).then_some((entry, adjusted))
        })
    }
}

impl ResolverStage {
    fn apply(self, ctx: &ResolutionContext<'_>) -> StageOutcome {
        match self {
            ResolverStage::Assignment => match ctx.employee.assignments.covering(ctx.date) {
                Some(asgmt) => StageOutcome::Replace(asgmt.workday(ctx.date)),
                None => StageOutcome::Pass,
            },
            ResolverStage::Variation => {
                let Some(site) = ctx.site else {
                    return StageOutcome::Pass;
                };
                match ctx
                    .employee
                    .variations
                    .iter()
                    .rev()
                    .find(|v| v.applies_to(site, ctx.date))
                {
                    Some(variation) => StageOutcome::Replace(variation.workday(ctx.date)),
                    None => StageOutcome::Pass,
                }
            }
            ResolverStage::WorkSuppression => {
                if ctx.employee.hours_worked_on(ctx.date) > Decimal::ZERO {
                    StageOutcome::Settle
                } else {
                    StageOutcome::Pass
                }
            }
            ResolverStage::Leave => {
                let policy = ctx.employee.leave_policy(ctx.date);
                ctx.leaves_on_date()
                    .filter(|(entry, adjusted)| policy.overrides(entry, *adjusted))
                    .last()
                    .map_or(StageOutcome::Pass, |(entry, _)| {
                        StageOutcome::Replace(Some(Workday::leave(&entry.code, entry.hours)))
                    })
            }
            ResolverStage::ActualLeave => {
                let mut merged: Option<(Workday, Decimal)> = None;
                for (entry, _) in ctx.leaves_on_date().filter(|(e, _)| e.is_actual()) {
                    if let Some((workday, largest)) = merged.as_mut() {
                        workday.hours += entry.hours;
                        if entry.hours > *largest {
                            workday.code = entry.code.clone();
                            *largest = entry.hours;
                        }
                    } else {
                        merged = Some((Workday::leave(&entry.code, entry.hours), entry.hours));
                    }
                }
                merged.map_or(StageOutcome::Pass, |(workday, _)| {
                    StageOutcome::Replace(Some(workday))
                })
            }
        }
    }
}

impl Employee {
    /// Runs `pipeline` for `date` and reports which stage decided the result.
    ///
    /// `hour_offset` shifts ledger entries that carry an hour-of-day before
    /// they are compared with `date`; it never affects the assignment or
    /// variation lookups.
    pub fn resolve_traced(
        &self,
        pipeline: &[ResolverStage],
        date: NaiveDate,
        hour_offset: Decimal,
    ) -> Resolution {
        let ctx = ResolutionContext {
            employee: self,
            date,
            hour_offset,
            site: self.assignments.covering(date).map(|a| a.site.as_str()),
        };
        let mut resolution = Resolution {
            workday: None,
            decided_by: None,
        };
        for stage in pipeline {
            match stage.apply(&ctx) {
                StageOutcome::Pass => {}
                StageOutcome::Replace(workday) => {
                    resolution.workday = workday;
                    resolution.decided_by = Some(*stage);
                }
                StageOutcome::Settle => {
                    resolution.decided_by = Some(*stage);
                    break;
                }
            }
        }
        resolution
    }

    /// Resolves what the employee is doing on `date`.
    ///
    /// # Example
    ///
    /// ```
    /// use leave_engine::models::{Employee, EmployeeName, LeaveStatus};
    /// use leave_engine::leave::LeaveEntry;
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let mut employee = Employee::new("emp_001", EmployeeName::new("Ada", "Lovelace"), "DGS");
    /// employee.add_assignment("DGS", "GEOINT", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    ///
    /// let monday = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
    /// assert_eq!(employee.resolve_workday(monday, Decimal::ZERO).unwrap().code, "D");
    ///
    /// employee.leaves.upsert(LeaveEntry::new(monday, "V", Decimal::new(8, 0), LeaveStatus::Approved));
    /// assert_eq!(employee.resolve_workday(monday, Decimal::ZERO).unwrap().code, "V");
    /// ```
    pub fn resolve_workday(&self, date: NaiveDate, hour_offset: Decimal) -> Option<Workday> {
        self.resolve_traced(FULL_PIPELINE, date, hour_offset).workday
    }

    /// Resolves `date` overlaying only confirmed leave, for payroll reconciliation.
    pub fn resolve_actual_workday(&self, date: NaiveDate, hour_offset: Decimal) -> Option<Workday> {
        self.resolve_traced(ACTUAL_PIPELINE, date, hour_offset).workday
    }

    /// Resolves `date` from assignments and variations alone.
    pub fn resolve_without_leave(&self, date: NaiveDate) -> Option<Workday> {
        self.resolve_traced(SCHEDULE_PIPELINE, date, Decimal::ZERO).workday
    }

    /// Standard workday length for the week containing `date`.
    ///
    /// A week with fewer than five coded days is a compressed week of
    /// ten-hour days; otherwise the standard day is eight hours.
    pub fn standard_workday_length(&self, date: NaiveDate) -> Decimal {
        let (sunday, saturday) = interval::week_bounds(date);
        let worked = interval::days_between(sunday, saturday)
            .filter(|day| {
                self.resolve_workday(*day, Decimal::ZERO)
                    .is_some_and(|w| w.is_worked())
            })
            .count();
        standard_day_for(worked)
    }

    /// The leave policy in force on `date`.
    pub fn leave_policy(&self, date: NaiveDate) -> PartialDayLeavePolicy {
        let standard_day = self
            .assignments
            .iter()
            .rev()
            .find(|a| a.use_assignment(&self.site_id, date))
            .map(|a| a.standard_workday())
            .unwrap_or(STANDARD_WORKDAY_HOURS);
        PartialDayLeavePolicy {
            standard_day,
            last_work: self.last_workday(),
        }
    }
}
