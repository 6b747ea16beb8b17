//! Annual leave balances and carryover.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;

use crate::models::{AnnualLeave, Employee};

/// Annual hours granted when an employee has no usable prior-year balance.
pub const DEFAULT_ANNUAL_HOURS: Decimal = Decimal::from_parts(120, 0, 0, false, 0);

impl Employee {
    /// The balance for `year`, if one exists.
    pub fn balance(&self, year: i32) -> Option<&AnnualLeave> {
        self.balances.iter().find(|b| b.year == year)
    }

    /// Creates the balance for `year` if it does not exist yet.
    ///
    /// With no prior-year balance, or a prior-year balance with no annual
    /// hours, the year starts at [`DEFAULT_ANNUAL_HOURS`] with no carryover.
    /// Otherwise the annual grant repeats and the carryover is what was left
    /// of last year's grant and carryover after confirmed vacation.
    ///
    /// # Example
    ///
    /// ```
    /// use leave_engine::models::{Employee, EmployeeName};
    /// use rust_decimal::Decimal;
    ///
    /// let mut employee = Employee::new("emp_001", EmployeeName::new("Ada", "Lovelace"), "DGS");
    /// employee.ensure_year_balance(2024);
    /// let balance = employee.balance(2024).unwrap();
    /// assert_eq!(balance.annual, Decimal::new(120, 0));
    /// assert_eq!(balance.carryover, Decimal::ZERO);
    /// ```
    pub fn ensure_year_balance(&mut self, year: i32) -> &AnnualLeave {
        if let Some(pos) = self.balances.iter().position(|b| b.year == year) {
            return &self.balances[pos];
        }

        let prior = self
            .balances
            .iter()
            .find(|b| b.year == year - 1)
            .filter(|b| !b.annual.is_zero())
            .cloned();
        let balance = match prior {
            None => AnnualLeave {
                year,
                annual: DEFAULT_ANNUAL_HOURS,
                carryover: Decimal::ZERO,
            },
            Some(prior) => {
                let used = match (
                    NaiveDate::from_ymd_opt(year - 1, 1, 1),
                    NaiveDate::from_ymd_opt(year, 1, 1),
                ) {
                    (Some(start), Some(end)) => self.leaves.pto_hours(start, end),
                    _ => Decimal::ZERO,
                };
                AnnualLeave {
                    year,
                    annual: prior.annual,
                    carryover: prior.annual + prior.carryover - used,
                }
            }
        };
        info!(
            employee_id = %self.id,
            year,
            annual = %balance.annual,
            carryover = %balance.carryover,
            "Created leave balance"
        );
        self.set_balance(year, balance.annual, balance.carryover)
    }

    /// Sets the balance for `year`, creating it if needed.
    pub fn set_balance(&mut self, year: i32, annual: Decimal, carryover: Decimal) -> &AnnualLeave {
        match self.balances.iter_mut().find(|b| b.year == year) {
            Some(balance) => {
                balance.annual = annual;
                balance.carryover = carryover;
            }
            None => {
                self.balances.push(AnnualLeave {
                    year,
                    annual,
                    carryover,
                });
                self.balances.sort_by_key(|b| b.year);
            }
        }
        let pos = self.balances.iter().position(|b| b.year == year).unwrap_or(0);
        &self.balances[pos]
    }

    /// Hours of annual leave left in `year` after confirmed vacation.
    pub fn leave_remaining(&self, year: i32) -> Option<Decimal> {
        let balance = self.balance(year)?;
        let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let end = NaiveDate::from_ymd_opt(year + 1, 1, 1)?;
        Some(balance.annual + balance.carryover - self.leaves.pto_hours(start, end))
    }
}
