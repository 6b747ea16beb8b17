//! Actual work records supplied by the timekeeping system.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::LaborCode;

/// Hours actually worked on one day against one labor code.
///
/// Work history is a read-only snapshot; the engine never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Work {
    /// The day the work was performed.
    pub date_worked: NaiveDate,
    /// Charge number the hours were booked to.
    #[serde(default)]
    pub charge_number: String,
    /// Charge number extension.
    #[serde(default)]
    pub extension: String,
    /// Pay code reported by timekeeping.
    #[serde(default)]
    pub pay_code: String,
    /// Hours worked.
    pub hours: Decimal,
}

impl Work {
    /// Returns true if the work was booked to `labor_code`.
    pub fn is_for(&self, labor_code: &LaborCode) -> bool {
        labor_code.matches(&self.charge_number, &self.extension)
    }
}

/// A labor code with its own period of validity, used for forecasting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastLaborCode {
    /// The labor code being forecast.
    #[serde(flatten)]
    pub code: LaborCode,
    /// First day the code may be charged.
    pub start_date: NaiveDate,
    /// Last day the code may be charged.
    pub end_date: NaiveDate,
}

/// Classifies a workday code as work or leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkCode {
    /// The workday code.
    pub code: String,
    /// True if the code represents leave rather than work.
    pub is_leave: bool,
}
