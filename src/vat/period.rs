//! Declaration periods: quarters and months with their filing due dates.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::ComplianceError;

/// Filing cadence of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodType {
    Quarterly,
    Monthly,
}

impl PeriodType {
    /// Code used in the export header.
    pub fn code(&self) -> &'static str {
        match self {
            PeriodType::Quarterly => "quarterly",
            PeriodType::Monthly => "monthly",
        }
    }

    /// How many periods of this type make a year.
    pub fn periods_per_year(&self) -> u32 {
        match self {
            PeriodType::Quarterly => 4,
            PeriodType::Monthly => 12,
        }
    }
}

/// A concrete declaration period with its filing due date.
///
/// The due date falls on the 30th of the month after the period ends,
/// clamped to the month's length, rolling into the next year when the
/// period ends in December.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationPeriod {
    /// Calendar year the period belongs to.
    pub year: i32,
    /// Canonical code: "Q1".."Q4" or "M1".."M12".
    pub code: String,
    /// Filing cadence.
    pub period_type: PeriodType,
    /// First day of the period.
    pub start: NaiveDate,
    /// Last day of the period.
    pub end: NaiveDate,
    /// Filing and payment due date.
    pub due_date: NaiveDate,
}

impl DeclarationPeriod {
    /// Quarter 1-4 of the given year.
    pub fn quarterly(year: i32, quarter: u32) -> Result<Self, ComplianceError> {
        if !(1..=4).contains(&quarter) {
            return Err(ComplianceError::Validation(format!(
                "quarter must be 1-4, got {quarter}"
            )));
        }
        let first_month = quarter * 3 - 2;
        let last_month = quarter * 3;
        Self::build(
            year,
            format!("Q{quarter}"),
            PeriodType::Quarterly,
            first_month,
            last_month,
        )
    }

    /// Month 1-12 of the given year.
    pub fn monthly(year: i32, month: u32) -> Result<Self, ComplianceError> {
        if !(1..=12).contains(&month) {
            return Err(ComplianceError::Validation(format!(
                "month must be 1-12, got {month}"
            )));
        }
        Self::build(year, format!("M{month}"), PeriodType::Monthly, month, month)
    }

    /// Parse a period code ("Q3", "M11") into a period of the year.
    pub fn parse(year: i32, code: &str) -> Result<Self, ComplianceError> {
        let upper = code.trim().to_uppercase();
        if let Some(rest) = upper.strip_prefix('Q') {
            if let Ok(quarter) = rest.parse() {
                return Self::quarterly(year, quarter);
            }
        }
        if let Some(rest) = upper.strip_prefix('M') {
            if let Ok(month) = rest.parse() {
                return Self::monthly(year, month);
            }
        }
        Err(ComplianceError::Validation(format!(
            "unknown period code '{code}', expected Q1-Q4 or M1-M12"
        )))
    }

    fn build(
        year: i32,
        code: String,
        period_type: PeriodType,
        first_month: u32,
        last_month: u32,
    ) -> Result<Self, ComplianceError> {
        let due_month = last_month % 12 + 1;
        let due_year = if due_month <= last_month { year + 1 } else { year };
        let dates = (|| {
            let start = NaiveDate::from_ymd_opt(year, first_month, 1)?;
            let end = month_end(year, last_month)?;
            let due_last = month_end(due_year, due_month)?;
            let due_date = NaiveDate::from_ymd_opt(due_year, due_month, due_last.day().min(30))?;
            Some((start, end, due_date))
        })();
        match dates {
            Some((start, end, due_date)) => Ok(Self {
                year,
                code,
                period_type,
                start,
                end,
                due_date,
            }),
            None => Err(ComplianceError::Validation(format!(
                "year {year} is out of the supported calendar range"
            ))),
        }
    }
}

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}
