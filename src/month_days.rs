// src/month_days.rs
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::calendar::{CalendarClassifier, CalendarDay};
use crate::EngineError;

/// One calendar month as an immutable value. Replaces chained
/// set-month/set-year/start-of/end-of date manipulation with explicit
/// constructors returning new values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct MonthRange {
    year: i32,
    month: u32,
}

impl MonthRange {
    /// `month` is 1-12.
    pub fn new(year: i32, month: u32) -> Result<Self, EngineError> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    /// Zero-based month index (0-11), the convention of calling
    /// collaborators' query parameters.
    pub fn from_zero_based(year: i32, month: u32) -> Result<Self, EngineError> {
        let month = month
            .checked_add(1)
            .ok_or(EngineError::InvalidMonth(month))?;
        Self::new(year, month)
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap()
    }

    pub fn last_day(&self) -> NaiveDate {
        self.succ().first_day().pred_opt().unwrap()
    }

    /// The following month.
    pub fn succ(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Every calendar day of the month, ascending. Generated from the
    /// contiguous day-of-month range, so duplicates are impossible.
    pub fn days(&self) -> Vec<NaiveDate> {
        (1..=self.last_day().day())
            .map(|day| NaiveDate::from_ymd_opt(self.year, self.month, day).unwrap())
            .collect()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for MonthRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Working/off partition of one month's calendar days. Together the two
/// sequences cover the month exactly.
#[derive(Debug, Clone, Serialize)]
pub struct MonthDays {
    pub range: MonthRange,
    pub working: Vec<CalendarDay>,
    pub off: Vec<CalendarDay>,
}

impl MonthDays {
    pub fn build(calendar: &CalendarClassifier, range: MonthRange) -> Self {
        let mut working = Vec::new();
        let mut off = Vec::new();
        for date in range.days() {
            let day = calendar.calendar_day(date);
            if day.is_off() {
                off.push(day);
            } else {
                working.push(day);
            }
        }
        debug!(
            "Month {}: {} working day(s), {} off day(s)",
            range,
            working.len(),
            off.len()
        );
        Self {
            range,
            working,
            off,
        }
    }

    pub fn working_dates(&self) -> Vec<NaiveDate> {
        self.working.iter().map(|d| d.date).collect()
    }

    pub fn off_dates(&self) -> Vec<NaiveDate> {
        self.off.iter().map(|d| d.date).collect()
    }
}

/// Ordered working days of a month.
pub fn working_days_of(calendar: &CalendarClassifier, range: MonthRange) -> Vec<NaiveDate> {
    MonthDays::build(calendar, range).working_dates()
}

/// Ordered weekend/holiday days of a month.
pub fn off_days_of(calendar: &CalendarClassifier, range: MonthRange) -> Vec<NaiveDate> {
    MonthDays::build(calendar, range).off_dates()
}
