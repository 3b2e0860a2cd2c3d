// src/calendar.rs
use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::holidays::{holiday_calendar_for, HolidayCalendar};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DayKind {
    Working,
    Weekend,
    Holiday,
}

/// A date together with its classification and ISO week number. Derived,
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub kind: DayKind,
    pub week: u32,
}

impl CalendarDay {
    pub fn is_off(&self) -> bool {
        self.kind != DayKind::Working
    }
}

/// Decides, for the configured country calendar, whether a date is a
/// working day, a weekend day or a public holiday, and maps business
/// timestamps onto calendar days of the configured timezone.
#[derive(Clone)]
pub struct CalendarClassifier {
    timezone: Tz,
    holidays: Arc<dyn HolidayCalendar>,
}

impl CalendarClassifier {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            timezone: config.timezone,
            holidays: holiday_calendar_for(config.country),
        }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// The calendar day a business timestamp belongs to. This is the only
    /// place a timestamp crosses into the configured timezone; everything
    /// downstream compares plain calendar days.
    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.timezone).date_naive()
    }

    /// ISO week number of a business timestamp's local calendar day.
    pub fn week_of(&self, at: DateTime<Utc>) -> u32 {
        self.local_date(at).iso_week().week()
    }

    pub fn classify(&self, date: NaiveDate) -> DayKind {
        if self.holidays.is_holiday(date) {
            DayKind::Holiday
        } else if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            DayKind::Weekend
        } else {
            DayKind::Working
        }
    }

    pub fn is_off_day(&self, date: NaiveDate) -> bool {
        self.classify(date) != DayKind::Working
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !self.is_off_day(date)
    }

    pub fn calendar_day(&self, date: NaiveDate) -> CalendarDay {
        CalendarDay {
            date,
            kind: self.classify(date),
            week: date.iso_week().week(),
        }
    }
}
