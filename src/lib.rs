// src/lib.rs
//
// Working-time balance engine. Consumes in-memory report records and
// duration-override history for one employee and computes worked vs
// required hours at day/week/month granularity plus a running lifetime
// balance. Storage, HTTP and rendering live in external collaborators.

use thiserror::Error;

pub mod balance;
pub mod calendar;
pub mod config;
pub mod day_duration;
pub mod grouping;
pub mod holidays;
pub mod month_days;
pub mod report;


pub use balance::{BalanceBreakdown, BalanceEngine, MonthSheet, WeekSummary};
pub use calendar::{CalendarClassifier, CalendarDay, DayKind};
pub use config::{Config, Country, CutoffPolicy, EngineConfig, DEFAULT_DAY_HOURS};
pub use day_duration::{expected_hours_for, DayDuration, DayDurationHistory};
pub use grouping::{group_by_day, group_by_week, sum_hours, DayReports, WeekGroup};
pub use month_days::{off_days_of, working_days_of, MonthDays, MonthRange};
pub use report::{first_report_at, Attachment, Report, ReportBook, ReportDraft};

/// The few ways engine inputs can be rejected at the boundary. Balance
/// computations themselves are total and do not fail.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("month out of range: {0} (expected 1-12)")]
    InvalidMonth(u32),
    #[error("no such ISO week: {week} in {year}")]
    InvalidWeek { year: i32, week: u32 },
    #[error("unparsable from date '{input}': expected DD.MM.YYYY")]
    InvalidFromDate {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
}
