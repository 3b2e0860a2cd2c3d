// src/grouping.rs
use rust_decimal::Decimal;
use serde::Serialize;

use crate::calendar::{CalendarClassifier, CalendarDay};
use crate::report::Report;

/// Arithmetic sum of report hours, rounded to 2 decimal places so
/// displayed balances carry no floating-point noise.
pub fn sum_hours<'a, I>(reports: I) -> Decimal
where
    I: IntoIterator<Item = &'a Report>,
{
    reports
        .into_iter()
        .map(|r| r.hours)
        .sum::<Decimal>()
        .round_dp(2)
}

/// ISO week number a report's business timestamp falls into.
pub fn week_of(calendar: &CalendarClassifier, report: &Report) -> u32 {
    calendar.week_of(report.reported_at)
}

/// Reports logged on one calendar day. An empty bucket stands in for a
/// "no work logged" row: zero hours, nothing to list, so presentation
/// layers need no special case for report-less days.
#[derive(Debug, Clone, Serialize)]
pub struct DayReports {
    pub day: CalendarDay,
    pub reports: Vec<Report>,
}

impl DayReports {
    pub fn worked_hours(&self) -> Decimal {
        sum_hours(&self.reports)
    }

    pub fn is_placeholder(&self) -> bool {
        self.reports.is_empty()
    }
}

/// Buckets reports by local calendar day over an ordered day-set. Every
/// day of the set appears in the output; reports outside the set are
/// dropped.
pub fn group_by_day(
    calendar: &CalendarClassifier,
    reports: &[Report],
    days: &[CalendarDay],
) -> Vec<DayReports> {
    days.iter()
        .map(|day| DayReports {
            day: *day,
            reports: reports
                .iter()
                .filter(|r| calendar.local_date(r.reported_at) == day.date)
                .cloned()
                .collect(),
        })
        .collect()
}

/// Consecutive run of day buckets sharing one ISO week, for weekly
/// subtotal rows.
#[derive(Debug, Clone, Serialize)]
pub struct WeekGroup {
    pub week: u32,
    pub days: Vec<DayReports>,
}

impl WeekGroup {
    pub fn worked_hours(&self) -> Decimal {
        self.days
            .iter()
            .map(|d| d.worked_hours())
            .sum::<Decimal>()
            .round_dp(2)
    }
}

/// Splits date-ascending day buckets into their ISO-week runs.
pub fn group_by_week(days: Vec<DayReports>) -> Vec<WeekGroup> {
    let mut weeks: Vec<WeekGroup> = Vec::new();
    for day in days {
        match weeks.last_mut() {
            Some(group) if group.week == day.day.week => group.days.push(day),
            _ => weeks.push(WeekGroup {
                week: day.day.week,
                days: vec![day],
            }),
        }
    }
    weeks
}
