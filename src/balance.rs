// src/balance.rs
use chrono::{DateTime, Duration, NaiveDate, Utc, Weekday};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::debug;

use crate::calendar::{CalendarClassifier, CalendarDay};
use crate::config::EngineConfig;
use crate::day_duration::{expected_hours_for, DayDuration};
use crate::grouping::{group_by_day, group_by_week, sum_hours, DayReports};
use crate::month_days::{MonthDays, MonthRange};
use crate::report::{first_report_at, Report};
use crate::EngineError;

/// Worked and required hours over one period, kept as separate operands
/// so collaborators can display both alongside the signed balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BalanceBreakdown {
    pub worked: Decimal,
    pub required: Decimal,
}

impl BalanceBreakdown {
    /// Positive means ahead of quota, negative behind.
    pub fn balance(&self) -> Decimal {
        self.worked - self.required
    }
}

/// One ISO week of a month sheet, with its subtotals.
#[derive(Debug, Clone, Serialize)]
pub struct WeekSummary {
    pub week: u32,
    pub days: Vec<DayReports>,
    pub totals: BalanceBreakdown,
}

/// Month sheet for presentation collaborators: per-day rows (working days
/// up to "now", with placeholders where nothing was logged, plus off days
/// that have logged work), the ISO-week subtotal rows, and month totals.
/// Data only; rendering is someone else's job.
#[derive(Debug, Clone, Serialize)]
pub struct MonthSheet {
    pub range: MonthRange,
    pub days: Vec<DayReports>,
    pub weeks: Vec<WeekSummary>,
    pub totals: BalanceBreakdown,
}

/// The balance calculator. Holds configuration and the calendar
/// classifier; every query is a pure function of the supplied reports,
/// overrides and "now", so concurrent callers need no locking.
pub struct BalanceEngine {
    config: EngineConfig,
    calendar: CalendarClassifier,
}

impl BalanceEngine {
    pub fn new(config: EngineConfig) -> Self {
        let calendar = CalendarClassifier::new(&config);
        Self { config, calendar }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn calendar(&self) -> &CalendarClassifier {
        &self.calendar
    }

    /// Hours the employee is expected to work over `days`. A day counts
    /// only inside the cutoff window: not before the employee's first
    /// report and, unless `count_future`, not after "now". Each counted
    /// day resolves its expected hours through the override history. With
    /// no first report there is no reporting start, so nothing is
    /// required.
    pub fn required_hours<I>(
        &self,
        days: I,
        overrides: &[DayDuration],
        first_report: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        count_future: bool,
    ) -> Decimal
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let Some(first_day) = first_report.map(|at| self.calendar.local_date(at)) else {
            return dec!(0);
        };
        let last_counted = self.last_counted_day(now);

        let mut total = dec!(0);
        for date in days {
            if date <= first_day - Duration::days(self.config.cutoff.days_before_first_report) {
                continue;
            }
            if !count_future && date > last_counted {
                continue;
            }
            total += expected_hours_for(date, overrides, self.config.day_hours);
        }
        total.round_dp(2)
    }

    /// Worked hours over a report slice; the aggregation the balances
    /// subtract required hours from.
    pub fn worked_hours<'a, I>(&self, reports: I) -> Decimal
    where
        I: IntoIterator<Item = &'a Report>,
    {
        sum_hours(reports)
    }

    /// Balance for one calendar month. Worked hours cover every report
    /// whose local day falls in the month, off-day work included; required
    /// hours cover the month's working days inside the cutoff window. The
    /// first-report bound derives from the snapshot passed in.
    pub fn month_balance(
        &self,
        range: MonthRange,
        reports: &[Report],
        overrides: &[DayDuration],
        now: DateTime<Utc>,
        count_future: bool,
    ) -> BalanceBreakdown {
        let days = MonthDays::build(&self.calendar, range);
        let first = first_report_at(reports);
        let required = self.required_hours(days.working_dates(), overrides, first, now, count_future);
        let worked = sum_hours(
            reports
                .iter()
                .filter(|r| range.contains(self.calendar.local_date(r.reported_at))),
        );
        debug!(
            "Month balance {}: worked={} required={}",
            range, worked, required
        );
        BalanceBreakdown { worked, required }
    }

    /// Balance for one ISO week (Monday through Sunday).
    pub fn week_balance(
        &self,
        year: i32,
        week: u32,
        reports: &[Report],
        overrides: &[DayDuration],
        now: DateTime<Utc>,
        count_future: bool,
    ) -> Result<BalanceBreakdown, EngineError> {
        let monday = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
            .ok_or(EngineError::InvalidWeek { year, week })?;
        let sunday = monday + Duration::days(6);

        let working_days = (0..7)
            .map(|offset| monday + Duration::days(offset))
            .filter(|date| self.calendar.is_working_day(*date));
        let first = first_report_at(reports);
        let required = self.required_hours(working_days, overrides, first, now, count_future);
        let worked = sum_hours(reports.iter().filter(|r| {
            let date = self.calendar.local_date(r.reported_at);
            date >= monday && date <= sunday
        }));
        debug!(
            "Week balance {}/W{}: worked={} required={}",
            year, week, worked, required
        );
        Ok(BalanceBreakdown { worked, required })
    }

    /// Cumulative balance from the first report's month through the
    /// current month: each month's balance under the usual cutoff rules,
    /// summed. Future days are never counted here, whatever the caller
    /// opts into elsewhere. Zero reports means zero months to iterate,
    /// and a zero total.
    pub fn lifetime_balance(
        &self,
        reports: &[Report],
        overrides: &[DayDuration],
        now: DateTime<Utc>,
    ) -> Decimal {
        let Some(first) = first_report_at(reports) else {
            return dec!(0);
        };

        let first_month = MonthRange::of(self.calendar.local_date(first));
        let current_month = MonthRange::of(self.calendar.local_date(now));

        let mut total = dec!(0);
        let mut month = first_month;
        while month <= current_month {
            total += self
                .month_balance(month, reports, overrides, now, false)
                .balance();
            month = month.succ();
        }
        debug!(
            "Lifetime balance over {}..={}: {}",
            first_month, current_month, total
        );
        total.round_dp(2)
    }

    /// Assembles the month sheet: working days up to "now" (every one of
    /// them present, empty ones as placeholders), off days only when work
    /// was logged on them, ascending, grouped by ISO week with subtotals.
    pub fn month_sheet(
        &self,
        range: MonthRange,
        reports: &[Report],
        overrides: &[DayDuration],
        now: DateTime<Utc>,
    ) -> MonthSheet {
        let month_days = MonthDays::build(&self.calendar, range);
        let last_counted = self.last_counted_day(now);
        let first = first_report_at(reports);

        let month_reports: Vec<Report> = reports
            .iter()
            .filter(|r| range.contains(self.calendar.local_date(r.reported_at)))
            .cloned()
            .collect();

        let mut day_set: Vec<CalendarDay> = month_days
            .working
            .iter()
            .copied()
            .filter(|day| day.date <= last_counted)
            .collect();
        for day in &month_days.off {
            let worked_on = month_reports
                .iter()
                .any(|r| self.calendar.local_date(r.reported_at) == day.date);
            if worked_on {
                day_set.push(*day);
            }
        }
        day_set.sort_by_key(|day| day.date);

        let days = group_by_day(&self.calendar, &month_reports, &day_set);
        let weeks = group_by_week(days.clone())
            .into_iter()
            .map(|group| {
                let working = group
                    .days
                    .iter()
                    .filter(|d| !d.day.is_off())
                    .map(|d| d.day.date);
                let totals = BalanceBreakdown {
                    worked: group.worked_hours(),
                    required: self.required_hours(working, overrides, first, now, false),
                };
                WeekSummary {
                    week: group.week,
                    days: group.days,
                    totals,
                }
            })
            .collect();
        let totals = self.month_balance(range, reports, overrides, now, false);

        MonthSheet {
            range,
            days,
            weeks,
            totals,
        }
    }

    /// Latest calendar day the cutoff policy counts as non-future.
    fn last_counted_day(&self, now: DateTime<Utc>) -> NaiveDate {
        self.calendar.local_date(now) + Duration::days(self.config.cutoff.days_after_now - 1)
    }
}
