// src/holidays.rs
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::{Datelike, Duration, NaiveDate};
use tracing::debug;

use crate::config::Country;

/// Public-holiday calendar, queried by exact date.
pub trait HolidayCalendar: Send + Sync {
    fn is_holiday(&self, date: NaiveDate) -> bool;
}

pub fn holiday_calendar_for(country: Country) -> Arc<dyn HolidayCalendar> {
    match country {
        Country::Poland => Arc::new(PolishHolidays::new()),
    }
}

/// Polish public holidays: the fixed-date set plus the movable feasts
/// anchored on Easter Sunday. Year sets are generated on first query and
/// memoized, since balance computations touch the same few years over and
/// over.
pub struct PolishHolidays {
    years: Mutex<HashMap<i32, HashSet<NaiveDate>>>,
}

impl PolishHolidays {
    pub fn new() -> Self {
        Self {
            years: Mutex::new(HashMap::new()),
        }
    }

    fn build_year(year: i32) -> HashSet<NaiveDate> {
        // Fixed month/day pairs are valid in every year.
        let fixed = |m: u32, d: u32| NaiveDate::from_ymd_opt(year, m, d).unwrap();
        let easter = easter_sunday(year);

        let mut days = HashSet::new();
        days.insert(fixed(1, 1)); // Nowy Rok
        if year >= 2011 {
            days.insert(fixed(1, 6)); // Trzech Kroli, public holiday since 2011
        }
        days.insert(easter); // Wielkanoc
        days.insert(easter + Duration::days(1)); // Poniedzialek Wielkanocny
        days.insert(fixed(5, 1)); // Swieto Pracy
        days.insert(fixed(5, 3)); // Swieto Konstytucji 3 Maja
        days.insert(easter + Duration::days(49)); // Zielone Swiatki
        days.insert(easter + Duration::days(60)); // Boze Cialo
        days.insert(fixed(8, 15)); // Wniebowziecie NMP
        days.insert(fixed(11, 1)); // Wszystkich Swietych
        days.insert(fixed(11, 11)); // Swieto Niepodleglosci
        if year >= 2025 {
            days.insert(fixed(12, 24)); // Wigilia, public holiday since 2025
        }
        days.insert(fixed(12, 25)); // Boze Narodzenie
        days.insert(fixed(12, 26)); // Drugi dzien Swiat
        days
    }
}

impl Default for PolishHolidays {
    fn default() -> Self {
        Self::new()
    }
}

impl HolidayCalendar for PolishHolidays {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        let mut years = self.years.lock().unwrap();
        years
            .entry(date.year())
            .or_insert_with(|| {
                debug!("Generating PL holiday calendar for year {}", date.year());
                Self::build_year(date.year())
            })
            .contains(&date)
    }
}

/// Gregorian Easter Sunday via the anonymous computus.
fn easter_sunday(year: i32) -> NaiveDate {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .unwrap_or_else(|_| panic!("Invalid date string format: {}", date_str))
    }

    #[test]
    fn easter_sunday_known_years() {
        assert_eq!(easter_sunday(2024), d("2024-03-31"));
        assert_eq!(easter_sunday(2025), d("2025-04-20"));
        assert_eq!(easter_sunday(2026), d("2026-04-05"));
    }

    #[test]
    fn movable_feasts_follow_easter() {
        let cal = PolishHolidays::new();
        // Easter Monday, Pentecost, Corpus Christi for 2025
        assert!(cal.is_holiday(d("2025-04-21")));
        assert!(cal.is_holiday(d("2025-06-08")));
        assert!(cal.is_holiday(d("2025-06-19")));
        // The day after Corpus Christi is an ordinary Friday
        assert!(!cal.is_holiday(d("2025-06-20")));
    }

    #[test]
    fn fixed_holidays() {
        let cal = PolishHolidays::new();
        assert!(cal.is_holiday(d("2025-01-01")));
        assert!(cal.is_holiday(d("2025-05-01")));
        assert!(cal.is_holiday(d("2025-05-03")));
        assert!(cal.is_holiday(d("2025-11-11")));
        assert!(cal.is_holiday(d("2025-12-25")));
        assert!(!cal.is_holiday(d("2025-07-15")));
    }

    #[test]
    fn epiphany_only_from_2011() {
        let cal = PolishHolidays::new();
        assert!(!cal.is_holiday(d("2010-01-06")));
        assert!(cal.is_holiday(d("2011-01-06")));
    }

    #[test]
    fn christmas_eve_only_from_2025() {
        let cal = PolishHolidays::new();
        assert!(!cal.is_holiday(d("2024-12-24")));
        assert!(cal.is_holiday(d("2025-12-24")));
    }
}
