// src/day_duration.rs
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::EngineError;

/// A change to the expected hours per working day for one employee,
/// effective from a date onward until superseded by a later entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayDuration {
    pub username: String,
    pub from_date: NaiveDate,
    pub hours: Decimal,
    /// The from-date exactly as the reporter typed it.
    pub from_date_display: String,
}

impl DayDuration {
    pub fn new(username: &str, from_date: NaiveDate, hours: Decimal) -> Self {
        Self {
            username: username.to_string(),
            from_date,
            hours,
            from_date_display: from_date.format("%d.%m.%Y").to_string(),
        }
    }

    /// Parses the `DD.MM.YYYY` form reporters submit, keeping the raw
    /// string for display.
    pub fn from_display(username: &str, from_date: &str, hours: Decimal) -> Result<Self, EngineError> {
        let parsed =
            NaiveDate::parse_from_str(from_date, "%d.%m.%Y").map_err(|source| {
                EngineError::InvalidFromDate {
                    input: from_date.to_string(),
                    source,
                }
            })?;
        Ok(Self {
            username: username.to_string(),
            from_date: parsed,
            hours,
            from_date_display: from_date.to_string(),
        })
    }
}

/// Override history across users; one entry per (username, from-date).
/// Resubmitting an existing pair replaces its duration.
#[derive(Debug, Default, Clone)]
pub struct DayDurationHistory {
    entries: Vec<DayDuration>,
}

impl DayDurationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&mut self, entry: DayDuration) {
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|e| e.username == entry.username && e.from_date == entry.from_date)
        {
            debug!(
                "Replacing day duration for {} from {}: {} -> {}",
                entry.username, entry.from_date, existing.hours, entry.hours
            );
            existing.hours = entry.hours;
            existing.from_date_display = entry.from_date_display;
        } else {
            debug!(
                "Recording day duration for {} from {}: {}h",
                entry.username, entry.from_date, entry.hours
            );
            self.entries.push(entry);
        }
    }

    /// Overrides for one user, most recent effective date first.
    pub fn for_user(&self, username: &str) -> Vec<DayDuration> {
        let mut out: Vec<DayDuration> = self
            .entries
            .iter()
            .filter(|e| e.username == username)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.from_date.cmp(&a.from_date));
        out
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Expected hours for one calendar day under an override history: the
/// duration of the override with the latest effective date on or before
/// the day, else `default_hours`. The input need not be pre-sorted; the
/// precondition is enforced here rather than on the caller.
pub fn expected_hours_for(
    date: NaiveDate,
    overrides: &[DayDuration],
    default_hours: Decimal,
) -> Decimal {
    let mut sorted: Vec<&DayDuration> = overrides.iter().collect();
    sorted.sort_by(|a, b| b.from_date.cmp(&a.from_date));
    sorted
        .into_iter()
        .find(|o| o.from_date <= date)
        .map(|o| o.hours)
        .unwrap_or(default_hours)
}
