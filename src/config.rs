// src/config.rs
use anyhow::Context;
use chrono_tz::Tz;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// Expected hours per working day when no duration override applies.
pub const DEFAULT_DAY_HOURS: Decimal = dec!(6);

/// Which public-holiday calendar the classifier consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Country {
    Poland,
}

impl Country {
    pub fn code(&self) -> &'static str {
        match self {
            Country::Poland => "PL",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "PL" => Some(Country::Poland),
            _ => None,
        }
    }
}

/// Day-counting boundaries for required-hours computation.
///
/// A day is counted when it lies strictly after
/// `first_report_day - days_before_first_report` and strictly before the
/// start of `now + days_after_now`. The defaults (1, 1) mean: count from
/// the first-report day itself, up to and including today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutoffPolicy {
    pub days_before_first_report: i64,
    pub days_after_now: i64,
}

impl Default for CutoffPolicy {
    fn default() -> Self {
        Self {
            days_before_first_report: 1,
            days_after_now: 1,
        }
    }
}

/// Process-wide engine configuration, injected at construction so every
/// computation is a pure function of its inputs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Timezone business timestamps are interpreted in.
    pub timezone: Tz,
    pub country: Country,
    /// Baseline expected hours per working day.
    pub day_hours: Decimal,
    pub cutoff: CutoffPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Europe::Warsaw,
            country: Country::Poland,
            day_hours: DEFAULT_DAY_HOURS,
            cutoff: CutoffPolicy::default(),
        }
    }
}

/// Raw deployment settings as they appear in the environment.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub timezone: String,
    pub country: String,
    pub default_day_hours: Option<Decimal>,
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        envy::from_env::<Config>()
    }

    pub fn into_engine_config(self) -> anyhow::Result<EngineConfig> {
        let timezone: Tz = self
            .timezone
            .parse()
            .map_err(|e| anyhow::anyhow!("unknown timezone {}: {}", self.timezone, e))?;
        let country = Country::from_code(&self.country)
            .with_context(|| format!("unsupported holiday country code: {}", self.country))?;

        Ok(EngineConfig {
            timezone,
            country,
            day_hours: self.default_day_hours.unwrap_or(DEFAULT_DAY_HOURS),
            cutoff: CutoffPolicy::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_warsaw_poland_six_hours() {
        let config = EngineConfig::default();
        assert_eq!(config.timezone, chrono_tz::Europe::Warsaw);
        assert_eq!(config.country, Country::Poland);
        assert_eq!(config.day_hours, dec!(6));
        assert_eq!(config.cutoff.days_before_first_report, 1);
        assert_eq!(config.cutoff.days_after_now, 1);
    }

    #[test]
    fn country_codes_round_trip() {
        assert_eq!(Country::from_code("pl"), Some(Country::Poland));
        assert_eq!(Country::from_code("PL"), Some(Country::Poland));
        assert_eq!(Country::Poland.code(), "PL");
        assert_eq!(Country::from_code("XX"), None);
    }

    #[test]
    fn raw_settings_convert_to_engine_config() {
        let raw = Config {
            timezone: "Europe/Warsaw".to_string(),
            country: "PL".to_string(),
            default_day_hours: Some(dec!(7.5)),
        };
        let config = raw.into_engine_config().unwrap();
        assert_eq!(config.timezone, chrono_tz::Europe::Warsaw);
        assert_eq!(config.day_hours, dec!(7.5));
    }

    #[test]
    fn bad_timezone_is_rejected() {
        let raw = Config {
            timezone: "Mars/Olympus_Mons".to_string(),
            country: "PL".to_string(),
            default_day_hours: None,
        };
        assert!(raw.into_engine_config().is_err());
    }
}
