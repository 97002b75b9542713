//! Runtime settings loaded from the environment.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `TIMETABLE_LEVEL_FALLBACK` | `unclassified` | Label for groups with neither UG nor PG sessions (`unclassified` or `pg`) |
//! | `TIMETABLE_COLUMN_WIDTH` | `18` | Width of columns A:Z on faculty sheets |
//! | `TIMETABLE_DATA_START_ROW` | `5` | Zero-based row of the data header on faculty sheets (minimum 5) |
//! | `TIMETABLE_CREATION_DATE` | `2026-01-01` | Document creation date stamped into the output |
//! | `TIMETABLE_LOG_FORMAT` | `text` | `text` or `json` |
//!
//! A `.env` file in the working directory is honoured.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{ConfigError, ConfigResult};
use crate::logs::LogFormat;

/// Data header row used when nothing else is configured; also the minimum.
pub const DEFAULT_DATA_START_ROW: u32 = 5;

/// Width applied to columns A:Z of each faculty sheet.
pub const DEFAULT_COLUMN_WIDTH: f64 = 18.0;

const VAR_LEVEL_FALLBACK: &str = "TIMETABLE_LEVEL_FALLBACK";
const VAR_COLUMN_WIDTH: &str = "TIMETABLE_COLUMN_WIDTH";
const VAR_DATA_START_ROW: &str = "TIMETABLE_DATA_START_ROW";
const VAR_CREATION_DATE: &str = "TIMETABLE_CREATION_DATE";
const VAR_LOG_FORMAT: &str = "TIMETABLE_LOG_FORMAT";

/// Academic level reported for a faculty with no UG and no PG sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelFallback {
    /// Report "Unclassified".
    #[default]
    Unclassified,
    /// Report "PG", matching workbooks produced by earlier tooling.
    Pg,
}

/// Settings for one run of the splitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub level_fallback: LevelFallback,
    pub column_width: f64,
    pub data_start_row: u32,
    pub creation_date: NaiveDate,
    pub log_format: LogFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level_fallback: LevelFallback::default(),
            column_width: DEFAULT_COLUMN_WIDTH,
            data_start_row: DEFAULT_DATA_START_ROW,
            creation_date: default_creation_date(),
            log_format: LogFormat::default(),
        }
    }
}

fn default_creation_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or_default()
}

impl Settings {
    /// Load settings from process environment (and `.env` if present).
    pub fn from_env() -> ConfigResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(raw) = lookup(VAR_LEVEL_FALLBACK) {
            settings.level_fallback = match raw.trim().to_lowercase().as_str() {
                "unclassified" => LevelFallback::Unclassified,
                "pg" => LevelFallback::Pg,
                _ => return Err(invalid(VAR_LEVEL_FALLBACK, raw, "expected 'unclassified' or 'pg'")),
            };
        }

        if let Some(raw) = lookup(VAR_COLUMN_WIDTH) {
            settings.column_width = match raw.trim().parse::<f64>() {
                Ok(w) if w > 0.0 && w <= 255.0 => w,
                _ => return Err(invalid(VAR_COLUMN_WIDTH, raw, "expected a number in (0, 255]")),
            };
        }

        if let Some(raw) = lookup(VAR_DATA_START_ROW) {
            let row = raw
                .trim()
                .parse::<u32>()
                .map_err(|_| invalid(VAR_DATA_START_ROW, raw.clone(), "expected a row number"))?;
            settings.data_start_row = row.max(DEFAULT_DATA_START_ROW);
        }

        if let Some(raw) = lookup(VAR_CREATION_DATE) {
            settings.creation_date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|_| invalid(VAR_CREATION_DATE, raw.clone(), "expected YYYY-MM-DD"))?;
        }

        if let Some(raw) = lookup(VAR_LOG_FORMAT) {
            settings.log_format = match raw.trim().to_lowercase().as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => return Err(invalid(VAR_LOG_FORMAT, raw, "expected 'text' or 'json'")),
            };
        }

        Ok(settings)
    }
}

fn invalid(variable: &'static str, value: String, reason: &str) -> ConfigError {
    ConfigError {
        variable,
        value,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> ConfigResult<Settings> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = load(&[]).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.level_fallback, LevelFallback::Unclassified);
        assert_eq!(settings.column_width, 18.0);
        assert_eq!(settings.data_start_row, 5);
        assert_eq!(settings.creation_date, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(settings.log_format, LogFormat::Text);
    }

    #[test]
    fn test_all_variables() {
        let settings = load(&[
            ("TIMETABLE_LEVEL_FALLBACK", "PG"),
            ("TIMETABLE_COLUMN_WIDTH", "24.5"),
            ("TIMETABLE_DATA_START_ROW", "8"),
            ("TIMETABLE_CREATION_DATE", "2025-07-01"),
            ("TIMETABLE_LOG_FORMAT", "json"),
        ])
        .unwrap();

        assert_eq!(settings.level_fallback, LevelFallback::Pg);
        assert_eq!(settings.column_width, 24.5);
        assert_eq!(settings.data_start_row, 8);
        assert_eq!(settings.creation_date, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        assert_eq!(settings.log_format, LogFormat::Json);
    }

    #[test]
    fn test_data_start_row_has_floor() {
        let settings = load(&[("TIMETABLE_DATA_START_ROW", "2")]).unwrap();
        assert_eq!(settings.data_start_row, DEFAULT_DATA_START_ROW);
    }

    #[test]
    fn test_invalid_values() {
        let err = load(&[("TIMETABLE_LEVEL_FALLBACK", "ug")]).unwrap_err();
        assert_eq!(err.variable, "TIMETABLE_LEVEL_FALLBACK");

        let err = load(&[("TIMETABLE_COLUMN_WIDTH", "-3")]).unwrap_err();
        assert_eq!(err.variable, "TIMETABLE_COLUMN_WIDTH");

        let err = load(&[("TIMETABLE_DATA_START_ROW", "six")]).unwrap_err();
        assert_eq!(err.value, "six");

        let err = load(&[("TIMETABLE_CREATION_DATE", "01/01/2026")]).unwrap_err();
        assert!(err.to_string().contains("YYYY-MM-DD"));

        assert!(load(&[("TIMETABLE_LOG_FORMAT", "xml")]).is_err());
    }
}
