//! Human-readable timestamps
//!
//! Dates render the way Russian-locale UIs show them: `DD.MM.YYYY HH:MM:SS`,
//! zero-padded, 24-hour clock, no comma between date and time.

use std::fmt;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Formats a timestamp in its own time zone
pub fn format_date<Tz>(date: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    date.format(DATE_FORMAT).to_string()
}

/// Time zone used when rendering stored (UTC) timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeDisplay {
    /// The machine's local zone
    #[default]
    Local,
    Utc,
}

impl TimeDisplay {
    /// Formats a UTC timestamp in this zone
    pub fn format(&self, date: &DateTime<Utc>) -> String {
        match self {
            TimeDisplay::Local => format_date(&date.with_timezone(&Local)),
            TimeDisplay::Utc => format_date(date),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeDisplay::Local => "local",
            TimeDisplay::Utc => "utc",
        }
    }
}

impl std::str::FromStr for TimeDisplay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(TimeDisplay::Local),
            "utc" => Ok(TimeDisplay::Utc),
            other => Err(format!("unknown time display '{}', expected 'local' or 'utc'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn formats_fixed_instant() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(format_date(&date), "05.03.2024 07:08:09");
    }

    #[test]
    fn no_comma_and_expected_shape() {
        let date = Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 58).unwrap();
        let out = format_date(&date);
        assert!(!out.contains(','));

        let bytes = out.as_bytes();
        assert_eq!(out.len(), 19);
        for (i, b) in bytes.iter().enumerate() {
            match i {
                2 | 5 => assert_eq!(*b, b'.'),
                10 => assert_eq!(*b, b' '),
                13 | 16 => assert_eq!(*b, b':'),
                _ => assert!(b.is_ascii_digit(), "position {} in {}", i, out),
            }
        }
    }

    #[test]
    fn respects_offset() {
        let moscow = FixedOffset::east_opt(3 * 3600).unwrap();
        let date = Utc
            .with_ymd_and_hms(2024, 1, 1, 22, 30, 0)
            .unwrap()
            .with_timezone(&moscow);
        assert_eq!(format_date(&date), "02.01.2024 01:30:00");
    }

    #[test]
    fn utc_display() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(TimeDisplay::Utc.format(&date), "05.03.2024 07:08:09");
    }

    #[test]
    fn parse_time_display() {
        assert_eq!("UTC".parse::<TimeDisplay>(), Ok(TimeDisplay::Utc));
        assert_eq!("local".parse::<TimeDisplay>(), Ok(TimeDisplay::Local));
        assert!("mars".parse::<TimeDisplay>().is_err());
    }
}
