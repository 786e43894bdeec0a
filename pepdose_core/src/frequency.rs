//! Dosing frequency parsing.
//!
//! Free-text frequencies ("daily or EOD", "twice weekly") are matched by
//! substring in a fixed order:
//! 1. "daily" or exactly "qd"
//! 2. "eod" or "every other day"
//! 3. "weekly" or exactly "qw"
//! 4. "twice weekly" or exactly "biw"
//!
//! Rule 3 runs before rule 4, so "twice weekly" resolves to weekly.
//! Unrecognized text falls back to daily.

use crate::{DosingFrequency, Error, Result};
use std::fmt;
use std::str::FromStr;

impl DosingFrequency {
    /// Classify a free-text frequency description
    pub fn from_text(text: &str) -> Self {
        let freq = text.trim().to_lowercase();

        if freq.contains("daily") || freq == "qd" {
            DosingFrequency::Daily
        } else if freq.contains("eod") || freq.contains("every other day") {
            DosingFrequency::EveryOtherDay
        } else if freq.contains("weekly") || freq == "qw" {
            DosingFrequency::Weekly
        } else if freq.contains("twice weekly") || freq == "biw" {
            DosingFrequency::TwiceWeekly
        } else {
            tracing::debug!("Unrecognized frequency {:?}, assuming daily", text);
            DosingFrequency::Daily
        }
    }

    /// Days between doses
    pub fn days_per_dose(&self) -> f64 {
        match self {
            DosingFrequency::Daily => 1.0,
            DosingFrequency::EveryOtherDay => 2.0,
            DosingFrequency::Weekly => 7.0,
            DosingFrequency::TwiceWeekly => 3.5,
            DosingFrequency::Custom { days_per_dose } => *days_per_dose,
        }
    }
}

impl fmt::Display for DosingFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DosingFrequency::Daily => f.write_str("daily"),
            DosingFrequency::EveryOtherDay => f.write_str("every other day"),
            DosingFrequency::Weekly => f.write_str("weekly"),
            DosingFrequency::TwiceWeekly => f.write_str("twice weekly"),
            DosingFrequency::Custom { days_per_dose } => {
                write!(f, "every {} days", days_per_dose)
            }
        }
    }
}

/// Parses either a bare number of days between doses or free text
impl FromStr for DosingFrequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Ok(days) = s.trim().parse::<f64>() {
            if days > 0.0 && days.is_finite() {
                return Ok(DosingFrequency::Custom {
                    days_per_dose: days,
                });
            }
            return Err(Error::Parse(format!(
                "days between doses must be positive, got {}",
                days
            )));
        }
        Ok(DosingFrequency::from_text(s))
    }
}
