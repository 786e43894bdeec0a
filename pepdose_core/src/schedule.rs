//! Injection scheduling.
//!
//! Produces recurring injection dates for a dosing cycle and answers
//! whether a scheduled injection is due or overdue. Delivering reminders
//! for these entries is left to whatever consumes them.

use crate::{Error, InjectionStatus, MassUnit, Result, ScheduleFrequency, ScheduledInjection};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Default window after the scheduled time in which an injection is "due"
pub const DEFAULT_GRACE_PERIOD_MINUTES: i64 = 30;

/// Longest grace window a config may set (one week)
pub const MAX_GRACE_PERIOD_MINUTES: i64 = 7 * 24 * 60;

/// Longest cycle `generate_cycle_schedule` will plan (ten years)
pub const MAX_CYCLE_WEEKS: u32 = 520;

impl ScheduleFrequency {
    /// Days between consecutive injections
    pub fn interval_days(self) -> i64 {
        match self {
            ScheduleFrequency::Daily => 1,
            ScheduleFrequency::Eod => 2,
            ScheduleFrequency::Weekly => 7,
            ScheduleFrequency::Biweekly => 14,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScheduleFrequency::Daily => "daily",
            ScheduleFrequency::Eod => "eod",
            ScheduleFrequency::Weekly => "weekly",
            ScheduleFrequency::Biweekly => "biweekly",
        }
    }
}

impl fmt::Display for ScheduleFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleFrequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(ScheduleFrequency::Daily),
            "eod" | "every other day" => Ok(ScheduleFrequency::Eod),
            "weekly" => Ok(ScheduleFrequency::Weekly),
            "biweekly" => Ok(ScheduleFrequency::Biweekly),
            other => Err(Error::Parse(format!(
                "unknown schedule frequency '{}' (expected daily, eod, weekly or biweekly)",
                other
            ))),
        }
    }
}

impl InjectionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InjectionStatus::Scheduled => "scheduled",
            InjectionStatus::Completed => "completed",
            InjectionStatus::Missed => "missed",
            InjectionStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for InjectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to inject; every generated entry copies these fields
#[derive(Clone, Debug)]
pub struct InjectionTemplate {
    pub peptide_id: String,
    pub peptide_name: String,
    pub dose: f64,
    pub unit: MassUnit,
}

/// A full cycle of planned injections
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CycleSchedule {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub frequency: ScheduleFrequency,
    pub injections: Vec<ScheduledInjection>,
}

/// `count` dates starting at `start`, spaced by the frequency interval
///
/// Fails with `Error::InvalidInput` if a date falls outside the calendar range.
pub fn recurring_dates(
    start: DateTime<Utc>,
    frequency: ScheduleFrequency,
    count: u32,
) -> Result<Vec<DateTime<Utc>>> {
    (0..i64::from(count))
        .map(|i| offset_days(start, frequency.interval_days() * i))
        .collect()
}

/// The injection after `last` at the given frequency, if it is representable
pub fn next_injection_date(
    last: DateTime<Utc>,
    frequency: ScheduleFrequency,
) -> Option<DateTime<Utc>> {
    Duration::try_days(frequency.interval_days()).and_then(|step| last.checked_add_signed(step))
}

fn offset_days(start: DateTime<Utc>, days: i64) -> Result<DateTime<Utc>> {
    Duration::try_days(days)
        .and_then(|offset| start.checked_add_signed(offset))
        .ok_or_else(|| {
            Error::InvalidInput(format!("date {} days after {} is out of range", days, start))
        })
}

/// Number of injections that fit in a cycle of `weeks` weeks
///
/// Partial intervals round up, so a 3-week EOD cycle has 11 injections.
pub fn cycle_injection_count(weeks: u32, frequency: ScheduleFrequency) -> u32 {
    let days = weeks.saturating_mul(7);
    match frequency {
        ScheduleFrequency::Daily => days,
        ScheduleFrequency::Eod => days.div_ceil(2),
        ScheduleFrequency::Weekly => weeks,
        ScheduleFrequency::Biweekly => weeks.div_ceil(2),
    }
}

/// Plan every injection of a cycle
///
/// Cycles longer than `MAX_CYCLE_WEEKS` are rejected with `Error::InvalidInput`.
pub fn generate_cycle_schedule(
    template: &InjectionTemplate,
    start: DateTime<Utc>,
    weeks: u32,
    frequency: ScheduleFrequency,
) -> Result<CycleSchedule> {
    if weeks > MAX_CYCLE_WEEKS {
        return Err(Error::InvalidInput(format!(
            "cycle length must be at most {} weeks, got {}",
            MAX_CYCLE_WEEKS, weeks
        )));
    }

    let end_date = offset_days(start, i64::from(weeks) * 7)?;
    let count = cycle_injection_count(weeks, frequency);

    let injections = recurring_dates(start, frequency, count)?
        .into_iter()
        .map(|scheduled_time| ScheduledInjection {
            id: Uuid::new_v4(),
            peptide_id: template.peptide_id.clone(),
            peptide_name: template.peptide_name.clone(),
            scheduled_time,
            dose: template.dose,
            unit: template.unit,
            status: InjectionStatus::Scheduled,
            completed_at: None,
        })
        .collect::<Vec<_>>();

    tracing::info!(
        "Scheduled {} {} injections of {} over {} weeks",
        injections.len(),
        frequency,
        template.peptide_name,
        weeks
    );

    Ok(CycleSchedule {
        start_date: start,
        end_date,
        frequency,
        injections,
    })
}

impl ScheduledInjection {
    /// End of the grace window; `None` when it lies past the calendar range
    fn grace_deadline(&self, grace: Duration) -> Option<DateTime<Utc>> {
        self.scheduled_time.checked_add_signed(grace)
    }

    /// Scheduled, and `now` falls within the grace window after the scheduled time
    pub fn is_due(&self, now: DateTime<Utc>, grace: Duration) -> bool {
        self.status == InjectionStatus::Scheduled
            && now >= self.scheduled_time
            && self.grace_deadline(grace).map_or(true, |deadline| now <= deadline)
    }

    /// Still scheduled although the grace window has passed
    pub fn is_overdue(&self, now: DateTime<Utc>, grace: Duration) -> bool {
        self.status == InjectionStatus::Scheduled
            && self.grace_deadline(grace).is_some_and(|deadline| now > deadline)
    }
}
