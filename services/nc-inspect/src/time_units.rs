//! CF time coordinate decoding (`"<unit> since <reference date>"`).
//!
//! The standard calendar goes through `chrono`. The fixed-length model
//! calendars (`noleap`, `all_leap`, `360_day`) have dates chrono cannot
//! represent, e.g. February 30th, and are computed by day counting.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;
use thiserror::Error;

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimeUnitsError {
    #[error("Time units '{0}' are not of the form '<unit> since <date>'")]
    Malformed(String),

    #[error("Unsupported time unit '{0}'")]
    UnsupportedUnit(String),

    #[error("Invalid reference date '{0}'")]
    InvalidReference(String),

    #[error("Unsupported calendar '{0}'")]
    UnsupportedCalendar(String),

    #[error("Time value {0} is out of range")]
    OutOfRange(f64),
}

pub type TimeUnitsResult<T> = Result<T, TimeUnitsError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calendar {
    /// Gregorian, including `gregorian` and `proleptic_gregorian`
    Standard,
    NoLeap,
    AllLeap,
    Day360,
}

impl Calendar {
    fn fixed_month_lengths(self) -> Option<[u32; 12]> {
        match self {
            Calendar::Standard => None,
            Calendar::NoLeap => Some([31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]),
            Calendar::AllLeap => Some([31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]),
            Calendar::Day360 => Some([30; 12]),
        }
    }
}

impl FromStr for Calendar {
    type Err = TimeUnitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" | "gregorian" | "proleptic_gregorian" => Ok(Calendar::Standard),
            "noleap" | "no_leap" | "365_day" => Ok(Calendar::NoLeap),
            "all_leap" | "366_day" => Ok(Calendar::AllLeap),
            "360_day" => Ok(Calendar::Day360),
            _ => Err(TimeUnitsError::UnsupportedCalendar(s.to_string())),
        }
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Calendar::Standard => "standard",
            Calendar::NoLeap => "noleap",
            Calendar::AllLeap => "all_leap",
            Calendar::Day360 => "360_day",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl TimeUnit {
    pub fn seconds(self) -> f64 {
        match self {
            TimeUnit::Days => 86_400.0,
            TimeUnit::Hours => 3_600.0,
            TimeUnit::Minutes => 60.0,
            TimeUnit::Seconds => 1.0,
        }
    }
}

impl FromStr for TimeUnit {
    type Err = TimeUnitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "days" | "day" | "d" => Ok(TimeUnit::Days),
            "hours" | "hour" | "hrs" | "hr" | "h" => Ok(TimeUnit::Hours),
            "minutes" | "minute" | "mins" | "min" => Ok(TimeUnit::Minutes),
            "seconds" | "second" | "secs" | "sec" | "s" => Ok(TimeUnit::Seconds),
            _ => Err(TimeUnitsError::UnsupportedUnit(s.to_string())),
        }
    }
}

/// A calendar-agnostic date and time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct CfDateTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl From<NaiveDateTime> for CfDateTime {
    fn from(dt: NaiveDateTime) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second(),
        }
    }
}

impl fmt::Display for CfDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

impl CfDateTime {
    fn seconds_of_day(&self) -> i64 {
        i64::from(self.hour) * 3_600 + i64::from(self.minute) * 60 + i64::from(self.second)
    }

    fn to_naive(self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)?.and_hms_opt(
            self.hour,
            self.minute,
            self.second,
        )
    }
}

/// Parsed `"<unit> since <reference>"` units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeUnits {
    pub unit: TimeUnit,
    pub reference: CfDateTime,
}

impl TimeUnits {
    pub fn parse(units: &str) -> TimeUnitsResult<Self> {
        let lower = units.to_ascii_lowercase();
        let at = lower
            .find(" since ")
            .ok_or_else(|| TimeUnitsError::Malformed(units.to_string()))?;
        let unit = units[..at].parse()?;
        let reference = parse_reference(units[at + " since ".len()..].trim())?;
        Ok(Self { unit, reference })
    }

    /// Date `value` units after the reference date, in `calendar`.
    pub fn decode(&self, value: f64, calendar: Calendar) -> TimeUnitsResult<CfDateTime> {
        let offset = value * self.unit.seconds();
        if !offset.is_finite() || offset.abs() > 1e15 {
            return Err(TimeUnitsError::OutOfRange(value));
        }

        match calendar.fixed_month_lengths() {
            None => {
                let reference = self
                    .reference
                    .to_naive()
                    .ok_or_else(|| TimeUnitsError::InvalidReference(self.reference.to_string()))?;
                let millis = (offset * 1_000.0).round() as i64;
                reference
                    .checked_add_signed(Duration::milliseconds(millis))
                    .map(CfDateTime::from)
                    .ok_or(TimeUnitsError::OutOfRange(value))
            }
            Some(months) => {
                let start = fixed_day_number(&self.reference, &months)?;
                let total = start * SECONDS_PER_DAY
                    + self.reference.seconds_of_day()
                    + offset.round() as i64;
                Ok(fixed_from_day_number(
                    total.div_euclid(SECONDS_PER_DAY),
                    total.rem_euclid(SECONDS_PER_DAY),
                    &months,
                ))
            }
        }
    }
}

/// Accepts `Y-M-D`, optionally followed by `H:M:S[.f]` after a space or `T`.
/// Trailing zone designators are ignored.
fn parse_reference(text: &str) -> TimeUnitsResult<CfDateTime> {
    let invalid = || TimeUnitsError::InvalidReference(text.to_string());

    let mut parts = text.splitn(2, |c: char| c == ' ' || c == 'T');
    let date = parts.next().ok_or_else(invalid)?;
    let time = parts.next().unwrap_or("").trim();

    let date_fields: Vec<&str> = date.split('-').collect();
    let [year, month, day] = date_fields.as_slice() else {
        return Err(invalid());
    };
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let day: u32 = day.parse().map_err(|_| invalid())?;

    let clock = time
        .split(|c: char| c == ' ' || c == 'Z' || c == '+')
        .next()
        .unwrap_or("");
    let mut hms = [0u32; 3];
    if !clock.is_empty() {
        for (slot, field) in hms.iter_mut().zip(clock.split(':')) {
            let whole = field.split('.').next().unwrap_or(field);
            *slot = whole.parse().map_err(|_| invalid())?;
        }
    }

    if !(1..=12).contains(&month) || day == 0 || hms[0] > 23 || hms[1] > 59 || hms[2] > 59 {
        return Err(invalid());
    }

    Ok(CfDateTime {
        year,
        month,
        day,
        hour: hms[0],
        minute: hms[1],
        second: hms[2],
    })
}

fn fixed_day_number(date: &CfDateTime, months: &[u32; 12]) -> TimeUnitsResult<i64> {
    let month_index = (date.month - 1) as usize;
    if date.day > months[month_index] {
        return Err(TimeUnitsError::InvalidReference(date.to_string()));
    }
    let year_len: i64 = months.iter().map(|&m| i64::from(m)).sum();
    let before: i64 = months[..month_index].iter().map(|&m| i64::from(m)).sum();
    Ok(i64::from(date.year) * year_len + before + i64::from(date.day) - 1)
}

fn fixed_from_day_number(days: i64, seconds: i64, months: &[u32; 12]) -> CfDateTime {
    let year_len: i64 = months.iter().map(|&m| i64::from(m)).sum();
    let year = days.div_euclid(year_len);
    let mut day_of_year = days.rem_euclid(year_len);

    let mut month = 1;
    for &len in months {
        let len = i64::from(len);
        if day_of_year < len {
            break;
        }
        day_of_year -= len;
        month += 1;
    }

    CfDateTime {
        year: year as i32,
        month,
        day: day_of_year as u32 + 1,
        hour: (seconds / 3_600) as u32,
        minute: (seconds % 3_600 / 60) as u32,
        second: (seconds % 60) as u32,
    }
}

/// Mean spacing of consecutive values, in days.
pub fn resolution_days(values: &[f64], unit: TimeUnit) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let span: f64 = values.windows(2).map(|w| w[1] - w[0]).sum();
    Some(span / (values.len() - 1) as f64 * unit.seconds() / 86_400.0)
}
