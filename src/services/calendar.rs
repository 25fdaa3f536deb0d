// src/services/calendar.rs
//! Civil date/time to Julian Day conversion.
//!
//! Julian Days produced here are always referenced to Universal Time: the
//! request's UTC offset is removed from the local clock before conversion.
//! The forward and reverse conversions follow the standard Gregorian
//! algorithm (Meeus, *Astronomical Algorithms*, ch. 7).

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

use crate::error::ChartError;
use crate::models::{ChartTime, CivilMoment, JulianDay};

/// Julian Day of 2000-01-01 00:00 UT.
pub const JD_2000_MIDNIGHT: f64 = 2_451_544.5;

impl CivilMoment {
    /// Parse `date` ("YYYY-MM-DD") and `time` ("HH:MM" or "HH:MM:SS").
    pub fn parse(date: &str, time: &str, utc_offset_hours: f64) -> Result<Self, ChartError> {
        let date = date.trim();
        let time = time.trim();

        let parsed_date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
            ChartError::Parse(format!("date '{}' is not a valid YYYY-MM-DD date ({})", date, e))
        })?;

        let parsed_time = NaiveTime::parse_from_str(time, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
            .map_err(|e| ChartError::Parse(format!("time '{}' is not a valid HH:MM time ({})", time, e)))?;

        if !utc_offset_hours.is_finite() {
            return Err(ChartError::Parse(format!(
                "timezone offset '{}' is not a finite number of hours",
                utc_offset_hours
            )));
        }

        Ok(CivilMoment {
            year: parsed_date.year(),
            month: parsed_date.month(),
            day: parsed_date.day(),
            hour: parsed_time.hour(),
            minute: parsed_time.minute(),
            second: parsed_time.second(),
            utc_offset_hours,
        })
    }

    /// Local clock time as fractional hours.
    pub fn local_hours(&self) -> f64 {
        self.hour as f64 + self.minute as f64 / 60.0 + self.second as f64 / 3600.0
    }

    /// Clock time shifted to UT; may fall outside [0, 24).
    pub fn ut_hours(&self) -> f64 {
        self.local_hours() - self.utc_offset_hours
    }

    /// 1-based ordinal of the local civil date.
    pub fn ordinal(&self) -> u32 {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .map(|date| date.ordinal())
            .unwrap_or_else(|| ((self.month.saturating_sub(1)) as f64 * 30.44) as u32 + self.day)
    }
}

impl ChartTime {
    /// The instant of a civil moment, keeping the day of year of its local date.
    pub fn from_civil(moment: &CivilMoment) -> Self {
        ChartTime {
            jd: julian_day(moment),
            day_of_year: moment.ordinal(),
        }
    }

    /// An instant known only as a UT Julian Day; its day of year is the UT date's.
    pub fn at_ut(jd: JulianDay) -> Self {
        ChartTime {
            jd,
            day_of_year: day_of_year(jd),
        }
    }
}

/// Julian Day (UT) for a civil moment.
pub fn julian_day(moment: &CivilMoment) -> JulianDay {
    let day = moment.day as f64 + moment.ut_hours() / 24.0;
    JulianDay(calendar_to_jd(moment.year, moment.month, day))
}

/// Gregorian calendar date with fractional day to Julian Day.
pub fn calendar_to_jd(year: i32, month: u32, day: f64) -> f64 {
    let (y, m) = if month <= 2 {
        (year - 1, month + 12)
    } else {
        (year, month)
    };
    let a = (y as f64 / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();

    (365.25 * (y as f64 + 4716.0)).floor() + (30.6001 * (m as f64 + 1.0)).floor() + day + b - 1524.5
}

/// Reverse of [`calendar_to_jd`]: (year, month, fractional day).
pub fn calendar_date(jd: JulianDay) -> (i32, u32, f64) {
    let shifted = jd.0 + 0.5;
    let z = shifted.floor();
    let f = shifted - z;

    let alpha = ((z - 1_867_216.25) / 36_524.25).floor();
    let a = z + 1.0 + alpha - (alpha / 4.0).floor();
    let b = a + 1524.0;
    let c = ((b - 122.1) / 365.25).floor();
    let d = (365.25 * c).floor();
    let e = ((b - d) / 30.6001).floor();

    let day = b - d - (30.6001 * e).floor() + f;
    let month = if e < 14.0 { e - 1.0 } else { e - 13.0 };
    let year = if month > 2.0 { c - 4716.0 } else { c - 4715.0 };

    (year as i32, month as u32, day)
}

/// 1-based ordinal day of the UT calendar date containing `jd`.
pub fn day_of_year(jd: JulianDay) -> u32 {
    let (year, month, day) = calendar_date(jd);
    NaiveDate::from_ymd_opt(year, month, day.floor() as u32)
        .map(|date| date.ordinal())
        // Meeus never yields an impossible date for finite input; fall back
        // to a 30.44-day month estimate rather than panic.
        .unwrap_or_else(|| ((month - 1) as f64 * 30.44 + day.floor()) as u32)
}

/// Cheap Julian Day estimate used by the synthetic ephemeris mode.
///
/// Years advance by Julian-calendar lengths (366 every fourth year counted
/// from 2000), so the estimate drifts by a day at each Gregorian century
/// year that skips its leap day. It never runs backwards across year ends
/// and gives the same value for the same instant.
pub fn synthetic_julian_day(moment: &CivilMoment) -> f64 {
    let year_start = ((moment.year - 2000) as f64 * 365.25 + 0.75).floor();
    let ordinal0 = moment.ordinal().saturating_sub(1) as f64;

    JD_2000_MIDNIGHT + year_start + ordinal0 + moment.ut_hours() / 24.0
}
