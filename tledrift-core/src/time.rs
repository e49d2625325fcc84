//! Epoch conversion to a two-part Julian date.
//!
//! SGP4 takes time as minutes since the element-set epoch; catalog epochs
//! arrive as UTC timestamps. The conversion goes through a split Julian
//! date so sub-second precision survives: near the present, a single f64
//! Julian day has ~40 µs of resolution and naive subtraction of two of
//! them cancels most of the mantissa.
//!
//! Key values:
//! - JD 2451545.0 = 2000-01-01 12:00 UTC (J2000)
//! - Midnight Julian day numbers always end in .5

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};
use serde::Serialize;

/// Minutes per day.
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Seconds per day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Offset from chrono's day count (0001-01-01 = day 1, proleptic
/// Gregorian) to the Julian day number at that date's midnight.
const JD_CE_OFFSET: f64 = 1_721_424.5;

/// An absolute instant as (midnight Julian day, fraction of day).
///
/// `day` is the Julian day number of the preceding UTC midnight (always
/// *.5) and `fraction` lies in [0, 1). Both parts are built from integer
/// calendar fields, never by splitting one large float, so the fraction
/// keeps full sub-second resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JulianDate {
    pub day: f64,
    pub fraction: f64,
}

impl JulianDate {
    /// Split a UTC timestamp into its two-part Julian date.
    pub fn from_datetime(t: &NaiveDateTime) -> Self {
        let day = f64::from(t.date().num_days_from_ce()) + JD_CE_OFFSET;
        let seconds = f64::from(t.time().num_seconds_from_midnight())
            + f64::from(t.time().nanosecond()) * 1e-9;
        JulianDate {
            day,
            fraction: seconds / SECONDS_PER_DAY,
        }
    }

    /// Split a timezone-aware UTC timestamp.
    pub fn from_utc(t: &DateTime<Utc>) -> Self {
        Self::from_datetime(&t.naive_utc())
    }

    /// The instant `seconds` later, fraction renormalized into [0, 1).
    ///
    /// The carry into `day` goes through floor/remainder, not subtraction
    /// of two near-equal floats.
    pub fn offset_seconds(&self, seconds: f64) -> JulianDate {
        let total = self.fraction + seconds / SECONDS_PER_DAY;
        let carry = total.floor();
        JulianDate {
            day: self.day + carry,
            fraction: total - carry,
        }
    }

    /// Signed minutes from `self` to `other`.
    ///
    /// Day and fraction parts are differenced separately before summing,
    /// which keeps sub-second resolution across gaps of many days.
    pub fn minutes_until(&self, other: &JulianDate) -> f64 {
        ((other.day - self.day) + (other.fraction - self.fraction)) * MINUTES_PER_DAY
    }

    /// The full Julian date as one f64. Fine for display and coarse math;
    /// use the split parts for time differences.
    pub fn value(&self) -> f64 {
        self.day + self.fraction
    }
}

/// Seconds between two epochs as f64, microsecond resolution.
pub fn elapsed_seconds(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let delta = to - from;
    delta
        .num_microseconds()
        .map_or_else(|| delta.num_seconds() as f64, |us| us as f64 / 1e6)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
