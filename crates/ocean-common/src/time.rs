//! CF-style time coordinates.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A time coordinate as stored in the source file.
///
/// Values are kept raw (e.g. hours since an epoch) together with their units so
/// the reference timestamp can be copied onto other variables bit-for-bit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeCoordinate {
    pub values: Vec<f64>,
    pub units: Option<String>,
    pub calendar: Option<String>,
}

impl TimeCoordinate {
    pub fn new(values: Vec<f64>, units: Option<String>) -> Self {
        Self {
            values,
            units,
            calendar: None,
        }
    }

    /// A single-step time coordinate.
    pub fn single(value: f64, units: impl Into<String>) -> Self {
        Self::new(vec![value], Some(units.into()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Decode step `index` into a UTC datetime using the CF `units` string.
    ///
    /// Returns `None` when units are absent or not of the form
    /// `"<seconds|minutes|hours|days> since <epoch>"`, and when the value is
    /// not finite or lands outside chrono's representable range.
    pub fn datetime(&self, index: usize) -> Option<DateTime<Utc>> {
        let value = *self.values.get(index)?;
        let (unit_seconds, epoch) = parse_cf_units(self.units.as_deref()?)?;
        let offset_ms = (value * unit_seconds * 1000.0).round();
        if !offset_ms.is_finite() || offset_ms.abs() >= i64::MAX as f64 {
            return None;
        }
        let offset = TimeDelta::try_milliseconds(offset_ms as i64)?;
        epoch.checked_add_signed(offset)
    }
}

/// Split CF time units into (seconds per unit, epoch).
fn parse_cf_units(units: &str) -> Option<(f64, DateTime<Utc>)> {
    let (unit, epoch) = units.split_once(" since ")?;
    let unit_seconds = match unit.trim().to_lowercase().as_str() {
        "second" | "seconds" | "s" | "sec" | "secs" => 1.0,
        "minute" | "minutes" | "min" | "mins" => 60.0,
        "hour" | "hours" | "h" | "hr" | "hrs" => 3600.0,
        "day" | "days" | "d" => 86400.0,
        _ => return None,
    };
    Some((unit_seconds, parse_epoch(epoch.trim())?))
}

fn parse_epoch(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let s = s.trim_end_matches('Z').trim_end_matches(" UTC");
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&ndt));
        }
    }

    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hours_since_1950() {
        // 2024-01-15T06:00:00Z
        let time = TimeCoordinate::single(649_014.0, "hours since 1950-01-01");
        let dt = time.datetime(0).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-15T06:00:00+00:00");
    }

    #[test]
    fn test_decode_seconds_with_time_of_day() {
        let time = TimeCoordinate::single(3600.0, "seconds since 1970-01-01 00:00:00");
        assert_eq!(time.datetime(0).unwrap().to_rfc3339(), "1970-01-01T01:00:00+00:00");
    }

    #[test]
    fn test_decode_fill_value_is_none() {
        // NetCDF default double fill.
        let time = TimeCoordinate::single(9.969209968386869e36, "hours since 1950-01-01");
        assert!(time.datetime(0).is_none());
    }

    #[test]
    fn test_decode_non_finite_is_none() {
        let time = TimeCoordinate::new(
            vec![f64::NAN, f64::INFINITY, 1e11],
            Some("days since 1950-01-01".to_string()),
        );
        assert!(time.datetime(0).is_none());
        assert!(time.datetime(1).is_none());
        // Fits in i64 milliseconds but not in chrono's year range.
        assert!(time.datetime(2).is_none());
    }

    #[test]
    fn test_decode_unknown_units() {
        let time = TimeCoordinate::single(1.0, "fortnights since 1970-01-01");
        assert!(time.datetime(0).is_none());
        let no_units = TimeCoordinate::new(vec![1.0], None);
        assert!(no_units.datetime(0).is_none());
    }
}
