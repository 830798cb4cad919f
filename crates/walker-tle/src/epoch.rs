//! TLE epoch (two-digit year + fractional day-of-year)
//!
//! A run samples its epoch exactly once and every satellite shares it.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Epoch shared by every satellite in a generation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Epoch {
    /// Full calendar year (drives the launch-year window)
    pub calendar_year: i32,
    /// Two-digit year as written in line 1
    pub year: u8,
    /// Day of year with fractional day (1.0 = Jan 1 00:00 UTC)
    pub day: f64,
}

impl Epoch {
    /// Fractional day uses whole seconds; sub-second time is ignored.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        let hour_fraction =
            (dt.hour() as f64 + dt.minute() as f64 / 60.0 + dt.second() as f64 / 3600.0) / 24.0;

        Self {
            calendar_year: dt.year(),
            year: dt.year().rem_euclid(100) as u8,
            day: dt.ordinal() as f64 + hour_fraction,
        }
    }

    /// Sample the current instant
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn from_ymd_hms(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Option<Self> {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .map(Self::from_datetime)
    }

    /// `YYDDD.DDDDDDDD` as written in line 1 columns 19-32
    pub fn format_tle(&self) -> String {
        format!("{:02}{:012.8}", self.year, self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_day_of_year() {
        let epoch = Epoch::from_ymd_hms(2026, 10, 19, 12, 0, 0).unwrap();
        assert_eq!(epoch.calendar_year, 2026);
        assert_eq!(epoch.year, 26);
        assert_eq!(epoch.day, 292.5);
        assert_eq!(epoch.format_tle(), "26292.50000000");
    }

    #[test]
    fn test_epoch_start_of_year_is_day_one() {
        let epoch = Epoch::from_ymd_hms(2030, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(epoch.format_tle(), "30001.00000000");
    }

    #[test]
    fn test_epoch_fraction_of_day() {
        // 18:00:00 = 0.75 day
        let epoch = Epoch::from_ymd_hms(2024, 2, 1, 18, 0, 0).unwrap();
        assert_eq!(epoch.day, 32.75);

        // 06:30:36 = 0.27125 day
        let epoch = Epoch::from_ymd_hms(2024, 2, 1, 6, 30, 36).unwrap();
        assert!((epoch.day - 32.27125).abs() < 1e-12);
        assert_eq!(epoch.format_tle(), "24032.27125000");
    }

    #[test]
    fn test_epoch_ignores_subsecond() {
        let dt = Utc.with_ymd_and_hms(2025, 3, 3, 0, 0, 1).unwrap()
            + chrono::Duration::milliseconds(900);
        let epoch = Epoch::from_datetime(dt);
        assert!((epoch.day - (62.0 + 1.0 / 86400.0)).abs() < 1e-12);
    }
}
