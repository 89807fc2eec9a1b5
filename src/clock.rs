//! Clock face text
//!
//! Converts a wall-clock time into the strings shown on the watchface: the
//! `HH:MM` time in the user's hour format, the seconds, the upper-case weekday
//! and the day of the month.

use core::fmt::Write;

use chrono::{DateTime, Datelike, FixedOffset, Offset, Timelike, Utc};
use heapless::String;

use crate::config::ClockFormat;

/// Day of the week
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Upper-case three letter abbreviation
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::Monday => "MON",
            Self::Tuesday => "TUE",
            Self::Wednesday => "WED",
            Self::Thursday => "THU",
            Self::Friday => "FRI",
            Self::Saturday => "SAT",
            Self::Sunday => "SUN",
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
            chrono::Weekday::Sun => Self::Sunday,
        }
    }
}

/// Broken-down local time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallClock {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub weekday: Weekday,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl WallClock {
    /// Break down milliseconds since the Unix epoch
    ///
    /// `utc_offset_s` shifts the result into local time; an offset outside
    /// +/-24h falls back to UTC. Timestamps chrono cannot represent map to the
    /// epoch.
    pub fn from_unix_ms(unix_ms: u64, utc_offset_s: i32) -> Self {
        let offset = FixedOffset::east_opt(utc_offset_s).unwrap_or_else(|| Utc.fix());
        let utc = i64::try_from(unix_ms)
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .unwrap_or_default();

        Self::from(utc.with_timezone(&offset))
    }
}

impl<Tz: chrono::TimeZone> From<DateTime<Tz>> for WallClock {
    fn from(time: DateTime<Tz>) -> Self {
        Self {
            year: time.year(),
            month: time.month() as u8,
            day: time.day() as u8,
            weekday: time.weekday().into(),
            hour: time.hour() as u8,
            minute: time.minute() as u8,
            second: time.second() as u8,
        }
    }
}

/// `H:MM` / `HH:MM` time text
///
/// 12-hour format shows 12 for midnight and noon and does not pad the hour.
pub fn format_time(time: WallClock, format: ClockFormat) -> String<5> {
    let mut out = String::new();
    let _ = match format {
        ClockFormat::TwelveHour => {
            let hour = match time.hour % 12 {
                0 => 12,
                h => h,
            };
            write!(out, "{}:{:02}", hour, time.minute)
        }
        ClockFormat::TwentyFourHour => write!(out, "{:02}:{:02}", time.hour, time.minute),
    };
    out
}

/// Zero-padded seconds
pub fn format_seconds(time: WallClock) -> String<2> {
    let mut out = String::new();
    let _ = write!(out, "{:02}", time.second);
    out
}

/// Upper-case weekday
pub fn format_weekday(time: WallClock) -> &'static str {
    time.weekday.abbreviation()
}

/// Day of month, unpadded
pub fn format_day_of_month(time: WallClock) -> String<2> {
    let mut out = String::new();
    let _ = write!(out, "{}", time.day);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u8, minute: u8, second: u8) -> WallClock {
        WallClock {
            year: 2024,
            month: 3,
            day: 7,
            weekday: Weekday::Thursday,
            hour,
            minute,
            second,
        }
    }

    #[test]
    fn test_twelve_hour_format() {
        assert_eq!(format_time(at(0, 5, 0), ClockFormat::TwelveHour), "12:05");
        assert_eq!(format_time(at(9, 30, 0), ClockFormat::TwelveHour), "9:30");
        assert_eq!(format_time(at(12, 0, 0), ClockFormat::TwelveHour), "12:00");
        assert_eq!(format_time(at(23, 59, 0), ClockFormat::TwelveHour), "11:59");
    }

    #[test]
    fn test_twenty_four_hour_format() {
        assert_eq!(format_time(at(0, 5, 0), ClockFormat::TwentyFourHour), "00:05");
        assert_eq!(format_time(at(9, 30, 0), ClockFormat::TwentyFourHour), "09:30");
        assert_eq!(format_time(at(23, 59, 0), ClockFormat::TwentyFourHour), "23:59");
    }

    #[test]
    fn test_seconds_and_date() {
        let time = at(10, 0, 7);
        assert_eq!(format_seconds(time), "07");
        assert_eq!(format_weekday(time), "THU");
        assert_eq!(format_day_of_month(time), "7");
    }

    #[test]
    fn test_from_unix_ms() {
        // 2024-03-07T13:45:30Z
        let time = WallClock::from_unix_ms(1_709_819_130_000, 0);
        assert_eq!((time.year, time.month, time.day), (2024, 3, 7));
        assert_eq!((time.hour, time.minute, time.second), (13, 45, 30));
        assert_eq!(time.weekday, Weekday::Thursday);
    }

    #[test]
    fn test_from_unix_ms_with_offset() {
        // One hour behind UTC crosses back into the previous day
        let time = WallClock::from_unix_ms(1_709_769_600_000, -3600);
        assert_eq!((time.month, time.day, time.hour), (3, 6, 23));
        assert_eq!(time.weekday, Weekday::Wednesday);
    }

    #[test]
    fn test_out_of_range_offset_uses_utc() {
        let time = WallClock::from_unix_ms(1_709_819_130_000, 90_000);
        assert_eq!((time.day, time.hour, time.minute), (7, 13, 45));
    }

    #[test]
    fn test_leap_day() {
        // 2024-02-29T23:59:59Z, then one second later
        let time = WallClock::from_unix_ms(1_709_251_199_000, 0);
        assert_eq!((time.month, time.day, time.weekday), (2, 29, Weekday::Thursday));

        let next = WallClock::from_unix_ms(1_709_251_200_000, 0);
        assert_eq!((next.month, next.day, next.weekday), (3, 1, Weekday::Friday));
    }

    #[test]
    fn test_epoch() {
        let time = WallClock::from_unix_ms(0, 0);
        assert_eq!((time.year, time.month, time.day), (1970, 1, 1));
        assert_eq!(time.weekday, Weekday::Thursday);
    }
}
