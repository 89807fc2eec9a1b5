//! Weather report shown on the stats panel
//!
//! The companion fetches the weather, encodes it with postcard and transfers it
//! to the device as a file. This module decodes that file, formats it for the
//! selected units and decides when the next refresh is due.

extern crate alloc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use heapless::String as FixedString;
use serde::{Deserialize, Serialize};

use crate::config::TemperatureUnits;

/// File name the companion transfers the report under
pub const WEATHER_FILE_NAME: &str = "WEATHER.BIN";

/// Longest summary line shown on the stats panel
pub const MAX_SUMMARY_LENGTH: usize = 32;

/// Current conditions at the wearer's location
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WeatherReport {
    /// Temperature in `units`
    pub temperature: f32,
    /// Units the companion fetched the temperature in
    pub units: TemperatureUnits,
    pub description: Option<String>,
    /// City (or the closest named region)
    pub location: Option<String>,
    /// Relative humidity, percent
    pub humidity: f32,
    pub precip_probability: Option<f32>,
    pub uv_index: Option<f32>,
    pub wind_speed: Option<f32>,
    pub wind_bearing: Option<f32>,
    /// When the companion fetched the report (ms since the Unix epoch)
    pub timestamp_ms: u64,
}

impl WeatherReport {
    /// Decode a transferred weather file
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes)
    }

    /// Encode for transfer
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        postcard::to_allocvec(self)
    }

    /// Temperature converted to `units`
    pub fn temperature_in(&self, units: TemperatureUnits) -> f32 {
        match (self.units, units) {
            (TemperatureUnits::Fahrenheit, TemperatureUnits::Celsius) => {
                (self.temperature - 32.0) * 5.0 / 9.0
            }
            (TemperatureUnits::Celsius, TemperatureUnits::Fahrenheit) => {
                self.temperature * 9.0 / 5.0 + 32.0
            }
            _ => self.temperature,
        }
    }

    /// One line summary, e.g. `72F Clear`
    ///
    /// Long descriptions are cut to fit.
    pub fn summary(&self, units: TemperatureUnits) -> FixedString<MAX_SUMMARY_LENGTH> {
        let mut out = FixedString::new();
        let _ = write!(out, "{:.0}{}", self.temperature_in(units), units.symbol());

        if let Some(description) = &self.description {
            if out.push(' ').is_err() {
                return out;
            }
            for c in description.chars() {
                if out.push(c).is_err() {
                    break;
                }
            }
        }
        out
    }
}

/// Decides when the companion should fetch a new report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherSchedule {
    pub refresh_interval_ms: u64,
}

impl WeatherSchedule {
    pub const fn new(refresh_interval_ms: u64) -> Self {
        Self {
            refresh_interval_ms,
        }
    }

    /// Refresh when there is no report yet, when the last one was fetched in
    /// other units, or once it is `refresh_interval_ms` old
    pub fn needs_refresh(
        &self,
        last_update_ms: Option<u64>,
        last_units: Option<TemperatureUnits>,
        current_units: TemperatureUnits,
        now_ms: u64,
    ) -> bool {
        let Some(last_update_ms) = last_update_ms else {
            return true;
        };
        if last_units != Some(current_units) {
            return true;
        }
        now_ms.saturating_sub(last_update_ms) >= self.refresh_interval_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    const MINUTE_MS: u64 = 60_000;

    fn report() -> WeatherReport {
        WeatherReport {
            temperature: 68.0,
            units: TemperatureUnits::Fahrenheit,
            description: Some("Partly Cloudy".to_string()),
            location: Some("Portland".to_string()),
            humidity: 54.0,
            precip_probability: Some(0.1),
            uv_index: Some(3.0),
            wind_speed: Some(4.5),
            wind_bearing: Some(270.0),
            timestamp_ms: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_file_round_trip() {
        let original = report();
        let bytes = original.to_bytes().unwrap();
        assert_eq!(WeatherReport::from_bytes(&bytes).unwrap(), original);
    }

    #[test]
    fn test_truncated_file_rejected() {
        let bytes = report().to_bytes().unwrap();
        assert!(WeatherReport::from_bytes(&bytes[..bytes.len() / 2]).is_err());
    }

    #[test]
    fn test_temperature_conversion() {
        let report = report();
        assert_eq!(report.temperature_in(TemperatureUnits::Fahrenheit), 68.0);
        assert!((report.temperature_in(TemperatureUnits::Celsius) - 20.0).abs() < 0.01);
    }

    #[test]
    fn test_summary() {
        let report = report();
        assert_eq!(
            report.summary(TemperatureUnits::Fahrenheit),
            "68F Partly Cloudy"
        );
        assert_eq!(report.summary(TemperatureUnits::Celsius), "20C Partly Cloudy");
    }

    #[test]
    fn test_summary_truncates_long_description() {
        let mut report = report();
        report.description = Some("Heavy Rain And Strong Winds Until Evening".to_string());
        let summary = report.summary(TemperatureUnits::Fahrenheit);
        assert_eq!(summary.len(), MAX_SUMMARY_LENGTH);
        assert!(summary.starts_with("68F Heavy Rain"));
    }

    #[test]
    fn test_summary_without_description() {
        let mut report = report();
        report.description = None;
        assert_eq!(report.summary(TemperatureUnits::Fahrenheit), "68F");
    }

    #[test]
    fn test_refresh_schedule() {
        let schedule = WeatherSchedule::new(25 * MINUTE_MS);
        let units = TemperatureUnits::Fahrenheit;

        assert!(schedule.needs_refresh(None, None, units, 0));
        assert!(!schedule.needs_refresh(Some(0), Some(units), units, 24 * MINUTE_MS));
        assert!(schedule.needs_refresh(Some(0), Some(units), units, 25 * MINUTE_MS));
    }

    #[test]
    fn test_refresh_on_units_change() {
        let schedule = WeatherSchedule::new(25 * MINUTE_MS);
        assert!(schedule.needs_refresh(
            Some(0),
            Some(TemperatureUnits::Fahrenheit),
            TemperatureUnits::Celsius,
            MINUTE_MS
        ));
    }
}
