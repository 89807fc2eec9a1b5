//! Watchface configuration and user display settings
//!
//! [`WatchfaceConfig`] carries the fixed tuning constants (chart range,
//! plotting cadence, staleness thresholds). [`DisplaySettings`] carries what
//! the user picks in the companion settings page and is updated from the
//! `{settingKey, value}` messages the companion sends.

use heapless::String;
use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

use crate::ui::components::graph::AxisRange;
use crate::ui::styling::rgb565_from_hex;
use embedded_graphics::pixelcolor::Rgb565;

/// Storage key of the persisted chart snapshot (FAT 8.3 name)
pub const SNAPSHOT_KEY: &str = "HRGRAPH.BIN";

/// Settings key for the theme accent colour
pub const THEME_ACCENT_COLOR_KEY: &str = "theme_accent_color";

/// Settings key for the weather temperature units
pub const WEATHER_TEMP_UNITS_KEY: &str = "weather_temperature_units";

/// Settings key for the clock display format
pub const CLOCK_DISPLAY_KEY: &str = "clock_display";

const MINUTE_MS: u64 = 60 * 1000;

/// Configuration errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid chart range (min: {min}, max: {max})")]
    InvalidRange { min: f32, max: f32 },
    #[error("Interval must be non-zero: {0}")]
    ZeroInterval(&'static str),
    #[error("History max age {max_age_ms} ms is shorter than plot interval {plot_interval_ms} ms")]
    MaxAgeBelowPlotInterval {
        max_age_ms: u64,
        plot_interval_ms: u64,
    },
    #[error("Invalid maximum heart rate")]
    InvalidMaxHeartRate,
    #[error("Unknown setting: {0}")]
    UnknownSetting(String<32>),
    #[error("Invalid value for setting {key}")]
    InvalidValue { key: &'static str },
}

/// Fixed watchface tuning
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct WatchfaceConfig {
    /// Initial chart lower bound (resting heart rate)
    pub graph_min_y: f32,
    /// Initial chart upper bound
    pub graph_max_y: f32,
    /// Minimum time between plotted readings
    pub plot_interval_ms: u64,
    /// Persisted history older than this is discarded at startup
    pub history_max_age_ms: u64,
    /// Live heart-rate text is cleared after this long without a reading
    pub heart_rate_stale_ms: u64,
    /// Cadence of the periodic tick
    pub update_interval_ms: u64,
    /// Weather is refreshed once the last report is this old
    pub weather_refresh_ms: u64,
    /// Maximum heart rate used to derive the zones
    pub max_heart_rate: f32,
}

impl Default for WatchfaceConfig {
    fn default() -> Self {
        Self {
            graph_min_y: 60.0,
            graph_max_y: 180.0,
            plot_interval_ms: 5 * MINUTE_MS,
            history_max_age_ms: 30 * MINUTE_MS,
            heart_rate_stale_ms: 5_000,
            update_interval_ms: 10_000,
            // Slightly off the 30 minute mark so it does not coincide with the
            // companion's 15 minute wake interval
            weather_refresh_ms: 25 * MINUTE_MS,
            max_heart_rate: 190.0,
        }
    }
}

impl WatchfaceConfig {
    /// Check the configuration is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        AxisRange::try_new(self.graph_min_y, self.graph_max_y).map_err(|_| {
            ConfigError::InvalidRange {
                min: self.graph_min_y,
                max: self.graph_max_y,
            }
        })?;

        if self.plot_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("plot_interval_ms"));
        }
        if self.heart_rate_stale_ms == 0 {
            return Err(ConfigError::ZeroInterval("heart_rate_stale_ms"));
        }
        if self.update_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("update_interval_ms"));
        }
        if self.history_max_age_ms < self.plot_interval_ms {
            return Err(ConfigError::MaxAgeBelowPlotInterval {
                max_age_ms: self.history_max_age_ms,
                plot_interval_ms: self.plot_interval_ms,
            });
        }
        if !self.max_heart_rate.is_finite() || self.max_heart_rate <= 0.0 {
            return Err(ConfigError::InvalidMaxHeartRate);
        }

        Ok(())
    }
}

/// Accent colours offered by the settings page
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccentColor {
    LightGray,
    Lavender,
    Violet,
    Purple,
    Cerulean,
    Blue,
    #[default]
    Cyan,
    Aqua,
    Mint,
    Yellow,
    Orange,
    Pink,
}

impl AccentColor {
    /// Every selectable colour, in settings page order
    pub const ALL: [AccentColor; 12] = [
        Self::LightGray,
        Self::Lavender,
        Self::Violet,
        Self::Purple,
        Self::Cerulean,
        Self::Blue,
        Self::Cyan,
        Self::Aqua,
        Self::Mint,
        Self::Yellow,
        Self::Orange,
        Self::Pink,
    ];

    /// The `0xRRGGBB` value the settings page stores
    pub const fn hex(self) -> u32 {
        match self {
            Self::LightGray => 0xA0A0A0,
            Self::Lavender => 0xBCD8F8,
            Self::Violet => 0xD828B8,
            Self::Purple => 0xBD4EFC,
            Self::Cerulean => 0x8080FF,
            Self::Blue => 0x3182DE,
            Self::Cyan => 0x14D3F5,
            Self::Aqua => 0x3BF7DE,
            Self::Mint => 0x5BE37D,
            Self::Yellow => 0xE4FA3C,
            Self::Orange => 0xFC6B3A,
            Self::Pink => 0xF83478,
        }
    }

    /// Display colour
    pub const fn rgb565(self) -> Rgb565 {
        rgb565_from_hex(self.hex())
    }

    /// Match a `#RRGGBB` string against the presets
    pub fn from_hex_str(value: &str) -> Option<Self> {
        let digits = value.strip_prefix('#')?;
        if digits.len() != 6 {
            return None;
        }
        let rgb = u32::from_str_radix(digits, 16).ok()?;
        Self::ALL.into_iter().find(|color| color.hex() == rgb)
    }
}

/// Units for the weather temperature
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemperatureUnits {
    #[default]
    Fahrenheit,
    Celsius,
}

impl TemperatureUnits {
    /// Parse the settings value (`f` or `c`)
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "f" | "F" => Some(Self::Fahrenheit),
            "c" | "C" => Some(Self::Celsius),
            _ => None,
        }
    }

    /// Short unit suffix
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Fahrenheit => "F",
            Self::Celsius => "C",
        }
    }
}

/// Hour display format
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockFormat {
    TwelveHour,
    #[default]
    TwentyFourHour,
}

impl ClockFormat {
    /// Parse the device preference (`12h` or `24h`)
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "12h" => Some(Self::TwelveHour),
            "24h" => Some(Self::TwentyFourHour),
            _ => None,
        }
    }
}

/// User-selected display settings
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplaySettings {
    pub accent: AccentColor,
    pub temperature_units: TemperatureUnits,
    pub clock_format: ClockFormat,
}

impl DisplaySettings {
    /// Apply a single setting change
    pub fn apply(&mut self, update: SettingsUpdate) {
        match update {
            SettingsUpdate::Accent(accent) => self.accent = accent,
            SettingsUpdate::TemperatureUnits(units) => self.temperature_units = units,
            SettingsUpdate::ClockFormat(format) => self.clock_format = format,
        }
    }
}

/// A single setting change received from the companion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsUpdate {
    Accent(AccentColor),
    TemperatureUnits(TemperatureUnits),
    ClockFormat(ClockFormat),
}

impl SettingsUpdate {
    /// Parse a `{settingKey, value}` message
    ///
    /// Some settings widgets store values wrapped in quotes; they are stripped
    /// before parsing.
    pub fn parse(key: &str, value: &str) -> Result<Self, ConfigError> {
        let value = value.trim().trim_matches('"');

        match key {
            THEME_ACCENT_COLOR_KEY => AccentColor::from_hex_str(value)
                .map(Self::Accent)
                .ok_or(ConfigError::InvalidValue {
                    key: THEME_ACCENT_COLOR_KEY,
                }),
            WEATHER_TEMP_UNITS_KEY => TemperatureUnits::parse(value)
                .map(Self::TemperatureUnits)
                .ok_or(ConfigError::InvalidValue {
                    key: WEATHER_TEMP_UNITS_KEY,
                }),
            CLOCK_DISPLAY_KEY => ClockFormat::parse(value)
                .map(Self::ClockFormat)
                .ok_or(ConfigError::InvalidValue {
                    key: CLOCK_DISPLAY_KEY,
                }),
            other => {
                let mut name = String::new();
                for c in other.chars() {
                    if name.push(c).is_err() {
                        break;
                    }
                }
                Err(ConfigError::UnknownSetting(name))
            }
        }
    }
}
