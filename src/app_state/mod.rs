//! Watchface application state
//!
//! Everything the watchface remembers between events lives in
//! [`WatchfaceState`]. The platform layer turns sensor callbacks, taps, timer
//! ticks and companion messages into [`WatchEvent`]s and feeds them to
//! [`WatchfaceState::update`] one at a time.

mod screens;

pub use screens::*;

use core::fmt::Write;

use embedded_graphics::primitives::Rectangle;
use heapless::String;
use log::{debug, info, warn};

use crate::clock::{WallClock, format_time};
use crate::config::{ConfigError, DisplaySettings, SettingsUpdate, WatchfaceConfig};
use crate::metrics::HeartRateZones;
use crate::storage::{LoadOutcome, PersistenceGateway, SnapshotStore};
use crate::ui::components::graph::{GraphWidget, PlotThrottle};
use crate::ui::styling::Theme;
use crate::weather::{MAX_SUMMARY_LENGTH, WeatherReport};

/// Number of points on the heart-rate chart
pub const DEFAULT_GRAPH_SLOTS: usize = 24;

/// Text shown while there is no current heart rate
pub const NO_HEART_RATE_TEXT: &str = "--";

/// Largest heart rate the display text can show
const MAX_DISPLAY_BPM: f32 = 999.0;

/// Watchface state with the default chart size
pub type Watchface = WatchfaceState<DEFAULT_GRAPH_SLOTS>;

/// Input to [`WatchfaceState::update`]
#[derive(Debug, Clone, PartialEq)]
pub enum WatchEvent {
    /// Periodic timer
    Tick,
    /// Heart-rate sensor reading; `None` when the sensor has no value
    HeartRate(Option<f32>),
    HeartRateError,
    /// Tap anywhere on the watchface
    ScreenTapped,
    /// Tap on the stats panel
    StatsTapped,
    /// Setting changed in the companion
    Setting(SettingsUpdate),
    /// New weather file from the companion
    Weather(WeatherReport),
}

/// State of the watchface, with a heart-rate chart of `N` points
pub struct WatchfaceState<const N: usize> {
    config: WatchfaceConfig,
    zones: HeartRateZones,
    graph: GraphWidget<N>,
    throttle: PlotThrottle,
    settings: DisplaySettings,
    theme: Theme,
    screen: Screen,
    stats_panel: StatsPanel,
    heart_rate: Option<f32>,
    last_heart_rate_ms: Option<u64>,
    weather: Option<WeatherReport>,
}

impl<const N: usize> WatchfaceState<N> {
    /// Create the initial state with the chart drawn inside `graph_bounds`
    pub fn new(config: WatchfaceConfig, graph_bounds: Rectangle) -> Result<Self, ConfigError> {
        config.validate()?;

        let settings = DisplaySettings::default();
        let theme = Theme::with_accent(settings.accent);
        let graph = GraphWidget::new(graph_bounds, config.graph_min_y, config.graph_max_y)
            .with_palette(theme.chart)
            .with_background(theme.background);

        Ok(Self {
            config,
            zones: HeartRateZones::from_max(config.max_heart_rate),
            graph,
            throttle: PlotThrottle::new(config.plot_interval_ms),
            settings,
            theme,
            screen: Screen::default(),
            stats_panel: StatsPanel::default(),
            heart_rate: None,
            last_heart_rate_ms: None,
            weather: None,
        })
    }

    /// Apply whatever the persisted history provided
    pub fn restore(&mut self, outcome: LoadOutcome) {
        if let Some(settings) = outcome.settings() {
            self.apply_settings(settings);
        }

        let readings = outcome.readings();
        if !self.graph.set_readings(readings) {
            debug!("Starting with an empty chart ({:?})", outcome_name(&outcome));
            return;
        }

        if let Some(last) = readings.iter().rev().find_map(|r| r.timestamp_ms) {
            self.throttle.resume_from(last);
        }
        info!("Chart restored with {} readings", self.graph.series().len());
    }

    /// Load and apply the persisted history
    pub fn restore_from<S: SnapshotStore>(
        &mut self,
        gateway: &mut PersistenceGateway<S>,
        now_ms: u64,
    ) {
        let outcome = gateway.load(now_ms, self.config.history_max_age_ms);
        self.restore(outcome);
    }

    /// Save the chart and settings; failures are logged and otherwise ignored
    pub fn persist<S: SnapshotStore>(
        &self,
        gateway: &mut PersistenceGateway<S>,
        now_ms: u64,
    ) -> bool {
        match gateway.save(self.graph.series(), self.settings, now_ms) {
            Ok(()) => true,
            Err(e) => {
                warn!("History not saved: {}", e);
                false
            }
        }
    }

    /// Handle one event
    pub fn update(&mut self, event: WatchEvent, now_ms: u64) {
        match event {
            WatchEvent::Tick => {
                let fresh = self.last_heart_rate_ms.is_some_and(|last| {
                    now_ms.saturating_sub(last) < self.config.heart_rate_stale_ms
                });
                if !fresh {
                    self.zero_heart_rate();
                }
            }
            WatchEvent::HeartRate(Some(bpm)) if bpm.is_finite() && bpm > 0.0 => {
                self.last_heart_rate_ms = Some(now_ms);
                self.heart_rate = Some(bpm);

                if self.throttle.admit(now_ms) {
                    self.graph.push(self.zones.reading(bpm, now_ms));
                }
            }
            WatchEvent::HeartRate(_) | WatchEvent::HeartRateError => self.zero_heart_rate(),
            WatchEvent::ScreenTapped => {
                self.screen = self.screen.next();
                debug!("Screen: {:?}", self.screen);
            }
            WatchEvent::StatsTapped => {
                self.stats_panel = self.stats_panel.next();
                debug!("Stats panel: {:?}", self.stats_panel);
            }
            WatchEvent::Setting(update) => {
                let mut settings = self.settings;
                settings.apply(update);
                self.apply_settings(settings);
            }
            WatchEvent::Weather(report) => {
                debug!("Weather report from {}", report.timestamp_ms);
                self.weather = Some(report);
            }
        }
    }

    fn zero_heart_rate(&mut self) {
        self.heart_rate = None;
    }

    fn apply_settings(&mut self, settings: DisplaySettings) {
        if settings.accent != self.settings.accent {
            self.theme = Theme::with_accent(settings.accent);
        }
        self.settings = settings;
    }

    pub fn config(&self) -> &WatchfaceConfig {
        &self.config
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn stats_panel(&self) -> StatsPanel {
        self.stats_panel
    }

    /// Current heart rate, `None` once zeroed
    pub fn heart_rate(&self) -> Option<f32> {
        self.heart_rate
    }

    /// Heart rate as shown on screen
    pub fn heart_rate_text(&self) -> String<4> {
        let mut text = String::new();
        let _ = match self.heart_rate {
            Some(bpm) => write!(text, "{:.0}", bpm.clamp(0.0, MAX_DISPLAY_BPM)),
            None => write!(text, "{}", NO_HEART_RATE_TEXT),
        };
        text
    }

    /// Time in the selected hour format
    pub fn time_text(&self, time: WallClock) -> String<5> {
        format_time(time, self.settings.clock_format)
    }

    pub fn graph(&self) -> &GraphWidget<N> {
        &self.graph
    }

    /// Mutable chart access for drawing
    pub fn graph_mut(&mut self) -> &mut GraphWidget<N> {
        &mut self.graph
    }

    pub fn throttle(&self) -> &PlotThrottle {
        &self.throttle
    }

    pub fn settings(&self) -> DisplaySettings {
        self.settings
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn weather(&self) -> Option<&WeatherReport> {
        self.weather.as_ref()
    }

    /// Weather line in the selected units
    pub fn weather_text(&self) -> Option<String<MAX_SUMMARY_LENGTH>> {
        self.weather
            .as_ref()
            .map(|report| report.summary(self.settings.temperature_units))
    }
}

fn outcome_name(outcome: &LoadOutcome) -> &'static str {
    match outcome {
        LoadOutcome::Missing => "missing",
        LoadOutcome::Unreadable => "unreadable",
        LoadOutcome::Corrupt => "corrupt",
        LoadOutcome::Stale { .. } => "stale",
        LoadOutcome::Restored { .. } => "restored-empty",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AccentColor, ClockFormat, SNAPSHOT_KEY, TemperatureUnits};
    use crate::storage::MemoryStore;
    use crate::ui::components::graph::{Reading, ReadingTag};
    use alloc::string::ToString;
    use alloc::vec;
    use embedded_graphics::prelude::*;

    const MINUTE_MS: u64 = 60_000;
    const START_MS: u64 = 1_700_000_000_000;

    fn bounds() -> Rectangle {
        Rectangle::new(Point::new(40, 100), Size::new(240, 120))
    }

    fn state() -> WatchfaceState<6> {
        WatchfaceState::new(WatchfaceConfig::default(), bounds()).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = WatchfaceConfig {
            graph_min_y: 200.0,
            ..WatchfaceConfig::default()
        };
        assert!(WatchfaceState::<6>::new(config, bounds()).is_err());
    }

    #[test]
    fn test_initial_state() {
        let state = state();
        assert_eq!(state.screen(), Screen::Stats);
        assert_eq!(state.stats_panel(), StatsPanel::Weather);
        assert_eq!(state.heart_rate_text(), NO_HEART_RATE_TEXT);
        assert!(state.graph().series().is_empty());
        assert_eq!(state.graph().range().min, 60.0);
        assert_eq!(state.graph().range().max, 180.0);
    }

    #[test]
    fn test_taps_cycle_views() {
        let mut state = state();
        for _ in 0..3 {
            state.update(WatchEvent::ScreenTapped, START_MS);
        }
        assert_eq!(state.screen(), Screen::Sleep);
        state.update(WatchEvent::ScreenTapped, START_MS);
        assert_eq!(state.screen(), Screen::Stats);

        state.update(WatchEvent::StatsTapped, START_MS);
        assert_eq!(state.stats_panel(), StatsPanel::Glucose);
    }

    #[test]
    fn test_heart_rate_goes_stale() {
        let mut state = state();
        state.update(WatchEvent::HeartRate(Some(72.0)), START_MS);
        assert_eq!(state.heart_rate_text(), "72");

        state.update(WatchEvent::Tick, START_MS + 4_999);
        assert_eq!(state.heart_rate(), Some(72.0));

        state.update(WatchEvent::Tick, START_MS + 5_000);
        assert_eq!(state.heart_rate(), None);
        assert_eq!(state.heart_rate_text(), "--");
    }

    #[test]
    fn test_heart_rate_text_fits_display() {
        let mut state = state();
        state.update(WatchEvent::HeartRate(Some(12_345.0)), START_MS);
        assert_eq!(state.heart_rate_text(), "999");

        state.update(WatchEvent::HeartRate(Some(999.6)), START_MS);
        assert_eq!(state.heart_rate_text(), "999");

        state.update(WatchEvent::HeartRate(Some(187.4)), START_MS);
        assert_eq!(state.heart_rate_text(), "187");
    }

    #[test]
    fn test_outcome_names() {
        let restored = LoadOutcome::Restored {
            readings: vec![],
            settings: DisplaySettings::default(),
            age_ms: 0,
        };
        assert_eq!(outcome_name(&restored), "restored-empty");
        assert_eq!(outcome_name(&LoadOutcome::Missing), "missing");
        assert_eq!(outcome_name(&LoadOutcome::Corrupt), "corrupt");
    }

    #[test]
    fn test_tick_without_reading_zeroes() {
        let mut state = state();
        state.update(WatchEvent::Tick, START_MS);
        assert_eq!(state.heart_rate_text(), "--");
    }

    #[test]
    fn test_missing_or_failed_reading_zeroes() {
        let mut state = state();
        state.update(WatchEvent::HeartRate(Some(80.0)), START_MS);
        state.update(WatchEvent::HeartRate(None), START_MS + 1_000);
        assert_eq!(state.heart_rate(), None);

        state.update(WatchEvent::HeartRate(Some(80.0)), START_MS + 2_000);
        state.update(WatchEvent::HeartRate(Some(0.0)), START_MS + 3_000);
        assert_eq!(state.heart_rate(), None);

        state.update(WatchEvent::HeartRate(Some(80.0)), START_MS + 4_000);
        state.update(WatchEvent::HeartRateError, START_MS + 5_000);
        assert_eq!(state.heart_rate(), None);
    }

    #[test]
    fn test_plotting_is_throttled() {
        let mut state = state();
        state.update(WatchEvent::HeartRate(Some(70.0)), START_MS);
        state.update(WatchEvent::HeartRate(Some(75.0)), START_MS + MINUTE_MS);
        state.update(WatchEvent::HeartRate(Some(150.0)), START_MS + 5 * MINUTE_MS);

        let plotted: alloc::vec::Vec<f32> =
            state.graph().series().readings().map(|r| r.value).collect();
        assert_eq!(plotted, [70.0, 150.0]);
        // The live value still follows every reading
        assert_eq!(state.heart_rate(), Some(150.0));
    }

    #[test]
    fn test_plotted_readings_are_zone_tagged() {
        let mut state = state();
        state.update(WatchEvent::HeartRate(Some(170.0)), START_MS);

        let latest = state.graph().series().latest().unwrap();
        assert_eq!(latest.tag, Some(ReadingTag::Peak));
        assert_eq!(latest.timestamp_ms, Some(START_MS));
    }

    #[test]
    fn test_settings_update_theme() {
        let mut state = state();
        state.update(
            WatchEvent::Setting(SettingsUpdate::Accent(AccentColor::Orange)),
            START_MS,
        );
        state.update(
            WatchEvent::Setting(SettingsUpdate::ClockFormat(ClockFormat::TwelveHour)),
            START_MS,
        );

        assert_eq!(state.settings().accent, AccentColor::Orange);
        assert_eq!(state.theme().accent, AccentColor::Orange.rgb565());

        let time = WallClock::from_unix_ms(0, 13 * 3600);
        assert_eq!(state.time_text(time), "1:00");
    }

    #[test]
    fn test_weather_follows_units() {
        let mut state = state();
        assert_eq!(state.weather_text(), None);

        state.update(
            WatchEvent::Weather(WeatherReport {
                temperature: 50.0,
                units: TemperatureUnits::Fahrenheit,
                description: Some("Fog".to_string()),
                location: None,
                humidity: 90.0,
                precip_probability: None,
                uv_index: None,
                wind_speed: None,
                wind_bearing: None,
                timestamp_ms: START_MS,
            }),
            START_MS,
        );
        assert_eq!(state.weather_text().unwrap(), "50F Fog");

        state.update(
            WatchEvent::Setting(SettingsUpdate::TemperatureUnits(TemperatureUnits::Celsius)),
            START_MS,
        );
        assert_eq!(state.weather_text().unwrap(), "10C Fog");
    }

    #[test]
    fn test_restore_resumes_throttle() {
        let mut state = state();
        let last = START_MS - MINUTE_MS;
        state.restore(LoadOutcome::Restored {
            readings: vec![
                Reading::new(65.0).with_timestamp(last - 5 * MINUTE_MS),
                Reading::new(90.0).with_timestamp(last),
            ],
            settings: DisplaySettings {
                accent: AccentColor::Mint,
                ..DisplaySettings::default()
            },
            age_ms: MINUTE_MS,
        });

        assert_eq!(state.graph().series().len(), 2);
        assert_eq!(state.settings().accent, AccentColor::Mint);
        assert_eq!(state.throttle().last_plotted_ms(), Some(last));

        // Within the interval of the last restored point
        state.update(WatchEvent::HeartRate(Some(100.0)), START_MS);
        assert_eq!(state.graph().series().len(), 2);

        state.update(WatchEvent::HeartRate(Some(100.0)), last + 5 * MINUTE_MS);
        assert_eq!(state.graph().series().len(), 3);
    }

    #[test]
    fn test_stale_restore_keeps_settings_only() {
        let mut state = state();
        state.restore(LoadOutcome::Stale {
            settings: DisplaySettings {
                temperature_units: TemperatureUnits::Celsius,
                ..DisplaySettings::default()
            },
            age_ms: 4 * 60 * MINUTE_MS,
        });

        assert!(state.graph().series().is_empty());
        assert_eq!(state.settings().temperature_units, TemperatureUnits::Celsius);
        assert_eq!(state.throttle().last_plotted_ms(), None);
    }

    #[test]
    fn test_persist_then_restore() {
        let mut gateway = PersistenceGateway::new(MemoryStore::new(), SNAPSHOT_KEY);

        let mut before = state();
        before.update(WatchEvent::HeartRate(Some(70.0)), START_MS);
        before.update(WatchEvent::HeartRate(Some(120.0)), START_MS + 5 * MINUTE_MS);
        assert!(before.persist(&mut gateway, START_MS + 6 * MINUTE_MS));

        let mut after = state();
        after.restore_from(&mut gateway, START_MS + 10 * MINUTE_MS);
        assert_eq!(after.graph().series().to_vec(), before.graph().series().to_vec());

        // Past the max age the chart starts empty
        let mut late = state();
        late.restore_from(&mut gateway, START_MS + 6 * MINUTE_MS + 30 * MINUTE_MS);
        assert!(late.graph().series().is_empty());
    }
}
