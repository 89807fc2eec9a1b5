//! Desktop simulator for the pulse-rs watchface.
//!
//! Renders the watchface in an SDL2 window via `embedded-graphics-simulator`,
//! feeds it a synthetic heart rate and keeps the chart history in a file so it
//! survives restarts the same way it does on the watch.
//!
//! Simulated time runs faster than wall time so chart points (one per plot
//! interval) show up within seconds.
//!
//! # Key bindings
//!
//! | Key   | Action                         |
//! |-------|--------------------------------|
//! | Space | Tap the watchface (next view)  |
//! | S     | Tap the stats panel            |
//! | A     | Next accent colour             |
//! | U     | Toggle temperature units       |
//! | H     | Toggle 12h / 24h clock         |
//! | E     | Heart-rate sensor error        |
//! | C     | Clear the chart                |
//! | Q     | Save and quit                  |
//!
//! Mouse clicks are treated as taps on the watchface.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_10X20};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Alignment, Text};
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use log::{error, info, warn};

use pulse_rs::app_state::{Screen, StatsPanel, WatchEvent, Watchface};
use pulse_rs::clock::{WallClock, format_day_of_month, format_seconds, format_weekday};
use pulse_rs::config::{
    AccentColor, CLOCK_DISPLAY_KEY, ClockFormat, SNAPSHOT_KEY, SettingsUpdate,
    THEME_ACCENT_COLOR_KEY, TemperatureUnits, WEATHER_TEMP_UNITS_KEY, WatchfaceConfig,
};
use pulse_rs::framebuffer::FrameBuffer;
use pulse_rs::storage::{PersistenceGateway, SnapshotStore};
use pulse_rs::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX, Drawable};
use pulse_rs::weather::{WeatherReport, WeatherSchedule};

// ---------------------------------------------------------------------------
// Simulator constants
// ---------------------------------------------------------------------------

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 2;

/// Target frame duration (~30 FPS).
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Interval between synthetic heart-rate readings (wall time).
const SENSOR_INTERVAL: Duration = Duration::from_secs(1);

/// Simulated seconds per wall-clock second.
const TIME_SCALE: u64 = 60;

/// Directory holding the persisted chart.
const DATA_DIR: &str = "sim-data";

// ---------------------------------------------------------------------------
// File-backed snapshot store
// ---------------------------------------------------------------------------

/// Stores each record as a file named after its key.
struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SnapshotStore for FileStore {
    type Error = io::Error;

    fn read(&mut self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        match fs::read(self.dir.join(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), Self::Error> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(key), bytes)
    }
}

// ---------------------------------------------------------------------------
// Mock data generation
// ---------------------------------------------------------------------------

/// Accelerated wall clock.
struct SimClock {
    start_ms: u64,
    started: Instant,
}

impl SimClock {
    fn new() -> Self {
        let start_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        Self {
            start_ms,
            started: Instant::now(),
        }
    }

    fn now_ms(&self) -> u64 {
        self.start_ms + self.started.elapsed().as_millis() as u64 * TIME_SCALE
    }
}

/// Heart rate drifting between rest and a workout.
fn synthetic_heart_rate(now_ms: u64) -> f32 {
    let t = (now_ms / 1000) as f64;
    let bpm = 110.0 + 50.0 * (t / 1800.0).sin() + 6.0 * (t / 47.0).cos();
    bpm as f32
}

/// Stand-in for the companion's weather fetch.
fn mock_weather(now_ms: u64, units: TemperatureUnits) -> WeatherReport {
    let t = (now_ms / 1000) as f64;
    let fahrenheit = 61.0 + 8.0 * (t / 7200.0).sin();
    let temperature = match units {
        TemperatureUnits::Fahrenheit => fahrenheit,
        TemperatureUnits::Celsius => (fahrenheit - 32.0) * 5.0 / 9.0,
    };

    WeatherReport {
        temperature: temperature as f32,
        units,
        description: Some("Partly Cloudy".to_string()),
        location: Some("Simulator".to_string()),
        humidity: 64.0,
        precip_probability: Some(0.2),
        uv_index: Some(2.0),
        wind_speed: Some(6.0),
        wind_bearing: Some(225.0),
        timestamp_ms: now_ms,
    }
}

// ---------------------------------------------------------------------------
// Companion messages
// ---------------------------------------------------------------------------

/// Encode a setting the way the companion sends it and parse it back.
fn companion_setting(key: &str, value: &str) -> Option<WatchEvent> {
    match SettingsUpdate::parse(key, value) {
        Ok(update) => Some(WatchEvent::Setting(update)),
        Err(e) => {
            warn!("Ignoring setting {}: {}", key, e);
            None
        }
    }
}

fn next_accent(current: AccentColor) -> AccentColor {
    let index = AccentColor::ALL
        .iter()
        .position(|c| *c == current)
        .unwrap_or(0);
    AccentColor::ALL[(index + 1) % AccentColor::ALL.len()]
}

fn key_to_event(keycode: Keycode, state: &Watchface) -> Option<WatchEvent> {
    let settings = state.settings();
    match keycode {
        Keycode::Space => Some(WatchEvent::ScreenTapped),
        Keycode::S => Some(WatchEvent::StatsTapped),
        Keycode::E => Some(WatchEvent::HeartRateError),
        Keycode::A => {
            // The settings page stores colours quoted
            let accent = next_accent(settings.accent);
            let value = format!("\"#{:06X}\"", accent.hex());
            companion_setting(THEME_ACCENT_COLOR_KEY, &value)
        }
        Keycode::U => {
            let value = match settings.temperature_units {
                TemperatureUnits::Fahrenheit => "c",
                TemperatureUnits::Celsius => "f",
            };
            companion_setting(WEATHER_TEMP_UNITS_KEY, value)
        }
        Keycode::H => {
            let value = match settings.clock_format {
                ClockFormat::TwelveHour => "24h",
                ClockFormat::TwentyFourHour => "12h",
            };
            companion_setting(CLOCK_DISPLAY_KEY, value)
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn graph_bounds() -> Rectangle {
    Rectangle::new(Point::new(60, 170), Size::new(240, 110))
}

fn draw_face<D>(state: &Watchface, now_ms: u64, display: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let theme = state.theme();
    let center_x = DISPLAY_WIDTH_PX as i32 / 2;
    let large = MonoTextStyle::new(&FONT_10X20, theme.text_primary);
    let small = MonoTextStyle::new(&FONT_6X10, theme.text_secondary);
    let accent = MonoTextStyle::new(&FONT_10X20, theme.accent);

    display.clear(theme.background)?;

    let time = WallClock::from_unix_ms(now_ms, 0);
    Text::with_alignment(
        state.time_text(time).as_str(),
        Point::new(center_x, 60),
        large,
        Alignment::Center,
    )
    .draw(display)?;
    Text::with_alignment(
        format_seconds(time).as_str(),
        Point::new(center_x + 50, 60),
        small,
        Alignment::Left,
    )
    .draw(display)?;

    let date = format!("{} {}", format_weekday(time), format_day_of_month(time));
    Text::with_alignment(&date, Point::new(center_x, 80), small, Alignment::Center)
        .draw(display)?;

    let heart_rate = format!("{} BPM", state.heart_rate_text());
    Text::with_alignment(
        &heart_rate,
        Point::new(center_x, 120),
        accent,
        Alignment::Center,
    )
    .draw(display)?;

    match state.screen() {
        Screen::Stats => {
            let panel = match state.stats_panel() {
                StatsPanel::Weather => state
                    .weather_text()
                    .map(|text| text.as_str().to_string())
                    .unwrap_or_else(|| "No weather".to_string()),
                StatsPanel::Glucose => "Glucose --".to_string(),
            };
            Text::with_alignment(&panel, Point::new(center_x, 200), small, Alignment::Center)
                .draw(display)?;
        }
        Screen::Glucose => {
            Text::with_alignment("Glucose", Point::new(center_x, 200), small, Alignment::Center)
                .draw(display)?;
        }
        Screen::HeartRate => state.graph().draw(display)?,
        Screen::Sleep => {
            Text::with_alignment("Sleep", Point::new(center_x, 200), small, Alignment::Center)
                .draw(display)?;
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    info!("Starting pulse-rs simulator");
    info!(
        "Display: {}×{} (scale {}×), time ×{}",
        DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX, WINDOW_SCALE, TIME_SCALE
    );
    info!("Keys: Space=Tap  S=Stats  A=Accent  U=Units  H=12/24h  E=HR error  C=Clear  Q=Quit");

    let config = WatchfaceConfig::default();
    let mut state = match Watchface::new(config, graph_bounds()) {
        Ok(state) => state,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    let clock = SimClock::new();
    let mut gateway = PersistenceGateway::new(FileStore::new(DATA_DIR), SNAPSHOT_KEY);
    state.restore_from(&mut gateway, clock.now_ms());

    let weather_schedule = WeatherSchedule::new(config.weather_refresh_ms);

    // SDL2 display and window
    let mut display = SimulatorDisplay::<Rgb565>::new(Size::new(
        DISPLAY_WIDTH_PX as u32,
        DISPLAY_HEIGHT_PX as u32,
    ));

    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("Pulse Simulator", &output_settings);

    // Timing
    let mut last_sample = Instant::now();
    let mut last_tick_ms = clock.now_ms();

    // Frames are composed in RAM; only the changed area reaches the window
    let mut frame = Box::new(FrameBuffer::new());

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    let _ = draw_face(&state, clock.now_ms(), frame.as_mut());
    let _ = frame.flush(&mut display);
    window.update(&display);

    // -----------------------------------------------------------------------
    // Main loop
    // -----------------------------------------------------------------------
    'running: loop {
        let frame_start = Instant::now();
        let now_ms = clock.now_ms();

        // --- SDL events ---------------------------------------------------
        let mut events = Vec::new();
        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,

                SimulatorEvent::KeyDown { keycode, .. } => {
                    if keycode == Keycode::Q || keycode == Keycode::Escape {
                        break 'running;
                    }
                    if keycode == Keycode::C {
                        info!("Clearing chart");
                        state.graph_mut().clear();
                    } else if let Some(event) = key_to_event(keycode, &state) {
                        events.push(event);
                    }
                }

                SimulatorEvent::MouseButtonDown { .. } => events.push(WatchEvent::ScreenTapped),

                _ => {}
            }
        }
        for event in events {
            state.update(event, now_ms);
        }

        // --- Mock sensor --------------------------------------------------
        if last_sample.elapsed() >= SENSOR_INTERVAL {
            state.update(
                WatchEvent::HeartRate(Some(synthetic_heart_rate(now_ms))),
                now_ms,
            );
            last_sample = Instant::now();
        }

        // --- Periodic update ----------------------------------------------
        if now_ms.saturating_sub(last_tick_ms) >= config.update_interval_ms {
            state.update(WatchEvent::Tick, now_ms);
            last_tick_ms = now_ms;
        }

        // --- Mock companion weather ---------------------------------------
        let units = state.settings().temperature_units;
        let last_report = state.weather().map(|w| (w.timestamp_ms, w.units));
        if weather_schedule.needs_refresh(
            last_report.map(|(ts, _)| ts),
            last_report.map(|(_, units)| units),
            units,
            now_ms,
        ) {
            // Round-trip through the transfer encoding
            match mock_weather(now_ms, units)
                .to_bytes()
                .and_then(|bytes| WeatherReport::from_bytes(&bytes))
            {
                Ok(report) => state.update(WatchEvent::Weather(report), now_ms),
                Err(e) => warn!("Weather transfer failed: {}", e),
            }
        }

        // --- Render -------------------------------------------------------
        if let Err(e) = draw_face(&state, now_ms, frame.as_mut()) {
            error!("Draw error: {:?}", e);
        }
        state.graph_mut().mark_clean();

        if frame.pending_area().is_some() {
            let _ = frame.flush(&mut display);
            window.update(&display);
        }

        // --- Frame pacing -------------------------------------------------
        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }

    state.persist(&mut gateway, clock.now_ms());
    info!("Simulator exiting");
}
