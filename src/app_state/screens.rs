/// Full-screen views, cycled by tapping the watchface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Clock with the stats panel
    #[default]
    Stats,
    /// Blood glucose
    Glucose,
    /// Heart rate with the history chart
    HeartRate,
    Sleep,
}

impl Screen {
    pub const fn next(self) -> Self {
        match self {
            Self::Stats => Self::Glucose,
            Self::Glucose => Self::HeartRate,
            Self::HeartRate => Self::Sleep,
            Self::Sleep => Self::Stats,
        }
    }
}

/// Content of the small panel on the stats screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatsPanel {
    #[default]
    Weather,
    Glucose,
}

impl StatsPanel {
    pub const fn next(self) -> Self {
        match self {
            Self::Weather => Self::Glucose,
            Self::Glucose => Self::Weather,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_cycle_wraps() {
        let mut screen = Screen::default();
        let mut seen = [Screen::Stats; 4];
        for slot in seen.iter_mut() {
            *slot = screen;
            screen = screen.next();
        }
        assert_eq!(
            seen,
            [Screen::Stats, Screen::Glucose, Screen::HeartRate, Screen::Sleep]
        );
        assert_eq!(screen, Screen::Stats);
    }

    #[test]
    fn test_stats_panel_toggles() {
        assert_eq!(StatsPanel::Weather.next(), StatsPanel::Glucose);
        assert_eq!(StatsPanel::Glucose.next(), StatsPanel::Weather);
    }
}
