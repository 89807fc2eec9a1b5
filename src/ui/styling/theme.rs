//! Global theme management
//!
//! Combines the fixed watchface colours with the user-selected accent colour.

use embedded_graphics::pixelcolor::Rgb565;

use crate::config::AccentColor;
use crate::ui::components::graph::TagPalette;

use super::colors::{COLOR_BACKGROUND, LIGHT_GRAY, WHITE};

/// Global theme configuration
///
/// # Examples
///
/// ```ignore
/// let theme = Theme::with_accent(AccentColor::Cyan);
/// let color = theme.accent;
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    /// Accent colour chosen in the companion settings
    pub accent: Rgb565,
    /// Main background color
    pub background: Rgb565,
    /// Primary text color - high contrast
    pub text_primary: Rgb565,
    /// Secondary text color - lower contrast for labels
    pub text_secondary: Rgb565,
    /// Heart-rate chart colours
    pub chart: TagPalette,
}

impl Default for Theme {
    fn default() -> Self {
        Self::with_accent(AccentColor::default())
    }
}

impl Theme {
    /// Creates the theme for an accent colour
    pub fn with_accent(accent: AccentColor) -> Self {
        Self {
            accent: accent.rgb565(),
            background: COLOR_BACKGROUND,
            text_primary: WHITE,
            text_secondary: LIGHT_GRAY,
            chart: TagPalette::default(),
        }
    }
}
