//! Styling system for the watchface
//!
//! - [`colors`] - Color constants (base, text and heart-rate zones)
//! - [`theme`] - Theme combining the constants with the selected accent

pub mod colors;
pub mod theme;

pub use colors::{
    COLOR_BACKGROUND, COLOR_CARDIO, COLOR_FAT_BURN, COLOR_FOREGROUND, COLOR_OUT_OF_ZONE,
    COLOR_PEAK, DARK_GRAY, LIGHT_GRAY, WHITE, rgb565_from_hex,
};
pub use theme::Theme;
