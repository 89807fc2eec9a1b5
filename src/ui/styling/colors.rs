//! Color definitions and palette management
//!
//! This module provides the watchface colours in RGB565 format, optimized for
//! embedded displays with 16-bit color depth.
//!
//! # RGB565 Format
//! - Red: 5 bits (0-31)
//! - Green: 6 bits (0-63)
//! - Blue: 5 bits (0-31)
//!
//! To convert from 8-bit RGB: R>>3, G>>2, B>>3

use embedded_graphics::pixelcolor::Rgb565;

// ============================================================================
// Base Colors
// ============================================================================

/// Primary background color - black for OLED power savings
pub const COLOR_BACKGROUND: Rgb565 = Rgb565::new(0, 0, 0);

/// Secondary background/surface color
pub const COLOR_FOREGROUND: Rgb565 = Rgb565::new(26 >> 3, 32 >> 2, 33 >> 3);

/// Pure white - maximum brightness in RGB565
pub const WHITE: Rgb565 = Rgb565::new(31, 63, 31);

/// Light gray - for secondary text
pub const LIGHT_GRAY: Rgb565 = Rgb565::new(21, 42, 21);

/// Dark gray - for subtle text
pub const DARK_GRAY: Rgb565 = Rgb565::new(10, 20, 10);

// ============================================================================
// Heart-rate Zone Colors
// ============================================================================

/// Below the fat-burn zone - soft blue
pub const COLOR_OUT_OF_ZONE: Rgb565 = Rgb565::new(0x80 >> 3, 0xB0 >> 2, 0xE8 >> 3);

/// Fat-burn zone - yellow
pub const COLOR_FAT_BURN: Rgb565 = Rgb565::new(0xE4 >> 3, 0xFA >> 2, 0x3C >> 3);

/// Cardio zone - orange
pub const COLOR_CARDIO: Rgb565 = Rgb565::new(0xFC >> 3, 0x6B >> 2, 0x3A >> 3);

/// Peak zone - red
pub const COLOR_PEAK: Rgb565 = Rgb565::new(0xF8 >> 3, 0x34 >> 2, 0x34 >> 3);

/// Convert an 8-bit-per-channel `0xRRGGBB` value to RGB565
pub const fn rgb565_from_hex(rgb: u32) -> Rgb565 {
    let r = ((rgb >> 16) & 0xFF) as u8;
    let g = ((rgb >> 8) & 0xFF) as u8;
    let b = (rgb & 0xFF) as u8;
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}
