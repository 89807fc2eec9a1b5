//! Core UI traits and types for the watchface

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Watch display width in pixels
pub const DISPLAY_WIDTH_PX: u16 = 336;

/// Watch display height in pixels
pub const DISPLAY_HEIGHT_PX: u16 = 336;

/// Trait for any UI element that can be drawn
pub trait Drawable {
    /// Draw the element to the display within its bounds
    fn draw<D: DrawTarget<Color = embedded_graphics::pixelcolor::Rgb565>>(
        &self,
        display: &mut D,
    ) -> Result<(), D::Error>;

    /// Get the bounds of this drawable element
    ///
    /// Every pixel `draw` touches lies inside this rectangle.
    fn bounds(&self) -> Rectangle;

    /// Check if this element needs to be redrawn
    fn is_dirty(&self) -> bool;

    /// Mark this element as clean (already drawn)
    fn mark_clean(&mut self);

    /// Mark this element as dirty (needs redraw)
    fn mark_dirty(&mut self);
}
