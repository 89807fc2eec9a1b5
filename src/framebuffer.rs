//! RAM framebuffer for the watch display with change tracking.
//!
//! Watchface drawing targets this buffer; afterwards only the rectangle that
//! actually changed is pushed to the panel. The buffer can also be inspected
//! pixel by pixel, which is how the chart rendering is tested on the host.

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::debug;

use crate::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};

const WIDTH: usize = DISPLAY_WIDTH_PX as usize;
const HEIGHT: usize = DISPLAY_HEIGHT_PX as usize;

/// Bounding box of pixels that have changed since the last flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ChangedArea {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl ChangedArea {
    fn at(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn include(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn rectangle(&self) -> Rectangle {
        Rectangle::new(
            Point::new(self.min_x as i32, self.min_y as i32),
            Size::new(
                (self.max_x - self.min_x + 1) as u32,
                (self.max_y - self.min_y + 1) as u32,
            ),
        )
    }
}

/// Heap-allocated `DrawTarget<Color = Rgb565>` covering the whole display.
pub struct FrameBuffer {
    pixels: Vec<Rgb565>,
    changed: Option<ChangedArea>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// Allocate a black framebuffer with nothing pending.
    pub fn new() -> Self {
        Self {
            pixels: vec![Rgb565::BLACK; WIDTH * HEIGHT],
            changed: None,
        }
    }

    /// Colour at a pixel, `None` outside the display.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb565> {
        if x < WIDTH && y < HEIGHT {
            Some(self.pixels[y * WIDTH + x])
        } else {
            None
        }
    }

    /// Area changed since the last flush, if any.
    pub fn pending_area(&self) -> Option<Rectangle> {
        self.changed.map(|area| area.rectangle())
    }

    #[inline]
    fn put(&mut self, x: usize, y: usize, color: Rgb565) {
        let idx = y * WIDTH + x;
        if self.pixels[idx] == color {
            return;
        }
        self.pixels[idx] = color;
        match &mut self.changed {
            Some(area) => area.include(x, y),
            None => self.changed = Some(ChangedArea::at(x, y)),
        }
    }

    /// Push the changed area to the panel in one transfer and reset tracking.
    pub fn flush<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(area) = self.changed.take() else {
            return Ok(());
        };

        let rect = area.rectangle();
        debug!(
            "Flushing {}x{} region at ({}, {})",
            rect.size.width, rect.size.height, area.min_x, area.min_y
        );

        let pixels = &self.pixels;
        let row_len = area.max_x - area.min_x + 1;
        let colors = (area.min_y..=area.max_y).flat_map(move |y| {
            let start = y * WIDTH + area.min_x;
            pixels[start..start + row_len].iter().copied()
        });

        display.fill_contiguous(&rect, colors)
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if coord.x >= 0 && coord.y >= 0 {
                let (x, y) = (coord.x as usize, coord.y as usize);
                if x < WIDTH && y < HEIGHT {
                    self.put(x, y, color);
                }
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };
        let x_start = (area.top_left.x.max(0) as usize).min(WIDTH);
        let y_start = (area.top_left.y.max(0) as usize).min(HEIGHT);
        let x_end = ((bottom_right.x + 1).max(0) as usize).min(WIDTH);
        let y_end = ((bottom_right.y + 1).max(0) as usize).min(HEIGHT);

        for y in y_start..y_end {
            for x in x_start..x_end {
                self.put(x, y, color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_clean() {
        let fb = FrameBuffer::new();
        assert_eq!(fb.pending_area(), None);
        assert_eq!(fb.pixel(0, 0), Some(Rgb565::BLACK));
        assert_eq!(fb.pixel(WIDTH, 0), None);
    }

    #[test]
    fn test_changed_area_tracks_writes() {
        let mut fb = FrameBuffer::new();
        fb.fill_solid(
            &Rectangle::new(Point::new(10, 20), Size::new(5, 3)),
            Rgb565::RED,
        )
        .unwrap();
        Pixel(Point::new(30, 40), Rgb565::GREEN).draw(&mut fb).unwrap();

        assert_eq!(fb.pixel(12, 21), Some(Rgb565::RED));
        assert_eq!(
            fb.pending_area(),
            Some(Rectangle::new(Point::new(10, 20), Size::new(21, 21)))
        );
    }

    #[test]
    fn test_same_color_is_not_a_change() {
        let mut fb = FrameBuffer::new();
        Pixel(Point::new(1, 1), Rgb565::BLACK).draw(&mut fb).unwrap();
        assert_eq!(fb.pending_area(), None);
    }

    #[test]
    fn test_flush_resets_tracking() {
        let mut fb = FrameBuffer::new();
        Pixel(Point::new(3, 4), Rgb565::BLUE).draw(&mut fb).unwrap();

        let mut panel = FrameBuffer::new();
        fb.flush(&mut panel).unwrap();

        assert_eq!(fb.pending_area(), None);
        assert_eq!(panel.pixel(3, 4), Some(Rgb565::BLUE));
    }

    #[test]
    fn test_off_screen_pixels_ignored() {
        let mut fb = FrameBuffer::new();
        Pixel(Point::new(-1, 5), Rgb565::RED).draw(&mut fb).unwrap();
        Pixel(Point::new(5, HEIGHT as i32), Rgb565::RED)
            .draw(&mut fb)
            .unwrap();
        assert_eq!(fb.pending_area(), None);
    }

    #[test]
    fn test_fill_clips_negative_origin() {
        let mut fb = FrameBuffer::new();
        fb.fill_solid(
            &Rectangle::new(Point::new(-4, -2), Size::new(10, 5)),
            Rgb565::RED,
        )
        .unwrap();

        assert_eq!(fb.pixel(5, 2), Some(Rgb565::RED));
        assert_eq!(fb.pixel(6, 2), Some(Rgb565::BLACK));
        assert_eq!(fb.pixel(5, 3), Some(Rgb565::BLACK));
        assert_eq!(
            fb.pending_area(),
            Some(Rectangle::new(Point::new(0, 0), Size::new(6, 3)))
        );
    }
}
