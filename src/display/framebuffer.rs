/*
 *  display/framebuffer.rs
 *
 *  glcd64 - 64x64 graphic LCD demo
 *  (c) 2020-26 Stuart Hunter
 *
 *  Packed 64x64 monochrome framebuffer
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use core::convert::Infallible;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::display::error::DisplayError;

/// Panel width in pixels
pub const WIDTH: u32 = 64;
/// Panel height in pixels
pub const HEIGHT: u32 = 64;

/// One bit per pixel, one u64 per row
///
/// Bit x of row y is pixel (x, y). The buffer is plain inline storage, so
/// the owner decides where it lives and nothing is allocated per frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    rows: [u64; HEIGHT as usize],
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framebuffer {
    pub const fn new() -> Self {
        Self { rows: [0; HEIGHT as usize] }
    }

    /// Clear every pixel
    pub fn clear(&mut self) {
        self.rows.fill(0);
    }

    /// Turn pixel (x, y) on; pixels are only ever cleared by clear()
    pub fn set_pixel(&mut self, x: u32, y: u32) -> Result<(), DisplayError> {
        Self::check(x, y)?;
        self.rows[y as usize] |= 1u64 << x;
        Ok(())
    }

    pub fn is_set(&self, x: u32, y: u32) -> Result<bool, DisplayError> {
        Self::check(x, y)?;
        Ok((self.rows[y as usize] >> x) & 1 == 1)
    }

    /// Raw row mask
    pub fn row(&self, y: u32) -> Option<u64> {
        self.rows.get(y as usize).copied()
    }

    /// Gather column x of rows band..band+7 into one byte
    ///
    /// Rows are shifted in top to bottom, so row `band` ends up in bit 7
    /// and row `band + 7` in bit 0.
    pub fn page_byte(&self, band: u32, x: u32) -> Result<u8, DisplayError> {
        let last = band.checked_add(7).ok_or(DisplayError::PixelOutOfRange { x, y: band })?;
        Self::check(x, last)?;
        let byte = self.rows[band as usize..band as usize + 8]
            .iter()
            .fold(0u8, |acc, row| (acc << 1) | ((row >> x) & 1) as u8);
        Ok(byte)
    }

    /// Number of pixels turned on
    pub fn count_on_pixels(&self) -> usize {
        self.rows.iter().map(|r| r.count_ones() as usize).sum()
    }

    #[inline]
    fn check(x: u32, y: u32) -> Result<(), DisplayError> {
        if x >= WIDTH || y >= HEIGHT {
            return Err(DisplayError::PixelOutOfRange { x, y });
        }
        Ok(())
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH, HEIGHT)
    }
}

impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    /// Off pixels clear the bit; points outside the panel are dropped
    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if p.x < 0 || p.y < 0 || p.x as u32 >= WIDTH || p.y as u32 >= HEIGHT {
                continue;
            }
            let mask = 1u64 << p.x;
            let row = &mut self.rows[p.y as usize];
            if c.is_on() {
                *row |= mask;
            } else {
                *row &= !mask;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.rows.fill(if color.is_on() { u64::MAX } else { 0 });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{Line, PrimitiveStyle};

    #[test]
    fn test_single_pixel_after_clear() {
        let mut fb = Framebuffer::new();
        for (x, y) in [(0, 0), (63, 0), (0, 63), (63, 63), (17, 42)] {
            fb.clear();
            fb.set_pixel(x, y).unwrap();
            for yy in 0..HEIGHT {
                for xx in 0..WIDTH {
                    assert_eq!(fb.is_set(xx, yy).unwrap(), (xx, yy) == (x, y));
                }
            }
        }
    }

    #[test]
    fn test_clear_idempotent() {
        let mut fb = Framebuffer::new();
        fb.set_pixel(5, 5).unwrap();
        fb.clear();
        let once = fb.clone();
        fb.clear();
        assert_eq!(fb, once);
        assert_eq!(fb.count_on_pixels(), 0);
    }

    #[test]
    fn test_set_pixel_is_or() {
        let mut fb = Framebuffer::new();
        fb.set_pixel(3, 1).unwrap();
        fb.set_pixel(4, 1).unwrap();
        fb.set_pixel(3, 1).unwrap();
        assert_eq!(fb.row(1), Some(0b11000));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut fb = Framebuffer::new();
        assert_eq!(fb.set_pixel(64, 0), Err(DisplayError::PixelOutOfRange { x: 64, y: 0 }));
        assert!(fb.set_pixel(0, 64).is_err());
        assert!(fb.is_set(100, 100).is_err());
        assert_eq!(fb.count_on_pixels(), 0);
    }

    #[test]
    fn test_page_byte_order() {
        let mut fb = Framebuffer::new();
        // top row of band 8 lands in the MSB
        fb.set_pixel(10, 8).unwrap();
        assert_eq!(fb.page_byte(8, 10).unwrap(), 0x80);

        fb.set_pixel(10, 15).unwrap();
        assert_eq!(fb.page_byte(8, 10).unwrap(), 0x81);
        assert_eq!(fb.page_byte(0, 10).unwrap(), 0x00);
        assert!(fb.page_byte(60, 0).is_err());
        assert_eq!(fb.page_byte(u32::MAX, 0), Err(DisplayError::PixelOutOfRange { x: 0, y: u32::MAX }));
        assert!(fb.page_byte(u32::MAX - 3, 0).is_err());
    }

    #[test]
    fn test_draw_target() {
        let mut fb = Framebuffer::new();
        Line::new(Point::new(0, 0), Point::new(70, 0))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut fb)
            .unwrap();
        assert_eq!(fb.row(0), Some(u64::MAX));
        assert_eq!(fb.row(64), None);

        Pixel(Point::new(2, 0), BinaryColor::Off).draw(&mut fb).unwrap();
        assert!(!fb.is_set(2, 0).unwrap());
        assert_eq!(fb.size(), Size::new(64, 64));
    }
}
