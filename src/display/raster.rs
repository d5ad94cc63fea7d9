/*
 *  display/raster.rs
 *
 *  glcd64 - 64x64 graphic LCD demo
 *  (c) 2020-26 Stuart Hunter
 *
 *  Filled circle rasterizer
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

use serde::{Deserialize, Serialize};

use crate::display::error::DisplayError;
use crate::display::framebuffer::{Framebuffer, HEIGHT, WIDTH};

/// Disc parameters, in panel pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circle {
    pub x: u8,
    pub y: u8,
    pub radius: u8,
}

impl Default for Circle {
    fn default() -> Self {
        Self { x: 30, y: 30, radius: 30 }
    }
}

impl Circle {
    /// Inclusive pixel span on one axis, None for an empty disc
    ///
    /// Offsets run over [-r, r) and -r itself never passes the strict
    /// distance test, so the span is [c - r + 1, c + r - 1].
    fn span(center: u8, radius: u8) -> Option<(i32, i32)> {
        if radius == 0 {
            return None;
        }
        let (c, r) = (center as i32, radius as i32);
        Some((c - r + 1, c + r - 1))
    }

    /// Whether every pixel of the disc lands on the panel
    pub fn fits(&self) -> bool {
        let on_axis = |center, limit: u32| match Self::span(center, self.radius) {
            Some((lo, hi)) => lo >= 0 && hi < limit as i32,
            None => true,
        };
        on_axis(self.x, WIDTH) && on_axis(self.y, HEIGHT)
    }
}

/// Fill a disc into the framebuffer
///
/// Sets (cx+i, cy+j) for every i, j in [-r, r) with i² + j² < r². Keep the
/// half-open range and the strict comparison: existing screens depend on
/// the exact boundary pixels. Nothing is drawn unless the whole disc fits.
pub fn fill_circle(fb: &mut Framebuffer, cx: u8, cy: u8, radius: u8) -> Result<(), DisplayError> {
    let circle = Circle { x: cx, y: cy, radius };
    if !circle.fits() {
        return Err(DisplayError::ShapeOutOfBounds { cx, cy, radius });
    }

    let r = radius as i32;
    let r2 = r * r;
    for i in -r..r {
        for j in -r..r {
            if i * i + j * j < r2 {
                fb.set_pixel((cx as i32 + i) as u32, (cy as i32 + j) as u32)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_pixels(fb: &Framebuffer) -> Vec<(u32, u32)> {
        let mut out = Vec::new();
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                if fb.is_set(x, y).unwrap() {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn test_radius_zero_draws_nothing() {
        let mut fb = Framebuffer::new();
        fill_circle(&mut fb, 30, 30, 0).unwrap();
        assert_eq!(fb.count_on_pixels(), 0);
    }

    #[test]
    fn test_radius_one_is_centre_only() {
        let mut fb = Framebuffer::new();
        fill_circle(&mut fb, 30, 30, 1).unwrap();
        assert_eq!(on_pixels(&fb), vec![(30, 30)]);
    }

    #[test]
    fn test_radius_two_block() {
        let mut fb = Framebuffer::new();
        fill_circle(&mut fb, 30, 30, 2).unwrap();
        // -2 never passes i² + j² < 4, leaving the 3x3 block
        let mut expected = Vec::new();
        for y in 29..=31 {
            for x in 29..=31 {
                expected.push((x, y));
            }
        }
        assert_eq!(on_pixels(&fb), expected);
    }

    #[test]
    fn test_demo_circle_extent() {
        let mut fb = Framebuffer::new();
        fill_circle(&mut fb, 30, 30, 30).unwrap();

        assert!(fb.is_set(30, 30).unwrap());
        assert!(fb.is_set(1, 30).unwrap());
        assert!(fb.is_set(59, 30).unwrap());
        assert!(fb.is_set(30, 1).unwrap());
        assert!(!fb.is_set(0, 30).unwrap());
        assert!(!fb.is_set(60, 30).unwrap());
        assert!(!fb.is_set(1, 1).unwrap());
    }

    #[test]
    fn test_out_of_bounds_circle_rejected() {
        let mut fb = Framebuffer::new();
        assert_eq!(
            fill_circle(&mut fb, 60, 30, 10),
            Err(DisplayError::ShapeOutOfBounds { cx: 60, cy: 30, radius: 10 })
        );
        assert!(fill_circle(&mut fb, 5, 5, 7).is_err());
        assert_eq!(fb.count_on_pixels(), 0);

        // touching both edges is fine
        fill_circle(&mut fb, 32, 32, 32).unwrap();
        assert!(fb.is_set(1, 32).unwrap());
        assert!(fb.is_set(63, 32).unwrap());
    }

    #[test]
    fn test_large_radius_does_not_overflow() {
        let circle = Circle { x: 200, y: 200, radius: 200 };
        assert!(!circle.fits());
        let mut fb = Framebuffer::new();
        assert!(fill_circle(&mut fb, 200, 200, 200).is_err());
    }
}
