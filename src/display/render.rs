/*
 *  display/render.rs
 *
 *  glcd64 - 64x64 graphic LCD demo
 *  (c) 2020-26 Stuart Hunter
 *
 *  Framebuffer to panel flush
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

use embedded_hal::delay::DelayNs;

use crate::display::bus::ParallelBus;
use crate::display::error::DisplayError;
use crate::display::framebuffer::{Framebuffer, HEIGHT, WIDTH};
use crate::display::protocol::Ks0108;

/// Rows per controller page
pub const BAND_HEIGHT: u32 = 8;

/// Bytes pushed by one full render
pub const WRITES_PER_FRAME: usize = (WIDTH * HEIGHT / BAND_HEIGHT) as usize;

/// Mirror the bit order of a byte (bit 0 <-> bit 7, ...)
#[inline]
pub fn reverse_byte(value: u8) -> u8 {
    value.reverse_bits()
}

/// Push the whole framebuffer to the selected controller
///
/// Bands are gathered MSB = top row, then mirrored, so the byte on the wire
/// carries the top row of the band in D0 as the controller expects.
pub fn render<B, D>(fb: &Framebuffer, glcd: &mut Ks0108<B, D>) -> Result<(), DisplayError>
where
    B: ParallelBus,
    D: DelayNs,
{
    for band in (0..HEIGHT).step_by(BAND_HEIGHT as usize) {
        for x in 0..WIDTH {
            let byte = reverse_byte(fb.page_byte(band, x)?);
            glcd.print_cursor(x as u8, band as u8, byte)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::delay::NoopDelay;
    use crate::display::drivers::mock::{LatchKind, RecordingBus};
    use crate::display::protocol::{CMD_SET_COLUMN, CMD_SET_PAGE};
    use crate::display::raster::fill_circle;

    #[test]
    fn test_reverse_byte_known_values() {
        assert_eq!(reverse_byte(0x00), 0x00);
        assert_eq!(reverse_byte(0xFF), 0xFF);
        assert_eq!(reverse_byte(0x01), 0x80);
        assert_eq!(reverse_byte(0xA0), 0x05);
    }

    #[test]
    fn test_reverse_byte_involution() {
        for b in 0..=255u8 {
            assert_eq!(reverse_byte(reverse_byte(b)), b);
        }
    }

    #[test]
    fn test_render_write_pattern() {
        let bus = RecordingBus::new();
        let mut glcd = Ks0108::new(bus.clone(), NoopDelay);
        let mut fb = Framebuffer::new();
        fill_circle(&mut fb, 30, 30, 30).unwrap();

        render(&fb, &mut glcd).unwrap();

        let latched = bus.latched();
        assert_eq!(latched.len(), WRITES_PER_FRAME * 3);
        assert_eq!(bus.values(LatchKind::Data).len(), 512);

        for (n, chunk) in latched.chunks(3).enumerate() {
            let (page, column) = ((n / 64) as u8, (n % 64) as u8);
            assert_eq!(chunk[0].kind, LatchKind::Command);
            assert_eq!(chunk[0].value, CMD_SET_PAGE + page);
            assert_eq!(chunk[1].kind, LatchKind::Command);
            assert_eq!(chunk[1].value, CMD_SET_COLUMN + column);
            assert_eq!(chunk[2].kind, LatchKind::Data);
        }
    }

    #[test]
    fn test_render_puts_top_row_in_d0() {
        let bus = RecordingBus::new();
        let mut glcd = Ks0108::new(bus.clone(), NoopDelay);
        let mut fb = Framebuffer::new();
        fb.set_pixel(5, 16).unwrap();
        fb.set_pixel(5, 18).unwrap();

        render(&fb, &mut glcd).unwrap();

        let data = bus.values(LatchKind::Data);
        // band 16 is page 2
        assert_eq!(data[2 * 64 + 5], 0b0000_0101);
        assert_eq!(data.iter().filter(|&&b| b != 0).count(), 1);
    }
}
