/*
 *  display/cursor.rs
 *
 *  glcd64 - 64x64 graphic LCD demo
 *  (c) 2020-26 Stuart Hunter
 *
 *  Page/column addressing
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
use crate::display::protocol::{Ks0108, CMD_SET_COLUMN, CMD_SET_PAGE};

/// Pages per controller (8 rows each)
pub const PAGES: u8 = 8;
/// Columns per controller
pub const COLUMNS: u8 = 64;

/// Controller RAM address of one byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub page: u8,
    pub column: u8,
}

impl Cursor {
    /// Address holding pixel (x, y)
    pub fn from_pixel(x: u8, y: u8) -> Self {
        Self {
            page: y / 8,
            column: x % COLUMNS,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.page < PAGES && self.column < COLUMNS
    }
}

impl<B: ParallelBus, D: DelayNs> Ks0108<B, D> {
    /// Point the selected controller at (page, column)
    pub fn set_cursor(&mut self, page: u8, column: u8) -> Result<(), DisplayError> {
        let cursor = Cursor { page, column };
        if !cursor.is_valid() {
            return Err(DisplayError::CursorOutOfRange { page, column });
        }
        self.send_command(CMD_SET_PAGE + page)?;
        self.send_command(CMD_SET_COLUMN + column)
    }

    /// Write the byte covering column x of the band starting at row y
    pub fn print_cursor(&mut self, x: u8, y: u8, byte: u8) -> Result<(), DisplayError> {
        let cursor = Cursor::from_pixel(x, y);
        self.set_cursor(cursor.page, cursor.column)?;
        self.send_data(byte)
    }
}
