/*
 *  display/bus.rs
 *
 *  glcd64 - 64x64 graphic LCD demo
 *  (c) 2020-26 Stuart Hunter
 *
 *  Parallel bus abstraction for KS0108-class controllers
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

use crate::display::error::DisplayError;

/// Logic level of every control line at one instant
///
/// `true` means the line is driven high. RST is active low on the panel,
/// so `rst: true` releases the controllers from reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlLines {
    /// Register select: low = command, high = data
    pub rs: bool,

    /// Read/write: low = write
    pub rw: bool,

    /// Enable, latches the data bus on the falling edge
    pub en: bool,

    /// Reset (active low)
    pub rst: bool,

    /// Chip select for the first controller
    pub cs1: bool,

    /// Chip select for the second controller
    pub cs2: bool,
}

impl ControlLines {
    /// Everything driven low
    pub const IDLE: ControlLines = ControlLines {
        rs: false,
        rw: false,
        en: false,
        rst: false,
        cs1: false,
        cs2: false,
    };
}

/// Minimal hardware seam - every panel backend implements this trait
///
/// The protocol layer owns the sequencing; a bus only has to put the
/// requested levels on the wires.
pub trait ParallelBus {
    /// Prepare the pins for output (directions, exports)
    ///
    /// Backends whose pins are already outputs after construction keep the
    /// default no-op.
    fn configure(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    /// Drive all six control lines to the given levels
    fn write_control_lines(&mut self, lines: ControlLines) -> Result<(), DisplayError>;

    /// Drive the eight data lines, D0 = bit 0
    fn write_data_bus(&mut self, value: u8) -> Result<(), DisplayError>;
}
