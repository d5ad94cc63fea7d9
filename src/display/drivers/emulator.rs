/*
 *  display/drivers/emulator.rs
 *
 *  glcd64 - 64x64 graphic LCD demo
 *  (c) 2020-26 Stuart Hunter
 *
 *  Software model of a dual KS0108 panel
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

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info, trace};

use crate::display::bus::{ControlLines, ParallelBus};
use crate::display::cursor::{COLUMNS, PAGES};
use crate::display::error::DisplayError;

/// Full panel width (two controllers side by side)
pub const PANEL_WIDTH: u32 = 128;
/// Panel height
pub const PANEL_HEIGHT: u32 = 64;

/// One KS0108 controller: 8 pages x 64 columns of display RAM
#[derive(Debug, Clone)]
pub struct ControllerState {
    pub display_on: bool,
    pub page: u8,
    pub column: u8,
    pub start_line: u8,
    pub ram: [[u8; COLUMNS as usize]; PAGES as usize],
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            display_on: false,
            page: 0,
            column: 0,
            start_line: 0,
            ram: [[0; COLUMNS as usize]; PAGES as usize],
        }
    }
}

impl ControllerState {
    fn command(&mut self, value: u8) {
        match value {
            0x3E | 0x3F => self.display_on = value & 1 == 1,
            0x40..=0x7F => self.column = value & 0x3F,
            0xB8..=0xBF => self.page = value & 0x07,
            0xC0..=0xFF => self.start_line = value & 0x3F,
            other => trace!("emulator: ignoring command 0x{:02X}", other),
        }
    }

    fn data(&mut self, value: u8) {
        self.ram[self.page as usize][self.column as usize] = value;
        // Y address auto-increments after every data write
        self.column = (self.column + 1) % COLUMNS;
    }

    fn reset(&mut self) {
        self.display_on = false;
        self.start_line = 0;
    }

    /// Visible pixel at (x, y) within this controller's half
    fn pixel(&self, x: u32, y: u32) -> bool {
        if !self.display_on {
            return false;
        }
        let line = (y + self.start_line as u32) % PANEL_HEIGHT;
        let byte = self.ram[(line / 8) as usize][x as usize];
        (byte >> (line % 8)) & 1 == 1
    }
}

/// Shared emulator state (for inspection and image dumps)
#[derive(Debug, Default)]
pub struct EmulatorState {
    /// CS1 and CS2 controllers
    pub controllers: [ControllerState; 2],

    /// Control lines as last driven
    pub lines: ControlLines,

    /// Level last put on the data lines
    pub data_bus: u8,

    /// Latched command bytes
    pub command_count: u64,

    /// Latched data bytes
    pub data_count: u64,
}

/// Emulated panel
///
/// Decodes the bus the way the controllers do: a byte is taken on the
/// enable falling edge by every controller whose chip-select is high, and
/// ignored while RST is low. Clones share the same panel.
#[derive(Debug, Clone, Default)]
pub struct EmulatorBus {
    state: Arc<Mutex<EmulatorState>>,
}

impl EmulatorBus {
    pub fn new() -> Self {
        info!("Creating emulated {}x{} KS0108 panel", PANEL_WIDTH, PANEL_HEIGHT);
        Self::default()
    }

    pub fn state(&self) -> Arc<Mutex<EmulatorState>> {
        Arc::clone(&self.state)
    }

    /// Visible pixel on the full 128x64 panel
    pub fn pixel(&self, x: u32, y: u32) -> Option<bool> {
        if x >= PANEL_WIDTH || y >= PANEL_HEIGHT {
            return None;
        }
        let state = self.lock();
        let half = (x / COLUMNS as u32) as usize;
        Some(state.controllers[half].pixel(x % COLUMNS as u32, y))
    }

    /// Number of lit pixels on the whole panel
    pub fn count_on_pixels(&self) -> usize {
        (0..PANEL_HEIGHT)
            .flat_map(|y| (0..PANEL_WIDTH).map(move |x| (x, y)))
            .filter(|&(x, y)| self.pixel(x, y) == Some(true))
            .count()
    }

    /// Panel image as a plain PBM
    pub fn to_pbm(&self) -> String {
        let mut out = format!("P1\n{} {}\n", PANEL_WIDTH, PANEL_HEIGHT);
        for y in 0..PANEL_HEIGHT {
            let line: Vec<&str> = (0..PANEL_WIDTH)
                .map(|x| if self.pixel(x, y) == Some(true) { "1" } else { "0" })
                .collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        out
    }

    /// Save panel image to PBM file (for visual debugging)
    pub fn save_pbm(&self, path: &Path) -> Result<(), DisplayError> {
        fs::write(path, self.to_pbm())
            .map_err(|e| DisplayError::Other(format!("Failed to write {}: {}", path.display(), e)))?;
        info!("Panel image written to {}", path.display());
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, EmulatorState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ParallelBus for EmulatorBus {
    fn configure(&mut self) -> Result<(), DisplayError> {
        debug!("emulator: pins configured");
        Ok(())
    }

    fn write_control_lines(&mut self, lines: ControlLines) -> Result<(), DisplayError> {
        let mut state = self.lock();

        if !lines.rst {
            state.controllers.iter_mut().for_each(ControllerState::reset);
        } else if state.lines.en && !lines.en {
            let value = state.data_bus;
            let selected = [lines.cs1, lines.cs2];
            if lines.rs {
                state.data_count += 1;
            } else {
                state.command_count += 1;
            }
            for (controller, _) in state.controllers.iter_mut().zip(selected).filter(|(_, cs)| *cs) {
                if lines.rs {
                    controller.data(value);
                } else {
                    controller.command(value);
                }
            }
        }

        state.lines = lines;
        Ok(())
    }

    fn write_data_bus(&mut self, value: u8) -> Result<(), DisplayError> {
        self.lock().data_bus = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::delay::NoopDelay;
    use crate::display::protocol::{Half, Ks0108};

    fn ready_panel(half: Half) -> (Ks0108<EmulatorBus, NoopDelay>, EmulatorBus) {
        let bus = EmulatorBus::new();
        let mut glcd = Ks0108::new(bus.clone(), NoopDelay);
        glcd.initialize().unwrap();
        glcd.select_screen(half).unwrap();
        (glcd, bus)
    }

    #[test]
    fn test_writes_ignored_in_reset() {
        let bus = EmulatorBus::new();
        let mut glcd = Ks0108::new(bus.clone(), NoopDelay);
        glcd.initialize().unwrap();

        let state = bus.state();
        let state = state.lock().unwrap();
        assert_eq!(state.command_count, 0);
        assert!(!state.controllers[0].display_on);
    }

    #[test]
    fn test_select_screen_turns_half_on() {
        let (_glcd, bus) = ready_panel(Half::Right);
        let state = bus.state();
        let state = state.lock().unwrap();
        assert!(!state.controllers[0].display_on);
        assert!(state.controllers[1].display_on);
        assert_eq!(state.command_count, 5);
    }

    #[test]
    fn test_data_write_and_autoincrement() {
        let (mut glcd, bus) = ready_panel(Half::Left);
        glcd.set_cursor(1, 62).unwrap();
        glcd.send_data(0x01).unwrap();
        glcd.send_data(0x80).unwrap();
        glcd.send_data(0xFF).unwrap();

        // page 1 top row at column 62, bottom row at 63, wrap to column 0
        assert_eq!(bus.pixel(62, 8), Some(true));
        assert_eq!(bus.pixel(63, 15), Some(true));
        assert_eq!(bus.pixel(0, 12), Some(true));
        assert_eq!(bus.count_on_pixels(), 10);
        assert_eq!(bus.pixel(128, 0), None);
    }

    #[test]
    fn test_start_line_scrolls() {
        let (mut glcd, bus) = ready_panel(Half::Left);
        glcd.set_cursor(0, 0).unwrap();
        glcd.send_data(0x02).unwrap();
        assert_eq!(bus.pixel(0, 1), Some(true));

        glcd.send_command(0xC0 | 1).unwrap();
        assert_eq!(bus.pixel(0, 0), Some(true));
        assert_eq!(bus.pixel(0, 1), Some(false));
    }

    #[test]
    fn test_pbm_dimensions() {
        let bus = EmulatorBus::new();
        let pbm = bus.to_pbm();
        let mut lines = pbm.lines();
        assert_eq!(lines.next(), Some("P1"));
        assert_eq!(lines.next(), Some("128 64"));
        assert_eq!(lines.count(), 64);
    }
}
