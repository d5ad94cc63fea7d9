/*
 *  display/protocol.rs
 *
 *  glcd64 - 64x64 graphic LCD demo
 *  (c) 2020-26 Stuart Hunter
 *
 *  KS0108 command/data protocol over the parallel bus
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
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use crate::display::bus::{ControlLines, ParallelBus};
use crate::display::error::DisplayError;

/// Display off
pub const CMD_DISPLAY_OFF: u8 = 0x3E;
/// Display on
pub const CMD_DISPLAY_ON: u8 = 0x3F;
/// Set column (Y address); OR in the column
pub const CMD_SET_COLUMN: u8 = 0x40;
/// Column command issued by the power-up sequence
pub const CMD_INIT_COLUMN: u8 = 0x42;
/// Set page (X address); add the page
pub const CMD_SET_PAGE: u8 = 0xB8;
/// Set display start line (Z address) to 0
pub const CMD_START_LINE: u8 = 0xC0;

/// Power-up sequence shared by initialize() and select_screen()
pub const DISPLAY_ON_SEQUENCE: [u8; 5] = [
    CMD_DISPLAY_OFF,
    CMD_INIT_COLUMN,
    CMD_SET_PAGE,
    CMD_START_LINE,
    CMD_DISPLAY_ON,
];

/// Settle time either side of the enable falling edge
pub const ENABLE_SETTLE_US: u32 = 5;
/// Wait after configuring pins and after the idle state
pub const POWER_SETTLE_MS: u32 = 20;
/// Wait after initialization before first use
pub const POST_INIT_MS: u32 = 2;

/// Which controller (half of the panel) receives writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Half {
    /// CS1
    #[default]
    Left,
    /// CS2
    Right,
}

/// Panel protocol driver
///
/// Keeps the current level of every control line so each step of a
/// transfer only changes what the controller expects to see change.
pub struct Ks0108<B, D> {
    bus: B,
    delay: D,
    lines: ControlLines,
}

impl<B: ParallelBus, D: DelayNs> Ks0108<B, D> {
    pub fn new(bus: B, delay: D) -> Self {
        Self {
            bus,
            delay,
            lines: ControlLines::IDLE,
        }
    }

    /// Control line levels as last driven
    pub fn lines(&self) -> ControlLines {
        self.lines
    }

    pub fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Configure pins, park the lines, then power the display on
    ///
    /// Every control line (RST included) is driven low before the
    /// power-up sequence; select_screen() releases reset afterwards.
    pub fn initialize(&mut self) -> Result<(), DisplayError> {
        info!("Initializing KS0108 panel");
        self.bus.configure()?;
        self.delay.delay_ms(POWER_SETTLE_MS);

        self.drive(ControlLines::IDLE)?;
        self.delay.delay_ms(POWER_SETTLE_MS);

        self.display_on_sequence()?;
        debug!("Panel initialization sequence sent");
        Ok(())
    }

    /// Route subsequent writes to one half of the panel and power it on
    pub fn select_screen(&mut self, half: Half) -> Result<(), DisplayError> {
        debug!("Selecting {:?} controller", half);
        self.drive(ControlLines {
            rs: true,
            rw: true,
            en: false,
            rst: true,
            cs1: half == Half::Left,
            cs2: half == Half::Right,
        })?;
        self.display_on_sequence()
    }

    /// Latch one byte into the instruction register
    pub fn send_command(&mut self, command: u8) -> Result<(), DisplayError> {
        trace!("cmd 0x{:02X}", command);
        self.write_byte(false, command)
    }

    /// Latch one byte into display RAM at the current address
    pub fn send_data(&mut self, data: u8) -> Result<(), DisplayError> {
        trace!("data 0x{:02X}", data);
        self.write_byte(true, data)
    }

    fn display_on_sequence(&mut self) -> Result<(), DisplayError> {
        for command in DISPLAY_ON_SEQUENCE {
            self.send_command(command)?;
        }
        Ok(())
    }

    fn write_byte(&mut self, data_register: bool, value: u8) -> Result<(), DisplayError> {
        self.bus.write_data_bus(value)?;

        let mut lines = self.lines;
        lines.rs = data_register;
        self.drive(lines)?;
        lines.rw = false;
        self.drive(lines)?;

        lines.en = true;
        self.drive(lines)?;
        self.delay.delay_us(ENABLE_SETTLE_US);
        lines.en = false;
        self.drive(lines)?;
        self.delay.delay_us(ENABLE_SETTLE_US);
        Ok(())
    }

    fn drive(&mut self, lines: ControlLines) -> Result<(), DisplayError> {
        self.bus.write_control_lines(lines)?;
        self.lines = lines;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::delay::NoopDelay;
    use crate::display::drivers::mock::{BusEvent, LatchKind, RecordingBus};

    fn driver() -> (Ks0108<RecordingBus, NoopDelay>, RecordingBus) {
        let bus = RecordingBus::new();
        (Ks0108::new(bus.clone(), NoopDelay), bus)
    }

    #[test]
    fn test_send_command_sequencing() {
        let (mut glcd, bus) = driver();
        glcd.send_command(0xB8).unwrap();

        let events = bus.events();
        assert_eq!(events[0], BusEvent::Data(0xB8));

        let controls: Vec<ControlLines> = events[1..]
            .iter()
            .map(|e| match e {
                BusEvent::Control(lines) => *lines,
                other => panic!("unexpected event {:?}", other),
            })
            .collect();
        assert_eq!(controls.len(), 4);
        assert!(controls.iter().all(|l| !l.rs && !l.rw));
        assert_eq!(controls.iter().map(|l| l.en).collect::<Vec<_>>(), vec![false, false, true, false]);

        let latched = bus.latched();
        assert_eq!(latched.len(), 1);
        assert_eq!(latched[0].kind, LatchKind::Command);
        assert_eq!(latched[0].value, 0xB8);
    }

    #[test]
    fn test_send_data_sets_register_select() {
        let (mut glcd, bus) = driver();
        glcd.send_data(0x5A).unwrap();

        let latched = bus.latched();
        assert_eq!(latched.len(), 1);
        assert_eq!(latched[0].kind, LatchKind::Data);
        assert_eq!(latched[0].value, 0x5A);
        assert!(glcd.lines().rs);
        assert!(!glcd.lines().en);
    }

    #[test]
    fn test_initialize_sends_power_up_sequence() {
        let (mut glcd, bus) = driver();
        glcd.initialize().unwrap();

        assert_eq!(bus.state().lock().unwrap().configure_count, 1);
        let commands: Vec<u8> = bus.latched().iter().map(|w| w.value).collect();
        assert_eq!(commands, DISPLAY_ON_SEQUENCE.to_vec());
        // reset still asserted, no controller selected
        assert!(bus.latched().iter().all(|w| !w.rst && !w.cs1 && !w.cs2));
    }

    #[test]
    fn test_select_screen_asserts_one_chip_select() {
        let (mut glcd, bus) = driver();
        glcd.select_screen(Half::Left).unwrap();
        assert!(bus.latched().iter().all(|w| w.cs1 && !w.cs2 && w.rst));
        assert_eq!(bus.latched().len(), DISPLAY_ON_SEQUENCE.len());

        bus.reset_state();
        glcd.select_screen(Half::Right).unwrap();
        assert!(bus.latched().iter().all(|w| !w.cs1 && w.cs2));
    }

    #[test]
    fn test_bus_failure_propagates() {
        let (mut glcd, bus) = driver();
        bus.state().lock().unwrap().simulate_failure = true;
        assert!(glcd.send_data(0x01).is_err());
    }
}
