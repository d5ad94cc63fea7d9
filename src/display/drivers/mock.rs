/*
 *  display/drivers/mock.rs
 *
 *  glcd64 - 64x64 graphic LCD demo
 *  (c) 2020-26 Stuart Hunter
 *
 *  Recording bus for testing without hardware
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

use crate::display::bus::{ControlLines, ParallelBus};
use crate::display::error::DisplayError;

use std::sync::{Arc, Mutex, MutexGuard};

/// One call made on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    Configure,
    Control(ControlLines),
    Data(u8),
}

/// Register a latched byte went to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatchKind {
    Command,
    Data,
}

/// A byte the panel would have accepted (enable falling edge)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatchedWrite {
    pub kind: LatchKind,
    pub value: u8,
    pub rst: bool,
    pub cs1: bool,
    pub cs2: bool,
}

/// Internal state for the recording bus (shared for inspection in tests)
#[derive(Debug, Default)]
pub struct RecordingState {
    /// Raw calls in order
    pub events: Vec<BusEvent>,

    /// Decoded writes, one per enable falling edge
    pub latched: Vec<LatchedWrite>,

    /// Number of times configure() was called
    pub configure_count: usize,

    /// Level last put on the data lines
    pub data_bus: u8,

    /// Control lines as last driven
    pub lines: ControlLines,

    /// Simulate failures (for error testing)
    pub simulate_failure: bool,
}

/// Recording bus
///
/// Records every call and decodes the latched bytes so tests can check the
/// protocol without hardware. Clones share the same state, so a test keeps
/// one handle while the driver owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingBus {
    state: Arc<Mutex<RecordingState>>,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get reference to state for inspection in tests
    pub fn state(&self) -> Arc<Mutex<RecordingState>> {
        Arc::clone(&self.state)
    }

    /// Reset recorded traffic, keeping the current line levels
    pub fn reset_state(&self) {
        let mut state = self.lock();
        state.events.clear();
        state.latched.clear();
        state.configure_count = 0;
    }

    pub fn events(&self) -> Vec<BusEvent> {
        self.lock().events.clone()
    }

    pub fn latched(&self) -> Vec<LatchedWrite> {
        self.lock().latched.clone()
    }

    /// Values of latched writes of one kind
    pub fn values(&self, kind: LatchKind) -> Vec<u8> {
        self.lock()
            .latched
            .iter()
            .filter(|w| w.kind == kind)
            .map(|w| w.value)
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, RecordingState> {
        // a panicking test may poison the lock; the data is still readable
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_failure(state: &RecordingState) -> Result<(), DisplayError> {
        if state.simulate_failure {
            return Err(DisplayError::GpioError("Simulated bus failure".to_string()));
        }
        Ok(())
    }
}

impl ParallelBus for RecordingBus {
    fn configure(&mut self) -> Result<(), DisplayError> {
        let mut state = self.lock();
        Self::check_failure(&state)?;
        state.configure_count += 1;
        state.events.push(BusEvent::Configure);
        Ok(())
    }

    fn write_control_lines(&mut self, lines: ControlLines) -> Result<(), DisplayError> {
        let mut state = self.lock();
        Self::check_failure(&state)?;

        if state.lines.en && !lines.en {
            let write = LatchedWrite {
                kind: if lines.rs { LatchKind::Data } else { LatchKind::Command },
                value: state.data_bus,
                rst: lines.rst,
                cs1: lines.cs1,
                cs2: lines.cs2,
            };
            state.latched.push(write);
        }

        state.lines = lines;
        state.events.push(BusEvent::Control(lines));
        Ok(())
    }

    fn write_data_bus(&mut self, value: u8) -> Result<(), DisplayError> {
        let mut state = self.lock();
        Self::check_failure(&state)?;
        state.data_bus = value;
        state.events.push(BusEvent::Data(value));
        Ok(())
    }
}
