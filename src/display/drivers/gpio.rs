/*
 *  display/drivers/gpio.rs
 *
 *  glcd64 - 64x64 graphic LCD demo
 *  (c) 2020-26 Stuart Hunter
 *
 *  Bit-banged parallel bus over embedded-hal output pins
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

use embedded_hal::digital::{OutputPin, PinState};

use crate::display::bus::{ControlLines, ParallelBus};
use crate::display::error::DisplayError;

/// The six control pins
pub struct ControlPins<P> {
    pub rs: P,
    pub rw: P,
    pub en: P,
    pub rst: P,
    pub cs1: P,
    pub cs2: P,
}

/// Parallel bus driven through GPIO
///
/// Pins are expected to be outputs already; embedded-hal pins are typed
/// that way at construction.
pub struct GpioBus<P> {
    data: [P; 8],
    control: ControlPins<P>,
}

fn drive<P: OutputPin>(pin: &mut P, high: bool, name: &str) -> Result<(), DisplayError> {
    pin.set_state(PinState::from(high))
        .map_err(|e| DisplayError::GpioError(format!("{}: {:?}", name, e)))
}

impl<P: OutputPin> GpioBus<P> {
    /// `data[0]` is D0
    pub fn new(data: [P; 8], control: ControlPins<P>) -> Self {
        Self { data, control }
    }
}

impl<P: OutputPin> ParallelBus for GpioBus<P> {
    fn write_control_lines(&mut self, lines: ControlLines) -> Result<(), DisplayError> {
        let c = &mut self.control;
        drive(&mut c.rs, lines.rs, "RS")?;
        drive(&mut c.rw, lines.rw, "RW")?;
        drive(&mut c.rst, lines.rst, "RST")?;
        drive(&mut c.cs1, lines.cs1, "CS1")?;
        drive(&mut c.cs2, lines.cs2, "CS2")?;
        // enable last so the edge sees settled RS/RW/CS
        drive(&mut c.en, lines.en, "EN")
    }

    fn write_data_bus(&mut self, value: u8) -> Result<(), DisplayError> {
        for (bit, pin) in self.data.iter_mut().enumerate() {
            drive(pin, (value >> bit) & 1 == 1, "D")?;
        }
        Ok(())
    }
}

#[cfg(feature = "gpio-cdev")]
pub use self::cdev::open_cdev;

#[cfg(feature = "gpio-cdev")]
mod cdev {
    use linux_embedded_hal::CdevPin;
    use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
    use log::{debug, info};

    use super::{ControlPins, GpioBus};
    use crate::config::GpioConfig;
    use crate::display::error::DisplayError;

    const CONSUMER: &str = "glcd64";

    fn request(chip: &mut Chip, offset: u32) -> Result<CdevPin, DisplayError> {
        let handle = chip
            .get_line(offset)
            .and_then(|line| line.request(LineRequestFlags::OUTPUT, 0, CONSUMER))
            .map_err(|e| DisplayError::InitializationFailed(format!("GPIO line {}: {}", offset, e)))?;
        debug!("Requested GPIO line {}", offset);
        CdevPin::new(handle)
            .map_err(|e| DisplayError::InitializationFailed(format!("GPIO line {}: {}", offset, e)))
    }

    /// Request every panel line from a Linux GPIO character device
    pub fn open_cdev(config: &GpioConfig) -> Result<GpioBus<CdevPin>, DisplayError> {
        info!("Opening GPIO chip {}", config.chip);
        let mut chip = Chip::new(&config.chip)
            .map_err(|e| DisplayError::InitializationFailed(format!("{}: {}", config.chip, e)))?;

        let [d0, d1, d2, d3, d4, d5, d6, d7] = config.data;
        let data = [
            request(&mut chip, d0)?,
            request(&mut chip, d1)?,
            request(&mut chip, d2)?,
            request(&mut chip, d3)?,
            request(&mut chip, d4)?,
            request(&mut chip, d5)?,
            request(&mut chip, d6)?,
            request(&mut chip, d7)?,
        ];

        let control = ControlPins {
            rs: request(&mut chip, config.rs)?,
            rw: request(&mut chip, config.rw)?,
            en: request(&mut chip, config.en)?,
            rst: request(&mut chip, config.rst)?,
            cs1: request(&mut chip, config.cs1)?,
            cs2: request(&mut chip, config.cs2)?,
        };

        Ok(GpioBus::new(data, control))
    }
}
