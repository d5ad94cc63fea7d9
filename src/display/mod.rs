/*
 *  display/mod.rs
 *
 *  glcd64 - 64x64 graphic LCD demo
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display subsystem - KS0108 panel, framebuffer and render loop
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

// Hardware seam and timing
pub mod bus;
pub mod delay;
pub mod error;

// Panel protocol and addressing
pub mod protocol;
pub mod cursor;

// Drawing
pub mod framebuffer;
pub mod raster;
pub mod render;

// Display manager
pub mod manager;

// Bus backends (GPIO, emulator, recording mock)
pub mod drivers;

// Re-exports for convenience
pub use bus::{ControlLines, ParallelBus};
pub use cursor::Cursor;
pub use delay::{NoopDelay, SpinDelay};
pub use error::DisplayError;
pub use framebuffer::Framebuffer;
pub use manager::{DisplayManager, PerformanceMetrics};
pub use protocol::{Half, Ks0108};
pub use raster::{fill_circle, Circle};
pub use render::{render, reverse_byte};
