/*
 *  lib.rs
 *
 *  glcd64 - 64x64 graphic LCD demo
 *  (c) 2020-26 Stuart Hunter
 *
 *  Library root - the binary and the integration tests build on this
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

//! Driver and demo for a 64x64 window of a KS0108 graphic LCD.
//!
//! The framebuffer is rasterized in memory and flushed page by page over an
//! 8-bit parallel bus. The bus is a trait, so the same code drives GPIO
//! lines, the software emulator, or the recording mock used by the tests.

pub mod config;
pub mod display;
pub mod func_timer;
