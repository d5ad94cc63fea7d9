/*
 *  display/error.rs
 *
 *  glcd64 - 64x64 graphic LCD demo
 *  (c) 2020-26 Stuart Hunter
 *
 *  Unified error type for the display subsystem
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

use std::fmt;
use std::error::Error;

/// Unified error type for all display operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayError {
    /// Hardware initialization failed (pin request, chip open)
    InitializationFailed(String),

    /// GPIO pin error while driving the bus
    GpioError(String),

    /// Invalid configuration
    InvalidConfiguration(String),

    /// Pixel coordinate outside the 64x64 panel
    PixelOutOfRange { x: u32, y: u32 },

    /// Page/column address the controller cannot take
    CursorOutOfRange { page: u8, column: u8 },

    /// Shape would draw outside the panel
    ShapeOutOfBounds { cx: u8, cy: u8, radius: u8 },

    /// Generic error with message
    Other(String),
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::InitializationFailed(msg) =>
                write!(f, "Display initialization failed: {}", msg),
            DisplayError::GpioError(msg) =>
                write!(f, "GPIO error: {}", msg),
            DisplayError::InvalidConfiguration(msg) =>
                write!(f, "Invalid configuration: {}", msg),
            DisplayError::PixelOutOfRange { x, y } =>
                write!(f, "Pixel ({}, {}) is outside the 64x64 panel", x, y),
            DisplayError::CursorOutOfRange { page, column } =>
                write!(f, "Cursor page {} column {} out of range (page 0..8, column 0..64)", page, column),
            DisplayError::ShapeOutOfBounds { cx, cy, radius } =>
                write!(f, "Circle at ({}, {}) radius {} does not fit the panel", cx, cy, radius),
            DisplayError::Other(msg) =>
                write!(f, "{}", msg),
        }
    }
}

impl Error for DisplayError {}
