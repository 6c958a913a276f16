// Copyright (C) 2025 Paul Hampson
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License version 3 as  published by the
// Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program.  If not, see <https://www.gnu.org/licenses/>.

//! Host command handling for the scale controller.
//!
//! The host sends `<command>` frames over a serial link. [`Controller::tick`] is called from the
//! firmware's control loop: it takes bytes until a frame is complete, dispatches the command,
//! then runs the per-tick action of the current mode (nothing, a weight reading, or one step of
//! the calibration sequence). Hardware is reached only through [`ScaleDriver`], [`Clock`],
//! [`ByteSource`] and [`ResponseSink`], so everything here runs on the host under test.

#![cfg_attr(not(test), no_std)]

pub mod calibration;
pub mod clock;
pub mod command;
pub mod config;
pub mod controller;
pub mod driver;
pub mod frame;
pub mod io;
pub mod measurement;
pub mod response;

#[cfg(test)]
mod testing;

pub use calibration::{CalibrationContext, CalibrationStep};
pub use clock::Clock;
pub use config::ControllerConfig;
pub use controller::{Controller, DeviceMode, Dispatch};
pub use driver::ScaleDriver;
pub use frame::{CommandFrame, FrameParser, FRAME_CAPACITY};
pub use io::{ByteSource, ResponseSink};
pub use response::{Response, MAX_RESPONSE_LEN};
