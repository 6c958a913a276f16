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

use core::fmt;

/// Longest line [`Response`] can render to, excluding the line terminator.
pub const MAX_RESPONSE_LEN: usize = 64;

/// Every line the controller can send to the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Response {
    /// Sent once when the control loop starts.
    Ready,
    Tared,
    Measuring,
    Stopped,
    CalibrationStarted,
    CalibrationCancelled,
    ScaleFactor(f32),
    ScaleSet(f32),
    InvalidScaleFactor,
    CalibrationClearScale,
    CalibrationTared,
    CalibrationWeight(f32),
    CalibrationRaw(i32),
    CalibrationFactor(f32),
    CalibrationTest(f32),
    CalibrationInvalidWeight,
    CalibrationNoWeight,
    /// Periodic reading while measuring.
    Weight(f32),
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ready => f.write_str("r"),
            Response::Tared => f.write_str("TARED"),
            Response::Measuring => f.write_str("MEASURING"),
            Response::Stopped => f.write_str("STOPPED"),
            Response::CalibrationStarted => f.write_str("CAL_START"),
            Response::CalibrationCancelled => f.write_str("CAL_CANCEL"),
            Response::ScaleFactor(factor) => write!(f, "SCALE_FACTOR:{:.6}", factor),
            Response::ScaleSet(factor) => write!(f, "SCALE_SET:{:.6}", factor),
            Response::InvalidScaleFactor => f.write_str("ERROR:Invalid scale factor"),
            Response::CalibrationClearScale => f.write_str("CAL_CLEAR_SCALE"),
            Response::CalibrationTared => f.write_str("CAL_TARED"),
            Response::CalibrationWeight(weight) => write!(f, "CAL_WEIGHT:{:.2}", weight),
            Response::CalibrationRaw(raw) => write!(f, "CAL_RAW:{}", raw),
            Response::CalibrationFactor(factor) => write!(f, "CAL_FACTOR:{:.2}", factor),
            Response::CalibrationTest(weight) => write!(f, "CAL_TEST:{:.2}", weight),
            Response::CalibrationInvalidWeight => f.write_str("CAL_ERROR:Invalid weight"),
            Response::CalibrationNoWeight => f.write_str("CAL_ERROR:No weight detected"),
            Response::Weight(weight) => write!(f, "{:.2}", weight),
        }
    }
}
