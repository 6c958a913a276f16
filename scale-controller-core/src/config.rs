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

/// Timing windows and thresholds used by the calibration sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControllerConfig {
    /// Wait after calibration starts before asking for the scale to be cleared
    pub ready_delay_ms: u64,
    /// Wait after the clear prompt before taring
    pub tare_settle_ms: u64,
    /// Wait after the reference weight is given before sampling it
    pub weight_settle_ms: u64,
    /// Smallest raw magnitude accepted as a reference weight being present
    pub min_detectable_raw: i32,
}

impl ControllerConfig {
    pub const DEFAULT: Self = Self {
        ready_delay_ms: 500,
        tare_settle_ms: 2000,
        weight_settle_ms: 3000,
        min_detectable_raw: 1000,
    };
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
