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

/// The load-cell amplifier as seen by the controller.
///
/// Sampling, filtering and offset handling belong to the implementation. The scale factor is
/// owned here; the controller never keeps its own copy.
pub trait ScaleDriver {
    /// True when a new conversion can be read without waiting.
    fn is_ready(&mut self) -> bool;

    /// Zero the scale on its current load.
    fn tare(&mut self);

    /// Offset corrected reading in ADC counts, without the scale factor applied.
    fn raw_value(&mut self) -> i32;

    /// Offset corrected reading divided by the scale factor.
    fn weight_units(&mut self) -> f32;

    fn scale_factor(&self) -> f32;

    fn set_scale_factor(&mut self, factor: f32);
}
