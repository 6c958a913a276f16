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

use crate::driver::ScaleDriver;
use crate::io::ResponseSink;
use crate::response::Response;

/// Send one weight reading if the driver has a conversion ready. Returns whether a reading was sent.
pub fn emit_measurement<D: ScaleDriver, S: ResponseSink>(driver: &mut D, sink: &mut S) -> bool {
    if !driver.is_ready() {
        return false;
    }
    let weight = driver.weight_units();
    sink.send(&Response::Weight(weight));
    true
}
