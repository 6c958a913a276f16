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

use crate::response::Response;

/// Non-blocking source of bytes from the host.
pub trait ByteSource {
    /// Next byte if one is already available. Must not wait for more data.
    fn read_byte(&mut self) -> Option<u8>;
}

/// Destination for response lines to the host.
pub trait ResponseSink {
    /// Emit one response as a complete line.
    fn send(&mut self, response: &Response);
}
