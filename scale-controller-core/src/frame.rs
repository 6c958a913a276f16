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

use crate::io::ByteSource;
use heapless::Vec;

/// Maximum number of bytes kept from a single frame. Anything past this is dropped.
pub const FRAME_CAPACITY: usize = 31;
pub const START_MARKER: u8 = b'<';
pub const END_MARKER: u8 = b'>';

/// A complete command taken from between the start and end markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFrame {
    bytes: Vec<u8, FRAME_CAPACITY>,
}

impl CommandFrame {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The frame as text, `None` if the host sent bytes that are not valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.bytes).ok()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn from_text(text: &str) -> Self {
        let mut bytes = Vec::new();
        for b in text.bytes().take(FRAME_CAPACITY) {
            let _ = bytes.push(b);
        }
        Self { bytes }
    }
}

/// Collects `<...>` delimited frames out of a byte stream.
///
/// Only one frame is held at a time. Once a frame is complete the parser refuses further
/// bytes until [`FrameParser::take_frame`] is called, so anything the host sent after the end
/// marker stays in the input source for the next tick.
#[derive(Debug, Default)]
pub struct FrameParser {
    buffer: Vec<u8, FRAME_CAPACITY>,
    capturing: bool,
    ready: bool,
}

impl FrameParser {
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            capturing: false,
            ready: false,
        }
    }

    pub fn is_frame_ready(&self) -> bool {
        self.ready
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    /// Number of bytes captured so far for the frame in progress (or the ready frame).
    pub fn captured_len(&self) -> usize {
        self.buffer.len()
    }

    /// Feed one byte. Returns `false` when the byte was not consumed because a complete frame
    /// is still waiting to be taken.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.ready {
            return false;
        }

        match byte {
            START_MARKER => {
                self.buffer.clear();
                self.capturing = true;
            }
            END_MARKER if self.capturing => {
                self.capturing = false;
                self.ready = true;
                log::trace!("Frame complete, {} bytes", self.buffer.len());
            }
            _ if self.capturing => {
                // full buffer: byte is dropped, frame still completes on the end marker
                let _ = self.buffer.push(byte);
            }
            _ => {}
        }
        true
    }

    /// Pull bytes from `source` until a frame is complete or no more bytes are available.
    pub fn drain<S: ByteSource>(&mut self, source: &mut S) {
        while !self.ready {
            match source.read_byte() {
                Some(byte) => {
                    self.push(byte);
                }
                None => break,
            }
        }
    }

    /// Hand over the completed frame, leaving the parser empty and ready for the next one.
    pub fn take_frame(&mut self) -> Option<CommandFrame> {
        if !self.ready {
            return None;
        }
        self.ready = false;
        Some(CommandFrame {
            bytes: core::mem::take(&mut self.buffer),
        })
    }
}
