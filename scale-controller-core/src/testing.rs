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

//! Stand-ins for the hardware used by the unit tests.

use crate::clock::Clock;
use crate::driver::ScaleDriver;
use crate::io::{ByteSource, ResponseSink};
use crate::response::Response;
use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Driver with directly settable readings. Weight is `raw / scale_factor`.
#[derive(Debug)]
pub struct FakeDriver {
    pub ready: bool,
    pub raw: i32,
    pub scale_factor: f32,
    pub tare_count: usize,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self {
            ready: true,
            raw: 0,
            scale_factor: 1.0,
            tare_count: 0,
        }
    }
}

impl ScaleDriver for FakeDriver {
    fn is_ready(&mut self) -> bool {
        self.ready
    }

    fn tare(&mut self) {
        self.tare_count += 1;
    }

    fn raw_value(&mut self) -> i32 {
        self.raw
    }

    fn weight_units(&mut self) -> f32 {
        self.raw as f32 / self.scale_factor
    }

    fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    fn set_scale_factor(&mut self, factor: f32) {
        self.scale_factor = factor;
    }
}

/// Manually stepped clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct FakeClock {
    now: Rc<Cell<u64>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_ms(&self, now: u64) {
        self.now.set(now);
    }

    pub fn advance_ms(&self, delta: u64) {
        self.now.set(self.now.get() + delta);
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

#[derive(Debug, Default)]
pub struct ScriptedInput {
    bytes: VecDeque<u8>,
}

impl ScriptedInput {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.iter().copied().collect(),
        }
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        self.bytes.extend(bytes.iter().copied());
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len()
    }
}

impl ByteSource for ScriptedInput {
    fn read_byte(&mut self) -> Option<u8> {
        self.bytes.pop_front()
    }
}

/// Keeps every response as the line the host would see.
#[derive(Debug, Default)]
pub struct RecordingSink {
    lines: Vec<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl ResponseSink for RecordingSink {
    fn send(&mut self, response: &Response) {
        self.lines.push(response.to_string());
    }
}
