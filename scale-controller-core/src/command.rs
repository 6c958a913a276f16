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

pub const SET_SCALE_PREFIX: &str = "set_scale:";
pub const WEIGHT_PREFIX: &str = "weight:";

/// Host command decoded from the text of a frame. Matching is exact and case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Tare,
    Start,
    Stop,
    Calibrate,
    Cancel,
    GetScale,
    /// Payload after `set_scale:`, not yet validated
    SetScale(&'a str),
    /// Payload after `weight:`, not yet validated
    Weight(&'a str),
    Unrecognized,
}

impl<'a> Command<'a> {
    pub fn parse(text: &'a str) -> Self {
        if let Some(payload) = text.strip_prefix(SET_SCALE_PREFIX) {
            return Command::SetScale(payload);
        }
        if let Some(payload) = text.strip_prefix(WEIGHT_PREFIX) {
            return Command::Weight(payload);
        }
        match text {
            "tare" => Command::Tare,
            "start" => Command::Start,
            "stop" => Command::Stop,
            "calibrate" => Command::Calibrate,
            "cancel" => Command::Cancel,
            "get_scale" => Command::GetScale,
            _ => Command::Unrecognized,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberError {
    Empty,
    Malformed,
    NotFinite,
}

/// Parse a numeric command payload. Surrounding whitespace is allowed, infinities and NaN are not.
pub fn parse_number(payload: &str) -> Result<f32, NumberError> {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return Err(NumberError::Empty);
    }
    let value: f32 = trimmed.parse().map_err(|_| NumberError::Malformed)?;
    if !value.is_finite() {
        return Err(NumberError::NotFinite);
    }
    Ok(value)
}
