//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Linux joystick event records (`struct js_event`).

use crate::{KeysetError, KeysetResult};
use byteorder::{ByteOrder, LittleEndian};

/// Size of one record on the wire.
pub const RECORD_SIZE: usize = 8;

/// A button changed state.
pub const JS_EVENT_BUTTON: u8 = 0x01;
/// An axis moved.
pub const JS_EVENT_AXIS: u8 = 0x02;
/// Synthetic initial state, sent once when the device is opened.
pub const JS_EVENT_INIT: u8 = 0x80;

const HIGHEST_KEY: u8 = 3;

///
/// One joystick event as delivered by the kernel driver.
///
/// Records are validated on parse, so every `JoystickRecord` in hand has a
/// known type, a button number in range and a button value of 0 or 1.
///
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct JoystickRecord {
    /// Event timestamp in milliseconds
    pub time: u32,
    /// Button state or axis position
    pub value: i16,
    /// Bitwise combination of the `JS_EVENT_*` flags
    pub kind: u8,
    /// Button or axis number
    pub number: u8,
}

impl JoystickRecord {
    /// Parses and validates one little-endian record.
    pub fn parse(bytes: &[u8; RECORD_SIZE]) -> KeysetResult<JoystickRecord> {
        let record = JoystickRecord {
            time: LittleEndian::read_u32(&bytes[0..4]),
            value: LittleEndian::read_i16(&bytes[4..6]),
            kind: bytes[6],
            number: bytes[7],
        };
        record.validate()?;
        Ok(record)
    }

    fn validate(&self) -> KeysetResult<()> {
        let allowed = JS_EVENT_BUTTON | JS_EVENT_AXIS | JS_EVENT_INIT;
        if self.kind == 0 || self.kind & allowed != self.kind {
            return Err(KeysetError::InvalidRecord {
                field: "type",
                value: i32::from(self.kind),
            });
        }
        if self.is_init() {
            return Ok(());
        }
        // A live event is exactly one of button or axis.
        if self.kind != JS_EVENT_BUTTON && self.kind != JS_EVENT_AXIS {
            return Err(KeysetError::InvalidRecord {
                field: "type",
                value: i32::from(self.kind),
            });
        }
        if self.number > HIGHEST_KEY {
            return Err(KeysetError::InvalidRecord {
                field: "number",
                value: i32::from(self.number),
            });
        }
        if self.is_button() && !(0..=1).contains(&self.value) {
            return Err(KeysetError::InvalidRecord {
                field: "value",
                value: i32::from(self.value),
            });
        }
        Ok(())
    }

    /// Initial state reports carry no user action.
    pub fn is_init(&self) -> bool {
        self.kind & JS_EVENT_INIT == JS_EVENT_INIT
    }

    /// Button event.
    pub fn is_button(&self) -> bool {
        self.kind == JS_EVENT_BUTTON
    }

    /// Axis event.
    pub fn is_axis(&self) -> bool {
        self.kind == JS_EVENT_AXIS
    }
}
