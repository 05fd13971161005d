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

use crate::event::AXIS_KEY;
use crate::{JoystickRecord, KeysetError, KeysetEvent, KeysetResult, chord_char};
use tracing::{error, trace};

/// Axis readings above this count as the fifth key being held.
///
/// The adapter reports roughly -10000 while pressed and -16000 while released.
pub const AXIS_THRESHOLD: i16 = -13000;

///
/// Chord accumulator.
///
/// Every press sets its key bit in both `pressed` and `current`; a release
/// clears it from `current` only. When `current` drops back to zero the union
/// of every key held since the last chord is typed. Pressing a key again
/// while others are still held does not start a new chord.
///
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ChordState {
    pressed: u8,
    current: u8,
}

impl ChordState {
    /// Creates an empty accumulator.
    pub fn new() -> ChordState {
        ChordState::default()
    }

    /// Keys held at any point since the last chord.
    pub fn pressed(&self) -> u8 {
        self.pressed
    }

    /// Keys held right now.
    pub fn current(&self) -> u8 {
        self.current
    }

    /// Clears both masks.
    pub fn reset(&mut self) {
        self.pressed = 0;
        self.current = 0;
    }

    /// Records key `key` (0..=4) going down.
    pub fn press(&mut self, key: u8) {
        let bit = key_bit(key);
        self.pressed |= bit;
        self.current |= bit;
    }

    /// Records key `key` going up, returning the chord character once all keys are up.
    pub fn release(&mut self, key: u8) -> KeysetResult<Option<char>> {
        self.current &= !key_bit(key);
        if self.current != 0 {
            return Ok(None);
        }
        let chord = self.pressed;
        self.reset();
        if chord == 0 {
            // Releases without a matching press do show up on some adapters.
            trace!("release with no keys accumulated");
            return Ok(None);
        }
        if !(1..=31).contains(&chord) {
            error!(chord, "chord value out of range");
            return Err(KeysetError::InvalidChord(chord));
        }
        Ok(Some(chord_char(chord)))
    }

    /// Feeds one validated record, returning the events it produces in order.
    pub fn process(&mut self, record: &JoystickRecord) -> KeysetResult<Vec<KeysetEvent>> {
        if record.is_init() {
            return Ok(Vec::new());
        }
        let time = record.time;
        let (key, down) = if record.is_button() {
            (record.number, record.value == 1)
        } else {
            (AXIS_KEY, record.value > AXIS_THRESHOLD)
        };

        if down {
            self.press(key);
            return Ok(vec![KeysetEvent::Pressed { time, key }]);
        }
        let mut events = vec![KeysetEvent::Released { time, key }];
        if let Some(ch) = self.release(key)? {
            events.push(KeysetEvent::Typed { time, ch });
        }
        Ok(events)
    }
}

fn key_bit(key: u8) -> u8 {
    1u8.checked_shl(u32::from(key)).unwrap_or(0)
}
