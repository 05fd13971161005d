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

/// Key number the axis wire is reported as.
pub const AXIS_KEY: u8 = 4;

/// Events produced by the keyset driver.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KeysetEvent {
    /// A key went down. `key` is 0..=3 for buttons, [`AXIS_KEY`] for the axis.
    Pressed {
        /// Device timestamp in milliseconds
        time: u32,
        /// Key number
        key: u8,
    },
    /// A key came up.
    Released {
        /// Device timestamp in milliseconds
        time: u32,
        /// Key number
        key: u8,
    },
    /// Every key of a chord has been released.
    Typed {
        /// Device timestamp in milliseconds
        time: u32,
        /// The character the chord maps to
        ch: char,
    },
}

impl KeysetEvent {
    /// The typed character, if this event completes a chord.
    pub fn typed(&self) -> Option<char> {
        match self {
            KeysetEvent::Typed { ch, .. } => Some(*ch),
            _ => None,
        }
    }
}
