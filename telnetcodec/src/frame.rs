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

use crate::TelnetCommand;

/// Outbound Telnet frame.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TelnetFrame {
    /// Data byte, IAC is doubled on the wire
    Data(u8),
    /// `IAC <command>`
    Command(TelnetCommand),
    /// `IAC WILL <code>`
    Will(u8),
    /// `IAC WONT <code>`
    Wont(u8),
    /// `IAC DO <code>`
    Do(u8),
    /// `IAC DONT <code>`
    Dont(u8),
}

impl TelnetFrame {
    /// Number of bytes the frame occupies on the wire.
    pub fn wire_len(&self) -> usize {
        match self {
            TelnetFrame::Data(crate::consts::IAC) => 2,
            TelnetFrame::Data(_) => 1,
            TelnetFrame::Command(_) => 2,
            TelnetFrame::Will(_) | TelnetFrame::Wont(_) | TelnetFrame::Do(_) | TelnetFrame::Dont(_) => 3,
        }
    }
}
