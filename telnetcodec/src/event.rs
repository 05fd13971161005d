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

use crate::consts;
use crate::option::OptionState;
use crate::options::TelnetSide;

///
/// `TelnetEvent` is what the decoder hands to its caller: plain data bytes
/// interleaved with out-of-band command and option signals, in wire order.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TelnetEvent {
    /// Telnet Data Byte
    Data(u8),
    /// Two byte `IAC <command>` sequence
    Command(TelnetCommand),
    /// Completed negotiation step or start of a subnegotiation
    Option(OptionEvent),
}

impl TelnetEvent {
    /// Returns the data byte, if this is one.
    pub fn data(&self) -> Option<u8> {
        match self {
            TelnetEvent::Data(byte) => Some(*byte),
            _ => None,
        }
    }
}

/// Signal raised for an option after negotiation or on `IAC SB <code>`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct OptionEvent {
    /// Option code as received.
    pub code: u8,
    /// Side the event concerns. Subnegotiation events are always local.
    pub side: TelnetSide,
    /// State of that side after the event was processed.
    pub state: OptionState,
    /// `true` when raised by `IAC SB`, `false` for WILL/WONT/DO/DONT.
    pub subnegotiation: bool,
}

/// Two byte Telnet commands.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TelnetCommand {
    /// End of subnegotiation parameters.
    SubnegotiationEnd,
    /// No operation.
    NoOperation,
    /// Data stream portion of a Synch.
    DataMark,
    /// Operator pressed the Break key or the Attention key.
    Break,
    /// Interrupt current process.
    InterruptProcess,
    /// Cancel output from the current process.
    AbortOutput,
    /// Request acknowledgment.
    AreYouThere,
    /// Request that the operator erase the previous character.
    EraseCharacter,
    /// Request that the operator erase the previous line.
    EraseLine,
    /// End of input for half-duplex connections.
    GoAhead,
}

impl TelnetCommand {
    /// Maps a byte following IAC to a command, if it is one.
    pub const fn from_u8(byte: u8) -> Option<TelnetCommand> {
        match byte {
            consts::SE => Some(TelnetCommand::SubnegotiationEnd),
            consts::NOP => Some(TelnetCommand::NoOperation),
            consts::DM => Some(TelnetCommand::DataMark),
            consts::BRK => Some(TelnetCommand::Break),
            consts::IP => Some(TelnetCommand::InterruptProcess),
            consts::AO => Some(TelnetCommand::AbortOutput),
            consts::AYT => Some(TelnetCommand::AreYouThere),
            consts::EC => Some(TelnetCommand::EraseCharacter),
            consts::EL => Some(TelnetCommand::EraseLine),
            consts::GA => Some(TelnetCommand::GoAhead),
            _ => None,
        }
    }

    /// Wire value of the command.
    pub const fn to_u8(self) -> u8 {
        match self {
            TelnetCommand::SubnegotiationEnd => consts::SE,
            TelnetCommand::NoOperation => consts::NOP,
            TelnetCommand::DataMark => consts::DM,
            TelnetCommand::Break => consts::BRK,
            TelnetCommand::InterruptProcess => consts::IP,
            TelnetCommand::AbortOutput => consts::AO,
            TelnetCommand::AreYouThere => consts::AYT,
            TelnetCommand::EraseCharacter => consts::EC,
            TelnetCommand::EraseLine => consts::EL,
            TelnetCommand::GoAhead => consts::GA,
        }
    }
}

impl std::fmt::Display for TelnetCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TelnetCommand::SubnegotiationEnd => "SE",
            TelnetCommand::NoOperation => "NOP",
            TelnetCommand::DataMark => "DM",
            TelnetCommand::Break => "BRK",
            TelnetCommand::InterruptProcess => "IP",
            TelnetCommand::AbortOutput => "AO",
            TelnetCommand::AreYouThere => "AYT",
            TelnetCommand::EraseCharacter => "EC",
            TelnetCommand::EraseLine => "EL",
            TelnetCommand::GoAhead => "GA",
        };
        write!(f, "<{}>", name)
    }
}
