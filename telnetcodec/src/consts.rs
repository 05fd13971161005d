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

//! RFC 854 wire constants.

/// Well known Telnet TCP port.
pub const TELNET_PORT: u16 = 23;

/// End of subnegotiation parameters.
pub const SE: u8 = 240;
/// No operation.
pub const NOP: u8 = 241;
/// Data stream portion of a Synch.
pub const DM: u8 = 242;
/// NVT character BRK.
pub const BRK: u8 = 243;
/// Interrupt Process.
pub const IP: u8 = 244;
/// Abort Output.
pub const AO: u8 = 245;
/// Are You There.
pub const AYT: u8 = 246;
/// Erase Character.
pub const EC: u8 = 247;
/// Erase Line.
pub const EL: u8 = 248;
/// Go Ahead.
pub const GA: u8 = 249;
/// Begin subnegotiation.
pub const SB: u8 = 250;
/// Sender wants to begin, or confirms, performing an option.
pub const WILL: u8 = 251;
/// Sender refuses to perform, or stops performing, an option.
pub const WONT: u8 = 252;
/// Sender asks the peer to perform an option.
pub const DO: u8 = 253;
/// Sender asks the peer to stop performing an option.
pub const DONT: u8 = 254;
/// Interpret As Command.
pub const IAC: u8 = 255;

/// Option codes this client knows by name.
pub mod option {
    /// Binary Transmission (RFC 856).
    pub const TRANSMIT_BINARY: u8 = 0;
    /// Echo (RFC 857).
    pub const ECHO: u8 = 1;
    /// Suppress Go Ahead (RFC 858).
    pub const SUPPRESS_GO_AHEAD: u8 = 3;
    /// Status (RFC 859).
    pub const STATUS: u8 = 5;
    /// Timing Mark (RFC 860).
    pub const TIMING_MARK: u8 = 6;
    /// Logout (RFC 727).
    pub const LOGOUT: u8 = 18;
    /// Send Location (RFC 779).
    pub const SEND_LOCATION: u8 = 23;
    /// Terminal Type (RFC 1091).
    pub const TERMINAL_TYPE: u8 = 24;
    /// End of Record (RFC 885).
    pub const END_OF_RECORD: u8 = 25;
    /// Negotiate About Window Size (RFC 1073).
    pub const NAWS: u8 = 31;
    /// Terminal Speed (RFC 1079).
    pub const TERMINAL_SPEED: u8 = 32;
    /// Remote Flow Control (RFC 1372).
    pub const TOGGLE_FLOW_CONTROL: u8 = 33;
    /// Linemode (RFC 1184).
    pub const LINEMODE: u8 = 34;
    /// X Display Location (RFC 1096).
    pub const X_DISPLAY_LOCATION: u8 = 35;
    /// Environment (RFC 1408).
    pub const ENVIRON: u8 = 36;
    /// Authentication (RFC 2941).
    pub const AUTHENTICATION: u8 = 37;
    /// New Environment (RFC 1572).
    pub const NEW_ENVIRON: u8 = 39;
}
