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

//! # Augterm Telnet Codec
//!
//! Client side Telnet (RFC 854) stream decoding and RFC 1143 option negotiation.
//!
//! ## Overview
//!
//! [`TelnetCodec`] implements `tokio_util::codec::Decoder` and `Encoder`. The decoder
//! turns an inbound byte stream into [`TelnetEvent`]s:
//!
//! - **Data**: every byte that is not part of a Telnet escape, with `IAC IAC` collapsed
//!   into a single 255
//! - **Commands**: two byte `IAC <command>` sequences such as `<GA>` and `<AYT>`
//! - **Options**: the outcome of a WILL/WONT/DO/DONT exchange, or the start of a
//!   subnegotiation
//!
//! ## Option Negotiation
//!
//! Options are registered per connection as [`TelnetOption`]s. Each keeps two
//! independent RFC 1143 state machines, one for what we perform ([`TelnetSide::Local`])
//! and one for what the peer performs ([`TelnetSide::Remote`]). The engine never loops:
//! a request that would not change state produces no reply.
//!
//! Replies are queued inside the codec rather than written immediately. The owner of
//! the transport drains them with [`TelnetCodec::take_replies`] after every decode.
//!
//! ```rust
//! use augterm_telnetcodec::{consts, OptionState, TelnetCodec, TelnetEvent, TelnetOption};
//! use bytes::BytesMut;
//! use tokio_util::codec::Decoder;
//!
//! let mut codec = TelnetCodec::new();
//! codec.add_option(TelnetOption::new(consts::option::ECHO, "ECHO", true, true)).unwrap();
//!
//! let mut input = BytesMut::from(&b"ok\xFF\xFB\x01"[..]);
//! let mut events = Vec::new();
//! while let Some(event) = codec.decode(&mut input).unwrap() {
//!     events.push(event);
//! }
//! assert_eq!(events[0], TelnetEvent::Data(b'o'));
//! match events[2] {
//!     TelnetEvent::Option(event) => assert_eq!(event.state, OptionState::Enabled),
//!     _ => unreachable!(),
//! }
//! assert_eq!(&codec.take_replies()[..], b"\xFF\xFD\x01");
//! ```
//!
//! ## Thread Safety
//!
//! `TelnetCodec` holds the negotiation state of exactly one connection and is meant to
//! be owned by the task reading that connection.
//!
//! ## Related RFCs
//!
//! - RFC 854: Telnet Protocol Specification
//! - RFC 857: Telnet Echo Option
//! - RFC 858: Telnet Suppress Go Ahead Option
//! - RFC 1143: The Q Method of Implementing Telnet Option Negotiation

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(
    clippy::option_if_let_else,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc
)]

mod codec;
pub mod consts;
mod event;
mod frame;
mod option;
mod options;
mod result;

pub use self::codec::TelnetCodec;
pub use self::event::{OptionEvent, TelnetCommand, TelnetEvent};
pub use self::frame::TelnetFrame;
pub use self::option::{NegotiationAction, OptionState, QState, TelnetOption};
pub use self::options::{TelnetOptions, TelnetSide};
pub use self::result::{CodecError, CodecResult};
