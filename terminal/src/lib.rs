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

//! # Augterm Terminal
//!
//! The VAT-0 terminal protocol, decoded from and encoded onto a Telnet stream.
//!
//! ## Layers
//!
//! - [`coord`]: the numeric encoding shared by both directions, with rows
//!   counted from the bottom line on the wire
//! - [`VatCodec`]: a `tokio_util` decoder stacked on a Telnet decoder that turns
//!   data bytes into [`VatInstruction`]s and passes Telnet events through
//! - [`TerminalSession`]: cursor, window and mode state, applying instructions
//!   to a [`Screen`] and encoding keys, mouse gestures and interrogation replies
//! - [`ScreenBuffer`]: an in-memory [`Screen`] for headless use and tests
//!
//! ```rust
//! use augterm_telnetcodec::TelnetCodec;
//! use augterm_terminal::{ScreenBuffer, TerminalEvent, TerminalSession, VatCodec};
//! use bytes::BytesMut;
//! use tokio_util::codec::Decoder;
//!
//! let mut codec = VatCodec::new(TelnetCodec::new());
//! let mut screen = ScreenBuffer::new();
//! let mut session = TerminalSession::new(&screen);
//! let mut reply = BytesMut::new();
//!
//! // Position at column 2 of the top line, then print.
//! let mut input = BytesMut::from(&b"\x1b\x20\x22\x37hi"[..]);
//! while let Some(event) = codec.decode(&mut input).unwrap() {
//!     if let TerminalEvent::Instruction(instruction) = event {
//!         session.apply(&mut screen, instruction, &mut reply);
//!     }
//! }
//! assert_eq!(screen.row_text(0).unwrap().trim_end(), "  hi");
//! ```

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc
)]

mod buffer;
mod codec;
pub mod coord;
mod event;
mod input;
pub mod instruction;
mod result;
mod screen;
mod session;
mod types;

pub use self::buffer::{Cell, ScreenBuffer};
pub use self::codec::VatCodec;
pub use self::coord::{CoordinateDecoder, CoordinateEncoder};
pub use self::event::TerminalEvent;
pub use self::input::{MouseButton, MouseState};
pub use self::instruction::VatInstruction;
pub use self::result::{TerminalError, TerminalResult};
pub use self::screen::Screen;
pub use self::session::TerminalSession;
pub use self::types::{CellPosition, DevicePoint, TerminalSize};

#[cfg(test)]
mod tests {
    use super::*;
    use augterm_telnetcodec::TelnetCodec;
    use bytes::BytesMut;
    use tokio_util::codec::Decoder;

    #[test]
    fn test_module_exports_exist() {
        let _ = std::any::type_name::<VatCodec<TelnetCodec>>();
        let _ = std::any::type_name::<TerminalSession>();
        let _ = std::any::type_name::<ScreenBuffer>();
        let _ = std::any::type_name::<TerminalResult<()>>();
    }

    #[test]
    fn test_decoded_stream_drives_screen() {
        let mut codec = VatCodec::new(TelnetCodec::new());
        let mut screen = ScreenBuffer::new();
        let mut session = TerminalSession::new(&screen);
        let mut reply = BytesMut::new();
        let mut input = BytesMut::from(&b"line one\r\nline two\x1b\x2d"[..]);
        while let Some(event) = codec.decode(&mut input).unwrap() {
            if let TerminalEvent::Instruction(instruction) = event {
                session.apply(&mut screen, instruction, &mut reply);
            }
        }
        assert_eq!(screen.lines()[..2], ["line one".to_string(), "line two".to_string()]);
        assert_eq!(reply.len(), 7);
    }
}
