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

use crate::coord::CoordinateDecoder;
use crate::instruction::{Arg, BEL, BS, CR, ESC, LF, PAD};
use crate::{TerminalError, TerminalEvent, VatInstruction};
use augterm_telnetcodec::TelnetEvent;
use bytes::BytesMut;
use metrics::counter;
use tracing::{debug, trace};
use tokio_util::codec::{Decoder, Encoder};

/// Most numbers any command takes.
const MAX_ARGUMENTS: usize = 5;

///
/// Wraps a decoder of [`TelnetEvent`]s and parses the data bytes it yields as
/// VAT-0.
///
/// Telnet commands and option events pass straight through as
/// [`TerminalEvent::Telnet`]. One arriving while a command's arguments are
/// still being read abandons that command; nothing of it is emitted.
///
pub struct VatCodec<I> {
    state: ParseState,
    codec: I,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ParseState {
    Ground,
    Escape,
    Arguments(PendingCommand),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct PendingCommand {
    opcode: u8,
    layout: &'static [Arg],
    next: usize,
    numbers: [i32; MAX_ARGUMENTS],
    count: usize,
    number: CoordinateDecoder,
}

impl PendingCommand {
    fn new(opcode: u8, layout: &'static [Arg]) -> Self {
        PendingCommand {
            opcode,
            layout,
            next: 0,
            numbers: [0; MAX_ARGUMENTS],
            count: 0,
            number: CoordinateDecoder::default(),
        }
    }

    /// Feeds one argument byte, returning the instruction once every argument is in.
    fn push(&mut self, byte: u8) -> Option<VatInstruction> {
        match self.layout.get(self.next) {
            Some(Arg::Skip) => self.next += 1,
            Some(Arg::Number) => {
                if let Some(value) = self.number.push(byte) {
                    if let Some(slot) = self.numbers.get_mut(self.count) {
                        *slot = value;
                        self.count += 1;
                    }
                    self.next += 1;
                }
            }
            None => {}
        }
        self.finish()
    }

    fn finish(&self) -> Option<VatInstruction> {
        (self.next >= self.layout.len())
            .then(|| VatInstruction::command(self.opcode, &self.numbers[..self.count]))
    }
}

impl<I> VatCodec<I> {
    /// Creates a VAT-0 codec wrapping the given Telnet codec.
    pub fn new(codec: I) -> Self {
        VatCodec {
            state: ParseState::Ground,
            codec,
        }
    }

    /// Returns a reference to the inner codec.
    pub fn codec(&self) -> &I {
        &self.codec
    }

    /// Returns a mutable reference to the inner codec.
    pub fn codec_mut(&mut self) -> &mut I {
        &mut self.codec
    }

    /// Whether a command is partially read.
    pub fn in_command(&self) -> bool {
        self.state != ParseState::Ground
    }

    fn abandon(&mut self, reason: &str) {
        if let ParseState::Arguments(pending) = self.state {
            debug!(opcode = pending.opcode, "VAT-0 command abandoned: {}", reason);
        } else if self.state == ParseState::Escape {
            debug!("VAT-0 escape abandoned: {}", reason);
        }
        self.state = ParseState::Ground;
    }

    fn feed(&mut self, byte: u8) -> Option<VatInstruction> {
        match self.state {
            ParseState::Ground => match byte {
                ESC => {
                    self.state = ParseState::Escape;
                    None
                }
                BEL => Some(VatInstruction::Bell),
                BS => Some(VatInstruction::Backspace),
                LF => Some(VatInstruction::LineFeed),
                CR => Some(VatInstruction::CarriageReturn),
                PAD => None,
                0o40.. => Some(VatInstruction::Print(byte)),
                _ => None,
            },
            ParseState::Escape if byte == PAD => None,
            ParseState::Escape => {
                let layout = VatInstruction::arguments(byte);
                let pending = PendingCommand::new(byte, layout);
                match pending.finish() {
                    Some(instruction) => {
                        self.state = ParseState::Ground;
                        Some(instruction)
                    }
                    None => {
                        self.state = ParseState::Arguments(pending);
                        None
                    }
                }
            }
            ParseState::Arguments(mut pending) => {
                let instruction = pending.push(byte);
                self.state = if instruction.is_some() {
                    ParseState::Ground
                } else {
                    ParseState::Arguments(pending)
                };
                instruction
            }
        }
    }
}

impl<I> Decoder for VatCodec<I>
where
    I: Decoder<Item = TelnetEvent>,
    TerminalError: From<I::Error>,
{
    type Item = TerminalEvent;
    type Error = TerminalError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        while let Some(event) = self.codec.decode(src)? {
            match event {
                TelnetEvent::Data(byte) => {
                    if let Some(instruction) = self.feed(byte) {
                        trace!(?instruction, "VAT-0 instruction");
                        counter!("augterm.vat.instructions").increment(1);
                        return Ok(Some(TerminalEvent::Instruction(instruction)));
                    }
                }
                other => {
                    self.abandon("telnet event");
                    return Ok(Some(TerminalEvent::Telnet(other)));
                }
            }
        }
        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(event) => Ok(Some(event)),
            None => {
                self.abandon("end of stream");
                Ok(None)
            }
        }
    }
}

impl<'a, I> Encoder<&'a [u8]> for VatCodec<I>
where
    I: Encoder<&'a [u8]>,
    TerminalError: From<I::Error>,
{
    type Error = TerminalError;

    fn encode(&mut self, item: &'a [u8], dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.codec.encode(item, dst).map_err(From::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::ESCAPE_LEAD;
    use crate::instruction::opcode;
    use augterm_telnetcodec::{TelnetCodec, TelnetCommand, consts};

    fn create_test_codec() -> VatCodec<TelnetCodec> {
        VatCodec::new(TelnetCodec::new())
    }

    fn decode_all(codec: &mut VatCodec<TelnetCodec>, bytes: &[u8]) -> Vec<TerminalEvent> {
        let mut src = BytesMut::from(bytes);
        let mut out = Vec::new();
        while let Some(event) = codec.decode(&mut src).unwrap() {
            out.push(event);
        }
        out
    }

    fn instructions(bytes: &[u8]) -> Vec<VatInstruction> {
        let mut codec = create_test_codec();
        decode_all(&mut codec, bytes)
            .into_iter()
            .map(|event| match event {
                TerminalEvent::Instruction(instruction) => instruction,
                other => panic!("unexpected {:?}", other),
            })
            .collect()
    }

    // ============================================================================
    // Data
    // ============================================================================

    #[test]
    fn test_printable_and_line_discipline() {
        assert_eq!(
            instructions(b"A\r\n\x08\x07"),
            vec![
                VatInstruction::Print(b'A'),
                VatInstruction::CarriageReturn,
                VatInstruction::LineFeed,
                VatInstruction::Backspace,
                VatInstruction::Bell,
            ]
        );
    }

    #[test]
    fn test_pad_nul_and_other_controls_are_ignored() {
        assert_eq!(
            instructions(&[0, 0o177, 0o01, 0o37, b'z']),
            vec![VatInstruction::Print(b'z')]
        );
    }

    #[test]
    fn test_high_bytes_print() {
        assert_eq!(instructions(&[0o200, 0o376]).len(), 2);
    }

    // ============================================================================
    // Commands
    // ============================================================================

    #[test]
    fn test_position_command() {
        assert_eq!(
            instructions(&[ESC, opcode::POSITION, 0o45, 0o40 + 23]),
            vec![VatInstruction::Position { x: 5, y: 23 }]
        );
    }

    #[test]
    fn test_position_with_wide_column() {
        assert_eq!(
            instructions(&[ESC, opcode::POSITION, ESCAPE_LEAD, 0o42, 0o40, 0o40]),
            vec![VatInstruction::Position { x: 128, y: 0 }]
        );
    }

    #[test]
    fn test_commands_without_arguments() {
        assert_eq!(
            instructions(&[ESC, opcode::CLEAR, ESC, opcode::STANDOUT_ON, ESC, 0o62, b'x']),
            vec![
                VatInstruction::Clear,
                VatInstruction::StandoutOn,
                VatInstruction::Unknown(0o62),
                VatInstruction::Print(b'x'),
            ]
        );
    }

    #[test]
    fn test_pad_ignored_while_waiting_for_opcode() {
        assert_eq!(
            instructions(&[ESC, 0o177, opcode::POP_BUG]),
            vec![VatInstruction::PopBug]
        );
    }

    #[test]
    fn test_graphics_skips_bytes() {
        assert_eq!(
            instructions(&[ESC, opcode::GRAPHICS, 0o33, 0o43, 0o177, b'q']),
            vec![VatInstruction::Graphics { count: 3 }, VatInstruction::Print(b'q')]
        );
    }

    #[test]
    fn test_scroll_with_negative_count() {
        assert_eq!(
            instructions(&[ESC, opcode::SCROLL, 0o40, 0o40 + 79, 0o40 + 20, 0o40 + 10, 0o37]),
            vec![VatInstruction::Scroll {
                left: 0,
                right: 79,
                top: 20,
                bottom: 10,
                lines: -1
            }]
        );
    }

    #[test]
    fn test_command_split_across_reads() {
        let mut codec = create_test_codec();
        assert!(decode_all(&mut codec, &[ESC, opcode::SET_BUG, 0o41]).is_empty());
        assert!(codec.in_command());
        assert_eq!(
            decode_all(&mut codec, &[0o42]),
            vec![TerminalEvent::Instruction(VatInstruction::SetBug { x: 1, y: 2 })]
        );
        assert!(!codec.in_command());
    }

    #[test]
    fn test_iac_quoted_byte_is_data() {
        let mut codec = create_test_codec();
        let events = decode_all(&mut codec, &[consts::IAC, consts::IAC]);
        assert_eq!(events, vec![TerminalEvent::Instruction(VatInstruction::Print(0xFF))]);
    }

    // ============================================================================
    // Abandoned Commands
    // ============================================================================

    #[test]
    fn test_telnet_event_abandons_command() {
        let mut codec = create_test_codec();
        let events = decode_all(
            &mut codec,
            &[ESC, opcode::POSITION, 0o41, consts::IAC, consts::NOP, b'k'],
        );
        assert_eq!(
            events,
            vec![
                TerminalEvent::Telnet(TelnetEvent::Command(TelnetCommand::NoOperation)),
                TerminalEvent::Instruction(VatInstruction::Print(b'k')),
            ]
        );
    }

    #[test]
    fn test_eof_abandons_partial_command() {
        let mut codec = create_test_codec();
        let mut src = BytesMut::from(&[ESC, opcode::SCROLL, 0o40][..]);
        assert_eq!(codec.decode_eof(&mut src).unwrap(), None);
        assert!(!codec.in_command());
    }
}
