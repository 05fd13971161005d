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

use super::{
    CodecError, CodecResult, NegotiationAction, OptionEvent, OptionState, TelnetCommand,
    TelnetEvent, TelnetFrame, TelnetOption, TelnetOptions, TelnetSide, consts,
};
use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, trace, warn};

/// A codec for the client side of a Telnet connection.
///
/// The decoder splits the inbound byte stream into data bytes and
/// out-of-band [`TelnetEvent`]s, running every received WILL/WONT/DO/DONT
/// through the RFC 1143 engine of the matching registered [`TelnetOption`].
/// Replies chosen by the engine are not written anywhere directly; they are
/// appended to an internal reply buffer which the owner of the transport
/// drains with [`TelnetCodec::take_replies`] after each decode call, before
/// reading further input.
///
/// The encoder writes [`TelnetFrame`]s and plain data, doubling IAC.
#[derive(Debug)]
pub struct TelnetCodec {
    decoder_state: DecoderState,
    options: TelnetOptions,
    replies: BytesMut,
    inband_commands: bool,
}

impl TelnetCodec {
    /// Creates a codec with no registered options.
    ///
    /// Every negotiation request from the peer is refused until options are added.
    ///
    /// # Example
    /// ```
    /// use augterm_telnetcodec::TelnetCodec;
    ///
    /// let codec = TelnetCodec::new();
    /// assert!(codec.options().is_empty());
    /// ```
    pub fn new() -> TelnetCodec {
        TelnetCodec::default()
    }

    /// Creates a codec over an already populated option set.
    pub fn with_options(options: TelnetOptions) -> TelnetCodec {
        TelnetCodec {
            options,
            ..TelnetCodec::default()
        }
    }

    /// Registers an option on this connection.
    pub fn add_option(&mut self, option: TelnetOption) -> CodecResult<()> {
        self.options.add(option)
    }

    /// Registered options.
    pub fn options(&self) -> &TelnetOptions {
        &self.options
    }

    /// Looks an option up by name, ignoring case.
    pub fn option(&self, name: &str) -> Option<&TelnetOption> {
        self.options.by_name(name)
    }

    /// When enabled, commands other than SE are delivered as data bytes.
    pub fn set_inband_commands(&mut self, enable: bool) {
        self.inband_commands = enable;
    }

    /// Whether commands are delivered as data bytes.
    pub fn inband_commands(&self) -> bool {
        self.inband_commands
    }

    /// Starts a locally initiated negotiation for the named option.
    ///
    /// The verb, if the engine decides one is needed, is queued with the
    /// pending replies. Returns the option code.
    pub fn request(&mut self, name: &str, side: TelnetSide, enable: bool) -> CodecResult<u8> {
        let option = self
            .options
            .by_name_mut(name)
            .ok_or_else(|| CodecError::UnknownOption(name.to_string()))?;
        let code = option.code();
        let action = match side {
            TelnetSide::Local => option.request_local(enable),
            TelnetSide::Remote => option.request_remote(enable),
        };
        debug!(option = code, %side, enable, ?action, "requesting option");
        self.queue_reply(action, code);
        Ok(code)
    }

    /// Whether negotiation replies are waiting to be written.
    pub fn has_pending_replies(&self) -> bool {
        !self.replies.is_empty()
    }

    /// Removes and returns the pending negotiation replies in the order they were decided.
    pub fn take_replies(&mut self) -> BytesMut {
        self.replies.split()
    }

    fn queue_reply(&mut self, action: NegotiationAction, code: u8) {
        if let Some(frame) = action.frame(code) {
            put_frame(frame, &mut self.replies);
        }
    }

    fn command(&self, command: TelnetCommand) -> TelnetEvent {
        if self.inband_commands && command != TelnetCommand::SubnegotiationEnd {
            TelnetEvent::Data(command.to_u8())
        } else {
            TelnetEvent::Command(command)
        }
    }

    fn subnegotiation(&self, code: u8) -> TelnetEvent {
        let state = self
            .options
            .get(code)
            .map_or(OptionState::Disabled, TelnetOption::local_state);
        TelnetEvent::Option(OptionEvent {
            code,
            side: TelnetSide::Local,
            state,
            subnegotiation: true,
        })
    }

    fn negotiate(&mut self, verb: Verb, code: u8) -> Option<TelnetEvent> {
        let side = verb.side();
        let Some(option) = self.options.get_mut(code) else {
            let refusal = match verb {
                Verb::Will => NegotiationAction::SendDont,
                Verb::Do => NegotiationAction::SendWont,
                Verb::Wont | Verb::Dont => NegotiationAction::Ignore,
            };
            debug!(option = code, %verb, ?refusal, "negotiation for unregistered option");
            self.queue_reply(refusal, code);
            return None;
        };

        let action = match verb {
            Verb::Will => option.received_will(),
            Verb::Wont => option.received_wont(),
            Verb::Do => option.received_do(),
            Verb::Dont => option.received_dont(),
        };
        let state = option.state(side);
        debug!(option = code, name = option.name(), %verb, ?action, %state, "negotiated");
        self.queue_reply(action, code);

        if action.is_ignore() {
            return None;
        }
        Some(TelnetEvent::Option(OptionEvent {
            code,
            side,
            state,
            subnegotiation: false,
        }))
    }
}

impl Default for TelnetCodec {
    fn default() -> Self {
        TelnetCodec {
            decoder_state: DecoderState::Normal,
            options: TelnetOptions::default(),
            replies: BytesMut::new(),
            inband_commands: false,
        }
    }
}

impl Decoder for TelnetCodec {
    type Item = TelnetEvent;
    type Error = CodecError;

    /// Consumes bytes until one event is recognized or `src` is exhausted.
    ///
    /// Framing bytes (IAC, verbs, option codes being negotiated) never surface
    /// as data. Decoding byte by byte or in bulk yields the same events; a
    /// partial escape sequence at the end of `src` is remembered in the
    /// decoder state and completed by the next call.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<TelnetEvent>, Self::Error> {
        while src.has_remaining() {
            let byte = src.get_u8();
            let class = ByteClass::of(byte);
            let event = match (self.decoder_state, class) {
                (DecoderState::Normal, ByteClass::Iac) => {
                    self.decoder_state = DecoderState::SeenIac;
                    None
                }
                (DecoderState::Normal, _) => Some(TelnetEvent::Data(byte)),
                (DecoderState::SeenIac, ByteClass::Iac) => {
                    self.decoder_state = DecoderState::Normal;
                    Some(TelnetEvent::Data(consts::IAC))
                }
                (DecoderState::SeenIac, ByteClass::Command(command)) => {
                    self.decoder_state = DecoderState::Normal;
                    trace!(%command, "command");
                    Some(self.command(command))
                }
                (DecoderState::SeenIac, ByteClass::Subnegotiation) => {
                    self.decoder_state = DecoderState::Subnegotiation;
                    None
                }
                (DecoderState::SeenIac, ByteClass::Verb(verb)) => {
                    self.decoder_state = DecoderState::Negotiate(verb);
                    None
                }
                (DecoderState::SeenIac, ByteClass::Other) => {
                    warn!("Unknown telnet command after IAC: 0x{:02X}", byte);
                    self.decoder_state = DecoderState::Normal;
                    None
                }
                (DecoderState::Subnegotiation, _) => {
                    self.decoder_state = DecoderState::Normal;
                    Some(self.subnegotiation(byte))
                }
                (DecoderState::Negotiate(verb), _) => {
                    self.decoder_state = DecoderState::Normal;
                    self.negotiate(verb, byte)
                }
            };
            if event.is_some() {
                return Ok(event);
            }
        }
        Ok(None)
    }
}

impl Encoder<TelnetFrame> for TelnetCodec {
    type Error = CodecError;

    fn encode(&mut self, item: TelnetFrame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        put_frame(item, dst);
        Ok(())
    }
}

impl Encoder<u8> for TelnetCodec {
    type Error = CodecError;

    fn encode(&mut self, item: u8, dst: &mut BytesMut) -> Result<(), Self::Error> {
        put_frame(TelnetFrame::Data(item), dst);
        Ok(())
    }
}

impl Encoder<&[u8]> for TelnetCodec {
    type Error = CodecError;

    fn encode(&mut self, item: &[u8], dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(item.len());
        for &byte in item {
            put_frame(TelnetFrame::Data(byte), dst);
        }
        Ok(())
    }
}

fn put_frame(frame: TelnetFrame, dst: &mut BytesMut) {
    dst.reserve(frame.wire_len());
    match frame {
        TelnetFrame::Data(consts::IAC) => {
            dst.put_u8(consts::IAC);
            dst.put_u8(consts::IAC);
        }
        TelnetFrame::Data(byte) => dst.put_u8(byte),
        TelnetFrame::Command(command) => {
            dst.put_u8(consts::IAC);
            dst.put_u8(command.to_u8());
        }
        TelnetFrame::Will(code) => dst.put_slice(&[consts::IAC, consts::WILL, code]),
        TelnetFrame::Wont(code) => dst.put_slice(&[consts::IAC, consts::WONT, code]),
        TelnetFrame::Do(code) => dst.put_slice(&[consts::IAC, consts::DO, code]),
        TelnetFrame::Dont(code) => dst.put_slice(&[consts::IAC, consts::DONT, code]),
    }
}

///
/// Framing state of the decoder. Exactly one per connection; every completed
/// escape sequence, including malformed ones, returns it to `Normal`.
///
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum DecoderState {
    Normal,
    SeenIac,
    Subnegotiation,
    Negotiate(Verb),
}

/// Negotiation verbs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Verb {
    Will,
    Wont,
    Do,
    Dont,
}

impl Verb {
    /// WILL/WONT describe the peer, DO/DONT describe us.
    fn side(self) -> TelnetSide {
        match self {
            Verb::Will | Verb::Wont => TelnetSide::Remote,
            Verb::Do | Verb::Dont => TelnetSide::Local,
        }
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verb::Will => write!(f, "WILL"),
            Verb::Wont => write!(f, "WONT"),
            Verb::Do => write!(f, "DO"),
            Verb::Dont => write!(f, "DONT"),
        }
    }
}

/// Meaning of a byte when it follows IAC.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ByteClass {
    Iac,
    Command(TelnetCommand),
    Subnegotiation,
    Verb(Verb),
    Other,
}

static BYTE_CLASSES: [ByteClass; 256] = ByteClass::table();

impl ByteClass {
    fn of(byte: u8) -> ByteClass {
        BYTE_CLASSES[usize::from(byte)]
    }

    const fn table() -> [ByteClass; 256] {
        let mut table = [ByteClass::Other; 256];
        let mut index = 0;
        while index < table.len() {
            table[index] = ByteClass::classify(index as u8);
            index += 1;
        }
        table
    }

    const fn classify(byte: u8) -> ByteClass {
        match byte {
            consts::IAC => ByteClass::Iac,
            consts::SB => ByteClass::Subnegotiation,
            consts::WILL => ByteClass::Verb(Verb::Will),
            consts::WONT => ByteClass::Verb(Verb::Wont),
            consts::DO => ByteClass::Verb(Verb::Do),
            consts::DONT => ByteClass::Verb(Verb::Dont),
            _ => match TelnetCommand::from_u8(byte) {
                Some(command) => ByteClass::Command(command),
                None => ByteClass::Other,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::option::{ECHO, SUPPRESS_GO_AHEAD};

    // ============================================================================
    // Helper Functions
    // ============================================================================

    fn client_codec() -> TelnetCodec {
        let mut codec = TelnetCodec::new();
        codec
            .add_option(TelnetOption::new(ECHO, "ECHO", true, true))
            .unwrap();
        codec
            .add_option(TelnetOption::new(SUPPRESS_GO_AHEAD, "SUPPRESS-GO-AHEAD", true, true))
            .unwrap();
        codec
    }

    fn collect_all(codec: &mut TelnetCodec, bytes: &[u8]) -> Vec<TelnetEvent> {
        let mut src = BytesMut::from(bytes);
        let mut out = Vec::new();
        while let Some(event) = codec.decode(&mut src).expect("decode should not error") {
            out.push(event);
        }
        out
    }

    fn data(bytes: &[u8]) -> Vec<TelnetEvent> {
        bytes.iter().copied().map(TelnetEvent::Data).collect()
    }

    // ============================================================================
    // Data and Quoting
    // ============================================================================

    #[test]
    fn decode_plain_data() {
        let mut codec = TelnetCodec::new();
        assert_eq!(collect_all(&mut codec, b"Hi\r\n"), data(b"Hi\r\n"));
    }

    #[test]
    fn decode_iac_iac_as_single_data_byte() {
        let mut codec = TelnetCodec::new();
        let events = collect_all(&mut codec, &[consts::IAC, consts::IAC]);
        assert_eq!(events, vec![TelnetEvent::Data(consts::IAC)]);
    }

    #[test]
    fn decode_iac_ga_is_a_command_event() {
        let mut codec = TelnetCodec::new();
        let events = collect_all(&mut codec, &[consts::IAC, consts::GA]);
        assert_eq!(events, vec![TelnetEvent::Command(TelnetCommand::GoAhead)]);
    }

    #[test]
    fn decode_split_escape_across_reads() {
        let mut codec = TelnetCodec::new();
        assert_eq!(collect_all(&mut codec, &[b'a', consts::IAC]), data(b"a"));
        assert_eq!(
            collect_all(&mut codec, &[consts::NOP, b'b']),
            vec![
                TelnetEvent::Command(TelnetCommand::NoOperation),
                TelnetEvent::Data(b'b')
            ]
        );
    }

    #[test]
    fn decode_unknown_command_returns_to_normal() {
        let mut codec = TelnetCodec::new();
        let events = collect_all(&mut codec, &[consts::IAC, 0x10, b'x']);
        assert_eq!(events, data(b"x"));
    }

    #[test]
    fn inband_commands_arrive_as_data_except_se() {
        let mut codec = TelnetCodec::new();
        codec.set_inband_commands(true);
        let events = collect_all(
            &mut codec,
            &[consts::IAC, consts::AYT, consts::IAC, consts::SE],
        );
        assert_eq!(
            events,
            vec![
                TelnetEvent::Data(consts::AYT),
                TelnetEvent::Command(TelnetCommand::SubnegotiationEnd)
            ]
        );
    }

    // ============================================================================
    // Negotiation
    // ============================================================================

    #[test]
    fn will_echo_is_accepted_with_do() {
        let mut codec = client_codec();
        let events = collect_all(&mut codec, &[consts::IAC, consts::WILL, ECHO]);
        assert_eq!(
            events,
            vec![TelnetEvent::Option(OptionEvent {
                code: ECHO,
                side: TelnetSide::Remote,
                state: OptionState::Enabled,
                subnegotiation: false,
            })]
        );
        assert_eq!(&codec.take_replies()[..], &[consts::IAC, consts::DO, ECHO]);
        assert!(!codec.has_pending_replies());
    }

    #[test]
    fn repeated_will_is_neither_answered_nor_reported() {
        let mut codec = client_codec();
        collect_all(&mut codec, &[consts::IAC, consts::WILL, ECHO]);
        codec.take_replies();
        let events = collect_all(&mut codec, &[consts::IAC, consts::WILL, ECHO]);
        assert!(events.is_empty());
        assert!(!codec.has_pending_replies());
    }

    #[test]
    fn unknown_will_and_do_are_refused() {
        let mut codec = client_codec();
        let events = collect_all(
            &mut codec,
            &[consts::IAC, consts::WILL, 24, consts::IAC, consts::DO, 31],
        );
        assert!(events.is_empty());
        assert_eq!(
            &codec.take_replies()[..],
            &[consts::IAC, consts::DONT, 24, consts::IAC, consts::WONT, 31]
        );
    }

    #[test]
    fn unknown_wont_and_dont_are_ignored() {
        let mut codec = client_codec();
        let events = collect_all(
            &mut codec,
            &[consts::IAC, consts::WONT, 24, consts::IAC, consts::DONT, 31, b'z'],
        );
        assert_eq!(events, data(b"z"));
        assert!(!codec.has_pending_replies());
    }

    #[test]
    fn requested_option_settles_without_reply() {
        let mut codec = client_codec();
        assert_eq!(codec.request("sUpPrEsS-gO-aHeAd", TelnetSide::Remote, true), Ok(SUPPRESS_GO_AHEAD));
        assert_eq!(
            &codec.take_replies()[..],
            &[consts::IAC, consts::DO, SUPPRESS_GO_AHEAD]
        );
        assert!(codec.option("SUPPRESS-GO-AHEAD").unwrap().is_unstable_remotely());

        let events = collect_all(&mut codec, &[consts::IAC, consts::WILL, SUPPRESS_GO_AHEAD]);
        assert!(events.is_empty());
        assert!(!codec.has_pending_replies());
        assert!(codec.option("SUPPRESS-GO-AHEAD").unwrap().is_enabled_remotely());
    }

    #[test]
    fn answer_to_own_disable_raises_no_event() {
        let mut codec = client_codec();
        let events = collect_all(&mut codec, &[consts::IAC, consts::WILL, ECHO]);
        assert_eq!(events.len(), 1);
        codec.take_replies();

        assert_eq!(codec.request("ECHO", TelnetSide::Remote, false), Ok(ECHO));
        assert_eq!(&codec.take_replies()[..], &[consts::IAC, consts::DONT, ECHO]);

        let events = collect_all(&mut codec, &[consts::IAC, consts::WONT, ECHO]);
        assert!(events.is_empty());
        assert!(!codec.has_pending_replies());
        assert!(codec.option("ECHO").unwrap().is_disabled_remotely());
    }

    #[test]
    fn request_for_unknown_name_fails() {
        let mut codec = client_codec();
        assert_eq!(
            codec.request("NAWS", TelnetSide::Local, true),
            Err(CodecError::UnknownOption("NAWS".to_string()))
        );
    }

    #[test]
    fn subnegotiation_raises_local_option_event() {
        let mut codec = client_codec();
        let events = collect_all(&mut codec, &[consts::IAC, consts::SB, ECHO, b'q']);
        assert_eq!(
            events,
            vec![
                TelnetEvent::Option(OptionEvent {
                    code: ECHO,
                    side: TelnetSide::Local,
                    state: OptionState::Disabled,
                    subnegotiation: true,
                }),
                TelnetEvent::Data(b'q'),
            ]
        );
    }

    #[test]
    fn negotiation_bytes_never_appear_as_data() {
        let mut codec = client_codec();
        let events = collect_all(
            &mut codec,
            &[b'a', consts::IAC, consts::DO, ECHO, b'b', consts::IAC, consts::DONT, ECHO, b'c'],
        );
        let bytes: Vec<u8> = events.iter().filter_map(TelnetEvent::data).collect();
        assert_eq!(bytes, b"abc");
        assert_eq!(
            &codec.take_replies()[..],
            &[consts::IAC, consts::WILL, ECHO, consts::IAC, consts::WONT, ECHO]
        );
    }

    // ============================================================================
    // Encoding
    // ============================================================================

    #[test]
    fn encode_data_doubles_iac() {
        let mut codec = TelnetCodec::new();
        let mut dst = BytesMut::new();
        codec.encode(&[b'a', consts::IAC, b'b'][..], &mut dst).unwrap();
        assert_eq!(&dst[..], &[b'a', consts::IAC, consts::IAC, b'b']);
    }

    #[test]
    fn encode_negotiation_and_commands() {
        let mut codec = TelnetCodec::new();
        let mut dst = BytesMut::new();
        codec.encode(TelnetFrame::Will(ECHO), &mut dst).unwrap();
        codec
            .encode(TelnetFrame::Command(TelnetCommand::AreYouThere), &mut dst)
            .unwrap();
        codec.encode(b'!', &mut dst).unwrap();
        assert_eq!(
            &dst[..],
            &[consts::IAC, consts::WILL, ECHO, consts::IAC, consts::AYT, b'!']
        );
    }

    #[test]
    fn byte_classes_cover_protocol_bytes() {
        assert_eq!(ByteClass::of(consts::IAC), ByteClass::Iac);
        assert_eq!(ByteClass::of(consts::SB), ByteClass::Subnegotiation);
        assert_eq!(ByteClass::of(consts::DONT), ByteClass::Verb(Verb::Dont));
        assert_eq!(
            ByteClass::of(consts::EL),
            ByteClass::Command(TelnetCommand::EraseLine)
        );
        assert_eq!(ByteClass::of(0), ByteClass::Other);
        assert_eq!(ByteClass::of(239), ByteClass::Other);
    }
}
