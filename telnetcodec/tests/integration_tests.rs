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

//! Integration tests for telnetcodec
//!
//! Two codecs are wired back to back and negotiate with each other, each
//! side's queued replies being fed to the other until both go quiet.

use augterm_telnetcodec::consts::{self, option};
use augterm_telnetcodec::{
    OptionState, QState, TelnetCodec, TelnetCommand, TelnetEvent, TelnetFrame, TelnetOption,
    TelnetSide,
};
use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use tracing_test::traced_test;

// ============================================================================
// Helper Functions
// ============================================================================

fn endpoint() -> TelnetCodec {
    let mut codec = TelnetCodec::new();
    codec
        .add_option(TelnetOption::new(option::ECHO, "ECHO", true, true))
        .unwrap();
    codec
        .add_option(TelnetOption::new(
            option::SUPPRESS_GO_AHEAD,
            "SUPPRESS-GO-AHEAD",
            true,
            true,
        ))
        .unwrap();
    codec
}

fn decode_all(codec: &mut TelnetCodec, buffer: &mut BytesMut) -> Vec<TelnetEvent> {
    let mut events = Vec::new();
    while let Some(event) = codec.decode(buffer).unwrap() {
        events.push(event);
    }
    events
}

/// Shuttles replies between the endpoints until neither has anything to say.
/// Returns the number of reply batches exchanged.
fn settle(a: &mut TelnetCodec, b: &mut TelnetCodec) -> usize {
    let mut rounds = 0;
    while a.has_pending_replies() || b.has_pending_replies() {
        let mut to_b = a.take_replies();
        decode_all(b, &mut to_b);
        let mut to_a = b.take_replies();
        decode_all(a, &mut to_a);
        rounds += 1;
        assert!(rounds < 16, "negotiation did not terminate");
    }
    rounds
}

fn assert_settled(codec: &TelnetCodec, name: &str) {
    let opt = codec.option(name).unwrap();
    for state in [opt.us(), opt.him()] {
        assert!(
            state == QState::Yes || state == QState::No,
            "{} left in {}",
            name,
            state
        );
    }
}

// ============================================================================
// Client-Server Negotiation Tests
// ============================================================================

#[test]
fn both_sides_enable_echo() {
    let (mut client, mut server) = (endpoint(), endpoint());

    client.request("ECHO", TelnetSide::Remote, true).unwrap();
    server.request("ECHO", TelnetSide::Local, true).unwrap();
    settle(&mut client, &mut server);

    assert!(client.option("ECHO").unwrap().is_enabled_remotely());
    assert!(server.option("ECHO").unwrap().is_enabled_locally());
    assert_settled(&client, "ECHO");
    assert_settled(&server, "ECHO");
}

#[test]
fn refused_request_settles_disabled() {
    let mut client = endpoint();
    let mut server = TelnetCodec::new();

    client
        .request("SUPPRESS-GO-AHEAD", TelnetSide::Remote, true)
        .unwrap();
    settle(&mut client, &mut server);

    let sga = client.option("SUPPRESS-GO-AHEAD").unwrap();
    assert_eq!(sga.remote_state(), OptionState::Disabled);
    assert_eq!(sga.him(), QState::No);
}

#[test]
fn simultaneous_requests_on_every_side_terminate() {
    let (mut client, mut server) = (endpoint(), endpoint());

    for name in ["ECHO", "SUPPRESS-GO-AHEAD"] {
        for side in [TelnetSide::Local, TelnetSide::Remote] {
            client.request(name, side, true).unwrap();
            server.request(name, side, true).unwrap();
        }
    }
    settle(&mut client, &mut server);

    for name in ["ECHO", "SUPPRESS-GO-AHEAD"] {
        assert_settled(&client, name);
        assert_settled(&server, name);
        assert!(client.option(name).unwrap().is_enabled_locally());
        assert!(client.option(name).unwrap().is_enabled_remotely());
    }
}

#[test]
fn enable_then_disable_before_answer_ends_disabled() {
    let (mut client, mut server) = (endpoint(), endpoint());

    client.request("ECHO", TelnetSide::Remote, true).unwrap();
    client.request("ECHO", TelnetSide::Remote, false).unwrap();
    assert!(client.option("ECHO").unwrap().him_queued());
    settle(&mut client, &mut server);

    assert!(client.option("ECHO").unwrap().is_disabled_remotely());
    assert!(server.option("ECHO").unwrap().is_disabled_locally());
    assert_settled(&client, "ECHO");
}

#[test]
fn disable_after_enable_round_trips() {
    let (mut client, mut server) = (endpoint(), endpoint());

    client.request("ECHO", TelnetSide::Local, true).unwrap();
    settle(&mut client, &mut server);
    assert!(server.option("ECHO").unwrap().is_enabled_remotely());

    client.request("ECHO", TelnetSide::Local, false).unwrap();
    let rounds = settle(&mut client, &mut server);
    assert_eq!(rounds, 1);
    assert!(server.option("ECHO").unwrap().is_disabled_remotely());
    assert!(client.option("ECHO").unwrap().is_disabled_locally());
}

// ============================================================================
// Stream Tests
// ============================================================================

#[test]
fn data_survives_encoding_with_embedded_iac() {
    let mut sender = TelnetCodec::new();
    let mut receiver = TelnetCodec::new();
    let payload: Vec<u8> = (0..=255).collect();

    let mut wire = BytesMut::new();
    sender.encode(&payload[..], &mut wire).unwrap();
    sender
        .encode(TelnetFrame::Command(TelnetCommand::GoAhead), &mut wire)
        .unwrap();

    let events = decode_all(&mut receiver, &mut wire);
    let (data, rest) = events.split_at(256);
    let bytes: Vec<u8> = data.iter().filter_map(TelnetEvent::data).collect();
    assert_eq!(bytes, payload);
    assert_eq!(rest, &[TelnetEvent::Command(TelnetCommand::GoAhead)]);
}

#[test]
fn bytewise_and_bulk_decoding_agree() {
    let wire: &[u8] = &[
        b'a',
        consts::IAC,
        consts::WILL,
        option::ECHO,
        b'b',
        consts::IAC,
        consts::IAC,
        consts::IAC,
        consts::DO,
        99,
        consts::IAC,
        consts::SB,
        option::ECHO,
        consts::IAC,
        consts::SE,
        b'c',
    ];

    let mut bulk = endpoint();
    let bulk_events = decode_all(&mut bulk, &mut BytesMut::from(wire));

    let mut split = endpoint();
    let mut split_events = Vec::new();
    for byte in wire {
        split_events.extend(decode_all(&mut split, &mut BytesMut::from(&[*byte][..])));
    }

    assert_eq!(bulk_events, split_events);
    assert_eq!(bulk.take_replies(), split.take_replies());
}

#[test]
#[traced_test]
fn malformed_command_is_logged_and_dropped() {
    let mut codec = TelnetCodec::new();
    let events = decode_all(&mut codec, &mut BytesMut::from(&[consts::IAC, 0x42, b'k'][..]));
    assert_eq!(events, vec![TelnetEvent::Data(b'k')]);
    assert!(logs_contain("Unknown telnet command after IAC: 0x42"));
}
