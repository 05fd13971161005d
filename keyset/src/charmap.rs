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

//! Augment chord character tables.
//!
//! A chord is a 5 bit value, one bit per keyset key. Value 0 is no chord and
//! maps to nothing; values 1 through 31 index the tables below.

/// Placeholder for chord value 0.
pub const UNMAPPED: char = '\u{FFFF}';

const ESC: u8 = 0o33;

/// Lower case: the character produced by a bare chord.
pub const CASE0: [u8; 31] = *b"abcdefghijklmnopqrstuvwxyz,.;? ";

/// Upper case.
pub const CASE1: [u8; 31] = *b"ABCDEFGHIJKLMNOPQRSTUVWXYZ<>:\\\t";

/// Digits and symbols.
pub const CASE2: [u8; 31] = [
    b'!', b'"', b'#', b'$', b'%', b'&', b'\'', b'(', b')', b'@', b'+', b'-', b'*', b'/', b'^',
    b'0', b'1', b'2', b'3', b'4', b'5', b'6', b'7', b'8', b'9', b'=', b'[', b']', b'_', ESC,
    b'\r',
];

fn lookup(table: &[u8; 31], chord: u8) -> char {
    match chord {
        1..=31 => char::from(table[usize::from(chord) - 1]),
        _ => UNMAPPED,
    }
}

/// Index of `ch` in the lower case table, if it is there.
fn chord_of(ch: char) -> Option<u8> {
    let byte = u8::try_from(ch).ok()?;
    let index = CASE0.iter().position(|&entry| entry == byte)?;
    u8::try_from(index + 1).ok()
}

/// Character typed by a bare chord, [`UNMAPPED`] outside 1..=31.
pub fn chord_char(chord: u8) -> char {
    lookup(&CASE0, chord)
}

/// Maps a lower case chord character to its upper case counterpart.
///
/// Characters not in the lower case table pass through unchanged.
pub fn shift_upper(ch: char) -> char {
    chord_of(ch).map_or(ch, |chord| lookup(&CASE1, chord))
}

/// Maps a lower case chord character to its symbol counterpart.
pub fn shift_symbol(ch: char) -> char {
    chord_of(ch).map_or(ch, |chord| lookup(&CASE2, chord))
}
