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

//! VAT-0 numeric encoding.
//!
//! Numbers travel as a single byte offset by 040, which covers 0 through 92.
//! Larger values are introduced by 036 and follow as two six bit digits, each
//! offset by 040. Rows are counted from the bottom line on the wire.

use bytes::{Buf, BufMut};

/// Offset added to every encoded digit.
pub const ZERO: u8 = 0o40;
/// Introduces the two digit form.
pub const ESCAPE_LEAD: u8 = 0o36;
/// Smallest value that does not fit the one byte form.
pub const SINGLE_BYTE_LIMIT: i32 = 93;

/// Incremental decoder for one number.
///
/// Fed one byte at a time so a number split across reads picks up where it left off.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CoordinateDecoder {
    /// Nothing read yet.
    #[default]
    Start,
    /// Lead byte seen, waiting for the high digit.
    High,
    /// High digit seen, waiting for the low digit.
    Low(i32),
}

impl CoordinateDecoder {
    /// Consumes one byte, returning the value once complete.
    pub fn push(&mut self, byte: u8) -> Option<i32> {
        let digit = i32::from(byte) - i32::from(ZERO);
        match *self {
            CoordinateDecoder::Start if byte == ESCAPE_LEAD => {
                *self = CoordinateDecoder::High;
                None
            }
            CoordinateDecoder::Start => Some(digit),
            CoordinateDecoder::High => {
                *self = CoordinateDecoder::Low(digit);
                None
            }
            CoordinateDecoder::Low(high) => {
                *self = CoordinateDecoder::Start;
                Some(((high & 0o77) << 6) | (digit & 0o77))
            }
        }
    }

    /// Whether a number is partially read.
    pub fn is_pending(&self) -> bool {
        *self != CoordinateDecoder::Start
    }
}

/// Reads one number, or `None` if `src` ends first.
pub fn read_x<B: Buf>(src: &mut B) -> Option<i32> {
    let mut decoder = CoordinateDecoder::Start;
    while src.has_remaining() {
        if let Some(value) = decoder.push(src.get_u8()) {
            return Some(value);
        }
    }
    None
}

/// Reads one row number and flips it to count from the top.
pub fn read_y<B: Buf>(src: &mut B, rows: usize) -> Option<i32> {
    read_x(src).map(|y| flip_row(rows, y))
}

/// Reads a column then a row.
pub fn read_xy<B: Buf>(src: &mut B, rows: usize) -> Option<(i32, i32)> {
    let x = read_x(src)?;
    let y = read_y(src, rows)?;
    Some((x, y))
}

/// Converts between bottom based and top based row numbers.
pub fn flip_row(rows: usize, row: i32) -> i32 {
    i32::try_from(rows).unwrap_or(i32::MAX) - row - 1
}

/// Writes a number the way the host software historically expects it.
///
/// Values outside the one byte range go out as two bytes without the 036
/// lead, which `read_x` does not understand. Kept for hosts that depend on it.
pub fn send_x<B: BufMut>(dst: &mut B, x: i32) {
    if (0..SINGLE_BYTE_LIMIT).contains(&x) {
        dst.put_u8(digit(x));
    } else {
        dst.put_u8(digit(x >> 6));
        dst.put_u8(digit(x));
    }
}

/// Writes a row number with [`send_x`] after flipping it to count from the bottom.
pub fn send_y<B: BufMut>(dst: &mut B, rows: usize, y: i32) {
    send_x(dst, flip_row(rows, y));
}

/// Writes a number in the form `read_x` accepts, using the 036 lead when needed.
pub fn write_x<B: BufMut>(dst: &mut B, x: i32) {
    if (0..SINGLE_BYTE_LIMIT).contains(&x) {
        dst.put_u8(digit(x));
    } else {
        dst.put_u8(ESCAPE_LEAD);
        dst.put_u8(digit((x >> 6) & 0o77));
        dst.put_u8(digit(x & 0o77));
    }
}

/// Writes a row number with [`write_x`] after flipping it to count from the bottom.
pub fn write_y<B: BufMut>(dst: &mut B, rows: usize, y: i32) {
    write_x(dst, flip_row(rows, y));
}

/// Low eight bits of `value + 040`.
fn digit(value: i32) -> u8 {
    value.wrapping_add(i32::from(ZERO)).to_le_bytes()[0]
}

/// Outbound number writer bound to a screen height and wire form.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CoordinateEncoder {
    rows: usize,
    escape_wide: bool,
}

impl CoordinateEncoder {
    /// `escape_wide` selects [`write_x`] over [`send_x`] for large values.
    pub fn new(rows: usize, escape_wide: bool) -> Self {
        CoordinateEncoder { rows, escape_wide }
    }

    /// Writes a column or count.
    pub fn put_x<B: BufMut>(&self, dst: &mut B, x: i32) {
        if self.escape_wide {
            write_x(dst, x);
        } else {
            send_x(dst, x);
        }
    }

    /// Writes a top based row number.
    pub fn put_y<B: BufMut>(&self, dst: &mut B, y: i32) {
        self.put_x(dst, flip_row(self.rows, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;
    use proptest::prelude::*;

    fn written(f: impl FnOnce(&mut BytesMut)) -> Vec<u8> {
        let mut dst = BytesMut::new();
        f(&mut dst);
        dst.to_vec()
    }

    // ============================================================================
    // Reading
    // ============================================================================

    #[test]
    fn single_byte_values() {
        assert_eq!(read_x(&mut &b" "[..]), Some(0));
        assert_eq!(read_x(&mut &b"!"[..]), Some(1));
        assert_eq!(read_x(&mut &[ZERO + 92][..]), Some(92));
    }

    #[test]
    fn escaped_value() {
        // 100 = 1 * 64 + 36
        assert_eq!(read_x(&mut &[ESCAPE_LEAD, 0o41, 0o40 + 36][..]), Some(100));
    }

    #[test]
    fn truncated_escape_is_none() {
        assert_eq!(read_x(&mut &[ESCAPE_LEAD, 0o41][..]), None);
        assert_eq!(read_x(&mut &b""[..]), None);
    }

    #[test]
    fn rows_are_flipped() {
        assert_eq!(read_y(&mut &b" "[..], 24), Some(23));
        assert_eq!(read_y(&mut &[ZERO + 23][..], 24), Some(0));
        assert_eq!(read_xy(&mut &b"% "[..], 24), Some((5, 23)));
    }

    #[test]
    fn decoder_resumes_across_pushes() {
        let mut decoder = CoordinateDecoder::default();
        assert_eq!(decoder.push(ESCAPE_LEAD), None);
        assert!(decoder.is_pending());
        assert_eq!(decoder.push(0o40 + 63), None);
        assert_eq!(decoder.push(0o40 + 63), Some(4095));
        assert!(!decoder.is_pending());
    }

    // ============================================================================
    // Writing
    // ============================================================================

    #[test]
    fn send_x_uses_two_bytes_without_lead() {
        assert_eq!(written(|d| send_x(d, 5)), vec![0o45]);
        assert_eq!(written(|d| send_x(d, 92)), vec![0o40 + 92]);
        assert_eq!(written(|d| send_x(d, 100)), vec![0o41, (100 + 0o40) as u8]);
    }

    #[test]
    fn write_x_uses_lead_for_wide_values() {
        assert_eq!(written(|d| write_x(d, 92)), vec![0o40 + 92]);
        assert_eq!(written(|d| write_x(d, 93)), vec![ESCAPE_LEAD, 0o41, 0o40 + 29]);
    }

    #[test]
    fn encoder_selects_form() {
        let legacy = CoordinateEncoder::new(24, false);
        let escaped = CoordinateEncoder::new(24, true);
        assert_eq!(written(|d| legacy.put_x(d, 200)).len(), 2);
        assert_eq!(written(|d| escaped.put_x(d, 200)).len(), 3);
        assert_eq!(written(|d| legacy.put_y(d, 0)), vec![0o40 + 23]);
    }

    proptest! {
        #[test]
        fn write_then_read_x(x in 0i32..4096) {
            let bytes = written(|d| write_x(d, x));
            prop_assert_eq!(read_x(&mut &bytes[..]), Some(x));
        }

        #[test]
        fn write_then_read_y(rows in 1usize..=500, seed in any::<u32>()) {
            let y = i32::try_from(seed as usize % rows).unwrap();
            let bytes = written(|d| write_y(d, rows, y));
            prop_assert_eq!(read_y(&mut &bytes[..], rows), Some(y));
        }
    }
}
