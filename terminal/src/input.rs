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

//! Outbound key and mouse reports.

use crate::session::to_coordinate;
use crate::{DevicePoint, Screen, TerminalSession};
use augterm_keyset::{shift_symbol, shift_upper};
use bytes::{BufMut, BytesMut};
use tracing::trace;

/// Introduces every positioned report.
const REPORT_LEAD: u8 = 0o34;
/// Single button report.
const BUTTON_REPORT: u8 = 0o42;
/// Chorded button report.
const CHORD_REPORT: u8 = 0o43;
/// Base added to the mask in a chorded key report.
const CHORD_BASE: u8 = 0o100;
/// Terminates the report sent for Enter in coordinate mode.
const ENTER_TERMINATOR: u8 = 0o04;

/// Codes reported for each button mask.
const MOUSE_CODES: [u8; 8] = [0o00, 0o04, 0o30, 0o02, 0o01, 0o33, 0o27, 0o00];

/// A pointer button, valued by its bit in the button mask.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MouseButton {
    /// Left button
    Left = 4,
    /// Middle button
    Middle = 2,
    /// Right button
    Right = 1,
}

impl MouseButton {
    /// Bit of this button in the mask.
    pub const fn bit(self) -> u8 {
        self as u8
    }
}

/// Button and pointer state of one session.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MouseState {
    mask: u8,
    press_point: Option<DevicePoint>,
    pointer: Option<DevicePoint>,
    releasing: bool,
    key_with_button: bool,
}

impl MouseState {
    /// Buttons currently held.
    pub fn mask(&self) -> u8 {
        self.mask
    }

    /// Where the last accepted press happened.
    pub fn press_point(&self) -> Option<DevicePoint> {
        self.press_point
    }

    /// Last known pointer position over the surface.
    pub fn pointer(&self) -> Option<DevicePoint> {
        self.pointer
    }

    /// Whether a release gesture is in progress.
    pub fn is_releasing(&self) -> bool {
        self.releasing
    }

    /// Whether a key was typed while a button was held.
    pub fn key_with_button(&self) -> bool {
        self.key_with_button
    }
}

impl TerminalSession {
    /// Button and pointer state.
    pub fn mouse(&self) -> &MouseState {
        &self.mouse
    }

    ///
    /// Encodes one typed character for the host.
    ///
    /// Characters travel as their low byte. While a button is held the button
    /// mask chooses what is sent instead:
    ///
    /// | Mask | Sent |
    /// |---|---|
    /// | 1, 5 | nothing |
    /// | 2 | upper case table |
    /// | 3 | letters as control characters |
    /// | 4 | symbol table |
    /// | 6, 7 | chorded report followed by the key |
    ///
    pub fn key_typed<S: Screen + ?Sized>(&mut self, screen: &S, ch: char, out: &mut BytesMut) {
        let byte = low_byte(ch);
        let mask = self.mouse.mask;
        trace!(byte, mask, "Key typed");
        if mask != 0 {
            self.mouse.key_with_button = true;
            match mask {
                2 => out.put_u8(low_byte(shift_upper(ch))),
                3 if ch.is_alphabetic() => out.put_u8(byte & 0o37),
                3 => out.put_u8(byte),
                4 => out.put_u8(low_byte(shift_symbol(ch))),
                6 | 7 => {
                    out.put_u8(REPORT_LEAD);
                    out.put_u8(CHORD_REPORT);
                    out.put_u8(CHORD_BASE + mask);
                    self.put_point(screen, self.mouse.press_point.unwrap_or_default(), out);
                    out.put_u8(byte);
                }
                _ => {}
            }
        } else if byte == b'\n' && self.coord_mode {
            out.put_u8(REPORT_LEAD);
            out.put_u8(BUTTON_REPORT);
            match self.mouse.pointer {
                Some(point) => self.put_point(screen, point, out),
                None => {
                    let encoder = self.encoder(screen);
                    encoder.put_x(out, 0);
                    encoder.put_y(out, 0);
                }
            }
            out.put_u8(ENTER_TERMINATOR);
        } else {
            out.put_u8(byte);
            if byte == b'\r' {
                out.put_u8(b'\n');
            }
        }
    }

    /// Records a button press. Ignored while a release gesture is in progress.
    pub fn mouse_pressed(&mut self, button: MouseButton, point: DevicePoint) {
        self.mouse.pointer = Some(point);
        if !self.mouse.releasing {
            self.mouse.press_point = Some(point);
            self.mouse.mask |= button.bit();
        }
    }

    ///
    /// Records a button release, reporting the gesture to the host.
    ///
    /// Only the first release of a gesture reports, and only in coordinate
    /// mode with a mask that has a nonzero code. The gesture ends once every
    /// button is up.
    ///
    pub fn mouse_released<S: Screen + ?Sized>(
        &mut self,
        screen: &S,
        button: MouseButton,
        out: &mut BytesMut,
    ) {
        let mask = self.mouse.mask;
        if !self.mouse.releasing {
            self.mouse.releasing = true;
            let code = MOUSE_CODES.get(usize::from(mask)).copied().unwrap_or_default();
            if code != 0 && self.coord_mode {
                let point = self.mouse.press_point.unwrap_or_default();
                if self.mouse.key_with_button {
                    self.mouse.key_with_button = false;
                    match mask {
                        1 | 5 => self.put_button_report(screen, point, code, out),
                        6 | 7 => {
                            out.put_u8(REPORT_LEAD);
                            out.put_u8(CHORD_REPORT);
                            out.put_u8(CHORD_BASE);
                            self.put_point(screen, point, out);
                        }
                        _ => {}
                    }
                } else {
                    match mask {
                        1..=5 => self.put_button_report(screen, point, code, out),
                        6 => out.put_u8(code),
                        _ => {}
                    }
                }
            }
        }
        self.mouse.mask &= !button.bit();
        if self.mouse.mask == 0 {
            self.mouse.releasing = false;
            self.mouse.key_with_button = false;
        }
    }

    /// Tracks the pointer for the Enter report.
    pub fn mouse_moved(&mut self, point: DevicePoint) {
        self.mouse.pointer = Some(point);
    }

    /// Forgets the pointer after it leaves the surface.
    pub fn mouse_exited(&mut self) {
        self.mouse.pointer = None;
    }

    fn put_button_report<S: Screen + ?Sized>(&self, screen: &S, point: DevicePoint, code: u8, out: &mut BytesMut) {
        out.put_u8(REPORT_LEAD);
        out.put_u8(BUTTON_REPORT);
        self.put_point(screen, point, out);
        out.put_u8(code);
    }

    fn put_point<S: Screen + ?Sized>(&self, screen: &S, point: DevicePoint, out: &mut BytesMut) {
        let cell = screen.translate(point);
        let encoder = self.encoder(screen);
        encoder.put_x(out, to_coordinate(cell.col));
        encoder.put_y(out, to_coordinate(cell.row));
    }
}

fn low_byte(ch: char) -> u8 {
    u32::from(ch).to_le_bytes()[0]
}
