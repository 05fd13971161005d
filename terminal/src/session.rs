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

use crate::coord::{CoordinateEncoder, flip_row};
use crate::input::MouseState;
use crate::{CellPosition, Screen, TerminalResult, VatInstruction};
use bytes::{BufMut, BytesMut};
use metrics::counter;
use tracing::{debug, trace, warn};

/// Lead bytes of the interrogation reply.
const INTERROGATE_LEAD: [u8; 2] = [0o34, 0o46];
/// Trailer of the interrogation reply.
const INTERROGATE_TRAILER: [u8; 3] = [0o46, 0o40, 0o41];

///
/// Cursor, window and mode state of one connected VAT-0 terminal.
///
/// The session drives a [`Screen`] it is handed on every call and never owns
/// one. The cursor row always lies on the screen; the column may rest one
/// past the last column, where further printable bytes are consumed without
/// being written.
///
#[derive(Clone, Debug)]
pub struct TerminalSession {
    pub(crate) cursor: CellPosition,
    saved: CellPosition,
    tty_top: usize,
    tty_bottom: usize,
    positioned: bool,
    reverse_mode: bool,
    pub(crate) coord_mode: bool,
    bug: Option<CellPosition>,
    pub(crate) mouse: MouseState,
    escape_wide: bool,
}

impl TerminalSession {
    /// Creates a session in its initial state for the given screen.
    pub fn new<S: Screen + ?Sized>(screen: &S) -> Self {
        TerminalSession {
            cursor: CellPosition::default(),
            saved: CellPosition::default(),
            tty_top: 0,
            tty_bottom: screen.rows().saturating_sub(1),
            positioned: false,
            reverse_mode: false,
            coord_mode: false,
            bug: None,
            mouse: MouseState::default(),
            escape_wide: false,
        }
    }

    /// Selects the three byte form for outbound numbers of 93 and above.
    pub fn with_escape_wide_coordinates(mut self, escape_wide: bool) -> Self {
        self.escape_wide = escape_wide;
        self
    }

    /// Returns every field to its initial state, keeping the coordinate form.
    pub fn reset_emulation<S: Screen + ?Sized>(&mut self, screen: &S) {
        *self = TerminalSession::new(screen).with_escape_wide_coordinates(self.escape_wide);
    }

    /// Clears the screen and resets the session.
    pub fn clear<S: Screen + ?Sized>(&mut self, screen: &mut S) {
        screen.clear();
        self.reset_emulation(screen);
    }

    /// Current cursor cell.
    pub fn cursor(&self) -> CellPosition {
        self.cursor
    }

    /// Position restored by `ResumeWindow`.
    pub fn saved_position(&self) -> CellPosition {
        self.saved
    }

    /// Top and bottom rows of the TTY window, inclusive.
    pub fn tty_window(&self) -> (usize, usize) {
        (self.tty_top, self.tty_bottom)
    }

    /// Whether an absolute position has been received since the last reset.
    pub fn is_positioned(&self) -> bool {
        self.positioned
    }

    /// Whether printable bytes are written in reverse video.
    pub fn is_reverse(&self) -> bool {
        self.reverse_mode
    }

    /// Whether mouse actions are reported to the host.
    pub fn is_coordinate_mode(&self) -> bool {
        self.coord_mode
    }

    /// Highlighted bug cell, if any.
    pub fn bug(&self) -> Option<CellPosition> {
        self.bug
    }

    pub(crate) fn encoder<S: Screen + ?Sized>(&self, screen: &S) -> CoordinateEncoder {
        CoordinateEncoder::new(screen.rows(), self.escape_wide)
    }

    ///
    /// Applies one instruction to the session and the screen.
    ///
    /// Any bytes owed to the host, such as the interrogation reply, are
    /// appended to `reply`. Screen failures are logged and otherwise ignored.
    ///
    pub fn apply<S: Screen + ?Sized>(
        &mut self,
        screen: &mut S,
        instruction: VatInstruction,
        reply: &mut BytesMut,
    ) {
        trace!(?instruction, cursor = ?self.cursor, "Applying");
        let rows = screen.rows();
        let columns = screen.columns();
        match instruction {
            VatInstruction::Print(byte) => {
                if self.cursor.col < columns {
                    let result =
                        screen.put_char(self.cursor.row, self.cursor.col, char::from(byte), self.reverse_mode);
                    report(result);
                    self.cursor.col += 1;
                }
            }
            VatInstruction::Bell => screen.bell(),
            VatInstruction::Backspace => {
                self.cursor.col = self.cursor.col.saturating_sub(1);
            }
            VatInstruction::LineFeed if self.positioned => self.advance(columns),
            VatInstruction::LineFeed => {
                self.cursor.row += 1;
                if self.cursor.row >= rows {
                    let last_row = rows.saturating_sub(1);
                    report(screen.scroll_up(0, 0, last_row, columns.saturating_sub(1), 1));
                    self.cursor.row = last_row;
                }
            }
            VatInstruction::CarriageReturn if self.positioned => self.advance(columns),
            VatInstruction::CarriageReturn => self.cursor.col = 0,
            VatInstruction::Position { x, y } => {
                self.saved = self.cursor;
                self.cursor = cell(x, y, columns, rows);
                self.positioned = true;
            }
            VatInstruction::SetWindow { top, bottom } => {
                let top = row_index(top, rows);
                let bottom = row_index(bottom, rows);
                self.tty_top = top.min(bottom);
                self.tty_bottom = top.max(bottom);
                self.saved = CellPosition::new(0, self.tty_top);
            }
            VatInstruction::ResumeWindow => {
                if self.positioned {
                    self.cursor = self.saved;
                }
            }
            VatInstruction::WriteBlanks(count) => {
                let room = columns.saturating_sub(self.cursor.col);
                let count = usize::try_from(count).unwrap_or(0).min(room);
                if count > 0 {
                    let blanks = " ".repeat(count);
                    report(screen.put_string(self.cursor.row, self.cursor.col, &blanks, self.reverse_mode));
                }
            }
            VatInstruction::DeleteLine => report(screen.erase_line(self.cursor.row)),
            VatInstruction::InsertLine => report(screen.insert_line(self.cursor.row)),
            VatInstruction::SetBug { x, y } => {
                let bug = cell(x, y, columns, rows);
                self.bug = Some(bug);
                report(screen.highlight_character(bug.row, bug.col));
            }
            VatInstruction::PopBug => {
                if let Some(bug) = self.bug.take() {
                    report(screen.highlight_character(bug.row, bug.col));
                }
            }
            VatInstruction::Clear => screen.clear(),
            VatInstruction::Reset => {
                screen.clear();
                self.tty_top = 0;
                self.tty_bottom = rows.saturating_sub(1);
                self.saved = CellPosition::default();
                self.positioned = false;
            }
            VatInstruction::Graphics { count } => {
                debug!(count, "Graphics display ignored");
            }
            VatInstruction::ClosePrinter | VatInstruction::PrinterCommand(_) => {
                debug!(?instruction, "Printer command ignored");
            }
            VatInstruction::Interrogate => {
                let encoder = self.encoder(screen);
                reply.put_slice(&INTERROGATE_LEAD);
                encoder.put_x(reply, to_coordinate(columns.saturating_sub(1)));
                encoder.put_x(reply, to_coordinate(rows.saturating_sub(1)));
                reply.put_slice(&INTERROGATE_TRAILER);
            }
            VatInstruction::StandoutOn => self.reverse_mode = true,
            VatInstruction::StandoutOff => self.reverse_mode = false,
            VatInstruction::CoordinatesOff => self.coord_mode = false,
            VatInstruction::CoordinatesOn => self.coord_mode = true,
            VatInstruction::Scroll {
                left,
                right,
                top,
                bottom,
                lines,
            } => {
                let left = column_index(left, columns);
                let right = column_index(right, columns);
                let top = row_index(top, rows);
                let bottom = row_index(bottom, rows);
                let (left, right) = (left.min(right), left.max(right));
                let (top, bottom) = (top.min(bottom), top.max(bottom));
                let count = usize::try_from(lines.unsigned_abs()).unwrap_or(usize::MAX);
                if lines < 0 {
                    report(screen.scroll_down(top, left, bottom, right, count));
                } else if lines > 0 {
                    report(screen.scroll_up(top, left, bottom, right, count));
                }
            }
            VatInstruction::Unknown(opcode) => {
                debug!(opcode, "Unassigned VAT-0 opcode ignored");
            }
        }
    }

    fn advance(&mut self, columns: usize) {
        self.cursor.col = (self.cursor.col + 1).min(columns);
    }
}

fn report(result: TerminalResult<()>) {
    if let Err(err) = result {
        counter!("augterm.terminal.screen_errors").increment(1);
        warn!("Screen update failed: {}", err);
    }
}

fn column_index(x: i32, columns: usize) -> usize {
    usize::try_from(x).unwrap_or(0).min(columns.saturating_sub(1))
}

fn row_index(y: i32, rows: usize) -> usize {
    usize::try_from(flip_row(rows, y)).unwrap_or(0).min(rows.saturating_sub(1))
}

fn cell(x: i32, y: i32, columns: usize, rows: usize) -> CellPosition {
    CellPosition::new(column_index(x, columns), row_index(y, rows))
}

pub(crate) fn to_coordinate(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScreenBuffer;

    fn create_test_session() -> (TerminalSession, ScreenBuffer) {
        let screen = ScreenBuffer::new();
        (TerminalSession::new(&screen), screen)
    }

    fn apply_all(session: &mut TerminalSession, screen: &mut ScreenBuffer, instructions: &[VatInstruction]) -> BytesMut {
        let mut reply = BytesMut::new();
        for instruction in instructions {
            session.apply(screen, *instruction, &mut reply);
        }
        reply
    }

    fn print(text: &str) -> Vec<VatInstruction> {
        text.bytes().map(VatInstruction::Print).collect()
    }

    // ============================================================================
    // Line Discipline
    // ============================================================================

    #[test]
    fn test_carriage_return_resets_column_when_not_positioned() {
        let (mut session, mut screen) = create_test_session();
        apply_all(
            &mut session,
            &mut screen,
            &[VatInstruction::Print(b'A'), VatInstruction::CarriageReturn, VatInstruction::Print(b'A')],
        );
        assert_eq!(screen.row_text(0).unwrap().trim_end(), "A");
        assert_eq!(session.cursor(), CellPosition::new(1, 0));
    }

    #[test]
    fn test_carriage_return_advances_when_positioned() {
        let (mut session, mut screen) = create_test_session();
        apply_all(
            &mut session,
            &mut screen,
            &[
                VatInstruction::Position { x: 0, y: 23 },
                VatInstruction::Print(b'A'),
                VatInstruction::CarriageReturn,
                VatInstruction::Print(b'B'),
                VatInstruction::LineFeed,
            ],
        );
        assert_eq!(screen.row_text(0).unwrap().trim_end(), "A B");
        assert_eq!(session.cursor(), CellPosition::new(4, 0));
    }

    #[test]
    fn test_line_feed_scrolls_at_bottom() {
        let (mut session, mut screen) = create_test_session();
        let mut instructions = print("top");
        instructions.extend(std::iter::repeat_n(VatInstruction::LineFeed, 24));
        apply_all(&mut session, &mut screen, &instructions);
        assert_eq!(session.cursor().row, 23);
        assert_eq!(screen.row_text(0).unwrap().trim_end(), "");
    }

    #[test]
    fn test_print_stops_at_right_margin() {
        let screen = ScreenBuffer::new_with_size(4, 2);
        let mut session = TerminalSession::new(&screen);
        let mut screen = screen;
        apply_all(&mut session, &mut screen, &print("abcdef"));
        assert_eq!(screen.row_text(0).unwrap(), "abcd");
        assert_eq!(session.cursor().col, 4);
        apply_all(&mut session, &mut screen, &[VatInstruction::Backspace, VatInstruction::Print(b'Z')]);
        assert_eq!(screen.row_text(0).unwrap(), "abcZ");
    }

    #[test]
    fn test_bell_reaches_screen() {
        let (mut session, mut screen) = create_test_session();
        apply_all(&mut session, &mut screen, &[VatInstruction::Bell, VatInstruction::Bell]);
        assert_eq!(screen.bell_count(), 2);
    }

    // ============================================================================
    // Commands
    // ============================================================================

    #[test]
    fn test_position_saves_previous_cursor() {
        let (mut session, mut screen) = create_test_session();
        apply_all(
            &mut session,
            &mut screen,
            &[
                VatInstruction::Print(b'x'),
                VatInstruction::Position { x: 10, y: 0 },
                VatInstruction::Print(b'y'),
            ],
        );
        assert_eq!(session.saved_position(), CellPosition::new(1, 0));
        assert_eq!(screen.cell(23, 10).unwrap().ch, 'y');
        apply_all(&mut session, &mut screen, &[VatInstruction::ResumeWindow]);
        assert_eq!(session.cursor(), CellPosition::new(1, 0));
    }

    #[test]
    fn test_position_is_clamped() {
        let (mut session, mut screen) = create_test_session();
        apply_all(&mut session, &mut screen, &[VatInstruction::Position { x: 500, y: -3 }]);
        assert_eq!(session.cursor(), CellPosition::new(79, 23));
    }

    #[test]
    fn test_resume_window_requires_positioned() {
        let (mut session, mut screen) = create_test_session();
        apply_all(
            &mut session,
            &mut screen,
            &[VatInstruction::Print(b'q'), VatInstruction::SetWindow { top: 20, bottom: 5 }, VatInstruction::ResumeWindow],
        );
        assert_eq!(session.tty_window(), (3, 18));
        assert_eq!(session.cursor(), CellPosition::new(1, 0));
    }

    #[test]
    fn test_write_blanks_keeps_cursor() {
        let (mut session, mut screen) = create_test_session();
        let mut instructions = print("hello");
        instructions.push(VatInstruction::CarriageReturn);
        instructions.push(VatInstruction::WriteBlanks(3));
        apply_all(&mut session, &mut screen, &instructions);
        assert_eq!(screen.row_text(0).unwrap().trim_end(), "   lo");
        assert_eq!(session.cursor().col, 0);
    }

    #[test]
    fn test_bug_set_and_pop_toggle_highlight() {
        let (mut session, mut screen) = create_test_session();
        apply_all(&mut session, &mut screen, &[VatInstruction::SetBug { x: 2, y: 23 }]);
        assert_eq!(session.bug(), Some(CellPosition::new(2, 0)));
        assert!(screen.cell(0, 2).unwrap().highlighted);
        apply_all(&mut session, &mut screen, &[VatInstruction::PopBug, VatInstruction::PopBug]);
        assert_eq!(session.bug(), None);
        assert!(!screen.cell(0, 2).unwrap().highlighted);
    }

    #[test]
    fn test_reset_forgets_window_but_not_cursor() {
        let (mut session, mut screen) = create_test_session();
        let mut instructions = vec![VatInstruction::Position { x: 5, y: 20 }, VatInstruction::SetWindow { top: 10, bottom: 2 }];
        instructions.extend(print("zz"));
        instructions.push(VatInstruction::Reset);
        apply_all(&mut session, &mut screen, &instructions);
        assert!(!session.is_positioned());
        assert_eq!(session.tty_window(), (0, 23));
        assert_eq!(session.saved_position(), CellPosition::default());
        assert_eq!(session.cursor(), CellPosition::new(7, 3));
        assert!(screen.lines().iter().all(String::is_empty));
    }

    #[test]
    fn test_standout_writes_reversed() {
        let (mut session, mut screen) = create_test_session();
        apply_all(
            &mut session,
            &mut screen,
            &[VatInstruction::StandoutOn, VatInstruction::Print(b'r'), VatInstruction::StandoutOff, VatInstruction::Print(b'n')],
        );
        assert!(screen.cell(0, 0).unwrap().reversed);
        assert!(!screen.cell(0, 1).unwrap().reversed);
    }

    #[test]
    fn test_interrogate_reports_extents() {
        let (mut session, mut screen) = create_test_session();
        let reply = apply_all(&mut session, &mut screen, &[VatInstruction::Interrogate]);
        assert_eq!(&reply[..], &[0o34, 0o46, 0o40 + 79, 0o40 + 23, 0o46, 0o40, 0o41]);
    }

    #[test]
    fn test_interrogate_wide_screen_forms() {
        let screen = ScreenBuffer::new_with_size(132, 24);
        let mut legacy = TerminalSession::new(&screen);
        let mut wide = TerminalSession::new(&screen).with_escape_wide_coordinates(true);
        let mut screen = screen;
        let mut reply = BytesMut::new();
        legacy.apply(&mut screen, VatInstruction::Interrogate, &mut reply);
        assert_eq!(&reply[2..4], &[0o40 + 2, 0o40 + 131]);
        reply.clear();
        wide.apply(&mut screen, VatInstruction::Interrogate, &mut reply);
        assert_eq!(&reply[2..5], &[0o36, 0o40 + 2, 0o40 + 3]);
    }

    #[test]
    fn test_scroll_region_down_and_up() {
        let (mut session, mut screen) = create_test_session();
        let mut instructions = print("one");
        instructions.push(VatInstruction::Scroll {
            left: 0,
            right: 79,
            top: 23,
            bottom: 21,
            lines: -1,
        });
        apply_all(&mut session, &mut screen, &instructions);
        assert_eq!(screen.row_text(1).unwrap().trim_end(), "one");
        apply_all(
            &mut session,
            &mut screen,
            &[VatInstruction::Scroll {
                left: 0,
                right: 79,
                top: 23,
                bottom: 21,
                lines: 1,
            }],
        );
        assert_eq!(screen.row_text(0).unwrap().trim_end(), "one");
    }

    #[test]
    fn test_clear_resets_session() {
        let (mut session, mut screen) = create_test_session();
        apply_all(
            &mut session,
            &mut screen,
            &[VatInstruction::Position { x: 3, y: 3 }, VatInstruction::CoordinatesOn, VatInstruction::StandoutOn],
        );
        session.clear(&mut screen);
        assert_eq!(session.cursor(), CellPosition::default());
        assert!(!session.is_coordinate_mode());
        assert!(!session.is_reverse());
        assert!(!session.is_positioned());
    }
}
