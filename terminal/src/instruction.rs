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

//! VAT-0 instruction set.

/// Bell.
pub const BEL: u8 = 0o07;
/// Backspace.
pub const BS: u8 = 0o10;
/// Line feed.
pub const LF: u8 = 0o12;
/// Carriage return.
pub const CR: u8 = 0o15;
/// Introduces a command.
pub const ESC: u8 = 0o33;
/// Pad, ignored everywhere outside command arguments.
pub const PAD: u8 = 0o177;

/// Command opcodes, the byte following ESC.
pub mod opcode {
    /// Position cursor: X, Y.
    pub const POSITION: u8 = 0o40;
    /// Define the TTY window: top Y, bottom Y.
    pub const SET_WINDOW: u8 = 0o41;
    /// Return to the saved TTY position.
    pub const RESUME_WINDOW: u8 = 0o42;
    /// Write blanks: count.
    pub const WRITE_BLANKS: u8 = 0o43;
    /// Delete the cursor line.
    pub const DELETE_LINE: u8 = 0o44;
    /// Insert a line at the cursor.
    pub const INSERT_LINE: u8 = 0o45;
    /// Select the bug: X, Y.
    pub const SET_BUG: u8 = 0o46;
    /// Deselect the bug.
    pub const POP_BUG: u8 = 0o47;
    /// Clear screen.
    pub const CLEAR: u8 = 0o50;
    /// Reset.
    pub const RESET: u8 = 0o51;
    /// Write graphics: one skipped byte, count, one skipped byte.
    pub const GRAPHICS: u8 = 0o52;
    /// Close printer.
    pub const CLOSE_PRINTER: u8 = 0o54;
    /// Interrogate terminal extents.
    pub const INTERROGATE: u8 = 0o55;
    /// Standout (reverse video) on.
    pub const STANDOUT_ON: u8 = 0o56;
    /// Standout off.
    pub const STANDOUT_OFF: u8 = 0o57;
    /// Coordinate mode off.
    pub const COORDINATES_OFF: u8 = 0o60;
    /// Coordinate mode on.
    pub const COORDINATES_ON: u8 = 0o61;
    /// Printer command.
    pub const PRINTER_ON: u8 = 0o63;
    /// Printer command.
    pub const PRINTER_OFF: u8 = 0o64;
    /// Scroll a region: left X, right X, top Y, bottom Y, signed line count.
    pub const SCROLL: u8 = 0o65;
}

///
/// One decoded unit of the VAT-0 stream.
///
/// Row arguments are carried as received, counted from the bottom line; the
/// interpreter flips them against the screen it drives.
///
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum VatInstruction {
    /// Printable byte, 040 and above except pad.
    Print(u8),
    /// Sound the bell.
    Bell,
    /// Move left one column.
    Backspace,
    /// Line feed.
    LineFeed,
    /// Carriage return.
    CarriageReturn,
    /// Absolute cursor position.
    Position {
        /// Column
        x: i32,
        /// Row from the bottom
        y: i32,
    },
    /// Define the TTY simulation window.
    SetWindow {
        /// Top row from the bottom
        top: i32,
        /// Bottom row from the bottom
        bottom: i32,
    },
    /// Return to the position saved by the last `Position`.
    ResumeWindow,
    /// Write blanks at the cursor without moving it.
    WriteBlanks(i32),
    /// Erase the cursor line.
    DeleteLine,
    /// Insert a blank line at the cursor line.
    InsertLine,
    /// Highlight the bug at a position.
    SetBug {
        /// Column
        x: i32,
        /// Row from the bottom
        y: i32,
    },
    /// Remove the bug highlight.
    PopBug,
    /// Clear the screen.
    Clear,
    /// Clear the screen and forget the TTY window.
    Reset,
    /// Graphics display, not rendered.
    Graphics {
        /// Announced length
        count: i32,
    },
    /// Close printer, no effect.
    ClosePrinter,
    /// Report terminal extents to the host.
    Interrogate,
    /// Reverse video on.
    StandoutOn,
    /// Reverse video off.
    StandoutOff,
    /// Stop reporting mouse coordinates.
    CoordinatesOff,
    /// Start reporting mouse coordinates.
    CoordinatesOn,
    /// Printer control, no effect.
    PrinterCommand(u8),
    /// Scroll a rectangular region.
    Scroll {
        /// Left column
        left: i32,
        /// Right column
        right: i32,
        /// Top row from the bottom
        top: i32,
        /// Bottom row from the bottom
        bottom: i32,
        /// Lines to scroll up, negative scrolls down
        lines: i32,
    },
    /// Unassigned opcode, consumed without effect.
    Unknown(u8),
}

/// Argument layout of a command.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Arg {
    /// One encoded number.
    Number,
    /// One byte read and discarded.
    Skip,
}

impl VatInstruction {
    /// Arguments that follow `opcode`.
    pub(crate) fn arguments(opcode: u8) -> &'static [Arg] {
        use Arg::{Number, Skip};
        match opcode {
            opcode::POSITION | opcode::SET_WINDOW | opcode::SET_BUG => &[Number, Number],
            opcode::WRITE_BLANKS => &[Number],
            opcode::GRAPHICS => &[Skip, Number, Skip],
            opcode::SCROLL => &[Number, Number, Number, Number, Number],
            _ => &[],
        }
    }

    /// Builds a command from its opcode and the numbers read for it, in order.
    pub(crate) fn command(opcode: u8, n: &[i32]) -> VatInstruction {
        let arg = |index: usize| n.get(index).copied().unwrap_or_default();
        match opcode {
            opcode::POSITION => VatInstruction::Position { x: arg(0), y: arg(1) },
            opcode::SET_WINDOW => VatInstruction::SetWindow {
                top: arg(0),
                bottom: arg(1),
            },
            opcode::RESUME_WINDOW => VatInstruction::ResumeWindow,
            opcode::WRITE_BLANKS => VatInstruction::WriteBlanks(arg(0)),
            opcode::DELETE_LINE => VatInstruction::DeleteLine,
            opcode::INSERT_LINE => VatInstruction::InsertLine,
            opcode::SET_BUG => VatInstruction::SetBug { x: arg(0), y: arg(1) },
            opcode::POP_BUG => VatInstruction::PopBug,
            opcode::CLEAR => VatInstruction::Clear,
            opcode::RESET => VatInstruction::Reset,
            opcode::GRAPHICS => VatInstruction::Graphics { count: arg(0) },
            opcode::CLOSE_PRINTER => VatInstruction::ClosePrinter,
            opcode::INTERROGATE => VatInstruction::Interrogate,
            opcode::STANDOUT_ON => VatInstruction::StandoutOn,
            opcode::STANDOUT_OFF => VatInstruction::StandoutOff,
            opcode::COORDINATES_OFF => VatInstruction::CoordinatesOff,
            opcode::COORDINATES_ON => VatInstruction::CoordinatesOn,
            opcode::PRINTER_ON | opcode::PRINTER_OFF => VatInstruction::PrinterCommand(opcode),
            opcode::SCROLL => VatInstruction::Scroll {
                left: arg(0),
                right: arg(1),
                top: arg(2),
                bottom: arg(3),
                lines: arg(4),
            },
            other => VatInstruction::Unknown(other),
        }
    }

    /// Whether applying this instruction touches the screen surface.
    pub fn mutates_screen(&self) -> bool {
        matches!(
            self,
            VatInstruction::Print(_)
                | VatInstruction::LineFeed
                | VatInstruction::WriteBlanks(_)
                | VatInstruction::DeleteLine
                | VatInstruction::InsertLine
                | VatInstruction::SetBug { .. }
                | VatInstruction::PopBug
                | VatInstruction::Clear
                | VatInstruction::Reset
                | VatInstruction::Scroll { .. }
        )
    }
}
