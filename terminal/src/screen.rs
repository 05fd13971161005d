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

use crate::{CellPosition, DevicePoint, TerminalResult};

///
/// The character cell surface a terminal session draws on.
///
/// Rows are counted from the top. Every method addressing a cell outside the
/// surface fails with [`crate::TerminalError::OutOfBounds`]; scroll regions are
/// inclusive on all four sides.
///
pub trait Screen {
    /// Number of rows.
    fn rows(&self) -> usize;

    /// Number of columns.
    fn columns(&self) -> usize;

    /// Writes one character.
    fn put_char(&mut self, row: usize, col: usize, ch: char, reversed: bool) -> TerminalResult<()>;

    /// Writes a run of characters starting at a cell, stopping at the right margin.
    fn put_string(&mut self, row: usize, col: usize, text: &str, reversed: bool)
    -> TerminalResult<()>;

    /// Blanks every cell.
    fn clear(&mut self);

    /// Blanks one line.
    fn erase_line(&mut self, row: usize) -> TerminalResult<()>;

    /// Inserts a blank line, pushing the lines below it down and dropping the last.
    fn insert_line(&mut self, row: usize) -> TerminalResult<()>;

    /// Moves a region's contents up, blanking the lines uncovered at its bottom.
    fn scroll_up(
        &mut self,
        top: usize,
        left: usize,
        bottom: usize,
        right: usize,
        lines: usize,
    ) -> TerminalResult<()>;

    /// Moves a region's contents down, blanking the lines uncovered at its top.
    fn scroll_down(
        &mut self,
        top: usize,
        left: usize,
        bottom: usize,
        right: usize,
        lines: usize,
    ) -> TerminalResult<()>;

    /// Toggles the highlight of one cell.
    fn highlight_character(&mut self, row: usize, col: usize) -> TerminalResult<()>;

    /// Maps a surface point to the cell under it.
    fn translate(&self, point: DevicePoint) -> CellPosition;

    /// Sounds the bell.
    fn bell(&mut self) {}
}
