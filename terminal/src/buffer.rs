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

use crate::types::{CellPosition, DevicePoint, TerminalSize};
use crate::{Screen, TerminalError, TerminalResult};

/// One character cell.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Cell {
    /// Character shown
    pub ch: char,
    /// Drawn in reverse video
    pub reversed: bool,
    /// Bug highlight
    pub highlighted: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            ch: ' ',
            reversed: false,
            highlighted: false,
        }
    }
}

/// In-memory screen surface.
///
/// Holds a fixed grid of [`Cell`]s. Device points are taken to be pixels of a
/// uniform cell size, which is all `translate` needs.
#[derive(Clone, Debug)]
pub struct ScreenBuffer {
    size: TerminalSize,
    cell_width: i32,
    cell_height: i32,
    cells: Vec<Vec<Cell>>,
    bells: usize,
}

impl ScreenBuffer {
    /// Creates a blank 80x24 buffer
    pub fn new() -> Self {
        Self::new_with_size(80, 24)
    }

    /// Creates a blank buffer of the given extents with 1x1 pixel cells.
    pub fn new_with_size(cols: usize, rows: usize) -> Self {
        ScreenBuffer {
            size: TerminalSize::new(cols, rows),
            cell_width: 1,
            cell_height: 1,
            cells: vec![vec![Cell::default(); cols]; rows],
            bells: 0,
        }
    }

    /// Sets the pixel size of a cell used by `translate`.
    pub fn with_cell_size(mut self, width: i32, height: i32) -> Self {
        self.cell_width = width.max(1);
        self.cell_height = height.max(1);
        self
    }

    /// Gets the buffer extents
    pub fn size(&self) -> TerminalSize {
        self.size
    }

    /// Cell at a position, if it is on screen.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(row).and_then(|line| line.get(col))
    }

    /// Characters of one row, trailing blanks included.
    pub fn row_text(&self, row: usize) -> Option<String> {
        self.cells
            .get(row)
            .map(|line| line.iter().map(|cell| cell.ch).collect())
    }

    /// Every row with trailing blanks trimmed.
    pub fn lines(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|line| {
                let text: String = line.iter().map(|cell| cell.ch).collect();
                text.trim_end().to_string()
            })
            .collect()
    }

    /// Number of times the bell was sounded.
    pub fn bell_count(&self) -> usize {
        self.bells
    }

    fn check(&self, row: usize, col: usize) -> TerminalResult<()> {
        if row < self.size.rows && col < self.size.cols {
            Ok(())
        } else {
            Err(TerminalError::OutOfBounds { row, col })
        }
    }

    fn check_region(&self, top: usize, left: usize, bottom: usize, right: usize) -> TerminalResult<()> {
        self.check(top, left)?;
        self.check(bottom, right)?;
        if top > bottom || left > right {
            return Err(TerminalError::OutOfBounds {
                row: bottom,
                col: right,
            });
        }
        Ok(())
    }

    fn blank_span(&mut self, row: usize, left: usize, right: usize) {
        for cell in &mut self.cells[row][left..=right] {
            *cell = Cell::default();
        }
    }
}

impl Default for ScreenBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for ScreenBuffer {
    fn rows(&self) -> usize {
        self.size.rows
    }

    fn columns(&self) -> usize {
        self.size.cols
    }

    fn put_char(&mut self, row: usize, col: usize, ch: char, reversed: bool) -> TerminalResult<()> {
        self.check(row, col)?;
        let cell = &mut self.cells[row][col];
        cell.ch = ch;
        cell.reversed = reversed;
        Ok(())
    }

    fn put_string(
        &mut self,
        row: usize,
        col: usize,
        text: &str,
        reversed: bool,
    ) -> TerminalResult<()> {
        self.check(row, col)?;
        for (cell, ch) in self.cells[row][col..].iter_mut().zip(text.chars()) {
            cell.ch = ch;
            cell.reversed = reversed;
        }
        Ok(())
    }

    fn clear(&mut self) {
        for line in &mut self.cells {
            line.fill(Cell::default());
        }
    }

    fn erase_line(&mut self, row: usize) -> TerminalResult<()> {
        self.check(row, 0)?;
        self.cells[row].fill(Cell::default());
        Ok(())
    }

    fn insert_line(&mut self, row: usize) -> TerminalResult<()> {
        self.check(row, 0)?;
        self.cells.pop();
        self.cells.insert(row, vec![Cell::default(); self.size.cols]);
        Ok(())
    }

    fn scroll_up(
        &mut self,
        top: usize,
        left: usize,
        bottom: usize,
        right: usize,
        lines: usize,
    ) -> TerminalResult<()> {
        self.check_region(top, left, bottom, right)?;
        for row in top..=bottom {
            match row.checked_add(lines) {
                Some(source) if source <= bottom => {
                    let moved: Vec<Cell> = self.cells[source][left..=right].to_vec();
                    self.cells[row][left..=right].copy_from_slice(&moved);
                }
                _ => self.blank_span(row, left, right),
            }
        }
        Ok(())
    }

    fn scroll_down(
        &mut self,
        top: usize,
        left: usize,
        bottom: usize,
        right: usize,
        lines: usize,
    ) -> TerminalResult<()> {
        self.check_region(top, left, bottom, right)?;
        for row in (top..=bottom).rev() {
            match row.checked_sub(lines) {
                Some(source) if source >= top => {
                    let moved: Vec<Cell> = self.cells[source][left..=right].to_vec();
                    self.cells[row][left..=right].copy_from_slice(&moved);
                }
                _ => self.blank_span(row, left, right),
            }
        }
        Ok(())
    }

    fn highlight_character(&mut self, row: usize, col: usize) -> TerminalResult<()> {
        self.check(row, col)?;
        let cell = &mut self.cells[row][col];
        cell.highlighted = !cell.highlighted;
        Ok(())
    }

    fn translate(&self, point: DevicePoint) -> CellPosition {
        let col = usize::try_from(point.x / self.cell_width).unwrap_or(0);
        let row = usize::try_from(point.y / self.cell_height).unwrap_or(0);
        CellPosition::new(
            col.min(self.size.cols.saturating_sub(1)),
            row.min(self.size.rows.saturating_sub(1)),
        )
    }

    fn bell(&mut self) {
        self.bells += 1;
    }
}
