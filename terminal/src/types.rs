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

/// Screen extents in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TerminalSize {
    /// Number of columns
    pub cols: usize,
    /// Number of rows
    pub rows: usize,
}

impl TerminalSize {
    /// Creates a size from columns and rows.
    pub fn new(cols: usize, rows: usize) -> Self {
        Self { cols, rows }
    }
}

impl Default for TerminalSize {
    fn default() -> Self {
        TerminalSize::new(80, 24)
    }
}

/// A character cell, row 0 being the top line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellPosition {
    /// Column, 0 based from the left
    pub col: usize,
    /// Row, 0 based from the top
    pub row: usize,
}

impl CellPosition {
    /// Creates a position from column and row.
    pub fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

/// A point in the display surface's own coordinate space, such as pixels.
///
/// Only the surface knows how to map it to a cell; see [`crate::Screen::translate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DevicePoint {
    /// Horizontal offset
    pub x: i32,
    /// Vertical offset, growing downwards
    pub y: i32,
}

impl DevicePoint {
    /// Creates a point.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}
