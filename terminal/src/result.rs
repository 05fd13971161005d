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

use augterm_telnetcodec::CodecError;

/// Result type for the terminal
pub type TerminalResult<T> = Result<T, TerminalError>;

/// Errors raised by the terminal layer and its screen surfaces.
#[derive(Debug)]
pub enum TerminalError {
    /// A cell outside the screen was addressed.
    OutOfBounds {
        /// Row that was addressed
        row: usize,
        /// Column that was addressed
        col: usize,
    },
    /// The Telnet layer below failed.
    CodecError(CodecError),
    /// Transport failure.
    IOError(std::io::Error),
}

impl std::fmt::Display for TerminalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminalError::OutOfBounds { row, col } => {
                write!(f, "Bad location: row {} column {}", row, col)
            }
            TerminalError::CodecError(err) => write!(f, "Telnet codec error: {}", err),
            TerminalError::IOError(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for TerminalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TerminalError::OutOfBounds { .. } => None,
            TerminalError::CodecError(err) => Some(err),
            TerminalError::IOError(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for TerminalError {
    fn from(error: std::io::Error) -> Self {
        TerminalError::IOError(error)
    }
}

impl From<CodecError> for TerminalError {
    fn from(error: CodecError) -> Self {
        TerminalError::CodecError(error)
    }
}
