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

//! Error types for the chord keyset driver

use std::path::PathBuf;
use thiserror::Error;

/// Result type for keyset operations
pub type KeysetResult<T> = std::result::Result<T, KeysetError>;

/// Keyset driver error types
#[derive(Debug, Error)]
pub enum KeysetError {
    /// The device file does not exist. The keyset is simply not attached.
    #[error("Chord keyset is not connected ({})", .0.display())]
    NotFound(PathBuf),

    /// A joystick record carried a field outside its allowed range.
    #[error("invalid value for {field}: {value}")]
    InvalidRecord {
        /// Name of the offending field
        field: &'static str,
        /// The value that was read
        value: i32,
    },

    /// Accumulated chord bits outside 1..=31.
    #[error("invalid chord value: {0}")]
    InvalidChord(u8),

    /// The device stopped delivering records.
    #[error("keyset device reached end of file")]
    UnexpectedEof,

    /// I/O error reading the device
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),
}

impl KeysetError {
    /// Whether the error ends the driver.
    ///
    /// A missing device only means the keyset is unavailable; everything else
    /// indicates the device or the chord accumulator is in a state it cannot
    /// recover from.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, KeysetError::NotFound(_))
    }
}

impl From<std::io::Error> for KeysetError {
    fn from(error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::UnexpectedEof => KeysetError::UnexpectedEof,
            _ => KeysetError::Io(error),
        }
    }
}
