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

/// Result Type for Codec Operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Represents possible errors that can occur in the codec handling process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// An I/O error occurred while reading from or writing to the underlying stream.
    IOError {
        /// The kind of I/O error that occurred
        kind: std::io::ErrorKind,
        /// Description of the operation that failed
        operation: String,
    },

    /// An option with the same code or (case-insensitive) name is already registered.
    DuplicateOption {
        /// Code of the rejected option
        code: u8,
        /// Name of the rejected option
        name: String,
    },

    /// The option instance is already attached to a connection.
    ///
    /// Options carry per-connection negotiation state and may only be attached once.
    AlreadyAssociated(String),

    /// No option with the given name is registered on this connection.
    UnknownOption(String),
}

impl std::error::Error for CodecError {}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::IOError { kind, operation } => {
                write!(f, "I/O error during {}: {:?}", operation, kind)
            }
            CodecError::DuplicateOption { code, name } => {
                write!(f, "Telnet option {} ({}) is already present", name, code)
            }
            CodecError::AlreadyAssociated(name) => {
                write!(f, "Illegal sharing of Telnet option: {}", name)
            }
            CodecError::UnknownOption(name) => write!(f, "Unknown option: {}", name),
        }
    }
}

impl From<std::io::Error> for CodecError {
    fn from(error: std::io::Error) -> Self {
        CodecError::IOError {
            kind: error.kind(),
            operation: error.to_string(),
        }
    }
}
