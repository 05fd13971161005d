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

//! Client error types

use augterm_telnetcodec::CodecError;
use augterm_terminal::TerminalError;
use std::io;

/// Client error type
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The host name did not resolve to any address
    #[error("Unknown host: {0}")]
    UnknownHost(String),

    /// Connection refused
    #[error("Connection refused")]
    ConnectionRefused,

    /// The environment does not allow the connection
    #[error("Connection denied: {0}")]
    AccessDenied(#[source] io::Error),

    /// Connection timeout
    #[error("Connection timeout")]
    ConnectTimeout,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),

    /// Connection closed by server
    #[error("Connection closed by server")]
    ConnectionClosed,

    /// Not connected
    #[error("Not connected")]
    NotConnected,

    /// No option of that name is registered
    #[error("Unknown option: {0}")]
    UnknownOption(String),

    /// Telnet codec error
    #[error("Codec error: {0}")]
    Codec(#[source] CodecError),

    /// Terminal error
    #[error("Terminal error: {0}")]
    Terminal(#[source] TerminalError),
}

impl From<io::Error> for ClientError {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::TimedOut => Self::ConnectTimeout,
            io::ErrorKind::ConnectionRefused => Self::ConnectionRefused,
            io::ErrorKind::PermissionDenied => Self::AccessDenied(error),
            io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::UnexpectedEof => Self::ConnectionClosed,
            _ => Self::Io(error),
        }
    }
}

impl From<CodecError> for ClientError {
    fn from(error: CodecError) -> Self {
        match error {
            CodecError::UnknownOption(name) => Self::UnknownOption(name),
            CodecError::IOError { kind, operation } => io::Error::new(kind, operation).into(),
            other => Self::Codec(other),
        }
    }
}

impl From<TerminalError> for ClientError {
    fn from(error: TerminalError) -> Self {
        match error {
            TerminalError::IOError(err) => err.into(),
            TerminalError::CodecError(err) => err.into(),
            other => Self::Terminal(other),
        }
    }
}

/// Client result type
pub type Result<T> = std::result::Result<T, ClientError>;
