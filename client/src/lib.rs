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

//! # Augmented Terminal Client
//!
//! Connects to a host over Telnet and drives a VAT-0 terminal session on a
//! caller supplied [`Screen`](augterm_terminal::Screen).
//!
//! A session is split in two tasks. The reader owns the connection, decodes
//! the host's byte stream and reports Telnet signals to a [`SessionHandler`].
//! The display owner holds the screen and applies decoded instructions,
//! turning key and mouse input into bytes for the host. Screen-changing
//! instructions are applied before the reader decodes anything further.
//!
//! ## Quick Start
//!
//! ```no_run
//! use augterm_client::{ClientConfig, NullHandler, TerminalClient};
//! use augterm_terminal::ScreenBuffer;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TerminalClient::new(ClientConfig::new("localhost", 23));
//!     let session = client
//!         .connect(ScreenBuffer::new_with_size(80, 24), Arc::new(NullHandler))
//!         .await?;
//!
//!     session.key('l').await?;
//!     let screen = session.join().await?;
//!     println!("{}", screen.lines().join("\n"));
//!     Ok(())
//! }
//! ```
//!
//! ## Option Negotiation
//!
//! Options registered through [`ClientConfig::with_option`] are requested in
//! both directions when the connection opens. A connection can also wait for
//! one option to settle:
//!
//! ```no_run
//! # use augterm_client::{ClientConfig, TcpConnection, ClientError};
//! # async fn example() -> Result<(), ClientError> {
//! let mut connection = TcpConnection::connect(&ClientConfig::new("localhost", 23)).await?;
//! if !connection.request_option("ECHO").await? {
//!     println!("Host will not echo");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod connection;
mod display;
mod error;
mod handler;
mod session;

pub use config::{ClientConfig, OptionConfig, TELNET_PORT};
pub use connection::{ConnectionWriter, TcpConnection, TelnetConnection};
pub use error::{ClientError, Result};
pub use handler::{NullHandler, SessionHandler};
pub use session::{SessionHandle, TerminalClient};
