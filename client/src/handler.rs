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

//! Session event handler trait

use crate::ClientError;
use async_trait::async_trait;
use augterm_keyset::KeysetError;
use augterm_telnetcodec::{OptionEvent, TelnetCommand};
use std::net::SocketAddr;

/// Session event handler trait
///
/// Implement this trait to observe a running terminal session. Screen
/// updates are not reported here; they land on the [`Screen`](augterm_terminal::Screen)
/// the session was started with. All methods have default implementations
/// that do nothing.
///
/// # Example
///
/// ```no_run
/// use augterm_client::SessionHandler;
/// use augterm_telnetcodec::TelnetCommand;
/// use async_trait::async_trait;
///
/// struct MyHandler;
///
/// #[async_trait]
/// impl SessionHandler for MyHandler {
///     async fn on_telnet_command(&self, command: TelnetCommand) {
///         println!("Host sent {}", command);
///     }
///
///     async fn on_disconnect(&self) {
///         println!("Disconnected");
///     }
/// }
/// ```
#[async_trait]
pub trait SessionHandler: Send + Sync + 'static {
    /// Called once the session tasks are about to start.
    async fn on_connect(&self, _peer: Option<SocketAddr>) {}

    /// Called after the transport is closed. Input is detached before this runs.
    async fn on_disconnect(&self) {}

    /// Called for every Telnet command the host sends, such as `<AYT>`.
    async fn on_telnet_command(&self, _command: TelnetCommand) {}

    /// Called when an option negotiation step completes or a subnegotiation begins.
    async fn on_option(&self, _event: OptionEvent) {}

    /// Called when a configured chord keyset cannot be used. The session carries on without it.
    async fn on_keyset_unavailable(&self, _error: &KeysetError) {}

    /// Called when the connection fails. The session ends after this returns.
    async fn on_error(&self, _error: &ClientError) {}
}

/// Handler that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullHandler;

impl SessionHandler for NullHandler {}
