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

//! Headless VAT-0 client
//!
//! Connects to a host, forwards stdin lines as typed keys and prints the
//! screen contents once the session ends.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --example headless_client -- localhost 23 [/dev/js0]
//! ```

use async_trait::async_trait;
use augterm_client::{ClientConfig, SessionHandler, TELNET_PORT, TerminalClient};
use augterm_keyset::KeysetError;
use augterm_telnetcodec::TelnetCommand;
use augterm_terminal::ScreenBuffer;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

struct ConsoleHandler;

#[async_trait]
impl SessionHandler for ConsoleHandler {
    async fn on_connect(&self, peer: Option<SocketAddr>) {
        println!("=== Connected to {:?} ===", peer);
        println!("Type lines to send them, Ctrl+C to disconnect.");
    }

    async fn on_disconnect(&self) {
        println!("=== Disconnected ===");
    }

    async fn on_telnet_command(&self, command: TelnetCommand) {
        println!("Host sent {}", command);
    }

    async fn on_keyset_unavailable(&self, error: &KeysetError) {
        println!("Chord keyset unavailable: {}", error);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let host = args.get(1).map(String::as_str).unwrap_or("localhost");
    let port: u16 = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(TELNET_PORT);

    let mut config = ClientConfig::new(host, port);
    if let Some(device) = args.get(3) {
        config = config.with_keyset_device(device);
    }

    let client = TerminalClient::new(config);
    let session = client
        .connect(ScreenBuffer::new(), Arc::new(ConsoleHandler))
        .await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => match line? {
                Some(line) => {
                    for ch in line.chars().chain(std::iter::once('\n')) {
                        if session.key(ch).await.is_err() {
                            break;
                        }
                    }
                }
                None => break,
            },
        }
        if session.is_disconnected() {
            break;
        }
    }

    session.disconnect().await;
    let screen = session.join().await?;
    for line in screen.lines() {
        println!("|{}", line);
    }
    Ok(())
}
