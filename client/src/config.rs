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

//! Client configuration

use augterm_telnetcodec::TelnetOption;
use augterm_telnetcodec::consts::option;
use std::path::PathBuf;
use std::time::Duration;

/// Well known Telnet port.
pub const TELNET_PORT: u16 = 23;

/// An option to register on every new connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionConfig {
    /// Option code
    pub code: u8,
    /// Display name, unique per connection ignoring case
    pub name: String,
    /// Whether we may perform the option
    pub local: bool,
    /// Whether the peer may perform the option
    pub remote: bool,
}

impl OptionConfig {
    /// Describes an option.
    pub fn new(code: u8, name: impl Into<String>, local: bool, remote: bool) -> Self {
        Self {
            code,
            name: name.into(),
            local,
            remote,
        }
    }

    /// A fresh, unattached option instance.
    pub fn to_option(&self) -> TelnetOption {
        TelnetOption::new(self.code, self.name.clone(), self.local, self.remote)
    }
}

/// Terminal client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server hostname or IP address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Screen rows
    pub rows: usize,

    /// Screen columns
    pub columns: usize,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Bound on `offer_option` and `request_option`
    pub negotiation_timeout: Duration,

    /// Bytes reserved per transport read
    pub read_buffer_size: usize,

    /// Deliver Telnet commands as data bytes
    pub inband_commands: bool,

    /// Options registered on connect
    pub options: Vec<OptionConfig>,

    /// Request every option in both directions right after connecting
    pub negotiate_on_connect: bool,

    /// Send outbound coordinates of 93 and above in the 036 escaped form
    pub escape_wide_coordinates: bool,

    /// Chord keyset device, if one should be attached
    pub keyset_device: Option<PathBuf>,

    /// Capacity of the display request queue
    pub display_queue: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: TELNET_PORT,
            rows: 24,
            columns: 80,
            connect_timeout: Duration::from_secs(10),
            negotiation_timeout: Duration::from_secs(1),
            read_buffer_size: 4096,
            inband_commands: false,
            options: vec![
                OptionConfig::new(option::ECHO, "ECHO", true, true),
                OptionConfig::new(option::SUPPRESS_GO_AHEAD, "SUPPRESS-GO-AHEAD", true, true),
            ],
            negotiate_on_connect: true,
            escape_wide_coordinates: false,
            keyset_device: None,
            display_queue: 64,
        }
    }
}

impl ClientConfig {
    /// Create a new client configuration with the given host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Set the screen size
    pub fn with_screen_size(mut self, columns: usize, rows: usize) -> Self {
        self.columns = columns;
        self.rows = rows;
        self
    }

    /// Set the connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the negotiation timeout
    pub fn with_negotiation_timeout(mut self, timeout: Duration) -> Self {
        self.negotiation_timeout = timeout;
        self
    }

    /// Set the read buffer size
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    /// Deliver Telnet commands in band
    pub fn with_inband_commands(mut self, enabled: bool) -> Self {
        self.inband_commands = enabled;
        self
    }

    /// Replace the registered options
    pub fn with_options(mut self, options: Vec<OptionConfig>) -> Self {
        self.options = options;
        self
    }

    /// Register one more option
    pub fn with_option(mut self, option: OptionConfig) -> Self {
        self.options.push(option);
        self
    }

    /// Enable or disable connect time negotiation
    pub fn with_negotiate_on_connect(mut self, enabled: bool) -> Self {
        self.negotiate_on_connect = enabled;
        self
    }

    /// Select the escaped form for wide outbound coordinates
    pub fn with_escape_wide_coordinates(mut self, enabled: bool) -> Self {
        self.escape_wide_coordinates = enabled;
        self
    }

    /// Attach a chord keyset
    pub fn with_keyset_device(mut self, device: impl Into<PathBuf>) -> Self {
        self.keyset_device = Some(device.into());
        self
    }

    /// Set the display request queue capacity
    pub fn with_display_queue(mut self, capacity: usize) -> Self {
        self.display_queue = capacity;
        self
    }

    /// Get the server address as a string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
