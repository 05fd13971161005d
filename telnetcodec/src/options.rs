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

use crate::{CodecError, CodecResult, TelnetOption};
use std::fmt::Formatter;

/// The set of options registered on one connection.
///
/// Codes and names are unique within a set; names compare case-insensitively.
/// An option is attached exactly once: adding an instance that is already
/// associated with a connection fails.
#[derive(Clone, Debug, Default)]
pub struct TelnetOptions {
    options: Vec<TelnetOption>,
}

impl TelnetOptions {
    /// Creates an empty option set.
    pub fn new() -> Self {
        TelnetOptions::default()
    }

    /// Registers an option.
    pub fn add(&mut self, mut option: TelnetOption) -> CodecResult<()> {
        if self.get(option.code()).is_some() || self.by_name(option.name()).is_some() {
            return Err(CodecError::DuplicateOption {
                code: option.code(),
                name: option.name().to_string(),
            });
        }
        option.associate()?;
        self.options.push(option);
        Ok(())
    }

    /// Looks an option up by code.
    pub fn get(&self, code: u8) -> Option<&TelnetOption> {
        self.options.iter().find(|opt| opt.code() == code)
    }

    /// Looks an option up by code for negotiation.
    pub fn get_mut(&mut self, code: u8) -> Option<&mut TelnetOption> {
        self.options.iter_mut().find(|opt| opt.code() == code)
    }

    /// Looks an option up by name, ignoring case.
    pub fn by_name(&self, name: &str) -> Option<&TelnetOption> {
        self.options
            .iter()
            .find(|opt| opt.name().eq_ignore_ascii_case(name))
    }

    /// Looks an option up by name, ignoring case, for negotiation.
    pub fn by_name_mut(&mut self, name: &str) -> Option<&mut TelnetOption> {
        self.options
            .iter_mut()
            .find(|opt| opt.name().eq_ignore_ascii_case(name))
    }

    /// Registered options in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TelnetOption> {
        self.options.iter()
    }

    /// Number of registered options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Whether no options are registered.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// Which end of the connection an option applies to.
///
/// `Local` is what we perform (negotiated with DO/DONT received, WILL/WONT
/// sent). `Remote` is what the peer performs (WILL/WONT received, DO/DONT
/// sent).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TelnetSide {
    /// The local side of the Telnet connection
    Local,
    /// The remote side of the Telnet connection
    Remote,
}

impl std::fmt::Display for TelnetSide {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TelnetSide::Local => write!(f, "Local"),
            TelnetSide::Remote => write!(f, "Remote"),
        }
    }
}
