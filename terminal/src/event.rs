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

use crate::VatInstruction;
use augterm_telnetcodec::TelnetEvent;

/// What the VAT-0 decoder hands to its caller.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TerminalEvent {
    /// A complete VAT-0 instruction.
    Instruction(VatInstruction),
    /// A Telnet command or option event from the layer below. Never `Data`.
    Telnet(TelnetEvent),
}
