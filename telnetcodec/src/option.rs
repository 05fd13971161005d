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

use crate::{CodecError, CodecResult, TelnetFrame, TelnetSide};

/// A single negotiable Telnet option bound to one connection.
///
/// Each option tracks two independent RFC 1143 "Q method" state machines:
/// `us` for the local side (what we perform, driven by DO/DONT) and `him`
/// for the remote side (what the peer performs, driven by WILL/WONT). Both
/// only ever move through the negotiation engine; callers may *request* a
/// desired state with [`TelnetOption::request_local`] and
/// [`TelnetOption::request_remote`], never set one.
///
/// Support flags are fixed at construction. A WILL or DO received for a side
/// we do not support is refused without touching the state.
#[derive(Clone, Debug)]
pub struct TelnetOption {
    code: u8,
    name: String,
    local_support: bool,
    remote_support: bool,
    us: HalfOption,
    him: HalfOption,
    associated: bool,
}

impl TelnetOption {
    /// Creates an option in the NO/NO state.
    pub fn new(code: u8, name: impl Into<String>, local_support: bool, remote_support: bool) -> Self {
        TelnetOption {
            code,
            name: name.into(),
            local_support,
            remote_support,
            us: HalfOption::default(),
            him: HalfOption::default(),
            associated: false,
        }
    }

    /// Numeric option code.
    pub fn code(&self) -> u8 {
        self.code
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether we are willing to perform this option.
    pub fn is_supported_locally(&self) -> bool {
        self.local_support
    }

    /// Whether we allow the peer to perform this option.
    pub fn is_supported_remotely(&self) -> bool {
        self.remote_support
    }

    /// Externally visible state of the local side.
    pub fn local_state(&self) -> OptionState {
        self.us.state.into()
    }

    /// Externally visible state of the remote side.
    pub fn remote_state(&self) -> OptionState {
        self.him.state.into()
    }

    /// Externally visible state of either side.
    pub fn state(&self, side: TelnetSide) -> OptionState {
        match side {
            TelnetSide::Local => self.local_state(),
            TelnetSide::Remote => self.remote_state(),
        }
    }

    /// Whether we perform the option.
    pub fn is_enabled_locally(&self) -> bool {
        self.local_state() == OptionState::Enabled
    }

    /// Whether we do not perform the option.
    pub fn is_disabled_locally(&self) -> bool {
        self.local_state() == OptionState::Disabled
    }

    /// Whether a local negotiation is in flight.
    pub fn is_unstable_locally(&self) -> bool {
        self.local_state() == OptionState::Unstable
    }

    /// Whether the peer performs the option.
    pub fn is_enabled_remotely(&self) -> bool {
        self.remote_state() == OptionState::Enabled
    }

    /// Whether the peer does not perform the option.
    pub fn is_disabled_remotely(&self) -> bool {
        self.remote_state() == OptionState::Disabled
    }

    /// Whether a remote negotiation is in flight.
    pub fn is_unstable_remotely(&self) -> bool {
        self.remote_state() == OptionState::Unstable
    }

    /// Raw Q-method state of the local side.
    pub fn us(&self) -> QState {
        self.us.state
    }

    /// Raw Q-method state of the remote side.
    pub fn him(&self) -> QState {
        self.him.state
    }

    /// Whether an opposite local request is queued behind the one in flight.
    pub fn us_queued(&self) -> bool {
        self.us.queued
    }

    /// Whether an opposite remote request is queued behind the one in flight.
    pub fn him_queued(&self) -> bool {
        self.him.queued
    }

    /// Whether this instance has been attached to a connection.
    pub fn is_associated(&self) -> bool {
        self.associated
    }

    /// Asks to enable or disable the option on our side.
    ///
    /// Returns the verb to send, if any. Asking to enable an option we do not
    /// support locally is treated as a request to disable it.
    pub fn request_local(&mut self, enable: bool) -> NegotiationAction {
        let verdict = self.us.request(enable && self.local_support);
        verdict.for_side(TelnetSide::Local)
    }

    /// Asks the peer to enable or disable the option on its side.
    pub fn request_remote(&mut self, enable: bool) -> NegotiationAction {
        let verdict = self.him.request(enable && self.remote_support);
        verdict.for_side(TelnetSide::Remote)
    }

    /// Peer sent `WILL <code>`.
    pub(crate) fn received_will(&mut self) -> NegotiationAction {
        self.him
            .received_enable(self.remote_support)
            .for_side(TelnetSide::Remote)
    }

    /// Peer sent `WONT <code>`.
    pub(crate) fn received_wont(&mut self) -> NegotiationAction {
        self.him
            .received_disable(self.remote_support)
            .for_side(TelnetSide::Remote)
    }

    /// Peer sent `DO <code>`.
    pub(crate) fn received_do(&mut self) -> NegotiationAction {
        self.us
            .received_enable(self.local_support)
            .for_side(TelnetSide::Local)
    }

    /// Peer sent `DONT <code>`.
    pub(crate) fn received_dont(&mut self) -> NegotiationAction {
        self.us
            .received_disable(self.local_support)
            .for_side(TelnetSide::Local)
    }

    /// Marks the option as attached, failing if it already was.
    pub(crate) fn associate(&mut self) -> CodecResult<()> {
        if self.associated {
            return Err(CodecError::AlreadyAssociated(self.name.clone()));
        }
        self.associated = true;
        Ok(())
    }
}

impl std::fmt::Display for TelnetOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Reply the negotiation engine wants written to the wire.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NegotiationAction {
    /// Nothing to send.
    Ignore,
    /// Send `IAC WILL <code>`.
    SendWill,
    /// Send `IAC WONT <code>`.
    SendWont,
    /// Send `IAC DO <code>`.
    SendDo,
    /// Send `IAC DONT <code>`.
    SendDont,
}

impl NegotiationAction {
    /// Builds the reply frame for `code`, or `None` for [`NegotiationAction::Ignore`].
    pub fn frame(self, code: u8) -> Option<TelnetFrame> {
        match self {
            NegotiationAction::Ignore => None,
            NegotiationAction::SendWill => Some(TelnetFrame::Will(code)),
            NegotiationAction::SendWont => Some(TelnetFrame::Wont(code)),
            NegotiationAction::SendDo => Some(TelnetFrame::Do(code)),
            NegotiationAction::SendDont => Some(TelnetFrame::Dont(code)),
        }
    }

    /// Whether no reply is sent.
    pub fn is_ignore(self) -> bool {
        self == NegotiationAction::Ignore
    }
}

/// Externally visible negotiation status of one side of an option.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum OptionState {
    /// Settled off.
    Disabled,
    /// Settled on.
    Enabled,
    /// A negotiation is in flight.
    Unstable,
}

impl From<QState> for OptionState {
    fn from(state: QState) -> Self {
        match state {
            QState::No => OptionState::Disabled,
            QState::Yes => OptionState::Enabled,
            QState::WantNo | QState::WantYes => OptionState::Unstable,
        }
    }
}

impl std::fmt::Display for OptionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionState::Disabled => write!(f, "disabled"),
            OptionState::Enabled => write!(f, "enabled"),
            OptionState::Unstable => write!(f, "unstable"),
        }
    }
}

/// RFC 1143 per-side state.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum QState {
    /// Option is disabled.
    #[default]
    No,
    /// Option is enabled.
    Yes,
    /// We sent a disable request and are waiting for the answer.
    WantNo,
    /// We sent an enable request and are waiting for the answer.
    WantYes,
}

impl std::fmt::Display for QState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QState::No => write!(f, "NO"),
            QState::Yes => write!(f, "YES"),
            QState::WantNo => write!(f, "WANTNO"),
            QState::WantYes => write!(f, "WANTYES"),
        }
    }
}

/// Side-neutral outcome, turned into a verb by [`Verdict::for_side`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Verdict {
    Ignore,
    Agree,
    Refuse,
}

impl Verdict {
    fn for_side(self, side: TelnetSide) -> NegotiationAction {
        match (self, side) {
            (Verdict::Ignore, _) => NegotiationAction::Ignore,
            (Verdict::Agree, TelnetSide::Local) => NegotiationAction::SendWill,
            (Verdict::Refuse, TelnetSide::Local) => NegotiationAction::SendWont,
            (Verdict::Agree, TelnetSide::Remote) => NegotiationAction::SendDo,
            (Verdict::Refuse, TelnetSide::Remote) => NegotiationAction::SendDont,
        }
    }
}

/// One direction of the Q method: a state plus a one-bit queue that is only
/// meaningful while the state is WANTNO or WANTYES.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
struct HalfOption {
    state: QState,
    queued: bool,
}

impl HalfOption {
    /// Peer announced or asked for the enabled state (WILL for him, DO for us).
    fn received_enable(&mut self, supported: bool) -> Verdict {
        if !supported {
            return Verdict::Refuse;
        }
        match self.state {
            QState::No => {
                self.state = QState::Yes;
                Verdict::Agree
            }
            QState::Yes => Verdict::Ignore,
            QState::WantNo => {
                // Our disable was answered with an enable.
                self.state = if self.queued { QState::Yes } else { QState::No };
                self.queued = false;
                Verdict::Ignore
            }
            QState::WantYes if self.queued => {
                self.state = QState::WantNo;
                self.queued = false;
                Verdict::Refuse
            }
            QState::WantYes => {
                self.state = QState::Yes;
                Verdict::Ignore
            }
        }
    }

    /// Peer announced or asked for the disabled state (WONT for him, DONT for us).
    fn received_disable(&mut self, supported: bool) -> Verdict {
        if !supported {
            return Verdict::Ignore;
        }
        match self.state {
            QState::No => Verdict::Ignore,
            QState::Yes => {
                self.state = QState::No;
                Verdict::Refuse
            }
            QState::WantNo if self.queued => {
                self.state = QState::WantYes;
                self.queued = false;
                Verdict::Agree
            }
            QState::WantNo => {
                self.state = QState::No;
                Verdict::Ignore
            }
            QState::WantYes => {
                self.state = QState::No;
                self.queued = false;
                Verdict::Ignore
            }
        }
    }

    /// Local request for a new state. Never interleaves with one in flight.
    fn request(&mut self, enable: bool) -> Verdict {
        match (enable, self.state) {
            (true, QState::No) => {
                self.state = QState::WantYes;
                Verdict::Agree
            }
            (false, QState::Yes) => {
                self.state = QState::WantNo;
                Verdict::Refuse
            }
            (true, QState::Yes) | (false, QState::No) => Verdict::Ignore,
            (true, QState::WantNo) | (false, QState::WantYes) => {
                self.queued = true;
                Verdict::Ignore
            }
            (true, QState::WantYes) | (false, QState::WantNo) => {
                self.queued = false;
                Verdict::Ignore
            }
        }
    }
}
