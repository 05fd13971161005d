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

//! Display owner task
//!
//! The only place a session's screen and terminal state are touched. Every
//! other task talks to it through [`DisplayRequest`]s, applied strictly in
//! arrival order.

use crate::connection::ConnectionWriter;
use augterm_terminal::{DevicePoint, MouseButton, Screen, TerminalSession, VatInstruction};
use bytes::BytesMut;
use tokio::io::AsyncWrite;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, trace, warn};

/// Closure run against the screen on the display task.
pub(crate) type ScreenFn<S> = Box<dyn FnOnce(&mut S, &TerminalSession) + Send>;

pub(crate) enum DisplayRequest<S> {
    /// Apply one instruction; `ack` fires once it has taken effect.
    Apply {
        instruction: VatInstruction,
        ack: Option<oneshot::Sender<()>>,
    },
    Key(char),
    MousePressed(MouseButton, DevicePoint),
    MouseReleased(MouseButton),
    MouseMoved(DevicePoint),
    MouseExited,
    Clear,
    WithScreen(ScreenFn<S>),
    /// The transport is gone: detach input and reset.
    Disconnected,
}

pub(crate) struct Display<S, W> {
    screen: S,
    session: TerminalSession,
    writer: ConnectionWriter<W>,
    attached: bool,
    out: BytesMut,
}

impl<S, W> Display<S, W>
where
    S: Screen + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    pub(crate) fn new(screen: S, writer: ConnectionWriter<W>, escape_wide: bool) -> Self {
        let session = TerminalSession::new(&screen).with_escape_wide_coordinates(escape_wide);
        Self {
            screen,
            session,
            writer,
            attached: true,
            out: BytesMut::new(),
        }
    }

    /// Serves requests until every sender is gone, then hands the screen back.
    pub(crate) async fn run(mut self, mut requests: mpsc::Receiver<DisplayRequest<S>>) -> S {
        while let Some(request) = requests.recv().await {
            self.handle(request).await;
        }
        debug!("Display task finished");
        self.screen
    }

    async fn handle(&mut self, request: DisplayRequest<S>) {
        match request {
            DisplayRequest::Apply { instruction, ack } => {
                self.session.apply(&mut self.screen, instruction, &mut self.out);
                self.flush().await;
                if let Some(ack) = ack {
                    // The reader may have gone away while waiting.
                    let _ = ack.send(());
                }
            }
            DisplayRequest::WithScreen(f) => f(&mut self.screen, &self.session),
            DisplayRequest::Disconnected => {
                self.attached = false;
                self.session.reset_emulation(&self.screen);
                info!("Input detached");
            }
            DisplayRequest::Clear => self.session.clear(&mut self.screen),
            input if !self.attached => {
                trace!("Input dropped after disconnect: {}", describe(&input));
            }
            DisplayRequest::Key(ch) => {
                self.session.key_typed(&self.screen, ch, &mut self.out);
                self.flush().await;
            }
            DisplayRequest::MousePressed(button, point) => self.session.mouse_pressed(button, point),
            DisplayRequest::MouseReleased(button) => {
                self.session.mouse_released(&self.screen, button, &mut self.out);
                self.flush().await;
            }
            DisplayRequest::MouseMoved(point) => self.session.mouse_moved(point),
            DisplayRequest::MouseExited => self.session.mouse_exited(),
        }
    }

    async fn flush(&mut self) {
        if self.out.is_empty() {
            return;
        }
        let bytes = self.out.split();
        if let Err(err) = self.writer.send_data(&bytes).await {
            warn!("Dropping {} outbound bytes: {}", bytes.len(), err);
        }
    }
}

fn describe<S>(request: &DisplayRequest<S>) -> &'static str {
    match request {
        DisplayRequest::Apply { .. } => "apply",
        DisplayRequest::Key(_) => "key",
        DisplayRequest::MousePressed(..) => "mouse pressed",
        DisplayRequest::MouseReleased(_) => "mouse released",
        DisplayRequest::MouseMoved(_) => "mouse moved",
        DisplayRequest::MouseExited => "mouse exited",
        DisplayRequest::Clear => "clear",
        DisplayRequest::WithScreen(_) => "with screen",
        DisplayRequest::Disconnected => "disconnected",
    }
}
