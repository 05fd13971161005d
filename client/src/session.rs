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

//! Running terminal sessions

use crate::connection::{TcpConnection, TelnetConnection};
use crate::display::{Display, DisplayRequest};
use crate::{ClientConfig, ClientError, Result, SessionHandler};
use augterm_keyset::{KeysetDriver, KeysetEvent, KeysetHandle};
use augterm_telnetcodec::TelnetEvent;
use augterm_terminal::{DevicePoint, MouseButton, Screen, TerminalEvent, TerminalSession, VatInstruction};
use metrics::counter;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::select;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, trace, warn};

/// Capacity of the keyset event queue.
const KEYSET_QUEUE: usize = 32;

#[derive(Debug)]
enum ReaderControl {
    Disconnect,
}

/// Starts terminal sessions.
///
/// Each session runs two tasks. The reader owns the connection and decodes
/// the host's stream; the display owner owns the screen and the terminal
/// state. The reader hands every instruction to the display owner and, for
/// instructions that change the screen, waits until it has been applied
/// before decoding further.
#[derive(Debug, Clone, Default)]
pub struct TerminalClient {
    config: ClientConfig,
}

impl TerminalClient {
    /// Create a client
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Configuration sessions are started with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Connects to the configured host and starts a session on `screen`.
    pub async fn connect<S>(&self, screen: S, handler: Arc<dyn SessionHandler>) -> Result<SessionHandle<S>>
    where
        S: Screen + Send + 'static,
    {
        let connection = TcpConnection::connect(&self.config).await?;
        Ok(self.start(connection, screen, handler).await)
    }

    /// Starts a session over an established connection.
    ///
    /// A configured chord keyset that cannot be opened is reported through
    /// [`SessionHandler::on_keyset_unavailable`] and the session runs without it.
    #[instrument(skip_all, fields(peer = ?connection.peer_addr()))]
    pub async fn start<R, W, S>(
        &self,
        connection: TelnetConnection<R, W>,
        screen: S,
        handler: Arc<dyn SessionHandler>,
    ) -> SessionHandle<S>
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
        S: Screen + Send + 'static,
    {
        let (requests, display_requests) = mpsc::channel(self.config.display_queue.max(1));
        let (control, control_requests) = mpsc::channel(1);

        let display = Display::new(screen, connection.writer(), self.config.escape_wide_coordinates);
        let display = tokio::spawn(display.run(display_requests));

        let keyset = match &self.config.keyset_device {
            Some(device) => attach_keyset(KeysetDriver::new(device), requests.clone(), handler.as_ref()).await,
            None => None,
        };

        handler.on_connect(connection.peer_addr()).await;
        info!("Session started");

        let reader = tokio::spawn(read_loop(
            connection,
            requests.clone(),
            control_requests,
            handler,
            keyset,
        ));

        SessionHandle {
            requests,
            control,
            reader,
            display,
        }
    }
}

async fn attach_keyset<S: Send + 'static>(
    driver: KeysetDriver,
    requests: mpsc::Sender<DisplayRequest<S>>,
    handler: &dyn SessionHandler,
) -> Option<KeysetHandle> {
    let (events, mut received) = mpsc::channel::<KeysetEvent>(KEYSET_QUEUE);
    match driver.start(events).await {
        Ok(keyset) => {
            tokio::spawn(async move {
                while let Some(event) = received.recv().await {
                    if let Some(ch) = event.typed() {
                        if requests.send(DisplayRequest::Key(ch)).await.is_err() {
                            break;
                        }
                    }
                }
                debug!("Keyset forwarding finished");
            });
            Some(keyset)
        }
        Err(err) => {
            warn!(device = %driver.device().display(), "Chord keyset unavailable: {}", err);
            handler.on_keyset_unavailable(&err).await;
            None
        }
    }
}

#[instrument(skip_all, fields(peer = ?connection.peer_addr()))]
async fn read_loop<R, W, S>(
    mut connection: TelnetConnection<R, W>,
    requests: mpsc::Sender<DisplayRequest<S>>,
    mut control: mpsc::Receiver<ReaderControl>,
    handler: Arc<dyn SessionHandler>,
    keyset: Option<KeysetHandle>,
) where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
    S: Send + 'static,
{
    loop {
        select! {
            message = control.recv() => {
                match message {
                    Some(ReaderControl::Disconnect) => info!("Disconnect requested"),
                    None => debug!("Session handle dropped"),
                }
                break;
            }
            event = connection.next_event() => match event {
                Ok(Some(TerminalEvent::Instruction(instruction))) => {
                    if !forward(&requests, instruction).await {
                        debug!("Display task went away");
                        break;
                    }
                }
                Ok(Some(TerminalEvent::Telnet(event))) => dispatch(handler.as_ref(), event).await,
                Ok(None) => {
                    info!("Server closed connection");
                    break;
                }
                Err(err) => {
                    error!("Connection error: {}", err);
                    handler.on_error(&err).await;
                    break;
                }
            },
        }
    }

    if let Some(keyset) = keyset {
        if let Err(err) = keyset.stop().await {
            debug!("Keyset ended with: {}", err);
        }
    }
    connection.close().await;
    if requests.send(DisplayRequest::Disconnected).await.is_err() {
        debug!("Display task already finished");
    }
    counter!("augterm.connections.closed").increment(1);
    info!("Disconnected");
    handler.on_disconnect().await;
}

/// Hands an instruction to the display owner, waiting for screen changes to land.
async fn forward<S>(requests: &mpsc::Sender<DisplayRequest<S>>, instruction: VatInstruction) -> bool {
    if !instruction.mutates_screen() {
        return requests
            .send(DisplayRequest::Apply { instruction, ack: None })
            .await
            .is_ok();
    }
    let (ack, applied) = oneshot::channel();
    let request = DisplayRequest::Apply {
        instruction,
        ack: Some(ack),
    };
    requests.send(request).await.is_ok() && applied.await.is_ok()
}

async fn dispatch(handler: &dyn SessionHandler, event: TelnetEvent) {
    match event {
        TelnetEvent::Command(command) => {
            debug!(command = %command, "Telnet command");
            handler.on_telnet_command(command).await;
        }
        TelnetEvent::Option(option) => {
            debug!(option = option.code, side = %option.side, state = ?option.state, "Option event");
            handler.on_option(option).await;
        }
        TelnetEvent::Data(byte) => trace!(byte, "Stray data event"),
    }
}

///
/// Input side of a running session.
///
/// Key and mouse input is queued to the display owner. Once the session has
/// disconnected, input is accepted but dropped.
///
pub struct SessionHandle<S> {
    requests: mpsc::Sender<DisplayRequest<S>>,
    control: mpsc::Sender<ReaderControl>,
    reader: JoinHandle<()>,
    display: JoinHandle<S>,
}

impl<S> SessionHandle<S>
where
    S: Screen + Send + 'static,
{
    async fn request(&self, request: DisplayRequest<S>) -> Result<()> {
        self.requests
            .send(request)
            .await
            .map_err(|_| ClientError::NotConnected)
    }

    /// Sends a typed character.
    pub async fn key(&self, ch: char) -> Result<()> {
        self.request(DisplayRequest::Key(ch)).await
    }

    /// Reports a button press at a surface point.
    pub async fn mouse_pressed(&self, button: MouseButton, point: DevicePoint) -> Result<()> {
        self.request(DisplayRequest::MousePressed(button, point)).await
    }

    /// Reports a button release.
    pub async fn mouse_released(&self, button: MouseButton) -> Result<()> {
        self.request(DisplayRequest::MouseReleased(button)).await
    }

    /// Reports pointer motion.
    pub async fn mouse_moved(&self, point: DevicePoint) -> Result<()> {
        self.request(DisplayRequest::MouseMoved(point)).await
    }

    /// Reports the pointer leaving the surface.
    pub async fn mouse_exited(&self) -> Result<()> {
        self.request(DisplayRequest::MouseExited).await
    }

    /// Clears the screen and resets the terminal state.
    pub async fn clear(&self) -> Result<()> {
        self.request(DisplayRequest::Clear).await
    }

    /// Runs `f` on the display task with the screen and terminal state.
    pub async fn with_screen<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut S, &TerminalSession) -> T + Send + 'static,
        T: Send + 'static,
    {
        let (reply, result) = oneshot::channel();
        self.request(DisplayRequest::WithScreen(Box::new(move |screen, session| {
            // The caller may have stopped waiting.
            let _ = reply.send(f(screen, session));
        })))
        .await?;
        result.await.map_err(|_| ClientError::NotConnected)
    }

    /// Closes the connection. Does nothing if it is already closed.
    pub async fn disconnect(&self) {
        if self.control.send(ReaderControl::Disconnect).await.is_err() {
            trace!("Session already disconnected");
        }
    }

    /// Whether the connection has closed.
    pub fn is_disconnected(&self) -> bool {
        self.reader.is_finished()
    }

    /// Waits for the connection to close, then returns the screen.
    pub async fn join(self) -> Result<S> {
        let SessionHandle {
            requests,
            control,
            reader,
            display,
        } = self;
        drop(requests);
        let reader_result = reader.await;
        drop(control);
        reader_result.map_err(|err| ClientError::Io(std::io::Error::other(err)))?;
        display
            .await
            .map_err(|err| ClientError::Io(std::io::Error::other(err)))
    }
}
