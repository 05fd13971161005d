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

//! Telnet connection over a byte-duplex transport

use crate::{ClientConfig, ClientError, Result};
use augterm_telnetcodec::{OptionState, TelnetCodec, TelnetOption, TelnetSide};
use augterm_terminal::{TerminalEvent, VatCodec};
use bytes::BytesMut;
use metrics::counter;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, lookup_host};
use tokio::sync::Mutex;
use tokio::time::{Instant, timeout, timeout_at};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, error, info, instrument, trace, warn};

/// A connection over TCP.
pub type TcpConnection = TelnetConnection<OwnedReadHalf, OwnedWriteHalf>;

/// Write half of a connection, shared by everything that talks to the host.
///
/// Closing is idempotent and never fails; writes after a close fail with
/// [`ClientError::NotConnected`].
pub struct ConnectionWriter<W> {
    inner: Arc<Mutex<WriterState<W>>>,
}

struct WriterState<W> {
    io: Option<W>,
    encoder: TelnetCodec,
    frame: BytesMut,
}

impl<W> Clone for ConnectionWriter<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<W> ConnectionWriter<W>
where
    W: AsyncWrite + Unpin + Send,
{
    fn new(io: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(WriterState {
                io: Some(io),
                encoder: TelnetCodec::new(),
                frame: BytesMut::new(),
            })),
        }
    }

    /// Sends data bytes, doubling any IAC.
    pub async fn send_data(&self, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        let mut guard = self.inner.lock().await;
        let state = &mut *guard;
        let io = state.io.as_mut().ok_or(ClientError::NotConnected)?;
        state.encoder.encode(data, &mut state.frame)?;
        let frame = state.frame.split();
        write_frame(io, &frame).await
    }

    /// Sends bytes that are already Telnet framed.
    pub async fn send_raw(&self, frame: &[u8]) -> Result<()> {
        if frame.is_empty() {
            return Ok(());
        }
        let mut guard = self.inner.lock().await;
        let io = guard.io.as_mut().ok_or(ClientError::NotConnected)?;
        write_frame(io, frame).await
    }

    /// Shuts the transport down. Errors are logged and swallowed.
    pub async fn close(&self) {
        let taken = self.inner.lock().await.io.take();
        if let Some(mut io) = taken {
            if let Err(err) = io.shutdown().await {
                warn!("Error closing connection: {}", err);
            }
            debug!("Connection closed");
        }
    }

    /// Whether [`close`](Self::close) has run.
    pub async fn is_closed(&self) -> bool {
        self.inner.lock().await.io.is_none()
    }
}

async fn write_frame<W: AsyncWrite + Unpin>(io: &mut W, frame: &[u8]) -> Result<()> {
    trace!(len = frame.len(), "Sending bytes");
    io.write_all(frame).await?;
    io.flush().await?;
    counter!("augterm.bytes.sent").increment(frame.len() as u64);
    Ok(())
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum StreamState {
    Open,
    Ended,
    Closed,
}

///
/// A Telnet connection decoding VAT-0 from its data stream.
///
/// Owns the read half, the option set and the decoder; negotiation replies
/// produced while decoding are written before the event that caused them is
/// handed out. The write half is shared through [`ConnectionWriter`].
///
pub struct TelnetConnection<R, W> {
    reader: R,
    buffer: BytesMut,
    codec: VatCodec<TelnetCodec>,
    pending: VecDeque<TerminalEvent>,
    writer: ConnectionWriter<W>,
    peer: Option<SocketAddr>,
    read_size: usize,
    negotiation_timeout: Duration,
    state: StreamState,
}

impl TcpConnection {
    /// Resolves and connects to the configured host.
    ///
    /// Registers the configured options and, unless disabled, asks for each
    /// of them in both directions without waiting for the answers.
    #[instrument(skip(config), fields(address = %config.address()))]
    pub async fn connect(config: &ClientConfig) -> Result<TcpConnection> {
        let address = config.address();
        info!("Connecting to {}", address);

        let addresses: Vec<SocketAddr> = match lookup_host(&address).await {
            Ok(addresses) => addresses.collect(),
            Err(err) => {
                error!("Cannot resolve {}: {}", config.host, err);
                return Err(ClientError::UnknownHost(config.host.clone()));
            }
        };
        if addresses.is_empty() {
            error!("No addresses for {}", config.host);
            return Err(ClientError::UnknownHost(config.host.clone()));
        }

        let stream = match timeout(config.connect_timeout, TcpStream::connect(&addresses[..])).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(err)) => {
                let err = ClientError::from(err);
                error!("Connection failed: {}", err);
                return Err(err);
            }
            Err(_) => {
                error!("Connection timed out after {:?}", config.connect_timeout);
                return Err(ClientError::ConnectTimeout);
            }
        };

        let peer = stream.peer_addr()?;
        info!(peer = %peer, "Connected");
        counter!("augterm.connections.total").increment(1);

        let (reader, writer) = stream.into_split();
        let mut connection = TelnetConnection::wrap(reader, writer, config)?;
        connection.peer = Some(peer);
        if config.negotiate_on_connect {
            connection.negotiate_on_connect().await?;
        }
        Ok(connection)
    }
}

impl<R, W> TelnetConnection<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Wraps an already connected transport.
    pub fn wrap(reader: R, writer: W, config: &ClientConfig) -> Result<Self> {
        let mut telnet = TelnetCodec::new();
        telnet.set_inband_commands(config.inband_commands);
        for option in &config.options {
            telnet.add_option(option.to_option())?;
        }
        Ok(Self {
            reader,
            buffer: BytesMut::with_capacity(config.read_buffer_size),
            codec: VatCodec::new(telnet),
            pending: VecDeque::new(),
            writer: ConnectionWriter::new(writer),
            peer: None,
            read_size: config.read_buffer_size.max(1),
            negotiation_timeout: config.negotiation_timeout,
            state: StreamState::Open,
        })
    }

    /// Address of the host, for TCP connections.
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer
    }

    /// Shared write half.
    pub fn writer(&self) -> ConnectionWriter<W> {
        self.writer.clone()
    }

    /// Registered option by name, ignoring case.
    pub fn option(&self, name: &str) -> Option<&TelnetOption> {
        self.codec.codec().option(name)
    }

    /// Every registered option.
    pub fn options(&self) -> impl Iterator<Item = &TelnetOption> {
        self.codec.codec().options().iter()
    }

    /// Asks for every registered option in both directions.
    pub async fn negotiate_on_connect(&mut self) -> Result<()> {
        let names: Vec<String> = self.options().map(|option| option.name().to_string()).collect();
        let telnet = self.codec.codec_mut();
        for name in &names {
            telnet.request(name, TelnetSide::Remote, true)?;
            telnet.request(name, TelnetSide::Local, true)?;
        }
        self.flush_replies().await
    }

    /// Offers to perform an option and waits for the host's answer.
    ///
    /// Returns whether we ended up performing it. Gives up after the
    /// negotiation timeout with whatever state the option is in.
    pub async fn offer_option(&mut self, name: &str) -> Result<bool> {
        self.negotiate(name, TelnetSide::Local).await
    }

    /// Asks the host to perform an option and waits for its answer.
    pub async fn request_option(&mut self, name: &str) -> Result<bool> {
        self.negotiate(name, TelnetSide::Remote).await
    }

    #[instrument(skip(self))]
    async fn negotiate(&mut self, name: &str, side: TelnetSide) -> Result<bool> {
        if self.state != StreamState::Open {
            return Err(ClientError::NotConnected);
        }
        self.codec.codec_mut().request(name, side, true)?;
        self.flush_replies().await?;

        let deadline = Instant::now() + self.negotiation_timeout;
        loop {
            self.decode_buffered().await?;
            let state = self
                .option(name)
                .map_or(OptionState::Disabled, |option| option.state(side));
            if state != OptionState::Unstable {
                debug!(?state, "Negotiation settled");
                return Ok(state == OptionState::Enabled);
            }
            match timeout_at(deadline, self.fill()).await {
                Ok(Ok(true)) => {}
                Ok(Ok(false)) => {
                    self.end_of_stream()?;
                    return Ok(false);
                }
                Ok(Err(err)) => return Err(err),
                Err(_) => {
                    debug!("Negotiation timed out");
                    return Ok(false);
                }
            }
        }
    }

    /// Next event from the host, `None` once at end of stream.
    ///
    /// Calls after the end has been reported, or after [`close`](Self::close),
    /// fail with [`ClientError::NotConnected`].
    pub async fn next_event(&mut self) -> Result<Option<TerminalEvent>> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Ok(Some(event));
            }
            match self.state {
                StreamState::Closed => return Err(ClientError::NotConnected),
                StreamState::Ended => {
                    self.state = StreamState::Closed;
                    return Ok(None);
                }
                StreamState::Open => {}
            }
            let decoded = self.codec.decode(&mut self.buffer)?;
            self.flush_replies().await?;
            if let Some(event) = decoded {
                return Ok(Some(event));
            }
            if !self.fill().await? {
                self.end_of_stream()?;
            }
        }
    }

    /// Sends data bytes, doubling any IAC.
    pub async fn send_data(&self, data: &[u8]) -> Result<()> {
        self.writer.send_data(data).await
    }

    /// Closes the transport. Further reads and negotiations fail.
    pub async fn close(&mut self) {
        self.state = StreamState::Closed;
        self.writer.close().await;
    }

    async fn decode_buffered(&mut self) -> Result<()> {
        while let Some(event) = self.codec.decode(&mut self.buffer)? {
            self.pending.push_back(event);
        }
        self.flush_replies().await
    }

    fn end_of_stream(&mut self) -> Result<()> {
        while let Some(event) = self.codec.decode_eof(&mut self.buffer)? {
            self.pending.push_back(event);
        }
        self.buffer.clear();
        self.state = StreamState::Ended;
        Ok(())
    }

    async fn fill(&mut self) -> Result<bool> {
        self.buffer.reserve(self.read_size);
        let read = self.reader.read_buf(&mut self.buffer).await?;
        if read == 0 {
            debug!("Connection stream ended");
            return Ok(false);
        }
        trace!(read, "Received bytes");
        counter!("augterm.bytes.received").increment(read as u64);
        Ok(true)
    }

    async fn flush_replies(&mut self) -> Result<()> {
        let telnet = self.codec.codec_mut();
        if telnet.has_pending_replies() {
            let replies = telnet.take_replies();
            counter!("augterm.negotiations.sent").increment(1);
            self.writer.send_raw(&replies).await?;
        }
        Ok(())
    }
}
