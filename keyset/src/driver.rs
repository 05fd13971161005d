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

//! Async chord keyset driver

use crate::record::RECORD_SIZE;
use crate::{ChordState, JoystickRecord, KeysetError, KeysetEvent, KeysetResult};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, trace};

/// Conventional device path of the gameport adapter.
pub const DEFAULT_DEVICE: &str = "/dev/input/js0";

///
/// Reads joystick records from a device file and turns them into
/// [`KeysetEvent`]s.
///
/// The driver is an owned component: whoever constructs it starts it, and the
/// returned [`KeysetHandle`] stops it.
///
#[derive(Clone, Debug)]
pub struct KeysetDriver {
    device: PathBuf,
}

impl KeysetDriver {
    /// Creates a driver for the given device file.
    pub fn new(device: impl Into<PathBuf>) -> KeysetDriver {
        KeysetDriver {
            device: device.into(),
        }
    }

    /// Device file this driver reads.
    pub fn device(&self) -> &Path {
        &self.device
    }

    /// Fails with [`KeysetError::NotFound`] when the device file is absent.
    pub fn check(&self) -> KeysetResult<()> {
        if self.device.exists() {
            Ok(())
        } else {
            Err(KeysetError::NotFound(self.device.clone()))
        }
    }

    /// Opens the device and spawns the reader task.
    ///
    /// Events are delivered on `events`; the task ends when the handle is
    /// stopped, the receiver goes away, or the device fails.
    pub async fn start(&self, events: mpsc::Sender<KeysetEvent>) -> KeysetResult<KeysetHandle> {
        self.check()?;
        let file = match tokio::fs::File::open(&self.device).await {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(KeysetError::NotFound(self.device.clone()));
            }
            Err(err) => return Err(err.into()),
        };
        info!(device = %self.device.display(), "Chord keyset attached");
        Ok(KeysetHandle::spawn(file, events))
    }
}

impl Default for KeysetDriver {
    fn default() -> Self {
        KeysetDriver::new(DEFAULT_DEVICE)
    }
}

/// Running driver task.
#[derive(Debug)]
pub struct KeysetHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<KeysetResult<()>>,
}

impl KeysetHandle {
    /// Runs the driver loop over any record source.
    pub fn spawn<R>(reader: R, events: mpsc::Sender<KeysetEvent>) -> KeysetHandle
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (shutdown, stop) = oneshot::channel();
        let task = tokio::spawn(run(reader, events, stop));
        KeysetHandle {
            shutdown: Some(shutdown),
            task,
        }
    }

    /// Whether the driver task has ended.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signals the driver to stop and waits for it.
    ///
    /// Returns the error that ended the driver, if it ended on its own.
    pub async fn stop(mut self) -> KeysetResult<()> {
        if let Some(shutdown) = self.shutdown.take() {
            // The task may already be gone.
            let _ = shutdown.send(());
        }
        self.join().await
    }

    /// Waits for the driver task to end without asking it to.
    pub async fn join(self) -> KeysetResult<()> {
        match self.task.await {
            Ok(result) => result,
            Err(err) => Err(KeysetError::Io(std::io::Error::other(err))),
        }
    }
}

/// Driver loop: reads fixed size records until stopped.
///
/// A record identical to the one before it is dropped. Fatal errors are logged
/// here and returned to whoever joins the task.
#[instrument(skip_all)]
pub async fn run<R>(
    mut reader: R,
    events: mpsc::Sender<KeysetEvent>,
    mut stop: oneshot::Receiver<()>,
) -> KeysetResult<()>
where
    R: AsyncRead + Unpin,
{
    let mut state = ChordState::new();
    let mut previous: Option<JoystickRecord> = None;
    let mut buffer = [0u8; RECORD_SIZE];

    loop {
        tokio::select! {
            _ = &mut stop => {
                debug!("Keyset driver stopped");
                return Ok(());
            }
            read = reader.read_exact(&mut buffer) => {
                if let Err(err) = read {
                    let err = KeysetError::from(err);
                    error!("Keyset driver failed: {}", err);
                    return Err(err);
                }
            }
        }

        let record = JoystickRecord::parse(&buffer).inspect_err(|err| {
            error!("Keyset driver failed: {}", err);
        })?;
        if previous == Some(record) {
            continue;
        }
        previous = Some(record);
        trace!(?record, "keyset record");

        let produced = state.process(&record).inspect_err(|err| {
            error!(pressed = state.pressed(), "Keyset driver failed: {}", err);
        })?;
        for event in produced {
            if events.send(event).await.is_err() {
                debug!("Keyset listener went away");
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{JS_EVENT_AXIS, JS_EVENT_BUTTON, JS_EVENT_INIT};
    use tracing_test::traced_test;

    fn record(time: u32, value: i16, kind: u8, number: u8) -> [u8; RECORD_SIZE] {
        let mut bytes = [0u8; RECORD_SIZE];
        bytes[0..4].copy_from_slice(&time.to_le_bytes());
        bytes[4..6].copy_from_slice(&value.to_le_bytes());
        bytes[6] = kind;
        bytes[7] = number;
        bytes
    }

    fn stream(records: &[[u8; RECORD_SIZE]]) -> Vec<u8> {
        records.iter().flatten().copied().collect()
    }

    async fn collect(rx: &mut mpsc::Receiver<KeysetEvent>) -> Vec<KeysetEvent> {
        let mut out = Vec::new();
        while let Some(event) = rx.recv().await {
            out.push(event);
        }
        out
    }

    #[test]
    fn missing_device_is_not_found() {
        let driver = KeysetDriver::new("/nonexistent/augterm/js9");
        assert!(matches!(driver.check(), Err(KeysetError::NotFound(_))));
    }

    #[tokio::test]
    async fn start_on_missing_device_is_not_found() {
        let driver = KeysetDriver::new("/nonexistent/augterm/js9");
        let (tx, _rx) = mpsc::channel(4);
        let result = driver.start(tx).await;
        assert!(matches!(result, Err(KeysetError::NotFound(path)) if path.ends_with("js9")));
    }

    #[tokio::test]
    async fn typed_chords_arrive_in_order_then_eof_is_fatal() {
        let data = stream(&[
            record(0, 0, JS_EVENT_INIT | JS_EVENT_BUTTON, 0),
            record(1, 1, JS_EVENT_BUTTON, 0),
            record(1, 1, JS_EVENT_BUTTON, 0),
            record(2, 0, JS_EVENT_BUTTON, 0),
            record(3, 1, JS_EVENT_BUTTON, 1),
            record(4, -9000, JS_EVENT_AXIS, 0),
            record(5, 0, JS_EVENT_BUTTON, 1),
            record(6, -15000, JS_EVENT_AXIS, 0),
        ]);
        let (tx, mut rx) = mpsc::channel(32);
        let handle = KeysetHandle::spawn(std::io::Cursor::new(data), tx);

        let events = collect(&mut rx).await;
        let typed: Vec<char> = events.iter().filter_map(KeysetEvent::typed).collect();
        assert_eq!(typed, vec!['a', 'r']);
        // duplicate press record dropped
        assert_eq!(
            events[0..2],
            [
                KeysetEvent::Pressed { time: 1, key: 0 },
                KeysetEvent::Released { time: 2, key: 0 }
            ]
        );
        assert!(matches!(handle.join().await, Err(KeysetError::UnexpectedEof)));
    }

    #[tokio::test]
    #[traced_test]
    async fn invalid_record_ends_driver() {
        let data = stream(&[record(1, 5, JS_EVENT_BUTTON, 0)]);
        let (tx, mut rx) = mpsc::channel(4);
        let (_stop_tx, stop) = oneshot::channel();
        let result = run(std::io::Cursor::new(data), tx, stop).await;
        assert!(matches!(
            result,
            Err(KeysetError::InvalidRecord { field: "value", value: 5 })
        ));
        assert!(collect(&mut rx).await.is_empty());
        assert!(logs_contain("Keyset driver failed: invalid value for value: 5"));
    }

    #[tokio::test]
    async fn stop_ends_an_idle_driver() {
        let (_device, reader) = tokio::io::duplex(64);
        let (tx, _rx) = mpsc::channel(4);
        let handle = KeysetHandle::spawn(reader, tx);
        assert!(handle.stop().await.is_ok());
    }
}
