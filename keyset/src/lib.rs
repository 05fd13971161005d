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

//! # Augterm Chord Keyset
//!
//! Driver for the five key Augment chord keyset attached through a gameport
//! adapter. Keys 0 through 3 arrive as joystick buttons and key 4 as the X
//! axis; a chord is typed when every key of it has been released.
//!
//! The chord accumulator ([`ChordState`]) is independent of any device and can
//! be fed [`JoystickRecord`]s directly. [`KeysetDriver`] wraps it around a
//! device file and delivers [`KeysetEvent`]s on a channel.
//!
//! ```no_run
//! use augterm_keyset::{KeysetDriver, KeysetEvent};
//! use tokio::sync::mpsc;
//!
//! # async fn example() -> augterm_keyset::KeysetResult<()> {
//! let (tx, mut rx) = mpsc::channel(16);
//! let handle = KeysetDriver::new("/dev/input/js0").start(tx).await?;
//! while let Some(event) = rx.recv().await {
//!     if let KeysetEvent::Typed { ch, .. } = event {
//!         println!("typed {:?}", ch);
//!     }
//! }
//! handle.stop().await
//! # }
//! ```

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

mod charmap;
mod chord;
mod driver;
mod event;
mod record;
mod result;

pub use self::charmap::{CASE0, CASE1, CASE2, UNMAPPED, chord_char, shift_symbol, shift_upper};
pub use self::chord::{AXIS_THRESHOLD, ChordState};
pub use self::driver::{DEFAULT_DEVICE, KeysetDriver, KeysetHandle, run};
pub use self::event::{AXIS_KEY, KeysetEvent};
pub use self::record::{JS_EVENT_AXIS, JS_EVENT_BUTTON, JS_EVENT_INIT, JoystickRecord, RECORD_SIZE};
pub use self::result::{KeysetError, KeysetResult};
