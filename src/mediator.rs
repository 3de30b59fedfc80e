use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::debug;

use crate::error::KeyOutOfRange;
use crate::frame::FrameBuffer;

/// keys on the hex keypad, 0x0 to 0xF
pub const KEY_COUNT: usize = 16;

/// pressed state for every key, indexed by key code
pub type KeyMatrix = [bool; KEY_COUNT];

/// how a bounded key wait ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyWait {
    Pressed(u8),
    TimedOut,
    Stopped,
}

/// everything the two threads share
struct Shared {
    keys: KeyMatrix,
    frame: FrameBuffer,
    frame_dirty: bool,
    sound_active: bool,
    stop_requested: bool,
}

/// Sits between the interpreter thread and whatever presents its output.
///
/// All state lives behind one lock. Only the key waits ever block; they
/// sleep on a condition variable that `set_keys` and `request_stop` signal.
/// Frames are fire-and-forget: publishing never waits for a consumer.
pub struct Mediator {
    shared: Mutex<Shared>,
    keys_changed: Condvar,
}

impl Mediator {
    pub fn new() -> Self {
        Mediator {
            shared: Mutex::new(Shared {
                keys: [false; KEY_COUNT],
                frame: FrameBuffer::new(),
                frame_dirty: false,
                sound_active: false,
                stop_requested: false,
            }),
            keys_changed: Condvar::new(),
        }
    }

    // the shared record is plain data, so a panic elsewhere can't leave it
    // half-updated in a way that matters; carry on with what's there
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// replace the latest frame and mark it unread
    pub fn publish_frame(&self, frame: &FrameBuffer) {
        let mut shared = self.lock();
        shared.frame.clone_from(frame);
        shared.frame_dirty = true;
    }

    /// take a copy of the latest frame and mark it read
    pub fn consume_frame(&self) -> FrameBuffer {
        let mut shared = self.lock();
        shared.frame_dirty = false;
        shared.frame.clone()
    }

    /// has a frame been published since the last `consume_frame`
    pub fn is_frame_dirty(&self) -> bool {
        self.lock().frame_dirty
    }

    /// replace the whole key matrix and wake anything waiting on a key
    pub fn set_keys(&self, keys: KeyMatrix) {
        self.lock().keys = keys;
        self.keys_changed.notify_all();
    }

    pub fn is_key_down(&self, key: u8) -> Result<bool, KeyOutOfRange> {
        let shared = self.lock();
        shared
            .keys
            .get(key as usize)
            .copied()
            .ok_or(KeyOutOfRange(key))
    }

    pub fn is_key_up(&self, key: u8) -> Result<bool, KeyOutOfRange> {
        self.is_key_down(key).map(|down| !down)
    }

    /// Block until at least one key is down and return the lowest such code.
    /// Returns `None` if a stop is requested first, or while waiting.
    pub fn await_key_press(&self) -> Option<u8> {
        let shared = self.lock();
        let shared = self
            .keys_changed
            .wait_while(shared, |s| !s.stop_requested && !s.keys.contains(&true))
            .unwrap_or_else(PoisonError::into_inner);
        if shared.stop_requested {
            return None;
        }
        shared.keys.iter().position(|&down| down).map(|k| k as u8)
    }

    /// As `await_key_press`, but gives up after `timeout` so the caller can
    /// get on with timekeeping and wait again.
    pub fn await_key_press_for(&self, timeout: Duration) -> KeyWait {
        let shared = self.lock();
        let (shared, _) = self
            .keys_changed
            .wait_timeout_while(shared, timeout, |s| {
                !s.stop_requested && !s.keys.contains(&true)
            })
            .unwrap_or_else(PoisonError::into_inner);
        if shared.stop_requested {
            return KeyWait::Stopped;
        }
        match shared.keys.iter().position(|&down| down) {
            Some(k) => KeyWait::Pressed(k as u8),
            None => KeyWait::TimedOut,
        }
    }

    /// ask the interpreter to finish; wakes a pending `await_key_press` and
    /// silences sound. calling it again does nothing more
    pub fn request_stop(&self) {
        {
            let mut shared = self.lock();
            if !shared.stop_requested {
                debug!("stop requested");
            }
            shared.stop_requested = true;
            shared.sound_active = false;
        }
        self.keys_changed.notify_all();
    }

    pub fn should_stop(&self) -> bool {
        self.lock().stop_requested
    }

    /// once stopped, sound stays off
    pub fn set_sound_active(&self, active: bool) {
        let mut shared = self.lock();
        shared.sound_active = active && !shared.stop_requested;
    }

    pub fn is_sound_active(&self) -> bool {
        self.lock().sound_active
    }
}

impl Default for Mediator {
    fn default() -> Self {
        Self::new()
    }
}
