use std::collections::{HashMap, VecDeque};
use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use crossterm::terminal;
use log::debug;

use crate::mediator::{KeyMatrix, KEY_COUNT};

/// map the left-hand side of a qwerty keyboard onto the COSMAC hex pad:
///   1 2 3 4      1 2 3 C
///   q w e r  =>  4 5 6 D
///   a s d f      7 8 9 E
///   z x c v      A 0 B F
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00), // x
    ('1', 0x01), // 1
    ('2', 0x02), // 2
    ('3', 0x03), // 3
    ('q', 0x04), // q
    ('w', 0x05), // w
    ('e', 0x06), // e
    ('a', 0x07), // a
    ('s', 0x08), // s
    ('d', 0x09), // d
    ('z', 0x0a), // z
    ('c', 0x0b), // c
    ('4', 0x0c), // 4
    ('r', 0x0d), // r
    ('f', 0x0e), // f
    ('v', 0x0f), // v
];

/// what the keyboard looks like right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputEvent {
    pub keys: KeyMatrix,
    /// the user wants out
    pub quit: bool,
}

/// reads keypresses
pub trait Input {
    /// drain pending events and report the current key state
    fn poll(&mut self) -> Result<InputEvent, io::Error>;
}

/// Terminals only tell us when a key goes down (and again on auto-repeat),
/// never when it comes back up. So a key counts as held for a short window
/// after its most recent press event.
pub struct KeyLatch {
    pressed_at: [Option<Instant>; KEY_COUNT],
    hold: Duration,
}

impl KeyLatch {
    pub fn new(hold: Duration) -> Self {
        KeyLatch {
            pressed_at: [None; KEY_COUNT],
            hold,
        }
    }

    pub fn press(&mut self, key: u8, now: Instant) {
        if let Some(slot) = self.pressed_at.get_mut(key as usize) {
            *slot = Some(now);
        }
    }

    pub fn matrix(&self, now: Instant) -> KeyMatrix {
        let mut keys = [false; KEY_COUNT];
        for (down, pressed_at) in keys.iter_mut().zip(self.pressed_at.iter()) {
            *down = pressed_at.map_or(false, |t| now.saturating_duration_since(t) < self.hold);
        }
        keys
    }
}

/// Input from the terminal, via crossterm in raw mode
pub struct TermInput {
    latch: KeyLatch,
    keymap: HashMap<char, u8>,
}

impl TermInput {
    pub fn new(hold: Duration) -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(TermInput {
            latch: KeyLatch::new(hold),
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
        })
    }
}

impl Drop for TermInput {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl Input for TermInput {
    fn poll(&mut self) -> Result<InputEvent, io::Error> {
        let mut quit = false;
        while poll(Duration::from_millis(0))? {
            let now = Instant::now();
            match read()? {
                Event::Key(evt) => match evt.code {
                    KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                        quit = true
                    }
                    KeyCode::Char(key) => match self.keymap.get(&key.to_ascii_lowercase()) {
                        Some(&mapped_key) => self.latch.press(mapped_key, now),
                        None => debug!("can't map {:?} to a COSMAC key", key),
                    },
                    KeyCode::Esc => quit = true,
                    code => debug!("ignoring key {:?}", code),
                },
                // resizes and mouse movement
                _ => {}
            }
        }
        Ok(InputEvent {
            keys: self.latch.matrix(Instant::now()),
            quit,
        })
    }
}

/// dummy Input implementation for testing: plays back a script of events,
/// then asks to quit once the script runs out
pub struct DummyInput {
    events: VecDeque<InputEvent>,
}

impl DummyInput {
    pub fn new(events: &[InputEvent]) -> Self {
        DummyInput {
            events: events.iter().copied().collect(),
        }
    }
}

impl Input for DummyInput {
    fn poll(&mut self) -> Result<InputEvent, io::Error> {
        Ok(self.events.pop_front().unwrap_or(InputEvent {
            keys: [false; KEY_COUNT],
            quit: true,
        }))
    }
}
