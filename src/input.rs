use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::geometry::Direction;

/// Prefix bytes announcing a two-byte special key.
pub const SPECIAL_PREFIXES: [u8; 2] = [0, 224];

pub const UP_ARROW: u8 = 72;
pub const DOWN_ARROW: u8 = 80;
pub const LEFT_ARROW: u8 = 75;
pub const RIGHT_ARROW: u8 = 77;

const CTRL_C: u8 = 3;
const ESC: u8 = 27;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyEvent {
    Plain(char),
    /// Second byte of a prefixed special-key sequence.
    Special(u8),
    /// Ctrl+C or Esc.
    Interrupt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    Quit,
}

impl KeyEvent {
    pub fn command(&self) -> Option<Command> {
        match self {
            KeyEvent::Special(UP_ARROW) => Some(Command::Turn(Direction::Up)),
            KeyEvent::Special(DOWN_ARROW) => Some(Command::Turn(Direction::Down)),
            KeyEvent::Special(LEFT_ARROW) => Some(Command::Turn(Direction::Left)),
            KeyEvent::Special(RIGHT_ARROW) => Some(Command::Turn(Direction::Right)),
            KeyEvent::Interrupt => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Decodes a raw console byte stream. A dangling prefix at the end is dropped.
pub fn decode_scancodes(bytes: &[u8]) -> Vec<KeyEvent> {
    let mut keys = Vec::new();
    let mut bytes = bytes.iter().copied();

    while let Some(byte) = bytes.next() {
        let key = match byte {
            b if SPECIAL_PREFIXES.contains(&b) => match bytes.next() {
                Some(code) => KeyEvent::Special(code),
                None => break,
            },
            CTRL_C | ESC => KeyEvent::Interrupt,
            b => KeyEvent::Plain(b as char),
        };
        keys.push(key);
    }

    keys
}

/// Where the game loop gets its keys from.
pub trait InputSource {
    /// Non-blocking.
    fn has_pending_input(&mut self) -> io::Result<bool>;

    /// Blocks until a key arrives.
    fn read_key(&mut self) -> io::Result<KeyEvent>;
}

/// Keyboard input through crossterm. Expects raw mode to be on.
#[derive(Debug, Default)]
pub struct TerminalInput {
    /// Key already pulled off the queue by `has_pending_input`.
    pending: Option<KeyEvent>,
}

impl TerminalInput {
    pub fn new() -> Self {
        Self::default()
    }

    fn translate(key: event::KeyEvent) -> Option<KeyEvent> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(KeyEvent::Interrupt);
        }

        let translated = match key.code {
            KeyCode::Up => KeyEvent::Special(UP_ARROW),
            KeyCode::Down => KeyEvent::Special(DOWN_ARROW),
            KeyCode::Left => KeyEvent::Special(LEFT_ARROW),
            KeyCode::Right => KeyEvent::Special(RIGHT_ARROW),
            KeyCode::Esc => KeyEvent::Interrupt,
            KeyCode::Char(c) => KeyEvent::Plain(c),
            KeyCode::Enter => KeyEvent::Plain('\r'),
            KeyCode::Tab => KeyEvent::Plain('\t'),
            KeyCode::Backspace => KeyEvent::Plain('\x08'),
            // F-keys and friends still count as "any key" on the intro screen
            _ => KeyEvent::Plain('\0'),
        };
        Some(translated)
    }

    fn key_of(event: Event) -> Option<KeyEvent> {
        match event {
            Event::Key(key) => Self::translate(key),
            _ => None,
        }
    }
}

/// Pulls events from `next` until one is a usable key press. `next` yields `None`
/// once nothing is queued; releases, resizes and the like are dropped on the way.
fn first_key_press<F>(mut next: F) -> io::Result<Option<KeyEvent>>
where
    F: FnMut() -> io::Result<Option<Event>>,
{
    while let Some(event) = next()? {
        if let Some(key) = TerminalInput::key_of(event) {
            return Ok(Some(key));
        }
    }
    Ok(None)
}

impl InputSource for TerminalInput {
    fn has_pending_input(&mut self) -> io::Result<bool> {
        if self.pending.is_none() {
            self.pending = first_key_press(|| {
                if event::poll(Duration::ZERO)? {
                    event::read().map(Some)
                } else {
                    Ok(None)
                }
            })?;
        }
        Ok(self.pending.is_some())
    }

    fn read_key(&mut self) -> io::Result<KeyEvent> {
        if let Some(key) = self.pending.take() {
            return Ok(key);
        }
        loop {
            if let Some(key) = Self::key_of(event::read()?) {
                return Ok(key);
            }
        }
    }
}

/// Replays a fixed queue of keys. Once drained, `read_key` reports an interrupt
/// so a blocked intro screen cannot hang.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    keys: VecDeque<KeyEvent>,
}

impl ScriptedInput {
    pub fn new(keys: impl IntoIterator<Item = KeyEvent>) -> Self {
        ScriptedInput {
            keys: keys.into_iter().collect(),
        }
    }

    pub fn from_scancodes(bytes: &[u8]) -> Self {
        Self::new(decode_scancodes(bytes))
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl InputSource for ScriptedInput {
    fn has_pending_input(&mut self) -> io::Result<bool> {
        Ok(!self.keys.is_empty())
    }

    fn read_key(&mut self) -> io::Result<KeyEvent> {
        Ok(self.keys.pop_front().unwrap_or(KeyEvent::Interrupt))
    }
}
