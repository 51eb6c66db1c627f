use crossterm::event::{poll, read, Event, KeyCode};
use crossterm::terminal;
use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

/// number of keys on the COSMAC hex keypad
pub const NUM_KEYS: usize = 16;

/// pressed/not-pressed for keys 0x0..=0xF
pub type Keypad = [bool; NUM_KEYS];

/// map using left-hand side of qwerty keyboard to the hex keypad
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// terminals only report key-down (and repeats), so a key counts as held
/// for this long after its last event
const KEY_HOLD: Duration = Duration::from_millis(150);

/// reads keypresses
pub trait Input {
    /// current state of every key on the keypad
    fn poll_keys(&mut self) -> Result<Keypad, io::Error>;

    /// has the user asked to leave
    fn quit_requested(&self) -> bool;
}

/// implementation of Input reading terminal key events via crossterm
pub struct StdinInput {
    last_seen: [Option<Instant>; NUM_KEYS],
    keymap: HashMap<char, u8>,
    quit: bool,
}

impl StdinInput {
    pub fn new() -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(StdinInput {
            last_seen: [None; NUM_KEYS],
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            quit: false,
        })
    }

    fn read_events(&mut self) -> Result<(), io::Error> {
        while poll(Duration::from_millis(0))? {
            if let Event::Key(evt) = read()? {
                match evt.code {
                    KeyCode::Char(key) => {
                        if let Some(mapped) = self.keymap.get(&key.to_ascii_lowercase()) {
                            self.last_seen[*mapped as usize] = Some(Instant::now());
                        }
                    }
                    KeyCode::Esc => self.quit = true,
                    _ => {}
                }
            }
        }
        Ok(())
    }
}

impl Drop for StdinInput {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl Input for StdinInput {
    fn poll_keys(&mut self) -> Result<Keypad, io::Error> {
        self.read_events()?;
        let now = Instant::now();
        let mut keys = [false; NUM_KEYS];
        for (key, seen) in keys.iter_mut().zip(self.last_seen.iter()) {
            *key = matches!(seen, Some(t) if now.duration_since(*t) < KEY_HOLD);
        }
        Ok(keys)
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}

/// dummy Input implementation for testing
pub struct DummyInput {
    keys: Keypad,
}

impl DummyInput {
    pub fn new(pressed: &[u8]) -> Self {
        let mut keys = [false; NUM_KEYS];
        for k in pressed {
            keys[*k as usize & 0xf] = true;
        }
        DummyInput { keys }
    }
}

impl Input for DummyInput {
    fn poll_keys(&mut self) -> Result<Keypad, io::Error> {
        Ok(self.keys)
    }

    fn quit_requested(&self) -> bool {
        false
    }
}
