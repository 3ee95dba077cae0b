use crate::chip8::error::{Fault, Result};

pub const N_KEYS: usize = 16;

/// left-hand side of a qwerty keyboard, laid out like the COSMAC VIP pad
const CONVENTIONAL_KEYMAP: [(char, u8); N_KEYS] = [
    ('x', 0x0),
    ('1', 0x1),
    ('2', 0x2),
    ('3', 0x3),
    ('q', 0x4),
    ('w', 0x5),
    ('e', 0x6),
    ('a', 0x7),
    ('s', 0x8),
    ('d', 0x9),
    ('z', 0xA),
    ('c', 0xB),
    ('4', 0xC),
    ('r', 0xD),
    ('f', 0xE),
    ('v', 0xF),
];

/// Map a typed character to a pad key, ignoring case.
pub fn conventional_keymap(c: char) -> Option<u8> {
    let c = c.to_ascii_lowercase();
    CONVENTIONAL_KEYMAP
        .iter()
        .find(|(ch, _)| *ch == c)
        .map(|(_, key)| *key)
}

/// Up/down state of the 16-key pad.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Keyboard {
    down: [bool; N_KEYS],
}

impl Keyboard {
    /// Create a pad with every key up.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key` as held or released.
    pub fn set_down(&mut self, key: u8, down: bool) -> Result<()> {
        let state = self
            .down
            .get_mut(key as usize)
            .ok_or(Fault::InvalidKey(key))?;
        *state = down;
        Ok(())
    }

    /// Keys outside the pad are never down.
    pub fn is_down(&self, key: u8) -> bool {
        self.down.get(key as usize).copied().unwrap_or(false)
    }

    /// Drain `events` until one maps to a pad key, mark it down and return it.
    ///
    /// Events `map` rejects are dropped. `None` means the source ran dry
    /// before a mapped key-down showed up.
    pub fn wait_for_key<C, I, F>(&mut self, events: I, mut map: F) -> Option<u8>
    where
        I: IntoIterator<Item = C>,
        F: FnMut(C) -> Option<u8>,
    {
        for event in events {
            match map(event) {
                Some(key) if (key as usize) < N_KEYS => {
                    self.down[key as usize] = true;
                    return Some(key);
                }
                Some(key) => log::debug!("key mapping produced {:#04x}, ignoring", key),
                None => log::trace!("unmapped key event while waiting"),
            }
        }
        None
    }
}
