use enigo::{Direction, Enigo, Key, Keyboard, Settings};

use crate::{KeyError, KeyInjector, SubmitKey};

pub struct EnigoInjector {
    enigo: Enigo,
}

impl EnigoInjector {
    pub fn new() -> Result<Self, KeyError> {
        Ok(Self {
            enigo: Enigo::new(&Settings::default()).map_err(|e| KeyError::Init(e.to_string()))?,
        })
    }

    fn key(&mut self, key: Key, direction: Direction) -> Result<(), KeyError> {
        self.enigo
            .key(key, direction)
            .map_err(|e| KeyError::Inject(e.to_string()))
    }
}

impl KeyInjector for EnigoInjector {
    fn type_char(&mut self, c: char) -> Result<(), KeyError> {
        let mut buf = [0u8; 4];
        self.enigo
            .text(c.encode_utf8(&mut buf))
            .map_err(|e| KeyError::Inject(e.to_string()))
    }

    fn submit(&mut self, key: SubmitKey) -> Result<(), KeyError> {
        match key {
            SubmitKey::Enter => self.key(Key::Return, Direction::Click),
            SubmitKey::ShiftEnter => {
                self.key(Key::Shift, Direction::Press)?;
                let clicked = self.key(Key::Return, Direction::Click);
                // Release even if the click failed so Shift is not left held down.
                let released = self.key(Key::Shift, Direction::Release);
                clicked.and(released)
            }
        }
    }
}
