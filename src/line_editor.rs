//! Keystroke-to-line assembly.
//!
//! The engine only ever sees whole lines. This editor sits between the
//! terminal and the engine: it buffers characters until Enter, or hands each
//! key over on its own when the focused form asks for immediate keys.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub const DEFAULT_MAX_LEN: usize = 64;

#[derive(Debug, Clone)]
pub struct LineEditor {
    buffer: String,
    max_len: usize,
}

impl Default for LineEditor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LEN)
    }
}

impl LineEditor {
    pub fn new(max_len: usize) -> Self {
        Self {
            buffer: String::new(),
            max_len: max_len.max(1),
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Feed one key. Returns a completed, trimmed, non-empty line.
    pub fn handle_key(&mut self, key: &KeyEvent, fills_buffer: bool) -> Option<String> {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return None;
        }
        match key.code {
            KeyCode::Char(c) if !fills_buffer => {
                self.buffer.clear();
                Some(c.to_string()).filter(|line| !line.trim().is_empty())
            }
            KeyCode::Char(c) => {
                if self.buffer.chars().count() < self.max_len {
                    self.buffer.push(c);
                }
                None
            }
            KeyCode::Backspace => {
                self.buffer.pop();
                None
            }
            KeyCode::Esc => {
                self.buffer.clear();
                None
            }
            KeyCode::Enter => {
                let line = std::mem::take(&mut self.buffer);
                let line = line.trim();
                (!line.is_empty()).then(|| line.to_string())
            }
            _ => None,
        }
    }
}
