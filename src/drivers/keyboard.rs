//! Raw terminal events reduced to what the line editor consumes.
//!
//! Only key presses and resizes get through. Pasted text is replayed as
//! individual key presses so it lands in the input buffer like typing, and
//! back-to-back resizes collapse into the last one.

use std::collections::VecDeque;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Default)]
pub struct InputFilter {
    pending: VecDeque<Event>,
}

impl InputFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, evt: Event) {
        match evt {
            Event::Key(key) => match key.kind {
                KeyEventKind::Press => self.pending.push_back(Event::Key(key)),
                // Windows reports held keys as separate repeats.
                KeyEventKind::Repeat if !cfg!(windows) => self.pending.push_back(Event::Key(key)),
                _ => {}
            },
            Event::Paste(text) => {
                let keys = text
                    .chars()
                    .filter(|c| !c.is_control())
                    .map(|c| Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)));
                self.pending.extend(keys);
            }
            Event::Resize(..) => {
                if matches!(self.pending.back(), Some(Event::Resize(..))) {
                    self.pending.pop_back();
                }
                self.pending.push_back(evt);
            }
            _ => {}
        }
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.pending.pop_front()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(kind: KeyEventKind) -> Event {
        let mut key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        key.kind = kind;
        Event::Key(key)
    }

    #[test]
    fn release_is_dropped() {
        let mut filter = InputFilter::new();
        filter.push(key(KeyEventKind::Release));
        assert!(!filter.has_pending());
        filter.push(key(KeyEventKind::Press));
        assert_eq!(filter.pop(), Some(key(KeyEventKind::Press)));
    }

    #[test]
    fn paste_becomes_keys() {
        let mut filter = InputFilter::new();
        filter.push(Event::Paste("12\n".to_string()));
        let typed: Vec<_> = std::iter::from_fn(|| filter.pop()).collect();
        assert_eq!(
            typed,
            vec![
                Event::Key(KeyEvent::new(KeyCode::Char('1'), KeyModifiers::NONE)),
                Event::Key(KeyEvent::new(KeyCode::Char('2'), KeyModifiers::NONE)),
            ]
        );
    }

    #[test]
    fn resizes_collapse_and_focus_is_dropped() {
        let mut filter = InputFilter::new();
        filter.push(Event::Resize(10, 20));
        filter.push(Event::FocusGained);
        filter.push(Event::Resize(30, 40));
        assert_eq!(filter.pop(), Some(Event::Resize(30, 40)));
        assert_eq!(filter.pop(), None);
    }
}
