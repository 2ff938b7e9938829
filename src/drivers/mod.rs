//! Terminal boundary. Nothing in here is needed by the engine itself; these
//! drivers feed it keystrokes and put its frames on screen.

pub mod console;
pub mod keyboard;

use ::crossterm::event::Event;
use ratatui::Frame;
use std::io;
use std::time::Duration;

pub use console::{ConsoleInputDriver, ConsoleOutputDriver};
pub use keyboard::InputFilter;

pub trait InputDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;
    fn read(&mut self) -> io::Result<Event>;
}

impl<T: InputDriver + ?Sized> InputDriver for &mut T {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        (**self).poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        (**self).read()
    }
}

pub trait OutputDriver {
    fn enter(&mut self) -> io::Result<()>;
    fn exit(&mut self) -> io::Result<()>;

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame<'_>);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    /// Replays the events an [`InputFilter`] lets through.
    struct Filtered(InputFilter);

    impl InputDriver for Filtered {
        fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(self.0.has_pending())
        }

        fn read(&mut self) -> io::Result<Event> {
            self.0
                .pop()
                .ok_or_else(|| io::Error::other("nothing pending"))
        }
    }

    fn drain<D: InputDriver>(mut driver: D) -> io::Result<Vec<Event>> {
        let mut events = Vec::new();
        while driver.poll(Duration::ZERO)? {
            events.push(driver.read()?);
        }
        Ok(events)
    }

    #[test]
    fn borrowed_driver_reads_through() {
        let mut filter = InputFilter::new();
        filter.push(Event::Paste("ok".to_string()));
        let mut driver = Filtered(filter);

        let events = drain(&mut driver).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            Event::Key(KeyEvent::new(KeyCode::Char('k'), KeyModifiers::NONE))
        );
        assert!(!driver.poll(Duration::ZERO).unwrap());
    }
}
