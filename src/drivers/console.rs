use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste, Event};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, SetTitle};
use crossterm::{execute, terminal};
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};

use super::keyboard::InputFilter;
use super::{InputDriver, OutputDriver};

/// Reads the real terminal through an [`InputFilter`].
#[derive(Debug, Default)]
pub struct ConsoleInputDriver {
    filter: InputFilter,
}

impl ConsoleInputDriver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InputDriver for ConsoleInputDriver {
    /// Waits at most `timeout` for the first raw event. Raw events the filter
    /// drops end the wait early rather than restarting it.
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        let mut wait = timeout;
        while !self.filter.has_pending() {
            if !crossterm::event::poll(wait)? {
                return Ok(false);
            }
            self.filter.push(crossterm::event::read()?);
            wait = Duration::ZERO;
        }
        Ok(true)
    }

    fn read(&mut self) -> io::Result<Event> {
        loop {
            if let Some(evt) = self.filter.pop() {
                return Ok(evt);
            }
            self.filter.push(crossterm::event::read()?);
        }
    }
}

/// Full-screen output on stdout. Raw mode and the alternate screen are held
/// between [`enter`](OutputDriver::enter) and [`exit`](OutputDriver::exit),
/// and released on drop if the caller never exited.
pub struct ConsoleOutputDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    title: Option<String>,
    raw: bool,
}

impl ConsoleOutputDriver {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            terminal: Terminal::new(CrosstermBackend::new(io::stdout()))?,
            title: None,
            raw: false,
        })
    }

    /// Set the terminal window title on enter.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl OutputDriver for ConsoleOutputDriver {
    fn enter(&mut self) -> io::Result<()> {
        if self.raw {
            return Ok(());
        }
        let backend = self.terminal.backend_mut();
        execute!(backend, EnterAlternateScreen, EnableBracketedPaste)?;
        if let Some(title) = &self.title {
            execute!(backend, SetTitle(title))?;
        }
        terminal::enable_raw_mode()?;
        self.raw = true;
        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        Ok(())
    }

    fn exit(&mut self) -> io::Result<()> {
        if !self.raw {
            return Ok(());
        }
        self.raw = false;
        terminal::disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            DisableBracketedPaste,
            LeaveAlternateScreen
        )?;
        self.terminal.show_cursor()
    }

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame<'_>),
    {
        self.terminal.draw(f)?;
        Ok(())
    }
}

impl Drop for ConsoleOutputDriver {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}
