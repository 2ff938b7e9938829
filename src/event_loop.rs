use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::InputDriver;

/// Upper bound on input events handled between two pulses, so a burst of
/// keys cannot starve the clock.
pub const MAX_EVENTS_PER_PASS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pass {
    /// Emitted once per loop iteration, whether or not input arrived.
    Pulse,
    Input(Event),
}

/// Single-threaded driver loop.
///
/// Each iteration emits one [`Pass::Pulse`], then waits up to the poll
/// interval for input and drains what is queued. The handler owns all
/// routing; the loop only decides when to call it.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(Pass) -> io::Result<ControlFlow>,
    {
        loop {
            if handler(Pass::Pulse)? == ControlFlow::Quit {
                return Ok(());
            }
            if !self.driver.poll(self.poll_interval)? {
                continue;
            }
            for _ in 0..MAX_EVENTS_PER_PASS {
                let event = self.driver.read()?;
                if handler(Pass::Input(event))? == ControlFlow::Quit {
                    return Ok(());
                }
                if !self.driver.poll(Duration::ZERO)? {
                    break;
                }
            }
        }
    }
}
