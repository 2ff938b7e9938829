//! Tick normalization.
//!
//! The outer loop calls [`Clock::pulse`] as often as it likes. The clock turns
//! those irregular pulses into simulation ticks spaced at least one cadence
//! apart, and flags the very first one so the runtime can bootstrap its root
//! window.

use std::time::{Duration, Instant};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1000);

const PHASE_GLYPHS: [char; 4] = ['|', '/', '-', '\\'];

/// Result of a single pulse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockPulse {
    /// Running tick count when the pulse crossed the cadence.
    pub tick: Option<u64>,
    /// Set only on the pulse that produced tick 1.
    pub first_tick: bool,
}

impl ClockPulse {
    pub fn is_tick(&self) -> bool {
        self.tick.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Clock {
    cadence: Duration,
    last_tick: Instant,
    ticks: u64,
    phase: usize,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}

impl Clock {
    pub fn new(cadence: Duration) -> Self {
        Self::starting_at(cadence, Instant::now())
    }

    /// Build a clock whose first cadence window opens at `start`.
    pub fn starting_at(cadence: Duration, start: Instant) -> Self {
        Self {
            cadence,
            last_tick: start,
            ticks: 0,
            phase: 0,
        }
    }

    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Rotating glyph for display. Carries no meaning.
    pub fn phase(&self) -> char {
        PHASE_GLYPHS[self.phase]
    }

    pub fn pulse(&mut self) -> ClockPulse {
        self.pulse_at(Instant::now())
    }

    pub fn pulse_at(&mut self, now: Instant) -> ClockPulse {
        let elapsed = now.saturating_duration_since(self.last_tick);
        if elapsed <= self.cadence {
            return ClockPulse::default();
        }
        self.last_tick = now;
        self.ticks = self.ticks.saturating_add(1);
        self.phase = (self.phase + 1) % PHASE_GLYPHS.len();
        let first_tick = self.ticks == 1;
        if first_tick {
            tracing::debug!(cadence_ms = self.cadence.as_millis() as u64, "first tick");
        }
        ClockPulse {
            tick: Some(self.ticks),
            first_tick,
        }
    }
}
