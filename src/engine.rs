//! Top-level runtime: clock, window stack and scene behind one handle.
//!
//! The outer loop only needs four verbs: [`Engine::pulse`] as often as it
//! likes, [`Engine::send_input`] for each submitted line,
//! [`Engine::add_window`] to push windows from outside, and
//! [`Engine::render`] to fetch a changed frame.

use std::time::Instant;

use crate::clock::{Clock, ClockPulse};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::factory::WindowFactory;
use crate::scene::{SceneInputs, SceneRenderer};
use crate::simulation::{Requests, Simulation};
use crate::window::WindowManager;

pub struct Engine<S: Simulation> {
    sim: S,
    windows: WindowManager<S>,
    clock: Clock,
    scene: SceneRenderer,
    config: EngineConfig,
}

impl<S: Simulation> Engine<S> {
    pub fn new(sim: S, factory: WindowFactory<S>, config: EngineConfig) -> Self {
        let clock = Clock::new(config.tick_interval);
        Self::with_clock(sim, factory, config, clock)
    }

    pub fn with_clock(
        sim: S,
        factory: WindowFactory<S>,
        config: EngineConfig,
        clock: Clock,
    ) -> Self {
        Self {
            sim,
            windows: WindowManager::new(factory),
            clock,
            scene: SceneRenderer::new(),
            config,
        }
    }

    pub fn sim(&self) -> &S {
        &self.sim
    }

    pub fn sim_mut(&mut self) -> &mut S {
        &mut self.sim
    }

    pub fn into_sim(self) -> S {
        self.sim
    }

    pub fn windows(&self) -> &WindowManager<S> {
        &self.windows
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn pulse(&mut self) -> Result<ClockPulse> {
        self.pulse_at(Instant::now())
    }

    /// Tick the focused window for the external pulse, then again as a
    /// simulation tick if the clock crossed its cadence.
    pub fn pulse_at(&mut self, now: Instant) -> Result<ClockPulse> {
        let pulse = self.clock.pulse_at(now);
        self.windows.tick(true, &mut self.sim)?;
        if let Some(tick) = pulse.tick {
            if pulse.first_tick {
                let mut requests = Requests::new();
                self.sim.on_first_tick(&mut requests);
                self.windows.apply(requests, &mut self.sim)?;
            }
            self.sim.on_tick(tick);
            self.windows.tick(false, &mut self.sim)?;
        }
        Ok(pulse)
    }

    pub fn add_window(&mut self, key: S::WindowKey) -> Result<()> {
        self.windows.add(key, &mut self.sim)
    }

    pub fn send_input(&mut self, input: &str) -> Result<()> {
        self.windows.send_input(input, &mut self.sim)
    }

    pub fn set_form(&mut self, key: S::FormKey) -> Result<()> {
        self.windows.set_form(key, &mut self.sim)
    }

    pub fn clear_form(&mut self) -> Result<()> {
        self.windows.clear_form()
    }

    pub fn remove_next_tick(&mut self, key: S::WindowKey) -> bool {
        self.windows.remove_next_tick(key)
    }

    pub fn clear_windows(&mut self) {
        self.windows.clear();
    }

    pub fn accepting_input(&self) -> bool {
        self.windows.accepting_input()
    }

    pub fn input_fills_buffer(&self) -> bool {
        self.windows.input_fills_buffer()
    }

    /// Compose the current frame without touching change detection.
    pub fn frame(&self, buffer: &str) -> String {
        SceneRenderer::compose(&self.windows, &self.sim, self.scene_inputs(buffer))
    }

    /// The current frame, or `None` if it matches the last one returned.
    pub fn render(&mut self, buffer: &str) -> Option<&str> {
        let inputs = SceneInputs {
            config: &self.config,
            phase: self.clock.phase(),
            buffer,
        };
        self.scene.render(&self.windows, &self.sim, inputs)
    }

    pub fn invalidate(&mut self) {
        self.scene.invalidate();
    }

    fn scene_inputs<'a>(&'a self, buffer: &'a str) -> SceneInputs<'a> {
        SceneInputs {
            config: &self.config,
            phase: self.clock.phase(),
            buffer,
        }
    }
}
