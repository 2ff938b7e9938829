//! Frame composition with change detection.

use crate::config::EngineConfig;
use crate::simulation::Simulation;
use crate::window::WindowManager;

/// Everything a frame is built from besides the window stack.
#[derive(Debug, Clone, Copy)]
pub struct SceneInputs<'a> {
    pub config: &'a EngineConfig,
    pub phase: char,
    /// Characters typed so far by the keystroke layer.
    pub buffer: &'a str,
}

/// Builds one flat string per frame and remembers the last one emitted.
#[derive(Debug, Default)]
pub struct SceneRenderer {
    last: Option<String>,
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compose<S: Simulation>(
        windows: &WindowManager<S>,
        sim: &S,
        inputs: SceneInputs<'_>,
    ) -> String {
        let mut lines: Vec<String> = Vec::new();
        if let Some(title) = sim.title().or_else(|| inputs.config.title.clone()) {
            lines.push(format!("{title} {}", inputs.phase));
            lines.push(String::new());
        }
        match windows.render(sim) {
            Some(body) => lines.push(body),
            None => lines.push(inputs.config.empty_message.clone()),
        }
        if windows.accepting_input() {
            lines.push(String::new());
            lines.push(format!("{}{}", inputs.config.prompt, inputs.buffer));
        }
        lines.join("\n")
    }

    /// Compose the frame and return it only if it differs from the last one
    /// returned.
    pub fn render<S: Simulation>(
        &mut self,
        windows: &WindowManager<S>,
        sim: &S,
        inputs: SceneInputs<'_>,
    ) -> Option<&str> {
        let frame = Self::compose(windows, sim, inputs);
        self.update(frame)
    }

    pub fn update(&mut self, frame: String) -> Option<&str> {
        if self.last.as_deref() == Some(frame.as_str()) {
            return None;
        }
        self.last = Some(frame);
        self.last.as_deref()
    }

    pub fn last_frame(&self) -> Option<&str> {
        self.last.as_deref()
    }

    /// Force the next frame out even if unchanged, e.g. after a resize.
    pub fn invalidate(&mut self) {
        self.last = None;
    }
}
