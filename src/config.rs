use std::time::Duration;

use crate::clock::DEFAULT_TICK_INTERVAL;

pub const DEFAULT_EMPTY_MESSAGE: &str = "No windows";
pub const DEFAULT_PROMPT: &str = "> ";

/// Runtime settings for an [`Engine`](crate::engine::Engine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Minimum wall time between simulation ticks.
    pub tick_interval: Duration,
    /// Fallback header when the simulation supplies no title.
    pub title: Option<String>,
    /// Shown when no window is live.
    pub empty_message: String,
    /// Prefix of the input line, drawn only while input is accepted.
    pub prompt: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            title: None,
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }
}
