//! A modal window-stack runtime for turn-based text games.
//!
//! Windows are pushed onto a stack by symbolic key; the newest live window has
//! focus and is the only one that ticks and sees input. A window
//! shows a numbered command menu until it attaches a [`Form`], a nested
//! sub-state that takes over rendering and input. A [`Clock`] turns irregular
//! outer-loop pulses into fixed-cadence simulation ticks, and the
//! [`SceneRenderer`] emits a flat text frame only when it changed.
//!
//! The game itself implements [`Simulation`] and registers its window kinds
//! with a [`WindowFactory`]; [`Engine`] ties the pieces together.

pub mod clock;
pub mod config;
pub mod debug_log;
pub mod drivers;
pub mod engine;
pub mod error;
pub mod event_loop;
pub mod factory;
pub mod form;
pub mod line_editor;
pub mod menu;
pub mod runner;
pub mod scene;
pub mod simulation;
pub mod tracing_sub;
pub mod window;

pub use clock::{Clock, ClockPulse};
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{EngineError, Result};
pub use factory::{FormFactory, WindowFactory};
pub use form::Form;
pub use menu::{CommandMenu, MenuCommand, NoCommand};
pub use scene::SceneRenderer;
pub use simulation::{Request, Requests, Simulation};
pub use window::{Action, Window, WindowBehavior, WindowCx, WindowManager};
