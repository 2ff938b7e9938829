//! Forms: nested sub-states living inside a window.
//!
//! A window shows its command menu until a form is attached. While a form is
//! attached it owns rendering and input for that window. Forms move between
//! each other only through explicit `set_form` / `clear_form` calls made on
//! the [`WindowCx`] they are handed; there is no implicit state graph.

use crate::error::Result;
use crate::simulation::Simulation;
use crate::window::{WindowBehavior, WindowCx};

pub trait Form<S: Simulation, W: WindowBehavior<S>>: 'static {
    /// Called once, right after the form is attached to its window.
    fn on_form_post_create(&mut self, _cx: &mut WindowCx<'_, S, W>) -> Result<()> {
        Ok(())
    }

    /// Text for the current frame. Must not change any state.
    fn render(&self, window: &W, sim: &S) -> String;

    /// A non-empty line submitted while this form is active.
    fn on_input(&mut self, _input: &str, _cx: &mut WindowCx<'_, S, W>) -> Result<()> {
        Ok(())
    }

    /// Called on every pass of the owning window. Forms that are not
    /// animations should return early when `is_external_pulse` is set.
    fn on_tick(&mut self, _is_external_pulse: bool, _cx: &mut WindowCx<'_, S, W>) -> Result<()> {
        Ok(())
    }

    fn accepts_input(&self) -> bool {
        true
    }

    /// Whether typed characters accumulate until Enter. When false every key
    /// is submitted on its own, as for yes/no prompts.
    fn input_fills_buffer(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormTransition<F> {
    Set(F),
    Clear,
}
