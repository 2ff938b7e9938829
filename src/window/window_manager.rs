use super::{AnyWindow, Env, Window, WindowBehavior};
use crate::error::{EngineError, Result};
use crate::factory::{FormFactory, WindowFactory};
use crate::simulation::{Request, Requests, Simulation};

/// Ordered stack of live windows.
///
/// The most recently added live window holds focus; it is the only window
/// that ticks or sees input. Removal is deferred: windows flag themselves and
/// are swept at the start of the next tick in which the focused window is
/// flagged.
///
/// Hooks run while the manager holds `&mut` access to its collection. They
/// reach the stack only through the [`Requests`] queue, which is drained
/// after every hook, so the collection is never mutated mid-iteration. When
/// a hook or a queued request fails, whatever is still queued is discarded.
pub struct WindowManager<S: Simulation> {
    factory: WindowFactory<S>,
    forms: FormFactory<S>,
    windows: Vec<Box<dyn AnyWindow<S>>>,
    requests: Requests<S::WindowKey>,
}

impl<S: Simulation> WindowManager<S> {
    pub fn new(factory: WindowFactory<S>) -> Self {
        Self {
            factory,
            forms: FormFactory::new(),
            windows: Vec::new(),
            requests: Requests::new(),
        }
    }

    pub fn window_factory(&self) -> &WindowFactory<S> {
        &self.factory
    }

    pub fn form_factory(&self) -> &FormFactory<S> {
        &self.forms
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Live window keys, bottom of the stack first.
    pub fn keys(&self) -> Vec<S::WindowKey> {
        self.windows.iter().map(|window| window.key()).collect()
    }

    pub fn contains(&self, key: S::WindowKey) -> bool {
        self.position(key).is_some()
    }

    pub fn focus(&self) -> Option<S::WindowKey> {
        self.windows.last().map(|window| window.key())
    }

    /// Typed access to a live window, `None` if absent or of another kind.
    pub fn window<W: WindowBehavior<S>>(&self, key: S::WindowKey) -> Option<&Window<S, W>> {
        let idx = self.position(key)?;
        self.windows[idx].as_any().downcast_ref::<Window<S, W>>()
    }

    pub fn window_mut<W: WindowBehavior<S>>(
        &mut self,
        key: S::WindowKey,
    ) -> Option<&mut Window<S, W>> {
        let idx = self.position(key)?;
        self.windows[idx].as_any_mut().downcast_mut::<Window<S, W>>()
    }

    /// Whether the innermost layer of the focused window (its form if one
    /// is attached, else the window itself) takes input.
    pub fn accepting_input(&self) -> bool {
        self.windows
            .last()
            .is_some_and(|window| window.accepts_input())
    }

    /// Whether the keystroke layer should buffer characters until Enter.
    pub fn input_fills_buffer(&self) -> bool {
        self.windows
            .last()
            .is_none_or(|window| window.input_fills_buffer())
    }

    /// Text of the focused window.
    pub fn render(&self, sim: &S) -> Option<String> {
        self.windows.last().map(|window| window.render(sim))
    }

    /// Open the window for `key`, or re-activate it if already live.
    pub fn add(&mut self, key: S::WindowKey, sim: &mut S) -> Result<()> {
        let outcome = self.add_window(key, sim);
        self.settle(outcome, sim)
    }

    /// Apply requests queued outside any hook, such as the first-tick hook.
    pub fn apply(&mut self, mut requests: Requests<S::WindowKey>, sim: &mut S) -> Result<()> {
        let outcome = requests
            .take()
            .into_iter()
            .try_for_each(|request| self.apply_request(request, sim));
        self.settle(outcome, sim)
    }

    pub fn tick(&mut self, is_external_pulse: bool, sim: &mut S) -> Result<()> {
        let outcome = self.tick_focused(is_external_pulse, sim);
        self.settle(outcome, sim)
    }

    fn tick_focused(&mut self, is_external_pulse: bool, sim: &mut S) -> Result<()> {
        if self
            .windows
            .last()
            .is_some_and(|window| window.should_remove())
        {
            self.sweep(sim)?;
        }
        if let Some(focused) = self.windows.last_mut() {
            let mut env = Env {
                sim: &mut *sim,
                requests: &mut self.requests,
                forms: &mut self.forms,
            };
            focused.tick(is_external_pulse, &mut env)?;
        }
        Ok(())
    }

    /// Route a submitted line to the focused window. Empty lines, and any
    /// line while input is not accepted, are dropped.
    pub fn send_input(&mut self, input: &str, sim: &mut S) -> Result<()> {
        let input = input.trim();
        if input.is_empty() || !self.accepting_input() {
            return Ok(());
        }
        let outcome = match self.windows.last_mut() {
            Some(focused) => {
                let mut env = Env {
                    sim: &mut *sim,
                    requests: &mut self.requests,
                    forms: &mut self.forms,
                };
                focused.send_input(input, &mut env)
            }
            None => Ok(()),
        };
        self.settle(outcome, sim)
    }

    /// Attach a form to the focused window, replacing its current form.
    pub fn set_form(&mut self, key: S::FormKey, sim: &mut S) -> Result<()> {
        let Some(focused) = self.windows.last_mut() else {
            return Err(EngineError::NoFocusedWindow);
        };
        let mut env = Env {
            sim: &mut *sim,
            requests: &mut self.requests,
            forms: &mut self.forms,
        };
        let outcome = focused.set_form(key, &mut env);
        self.settle(outcome, sim)
    }

    pub fn clear_form(&mut self) -> Result<()> {
        self.windows
            .last_mut()
            .ok_or(EngineError::NoFocusedWindow)?
            .clear_form()
    }

    /// Flag the window for `key` for removal. Returns false if not live.
    pub fn remove_next_tick(&mut self, key: S::WindowKey) -> bool {
        match self.position(key) {
            Some(idx) => {
                self.windows[idx].remove_next_tick();
                true
            }
            None => false,
        }
    }

    /// Drop every window immediately, bypassing deferred removal.
    pub fn clear(&mut self) {
        tracing::debug!(dropped = self.windows.len(), "cleared windows");
        self.windows.clear();
    }

    fn position(&self, key: S::WindowKey) -> Option<usize> {
        self.windows.iter().position(|window| window.key() == key)
    }

    fn add_window(&mut self, key: S::WindowKey, sim: &mut S) -> Result<()> {
        let mut env = Env {
            sim: &mut *sim,
            requests: &mut self.requests,
            forms: &mut self.forms,
        };
        if let Some(idx) = self.windows.iter().position(|window| window.key() == key) {
            tracing::debug!(window = ?key, "window already live; activating");
            return self.windows[idx].on_activate(&mut env);
        }
        let window = self.factory.create(key, &*env.sim)?;
        self.windows.push(window);
        tracing::debug!(window = ?key, depth = self.windows.len(), "opened window");
        let Some((focused, below)) = self.windows.split_last_mut() else {
            return Ok(());
        };
        focused.on_post_create(&mut env)?;
        for window in below {
            window.on_added(&mut env)?;
        }
        Ok(())
    }

    fn sweep(&mut self, sim: &mut S) -> Result<()> {
        let before = self.focus();
        let live = self.windows.len();
        self.windows.retain(|window| !window.should_remove());
        tracing::debug!(
            removed = live - self.windows.len(),
            remaining = self.windows.len(),
            "swept windows"
        );
        let after = self.focus();
        if after != before
            && let Some(focused) = self.windows.last_mut()
        {
            tracing::debug!(window = ?focused.key(), "window regained focus");
            let mut env = Env {
                sim,
                requests: &mut self.requests,
                forms: &mut self.forms,
            };
            focused.on_activate(&mut env)?;
        }
        Ok(())
    }

    fn apply_request(&mut self, request: Request<S::WindowKey>, sim: &mut S) -> Result<()> {
        match request {
            Request::Add(key) => self.add_window(key, sim),
            Request::Clear => {
                self.clear();
                Ok(())
            }
        }
    }

    /// Drain what the hooks queued, unless the hook itself failed. On any
    /// error the remaining queue is dropped so it cannot leak into the next
    /// call.
    fn settle(&mut self, outcome: Result<()>, sim: &mut S) -> Result<()> {
        let outcome = outcome.and_then(|()| self.flush_requests(sim));
        if outcome.is_err() {
            let dropped = self.requests.take();
            if !dropped.is_empty() {
                tracing::debug!(dropped = dropped.len(), "discarded queued window requests");
            }
        }
        outcome
    }

    fn flush_requests(&mut self, sim: &mut S) -> Result<()> {
        loop {
            let pending = self.requests.take();
            if pending.is_empty() {
                return Ok(());
            }
            for request in pending {
                self.apply_request(request, sim)?;
            }
        }
    }
}
