mod window_manager;

use std::any::Any;
use std::collections::VecDeque;

use crate::error::{EngineError, Result, key_name};
use crate::factory::FormFactory;
use crate::form::{Form, FormTransition};
use crate::menu::{CommandMenu, MenuCommand};
use crate::simulation::{Requests, Simulation};

pub use window_manager::WindowManager;

/// Menu action bound to a command symbol.
pub type Action<S, W> = fn(&mut WindowCx<'_, S, W>) -> Result<()>;

pub type Menu<S, W> = CommandMenu<<W as WindowBehavior<S>>::Command, Action<S, W>>;

/// Capability contract for a window kind.
///
/// The implementing type doubles as the window's user data; forms attached to
/// the window read and mutate it through [`WindowCx::window`]. Lifecycle hooks
/// are associated functions so the context can hand out `&mut Self` alongside
/// the simulation.
pub trait WindowBehavior<S: Simulation>: Sized + 'static {
    type Command: MenuCommand;

    /// Map a form key to a form owned by this window kind. `Ok(None)` means
    /// the key belongs to another window kind; an error means the form is
    /// this window's but could not be built.
    fn create_form(
        &self,
        _key: S::FormKey,
        _sim: &S,
    ) -> Result<Option<Box<dyn Form<S, Self>>>> {
        Ok(None)
    }

    /// Runs once when the window is created and becomes focused.
    fn on_window_post_create(_cx: &mut WindowCx<'_, S, Self>) -> Result<()> {
        Ok(())
    }

    /// Runs when an already-live window is added again, or regains focus
    /// after the windows above it were removed.
    fn on_window_activate(_cx: &mut WindowCx<'_, S, Self>) -> Result<()> {
        Ok(())
    }

    /// Runs on every other live window when a new one is pushed on top.
    fn on_window_added(_cx: &mut WindowCx<'_, S, Self>) -> Result<()> {
        Ok(())
    }

    fn on_tick(_is_external_pulse: bool, _cx: &mut WindowCx<'_, S, Self>) -> Result<()> {
        Ok(())
    }

    fn menu_header(&self, _sim: &S) -> Option<String> {
        None
    }

    fn menu_footer(&self, _sim: &S) -> Option<String> {
        None
    }

    /// Whether the menu layer takes input at all.
    fn accepts_input(&self) -> bool {
        true
    }
}

/// Handle passed to window hooks, form hooks and menu actions.
pub struct WindowCx<'a, S: Simulation, W: WindowBehavior<S>> {
    pub window: &'a mut W,
    pub sim: &'a mut S,
    key: S::WindowKey,
    menu: &'a mut Menu<S, W>,
    transitions: &'a mut Vec<FormTransition<S::FormKey>>,
    remove: &'a mut bool,
    requests: &'a mut Requests<S::WindowKey>,
    has_form: bool,
}

impl<'a, S: Simulation, W: WindowBehavior<S>> WindowCx<'a, S, W> {
    pub fn key(&self) -> S::WindowKey {
        self.key
    }

    /// Whether a form was attached when the hook started.
    pub fn has_form(&self) -> bool {
        self.has_form
    }

    pub fn menu(&self) -> &Menu<S, W> {
        &*self.menu
    }

    pub fn add_command(
        &mut self,
        action: Action<S, W>,
        command: W::Command,
        description: impl Into<String>,
    ) -> Result<()> {
        self.menu.add_command(action, command, description)
    }

    pub fn add_named_command(
        &mut self,
        action: Action<S, W>,
        command: W::Command,
        description: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<()> {
        self.menu.add_named_command(action, command, description, name)
    }

    pub fn clear_commands(&mut self) {
        self.menu.clear_commands();
    }

    /// Attach the form for `key` once the hook returns, replacing any
    /// current form.
    pub fn set_form(&mut self, key: S::FormKey) {
        self.transitions.push(FormTransition::Set(key));
    }

    /// Detach the current form once the hook returns. Fails the hook's
    /// caller if no form is attached by then.
    pub fn clear_form(&mut self) {
        self.transitions.push(FormTransition::Clear);
    }

    /// Flag this window for removal on the next manager tick.
    pub fn remove_next_tick(&mut self) {
        *self.remove = true;
    }

    pub fn add_window(&mut self, key: S::WindowKey) {
        self.requests.add(key);
    }

    pub fn clear_windows(&mut self) {
        self.requests.clear();
    }
}

pub(crate) struct Env<'a, S: Simulation> {
    pub sim: &'a mut S,
    pub requests: &'a mut Requests<S::WindowKey>,
    pub forms: &'a mut FormFactory<S>,
}

pub struct Window<S: Simulation, W: WindowBehavior<S>> {
    key: S::WindowKey,
    behavior: W,
    menu: Menu<S, W>,
    form: Option<Box<dyn Form<S, W>>>,
    form_key: Option<S::FormKey>,
    should_remove: bool,
}

impl<S: Simulation, W: WindowBehavior<S>> Window<S, W> {
    pub(crate) fn new(key: S::WindowKey, behavior: W) -> Result<Self> {
        Ok(Self {
            key,
            behavior,
            menu: CommandMenu::new(key)?,
            form: None,
            form_key: None,
            should_remove: false,
        })
    }

    pub fn key(&self) -> S::WindowKey {
        self.key
    }

    pub fn behavior(&self) -> &W {
        &self.behavior
    }

    pub fn behavior_mut(&mut self) -> &mut W {
        &mut self.behavior
    }

    pub fn menu(&self) -> &Menu<S, W> {
        &self.menu
    }

    pub fn form_key(&self) -> Option<S::FormKey> {
        self.form_key
    }

    pub fn has_form(&self) -> bool {
        self.form.is_some()
    }

    pub fn should_remove(&self) -> bool {
        self.should_remove
    }

    pub fn render(&self, sim: &S) -> String {
        match &self.form {
            Some(form) => form.render(&self.behavior, sim),
            None => {
                let header = self.behavior.menu_header(sim);
                let footer = self.behavior.menu_footer(sim);
                self.menu.render(header.as_deref(), footer.as_deref())
            }
        }
    }

    fn accepts_input(&self) -> bool {
        match &self.form {
            Some(form) => form.accepts_input(),
            None => self.behavior.accepts_input() && !self.menu.is_empty(),
        }
    }

    fn run_window_hook<F>(&mut self, env: &mut Env<'_, S>, hook: F) -> Result<()>
    where
        F: FnOnce(&mut WindowCx<'_, S, W>) -> Result<()>,
    {
        let mut transitions = Vec::new();
        {
            let mut cx = WindowCx {
                window: &mut self.behavior,
                sim: &mut *env.sim,
                key: self.key,
                menu: &mut self.menu,
                transitions: &mut transitions,
                remove: &mut self.should_remove,
                requests: &mut *env.requests,
                has_form: self.form.is_some(),
            };
            hook(&mut cx)?;
        }
        self.apply_transitions(transitions, env)
    }

    fn run_form_hook<F>(&mut self, env: &mut Env<'_, S>, hook: F) -> Result<()>
    where
        F: FnOnce(&mut Box<dyn Form<S, W>>, &mut WindowCx<'_, S, W>) -> Result<()>,
    {
        let Some(form) = self.form.as_mut() else {
            return Ok(());
        };
        let mut transitions = Vec::new();
        {
            let mut cx = WindowCx {
                window: &mut self.behavior,
                sim: &mut *env.sim,
                key: self.key,
                menu: &mut self.menu,
                transitions: &mut transitions,
                remove: &mut self.should_remove,
                requests: &mut *env.requests,
                has_form: true,
            };
            hook(form, &mut cx)?;
        }
        self.apply_transitions(transitions, env)
    }

    fn apply_transitions(
        &mut self,
        transitions: Vec<FormTransition<S::FormKey>>,
        env: &mut Env<'_, S>,
    ) -> Result<()> {
        let mut queue: VecDeque<_> = transitions.into();
        while let Some(transition) = queue.pop_front() {
            match transition {
                FormTransition::Clear => self.detach_form()?,
                FormTransition::Set(form_key) => {
                    // Build first so a failed construction keeps the current form.
                    let mut form = env
                        .forms
                        .create(self.key, form_key, &self.behavior, &*env.sim)?;
                    if self.form.is_some() {
                        self.detach_form()?;
                    }
                    let mut follow_up = Vec::new();
                    {
                        let mut cx = WindowCx {
                            window: &mut self.behavior,
                            sim: &mut *env.sim,
                            key: self.key,
                            menu: &mut self.menu,
                            transitions: &mut follow_up,
                            remove: &mut self.should_remove,
                            requests: &mut *env.requests,
                            has_form: true,
                        };
                        form.on_form_post_create(&mut cx)?;
                    }
                    self.form = Some(form);
                    self.form_key = Some(form_key);
                    queue.extend(follow_up);
                }
            }
        }
        Ok(())
    }

    fn detach_form(&mut self) -> Result<()> {
        if self.form.take().is_none() {
            return Err(EngineError::NoActiveForm {
                window: key_name(&self.key),
            });
        }
        if let Some(form_key) = self.form_key.take() {
            tracing::debug!(window = ?self.key, form = ?form_key, "detached form");
        }
        Ok(())
    }
}

/// Type-erased view of a [`Window`] so windows of different kinds can share
/// one stack.
pub(crate) trait AnyWindow<S: Simulation> {
    fn key(&self) -> S::WindowKey;
    fn should_remove(&self) -> bool;
    fn remove_next_tick(&mut self);
    fn accepts_input(&self) -> bool;
    fn input_fills_buffer(&self) -> bool;
    fn render(&self, sim: &S) -> String;
    fn on_post_create(&mut self, env: &mut Env<'_, S>) -> Result<()>;
    fn on_activate(&mut self, env: &mut Env<'_, S>) -> Result<()>;
    fn on_added(&mut self, env: &mut Env<'_, S>) -> Result<()>;
    fn tick(&mut self, is_external_pulse: bool, env: &mut Env<'_, S>) -> Result<()>;
    fn send_input(&mut self, input: &str, env: &mut Env<'_, S>) -> Result<()>;
    fn set_form(&mut self, key: S::FormKey, env: &mut Env<'_, S>) -> Result<()>;
    fn clear_form(&mut self) -> Result<()>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<S: Simulation, W: WindowBehavior<S>> AnyWindow<S> for Window<S, W> {
    fn key(&self) -> S::WindowKey {
        self.key
    }

    fn should_remove(&self) -> bool {
        self.should_remove
    }

    fn remove_next_tick(&mut self) {
        self.should_remove = true;
    }

    fn accepts_input(&self) -> bool {
        Window::accepts_input(self)
    }

    fn input_fills_buffer(&self) -> bool {
        self.form
            .as_ref()
            .is_none_or(|form| form.input_fills_buffer())
    }

    fn render(&self, sim: &S) -> String {
        Window::render(self, sim)
    }

    fn on_post_create(&mut self, env: &mut Env<'_, S>) -> Result<()> {
        self.run_window_hook(env, W::on_window_post_create)
    }

    fn on_activate(&mut self, env: &mut Env<'_, S>) -> Result<()> {
        self.run_window_hook(env, W::on_window_activate)
    }

    fn on_added(&mut self, env: &mut Env<'_, S>) -> Result<()> {
        self.run_window_hook(env, W::on_window_added)
    }

    fn tick(&mut self, is_external_pulse: bool, env: &mut Env<'_, S>) -> Result<()> {
        self.run_window_hook(env, |cx| W::on_tick(is_external_pulse, cx))?;
        self.run_form_hook(env, |form, cx| form.on_tick(is_external_pulse, cx))
    }

    fn send_input(&mut self, input: &str, env: &mut Env<'_, S>) -> Result<()> {
        if let Some(form) = &self.form {
            if !form.accepts_input() {
                return Ok(());
            }
            return self.run_form_hook(env, |form, cx| form.on_input(input, cx));
        }
        let Some(entry) = self.menu.resolve(input) else {
            tracing::trace!(window = ?self.key, input, "ignored unmatched input");
            return Ok(());
        };
        let action = entry.action();
        self.run_window_hook(env, |cx| action(cx))
    }

    fn set_form(&mut self, key: S::FormKey, env: &mut Env<'_, S>) -> Result<()> {
        self.apply_transitions(vec![FormTransition::Set(key)], env)
    }

    fn clear_form(&mut self) -> Result<()> {
        self.detach_form()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
