//! Key-to-instance construction for windows and forms.
//!
//! Windows come from an explicit registry built once at startup. Forms are
//! resolved through the owning window kind's [`WindowBehavior::create_form`]
//! match, so a form can only be attached to the window kind that declares it.
//! Constructors may fail. Both factories count successful constructions per
//! key; the counts are for diagnostics and never steer control flow.

use std::collections::BTreeMap;

use crate::error::{EngineError, Result, key_name};
use crate::form::Form;
use crate::menu::CommandMenu;
use crate::simulation::Simulation;
use crate::window::{AnyWindow, Menu, Window, WindowBehavior};

type WindowCtor<S> =
    Box<dyn Fn(<S as Simulation>::WindowKey, &S) -> Result<Box<dyn AnyWindow<S>>>>;

pub struct WindowFactory<S: Simulation> {
    ctors: BTreeMap<S::WindowKey, WindowCtor<S>>,
    attach_counts: BTreeMap<S::WindowKey, usize>,
}

impl<S: Simulation> Default for WindowFactory<S> {
    fn default() -> Self {
        Self {
            ctors: BTreeMap::new(),
            attach_counts: BTreeMap::new(),
        }
    }
}

impl<S: Simulation> WindowFactory<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `key` to the window kind `W`, built by `ctor`.
    ///
    /// The command set of `W` is validated here so a malformed one fails at
    /// startup rather than when the window is first opened. An error from
    /// `ctor` is returned from the `add` that triggered it; use
    /// [`EngineError::construction`] to report one.
    pub fn register<W: WindowBehavior<S>>(
        &mut self,
        key: S::WindowKey,
        ctor: fn(&S) -> Result<W>,
    ) -> Result<()> {
        if self.ctors.contains_key(&key) {
            return Err(EngineError::DuplicateRegistration { key: key_name(&key) });
        }
        let _: Menu<S, W> = CommandMenu::new(key)?;
        self.ctors.insert(
            key,
            Box::new(move |key, sim| {
                let window = Window::new(key, ctor(sim)?)?;
                Ok(Box::new(window) as Box<dyn AnyWindow<S>>)
            }),
        );
        Ok(())
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<W: WindowBehavior<S>>(
        mut self,
        key: S::WindowKey,
        ctor: fn(&S) -> Result<W>,
    ) -> Result<Self> {
        self.register(key, ctor)?;
        Ok(self)
    }

    pub fn is_registered(&self, key: S::WindowKey) -> bool {
        self.ctors.contains_key(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = S::WindowKey> + '_ {
        self.ctors.keys().copied()
    }

    pub fn attach_count(&self, key: S::WindowKey) -> usize {
        self.attach_counts.get(&key).copied().unwrap_or(0)
    }

    pub(crate) fn create(&mut self, key: S::WindowKey, sim: &S) -> Result<Box<dyn AnyWindow<S>>> {
        let ctor = self
            .ctors
            .get(&key)
            .ok_or_else(|| EngineError::UnregisteredWindow { key: key_name(&key) })?;
        let window = ctor(key, sim)?;
        let count = self.attach_counts.entry(key).or_default();
        *count += 1;
        tracing::debug!(window = ?key, attached = *count, "constructed window");
        Ok(window)
    }
}

pub struct FormFactory<S: Simulation> {
    attach_counts: BTreeMap<S::FormKey, usize>,
}

impl<S: Simulation> Default for FormFactory<S> {
    fn default() -> Self {
        Self {
            attach_counts: BTreeMap::new(),
        }
    }
}

impl<S: Simulation> FormFactory<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach_count(&self, key: S::FormKey) -> usize {
        self.attach_counts.get(&key).copied().unwrap_or(0)
    }

    pub(crate) fn create<W: WindowBehavior<S>>(
        &mut self,
        window: S::WindowKey,
        key: S::FormKey,
        behavior: &W,
        sim: &S,
    ) -> Result<Box<dyn Form<S, W>>> {
        let form = behavior
            .create_form(key, sim)?
            .ok_or_else(|| EngineError::FormNotAttached {
                window: key_name(&window),
                form: key_name(&key),
            })?;
        let count = self.attach_counts.entry(key).or_default();
        *count += 1;
        tracing::debug!(window = ?window, form = ?key, attached = *count, "attached form");
        Ok(form)
    }
}
