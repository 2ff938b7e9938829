use std::fmt;

use crate::error::{EngineError, Result, key_name};

/// A closed set of command symbols a window can bind to menu entries.
///
/// `ALL` must list every variant exactly once. [`CommandMenu::new`] checks
/// this along with the names, so a malformed set stops window construction.
pub trait MenuCommand: Copy + Eq + fmt::Debug + 'static {
    const ALL: &'static [Self];

    fn name(&self) -> &'static str;
}

/// Command set for windows that never show a menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoCommand {}

impl MenuCommand for NoCommand {
    const ALL: &'static [Self] = &[];

    fn name(&self) -> &'static str {
        match *self {}
    }
}

fn validate_command_set<C: MenuCommand>() -> std::result::Result<(), String> {
    for (idx, command) in C::ALL.iter().enumerate() {
        let earlier = &C::ALL[..idx];
        if earlier.contains(command) {
            return Err(format!("{command:?} listed twice"));
        }
        let name = command.name().trim();
        if name.is_empty() {
            return Err(format!("{command:?} has an empty name"));
        }
        // Digits are reserved for positional selection.
        if name.parse::<usize>().is_ok() {
            return Err(format!("{command:?} has a numeric name"));
        }
        if earlier
            .iter()
            .any(|other| other.name().trim().eq_ignore_ascii_case(name))
        {
            return Err(format!("name {name:?} is used by more than one command"));
        }
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct MenuEntry<C, A> {
    command: C,
    action: A,
    description: String,
    name: Option<String>,
}

impl<C: MenuCommand, A: Copy> MenuEntry<C, A> {
    pub fn command(&self) -> C {
        self.command
    }

    pub fn action(&self) -> A {
        self.action
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Explicit name if one was given, otherwise the command's own name.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.command.name())
    }
}

/// Ordered list of selectable actions, numbered from 1 in insertion order.
#[derive(Debug, Clone)]
pub struct CommandMenu<C, A> {
    owner: String,
    entries: Vec<MenuEntry<C, A>>,
}

impl<C: MenuCommand, A: Copy + PartialEq> CommandMenu<C, A> {
    /// Create an empty menu after validating the command set of `C`.
    pub fn new(owner: impl fmt::Debug) -> Result<Self> {
        let owner = key_name(&owner);
        validate_command_set::<C>().map_err(|reason| EngineError::InvalidCommandSet {
            window: owner.clone(),
            reason,
        })?;
        Ok(Self {
            owner,
            entries: Vec::new(),
        })
    }

    /// Append an entry. Re-adding an identical entry is a no-op.
    ///
    /// Identity includes `action`. For fn-pointer actions that comparison is
    /// only as stable as the compiler makes fn addresses: the same function
    /// reached through another codegen unit may compare unequal and report
    /// [`EngineError::ConflictingCommand`]. Bind each action from one place.
    pub fn add_command(
        &mut self,
        action: A,
        command: C,
        description: impl Into<String>,
    ) -> Result<()> {
        self.insert(action, command, description.into(), None)
    }

    /// Like [`add_command`](Self::add_command), with a name the user may type
    /// instead of the entry number.
    pub fn add_named_command(
        &mut self,
        action: A,
        command: C,
        description: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<()> {
        self.insert(action, command, description.into(), Some(name.into()))
    }

    fn insert(
        &mut self,
        action: A,
        command: C,
        description: String,
        name: Option<String>,
    ) -> Result<()> {
        if !C::ALL.contains(&command) {
            return Err(EngineError::UnknownCommand {
                window: self.owner.clone(),
                command: key_name(&command),
            });
        }
        let name = name.map(|name| name.trim().to_string());
        if let Some(existing) = self.entries.iter().find(|entry| entry.command == command) {
            if existing.action == action
                && existing.description == description
                && existing.name == name
            {
                return Ok(());
            }
            return Err(EngineError::ConflictingCommand {
                window: self.owner.clone(),
                command: key_name(&command),
            });
        }
        if let Some(name) = &name {
            self.check_explicit_name(name)?;
        }
        let resolved = name.as_deref().unwrap_or_else(|| command.name());
        if self
            .entries
            .iter()
            .any(|entry| entry.name().eq_ignore_ascii_case(resolved))
        {
            return Err(self.name_error(resolved, "already used by another entry"));
        }
        self.entries.push(MenuEntry {
            command,
            action,
            description,
            name,
        });
        Ok(())
    }

    fn check_explicit_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(self.name_error(name, "empty"));
        }
        if name.parse::<usize>().is_ok() {
            return Err(self.name_error(name, "numeric names are entry numbers"));
        }
        Ok(())
    }

    fn name_error(&self, name: &str, reason: &str) -> EngineError {
        EngineError::InvalidEntryName {
            window: self.owner.clone(),
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn clear_commands(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[MenuEntry<C, A>] {
        &self.entries
    }

    /// Match `input` against an entry number or an entry name.
    pub fn resolve(&self, input: &str) -> Option<&MenuEntry<C, A>> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        if let Ok(position) = input.parse::<usize>() {
            return position
                .checked_sub(1)
                .and_then(|idx| self.entries.get(idx));
        }
        self.entries
            .iter()
            .find(|entry| entry.name().eq_ignore_ascii_case(input))
    }

    pub fn render(&self, header: Option<&str>, footer: Option<&str>) -> String {
        let mut lines: Vec<String> = Vec::with_capacity(self.entries.len() + 4);
        if let Some(header) = header {
            lines.push(header.to_string());
            lines.push(String::new());
        }
        for (idx, entry) in self.entries.iter().enumerate() {
            lines.push(format!("{}. {}", idx + 1, entry.description));
        }
        if let Some(footer) = footer {
            lines.push(String::new());
            lines.push(footer.to_string());
        }
        lines.join("\n")
    }
}
