//! Error taxonomy for the window runtime.
//!
//! Two families of failure exist: configuration errors, raised while building
//! windows and forms from their keys, and invalid transitions, raised when a
//! caller asks for a form change that cannot happen. Unrecognized user input
//! is not represented here; it is ignored.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("no window registered for key {key}")]
    UnregisteredWindow { key: String },

    #[error("window key {key} registered twice")]
    DuplicateRegistration { key: String },

    #[error("command set for window {window} is not a closed enumeration: {reason}")]
    InvalidCommandSet { window: String, reason: String },

    #[error("command {command} is not part of the command set of window {window}")]
    UnknownCommand { window: String, command: String },

    #[error("command {command} already bound to a different action in window {window}")]
    ConflictingCommand { window: String, command: String },

    #[error("entry name {name:?} rejected in window {window}: {reason}")]
    InvalidEntryName {
        window: String,
        name: String,
        reason: String,
    },

    #[error("could not construct {key}: {reason}")]
    ConstructionFailed { key: String, reason: String },

    #[error("form {form} does not belong to window {window}")]
    FormNotAttached { window: String, form: String },

    #[error("window {window} has no active form to clear")]
    NoActiveForm { window: String },

    #[error("no focused window")]
    NoFocusedWindow,
}

pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    /// Failure raised by a window or form constructor.
    pub fn construction(key: impl std::fmt::Debug, reason: impl std::fmt::Display) -> Self {
        EngineError::ConstructionFailed {
            key: key_name(&key),
            reason: reason.to_string(),
        }
    }
}

/// Format a symbolic key for error messages.
pub(crate) fn key_name<K: std::fmt::Debug>(key: &K) -> String {
    format!("{key:?}")
}
