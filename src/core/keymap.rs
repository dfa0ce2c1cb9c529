//! Key-to-action bindings.

use std::collections::HashMap;
use std::fmt;

use crate::core::key::{KeyId, CTRL_E, CTRL_R};
use crate::error::{Error, Result};

/// Bindable action without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    StartSearch,
    Finish,
    MoveLeft,
    MoveRight,
    DeleteChar,
    InsertChar,
}

impl ActionKind {
    pub fn parse(name: &str) -> Option<ActionKind> {
        let kind = match name.trim() {
            "start-search" => ActionKind::StartSearch,
            "finish" => ActionKind::Finish,
            "move-left" => ActionKind::MoveLeft,
            "move-right" => ActionKind::MoveRight,
            "delete-char" => ActionKind::DeleteChar,
            "insert-char" => ActionKind::InsertChar,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::StartSearch => "start-search",
            ActionKind::Finish => "finish",
            ActionKind::MoveLeft => "move-left",
            ActionKind::MoveRight => "move-right",
            ActionKind::DeleteChar => "delete-char",
            ActionKind::InsertChar => "insert-char",
        };
        f.write_str(name)
    }
}

/// Action resolved for one key press, carrying the data it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    StartSearch,
    Finish,
    MoveLeft,
    MoveRight,
    DeleteChar,
    InsertChar(char),
}

/// Ordered list of `key=action` overrides applied on top of the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyMapConfig {
    entries: Vec<(KeyId, ActionKind)>,
}

impl KeyMapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: KeyId, action: ActionKind) {
        self.entries.push((key, action));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses `ctrl+f=start-search,ctrl+q=finish`.
    pub fn parse(spec: &str) -> Result<Self> {
        let mut config = Self::new();
        for entry in spec.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
            let (key, action) = entry
                .split_once('=')
                .ok_or_else(|| Error::Config(format!("key binding `{entry}` is missing `=`")))?;
            let key = KeyId::parse(key)
                .ok_or_else(|| Error::Config(format!("unknown key `{}`", key.trim())))?;
            let action = ActionKind::parse(action)
                .ok_or_else(|| Error::Config(format!("unknown action `{}`", action.trim())))?;
            config.set(key, action);
        }
        Ok(config)
    }
}

/// At most one action per key; later bindings replace earlier ones.
#[derive(Debug, Clone, Default)]
pub struct KeyMap {
    bindings: HashMap<KeyId, ActionKind>,
}

impl KeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock bindings the Screen registers.
    pub fn with_defaults() -> Self {
        let mut map = Self::new();
        map.bind(CTRL_R, ActionKind::StartSearch);
        map.bind(CTRL_E, ActionKind::Finish);
        map.bind(KeyId::Left, ActionKind::MoveLeft);
        map.bind(KeyId::Right, ActionKind::MoveRight);
        map.bind(KeyId::Backspace, ActionKind::DeleteChar);
        map.bind(KeyId::Char, ActionKind::InsertChar);
        map
    }

    pub fn bind(&mut self, key: KeyId, action: ActionKind) {
        self.bindings.insert(key, action);
    }

    pub fn apply(&mut self, config: &KeyMapConfig) {
        for (key, action) in &config.entries {
            self.bind(*key, *action);
        }
    }

    pub fn get(&self, key: KeyId) -> Option<ActionKind> {
        self.bindings.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Resolves the action bound to `key`.
    ///
    /// The decoded character is only attached for `InsertChar`; an
    /// `InsertChar` binding without one resolves to nothing.
    pub fn dispatch(&self, key: KeyId, ch: Option<char>) -> Option<Action> {
        let action = match self.get(key)? {
            ActionKind::StartSearch => Action::StartSearch,
            ActionKind::Finish => Action::Finish,
            ActionKind::MoveLeft => Action::MoveLeft,
            ActionKind::MoveRight => Action::MoveRight,
            ActionKind::DeleteChar => Action::DeleteChar,
            ActionKind::InsertChar => Action::InsertChar(ch?),
        };
        Some(action)
    }
}
