use crate::error::PicCullError;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Represents the result of handling a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Quit the application
    Quit,
    /// Show the previous image
    Previous,
    /// Show the next image
    Next,
    /// Cull the current image
    Cull,
    /// Confirm a permanent delete
    ConfirmDelete,
    /// Cancel a permanent delete
    CancelDelete,
    /// Prompt for a directory to load
    OpenDirectory,
    /// Open the culled folder in the file manager
    OpenCulled,
    /// Show the settings overlay
    Settings,
    /// Toggle help overlay
    Help,
    /// No action
    None,
}

impl KeyAction {
    /// Actions whose key can be changed in the settings overlay
    pub const REBINDABLE: [KeyAction; 3] = [KeyAction::Previous, KeyAction::Next, KeyAction::Cull];

    pub fn label(&self) -> &'static str {
        match self {
            KeyAction::Quit => "Quit",
            KeyAction::Previous => "Previous image",
            KeyAction::Next => "Next image",
            KeyAction::Cull => "Cull image",
            KeyAction::ConfirmDelete => "Confirm delete",
            KeyAction::CancelDelete => "Cancel delete",
            KeyAction::OpenDirectory => "Load directory",
            KeyAction::OpenCulled => "Open culled folder",
            KeyAction::Settings => "Settings",
            KeyAction::Help => "Help",
            KeyAction::None => "",
        }
    }
}

/// A key (with modifiers) that triggers an action.
///
/// Serialized as a short string such as `"Left"`, `"x"` or `"Ctrl+d"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyTrigger {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyTrigger {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        // Shift is already part of a character's case, and of BackTab
        let modifiers = match code {
            KeyCode::Char(_) | KeyCode::BackTab => modifiers - KeyModifiers::SHIFT,
            _ => modifiers,
        };
        Self {
            code,
            modifiers: modifiers & (KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT),
        }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn from_event(key: KeyEvent) -> Self {
        Self::new(key.code, key.modifiers)
    }

    pub fn matches(&self, key: KeyEvent) -> bool {
        *self == Self::from_event(key)
    }

    /// Whether the trigger has a text form that parses back to it. Only
    /// these can be saved in the config file.
    pub fn is_nameable(&self) -> bool {
        key_code_name(self.code).is_some()
    }

    /// The fixed browser action this trigger already performs, if any
    pub fn reserved_action(&self) -> Option<KeyAction> {
        match fixed_action(KeyEvent::new(self.code, self.modifiers)) {
            KeyAction::None => None,
            action => Some(action),
        }
    }
}

fn parse_key_code(name: &str) -> Option<KeyCode> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }

    let code = match name.to_lowercase().as_str() {
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "enter" | "return" => KeyCode::Enter,
        "space" => KeyCode::Char(' '),
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "backspace" => KeyCode::Backspace,
        "esc" | "escape" => KeyCode::Esc,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "delete" | "del" => KeyCode::Delete,
        "insert" => KeyCode::Insert,
        other => {
            let n: u8 = other.strip_prefix('f')?.parse().ok()?;
            if (1..=24).contains(&n) {
                KeyCode::F(n)
            } else {
                return None;
            }
        }
    };
    Some(code)
}

/// Text form of a key, or `None` for keys `parse_key_code` does not accept
fn key_code_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Char(' ') => "Space",
        KeyCode::Char(c) if c.is_whitespace() || c.is_control() => return None,
        KeyCode::Char(c) => return Some(c.to_string()),
        KeyCode::F(n) if (1..=24).contains(&n) => return Some(format!("F{}", n)),
        KeyCode::Left => "Left",
        KeyCode::Right => "Right",
        KeyCode::Up => "Up",
        KeyCode::Down => "Down",
        KeyCode::Enter => "Enter",
        KeyCode::Tab => "Tab",
        KeyCode::BackTab => "BackTab",
        KeyCode::Backspace => "Backspace",
        KeyCode::Esc => "Esc",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        KeyCode::PageUp => "PageUp",
        KeyCode::PageDown => "PageDown",
        KeyCode::Delete => "Delete",
        KeyCode::Insert => "Insert",
        _ => return None,
    };
    Some(name.to_string())
}

impl FromStr for KeyTrigger {
    type Err = PicCullError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || PicCullError::InvalidKey(s.to_string());

        // "+" alone, or a trailing "++", names the plus key itself
        let (mods_part, key_part) = if s == "+" {
            ("", "+")
        } else if let Some(mods) = s.strip_suffix("++") {
            (mods, "+")
        } else {
            s.rsplit_once('+').unwrap_or(("", s))
        };

        let mut modifiers = KeyModifiers::NONE;
        for part in mods_part.split('+').filter(|p| !p.is_empty()) {
            modifiers |= match part.to_lowercase().as_str() {
                "ctrl" | "control" => KeyModifiers::CONTROL,
                "alt" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                _ => return Err(invalid()),
            };
        }

        let mut code = parse_key_code(key_part).ok_or_else(invalid)?;
        if let KeyCode::Char(c) = code {
            if modifiers.contains(KeyModifiers::SHIFT) {
                code = KeyCode::Char(c.to_ascii_uppercase());
            }
        }

        Ok(KeyTrigger::new(code, modifiers))
    }
}

impl fmt::Display for KeyTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            write!(f, "Ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            write!(f, "Alt+")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            write!(f, "Shift+")?;
        }
        match key_code_name(self.code) {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "{:?}", self.code),
        }
    }
}

impl TryFrom<String> for KeyTrigger {
    type Error = PicCullError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeyTrigger> for String {
    fn from(trigger: KeyTrigger) -> Self {
        trigger.to_string()
    }
}

/// User-configurable keys for the rebindable actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub previous: KeyTrigger,
    pub next: KeyTrigger,
    pub cull: KeyTrigger,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            previous: KeyTrigger::plain(KeyCode::Left),
            next: KeyTrigger::plain(KeyCode::Right),
            cull: KeyTrigger::plain(KeyCode::Down),
        }
    }
}

impl KeyBindings {
    /// Returns the trigger bound to `action`, if it is rebindable
    pub fn get(&self, action: KeyAction) -> Option<KeyTrigger> {
        match action {
            KeyAction::Previous => Some(self.previous),
            KeyAction::Next => Some(self.next),
            KeyAction::Cull => Some(self.cull),
            _ => None,
        }
    }

    fn slot(&mut self, action: KeyAction) -> Option<&mut KeyTrigger> {
        match action {
            KeyAction::Previous => Some(&mut self.previous),
            KeyAction::Next => Some(&mut self.next),
            KeyAction::Cull => Some(&mut self.cull),
            _ => None,
        }
    }

    /// Binds `trigger` to `action`. If another action already uses the
    /// trigger, the two actions swap keys. Returns false for actions that
    /// cannot be rebound.
    pub fn set(&mut self, action: KeyAction, trigger: KeyTrigger) -> bool {
        let Some(old) = self.get(action) else {
            return false;
        };

        if let Some(other) = self.action_for(trigger) {
            if other != action {
                if let Some(slot) = self.slot(other) {
                    *slot = old;
                }
            }
        }

        if let Some(slot) = self.slot(action) {
            *slot = trigger;
        }
        true
    }

    /// Looks up which rebindable action a trigger is bound to
    pub fn action_for(&self, trigger: KeyTrigger) -> Option<KeyAction> {
        KeyAction::REBINDABLE
            .into_iter()
            .find(|&action| self.get(action) == Some(trigger))
    }
}

/// Maps keyboard events to actions. The fixed keys come first, so a
/// hand-edited binding cannot hide them.
pub fn handle_key_event(key: KeyEvent, bindings: &KeyBindings) -> KeyAction {
    match fixed_action(key) {
        KeyAction::None => bindings
            .action_for(KeyTrigger::from_event(key))
            .unwrap_or(KeyAction::None),
        action => action,
    }
}

/// Keys with a fixed meaning in the browser. These cannot be rebound.
fn fixed_action(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        // Quit: q, Esc or Ctrl+C
        (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Quit,

        // Vim-style aliases
        (KeyCode::Char('h'), KeyModifiers::NONE) => KeyAction::Previous,
        (KeyCode::Char('l'), KeyModifiers::NONE) => KeyAction::Next,

        (KeyCode::Char('o'), KeyModifiers::NONE) => KeyAction::OpenDirectory,
        (KeyCode::Char('f'), KeyModifiers::NONE) => KeyAction::OpenCulled,
        (KeyCode::Char('s'), KeyModifiers::NONE) => KeyAction::Settings,

        (KeyCode::Char('?'), _) => KeyAction::Help,

        _ => KeyAction::None,
    }
}

/// Maps keyboard events to confirmation actions
/// Used when ViewState is ConfirmDelete
pub fn handle_confirm_input(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        // Confirm: y or Enter
        (KeyCode::Char('y'), _) | (KeyCode::Char('Y'), _) => KeyAction::ConfirmDelete,
        (KeyCode::Enter, KeyModifiers::NONE) => KeyAction::ConfirmDelete,

        // Cancel: n or Esc
        (KeyCode::Char('n'), _) | (KeyCode::Char('N'), _) => KeyAction::CancelDelete,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::CancelDelete,

        _ => KeyAction::None,
    }
}

/// Editing commands for the directory prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptInput {
    Insert(char),
    Backspace,
    Clear,
    Submit,
    Cancel,
    None,
}

pub fn handle_prompt_input(key: KeyEvent) -> PromptInput {
    match (key.code, key.modifiers) {
        (KeyCode::Enter, _) => PromptInput::Submit,
        (KeyCode::Esc, _) => PromptInput::Cancel,
        (KeyCode::Backspace, _) => PromptInput::Backspace,
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => PromptInput::Clear,
        (KeyCode::Char(c), m) if !m.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            PromptInput::Insert(c)
        }
        _ => PromptInput::None,
    }
}

/// Commands for the settings overlay while no key is being captured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsInput {
    Up,
    Down,
    /// Start capturing a new key for the selected action
    Select,
    ToggleDelete,
    Apply,
    Cancel,
    None,
}

pub fn handle_settings_input(key: KeyEvent) -> SettingsInput {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => SettingsInput::Up,
        KeyCode::Down | KeyCode::Char('j') => SettingsInput::Down,
        KeyCode::Enter => SettingsInput::Select,
        KeyCode::Char('d') => SettingsInput::ToggleDelete,
        KeyCode::Char('a') => SettingsInput::Apply,
        KeyCode::Esc | KeyCode::Char('q') => SettingsInput::Cancel,
        _ => SettingsInput::None,
    }
}
