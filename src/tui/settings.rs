use super::input::{KeyAction, KeyBindings, KeyTrigger};
use crate::error::{PicCullError, Result};

/// Index of the delete-on-cull row, after the rebindable actions
pub const DELETE_ROW: usize = KeyAction::REBINDABLE.len();
const ROW_COUNT: usize = DELETE_ROW + 1;

/// Working copy of the preferences edited in the settings overlay.
///
/// Nothing here touches the live configuration until the app applies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsState {
    pub bindings: KeyBindings,
    pub delete_on_cull: bool,
    pub selected: usize,
    /// Set while waiting for the key to bind to the selected action
    pub capturing: bool,
}

impl SettingsState {
    pub fn new(bindings: KeyBindings, delete_on_cull: bool) -> Self {
        Self {
            bindings,
            delete_on_cull,
            selected: 0,
            capturing: false,
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.checked_sub(1).unwrap_or(ROW_COUNT - 1);
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % ROW_COUNT;
    }

    /// Action on the selected row, if it is a rebindable one
    pub fn selected_action(&self) -> Option<KeyAction> {
        KeyAction::REBINDABLE.get(self.selected).copied()
    }

    /// Enter on a row: start capturing for an action row, toggle on the
    /// delete row.
    pub fn activate(&mut self) {
        if self.selected_action().is_some() {
            self.capturing = true;
        } else {
            self.toggle_delete();
        }
    }

    pub fn toggle_delete(&mut self) {
        self.delete_on_cull = !self.delete_on_cull;
    }

    /// Binds the captured key to the selected action and stops capturing.
    ///
    /// Keys without a text form, and keys that already have a fixed
    /// meaning, are refused. Capturing continues so another key can be
    /// pressed.
    pub fn capture(&mut self, trigger: KeyTrigger) -> Result<()> {
        if !trigger.is_nameable() {
            return Err(PicCullError::InvalidKey(trigger.to_string()));
        }
        if let Some(action) = trigger.reserved_action() {
            return Err(PicCullError::ReservedKey {
                key: trigger.to_string(),
                action: action.label(),
            });
        }

        if let Some(action) = self.selected_action() {
            self.bindings.set(action, trigger);
        }
        self.capturing = false;
        Ok(())
    }

    pub fn cancel_capture(&mut self) {
        self.capturing = false;
    }
}
