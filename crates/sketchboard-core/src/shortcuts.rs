//! Keyboard shortcut registry.

use crate::input::{Key, KeyEvent};

/// Engine action bound to a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutAction {
    Undo,
    Redo,
    SelectAll,
    DeleteSelection,
    Cancel,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    /// Ctrl, or Cmd on macOS.
    pub command: bool,
    pub shift: bool,
    pub action: ShortcutAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        command: bool,
        shift: bool,
        action: ShortcutAction,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            command,
            shift,
            action,
            description,
        }
    }

    /// Whether `event` triggers this shortcut. Alt is ignored.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        Key::from_name(self.key) == event.key
            && self.command == event.modifiers.command()
            && self.shift == event.modifiers.shift
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.command {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

const SHORTCUTS: [Shortcut; 7] = [
    Shortcut::new("Z", true, false, ShortcutAction::Undo, "Undo"),
    Shortcut::new("Z", true, true, ShortcutAction::Redo, "Redo"),
    Shortcut::new("Y", true, false, ShortcutAction::Redo, "Redo"),
    Shortcut::new("A", true, false, ShortcutAction::SelectAll, "Select all elements"),
    Shortcut::new(
        "Delete",
        false,
        false,
        ShortcutAction::DeleteSelection,
        "Delete selected elements",
    ),
    Shortcut::new(
        "Backspace",
        false,
        false,
        ShortcutAction::DeleteSelection,
        "Delete selected elements",
    ),
    Shortcut::new("Escape", false, false, ShortcutAction::Cancel, "Cancel current action"),
];

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> &'static [Shortcut] {
        &SHORTCUTS
    }

    /// Action bound to `event`, if any.
    pub fn action_for(event: &KeyEvent) -> Option<ShortcutAction> {
        SHORTCUTS.iter().find(|s| s.matches(event)).map(|s| s.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;

    fn press(name: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        ShortcutRegistry::action_for(&KeyEvent::named(name, modifiers))
    }

    #[test]
    fn test_undo_redo_bindings() {
        let ctrl_shift = Modifiers {
            ctrl: true,
            shift: true,
            ..Modifiers::NONE
        };
        let cmd = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert_eq!(press("z", Modifiers::ctrl()), Some(ShortcutAction::Undo));
        assert_eq!(press("z", cmd), Some(ShortcutAction::Undo));
        assert_eq!(press("Z", ctrl_shift), Some(ShortcutAction::Redo));
        assert_eq!(press("y", Modifiers::ctrl()), Some(ShortcutAction::Redo));
        assert_eq!(press("z", Modifiers::NONE), None);
    }

    #[test]
    fn test_plain_keys() {
        assert_eq!(press("Escape", Modifiers::NONE), Some(ShortcutAction::Cancel));
        assert_eq!(press("Backspace", Modifiers::NONE), Some(ShortcutAction::DeleteSelection));
        assert_eq!(press("Delete", Modifiers::ctrl()), None);
        assert_eq!(press("a", Modifiers::ctrl()), Some(ShortcutAction::SelectAll));
    }

    #[test]
    fn test_format() {
        let redo = &ShortcutRegistry::all()[1];
        assert_eq!(redo.format(), "Ctrl+Shift+Z");
    }
}
