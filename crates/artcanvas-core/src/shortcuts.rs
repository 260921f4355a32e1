//! Keyboard shortcut registry.

use crate::input::KeyEvent;

/// Engine operation bound to a shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Undo,
    Redo,
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

    /// Format the shortcut for display (e.g., "Ctrl+Shift+Z").
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

    /// Whether a key press triggers this shortcut. Key names compare
    /// case-insensitively since Shift changes the reported letter case.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        event.key.eq_ignore_ascii_case(self.key)
            && event.modifiers.command() == self.command
            && event.modifiers.shift == self.shift
    }
}

static SHORTCUTS: [Shortcut; 3] = [
    Shortcut::new("Z", true, false, ShortcutAction::Undo, "Undo"),
    Shortcut::new("Z", true, true, ShortcutAction::Redo, "Redo"),
    Shortcut::new("Y", true, false, ShortcutAction::Redo, "Redo"),
];

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> &'static [Shortcut] {
        &SHORTCUTS
    }

    /// Find the shortcut a key press triggers.
    pub fn find(event: &KeyEvent) -> Option<&'static Shortcut> {
        SHORTCUTS.iter().find(|shortcut| shortcut.matches(event))
    }

    /// Find the action bound to a key press.
    pub fn resolve(event: &KeyEvent) -> Option<ShortcutAction> {
        Self::find(event).map(|shortcut| shortcut.action)
    }
}
