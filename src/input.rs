//! Keyboard input mapping
//!
//! Every key press maps to at most one action. Held keys rely on the
//! terminal's own key repeat.

use crate::game::Action;
use crate::settings::Settings;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Key bindings configuration - supports multiple keys per action
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub move_left: Vec<KeyCode>,
    pub move_right: Vec<KeyCode>,
    pub move_down: Vec<KeyCode>,
    pub rotate: Vec<KeyCode>,
    pub restart: Vec<KeyCode>,
    pub quit: Vec<KeyCode>,
}

impl KeyBindings {
    /// Parse a key string into KeyCode
    fn parse_key(s: &str) -> Option<KeyCode> {
        let key = match s.to_lowercase().as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "esc" | "escape" => KeyCode::Esc,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };
        Some(key)
    }

    /// Parse a list of key strings into KeyCodes, skipping unknown names
    fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
        keys.iter()
            .filter_map(|s| {
                let key = Self::parse_key(s);
                if key.is_none() {
                    tracing::warn!("Ignoring unknown key name {:?}", s);
                }
                key
            })
            .collect()
    }

    /// Create keybindings from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            move_left: Self::parse_keys(&settings.keys.move_left),
            move_right: Self::parse_keys(&settings.keys.move_right),
            move_down: Self::parse_keys(&settings.keys.move_down),
            rotate: Self::parse_keys(&settings.keys.rotate),
            restart: Self::parse_keys(&settings.keys.restart),
            quit: Self::parse_keys(&settings.keys.quit),
        }
    }

    /// Look up the action bound to a key
    pub fn action_for(&self, code: KeyCode) -> Option<Action> {
        let code = normalize_key(code);
        [
            (&self.move_left, Action::MoveLeft),
            (&self.move_right, Action::MoveRight),
            (&self.move_down, Action::MoveDown),
            (&self.rotate, Action::Rotate),
            (&self.restart, Action::Restart),
            (&self.quit, Action::Quit),
        ]
        .into_iter()
        .find(|(keys, _)| keys.contains(&code))
        .map(|(_, action)| action)
    }

    /// Display name of the first key bound to an action
    pub fn label(&self, action: Action) -> String {
        let keys = match action {
            Action::MoveLeft => &self.move_left,
            Action::MoveRight => &self.move_right,
            Action::MoveDown => &self.move_down,
            Action::Rotate => &self.rotate,
            Action::Restart => &self.restart,
            Action::Quit => &self.quit,
        };
        match keys.first() {
            Some(KeyCode::Left) => "←".to_string(),
            Some(KeyCode::Right) => "→".to_string(),
            Some(KeyCode::Up) => "↑".to_string(),
            Some(KeyCode::Down) => "↓".to_string(),
            Some(KeyCode::Char(' ')) => "Space".to_string(),
            Some(KeyCode::Char(c)) => c.to_ascii_uppercase().to_string(),
            Some(KeyCode::Esc) => "Esc".to_string(),
            Some(KeyCode::Enter) => "Enter".to_string(),
            Some(KeyCode::Tab) => "Tab".to_string(),
            _ => "-".to_string(),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: vec![KeyCode::Left],
            move_right: vec![KeyCode::Right],
            move_down: vec![KeyCode::Down],
            rotate: vec![KeyCode::Up],
            restart: vec![KeyCode::Char('r')],
            quit: vec![KeyCode::Char('q'), KeyCode::Esc],
        }
    }
}

/// Maps key events to game actions
#[derive(Debug, Clone, Default)]
pub struct InputHandler {
    pub bindings: KeyBindings,
}

impl InputHandler {
    /// Create input handler from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            bindings: KeyBindings::from_settings(settings),
        }
    }

    /// Handle a key event - returns the action to apply, if any
    pub fn key_down(&self, key: KeyEvent) -> Option<Action> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        // Handle Ctrl+C for quit
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }

        self.bindings.action_for(key.code)
    }
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_default_bindings() {
        let input = InputHandler::default();
        assert_eq!(input.key_down(press(KeyCode::Left)), Some(Action::MoveLeft));
        assert_eq!(input.key_down(press(KeyCode::Right)), Some(Action::MoveRight));
        assert_eq!(input.key_down(press(KeyCode::Down)), Some(Action::MoveDown));
        assert_eq!(input.key_down(press(KeyCode::Up)), Some(Action::Rotate));
        assert_eq!(input.key_down(press(KeyCode::Char('r'))), Some(Action::Restart));
        assert_eq!(input.key_down(press(KeyCode::Esc)), Some(Action::Quit));
        assert_eq!(input.key_down(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_uppercase_matches_binding() {
        let input = InputHandler::default();
        assert_eq!(input.key_down(press(KeyCode::Char('R'))), Some(Action::Restart));
    }

    #[test]
    fn test_ctrl_c_quits() {
        let input = InputHandler::default();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(input.key_down(key), Some(Action::Quit));
    }

    #[test]
    fn test_release_is_ignored() {
        let input = InputHandler::default();
        let mut key = press(KeyCode::Left);
        key.kind = KeyEventKind::Release;
        assert_eq!(input.key_down(key), None);
    }

    #[test]
    fn test_bindings_from_settings() {
        let mut settings = Settings::default();
        settings.keys.move_left = vec!["a".to_string(), "Left".to_string()];
        settings.keys.rotate = vec!["Space".to_string(), "nonsense".to_string()];
        let input = InputHandler::from_settings(&settings);

        assert_eq!(input.key_down(press(KeyCode::Char('a'))), Some(Action::MoveLeft));
        assert_eq!(input.key_down(press(KeyCode::Left)), Some(Action::MoveLeft));
        assert_eq!(input.key_down(press(KeyCode::Char(' '))), Some(Action::Rotate));
        assert_eq!(input.bindings.rotate.len(), 1);
        assert_eq!(input.key_down(press(KeyCode::Up)), None);
    }

    #[test]
    fn test_labels() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.label(Action::MoveLeft), "←");
        assert_eq!(bindings.label(Action::Restart), "R");
        assert_eq!(bindings.label(Action::Quit), "Q");
    }
}
