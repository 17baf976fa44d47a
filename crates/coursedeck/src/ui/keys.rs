//! Key binding parsing and the resolved keymap used by every screen.

use anyhow::{Result, bail};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::infra::config::Keybindings;

/// A single key chord parsed from config, e.g. `k`, `space`, `ctrl+x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    code: KeyCode,
    modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn parse(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        if spec.is_empty() {
            bail!("empty key binding");
        }

        let mut modifiers = KeyModifiers::NONE;
        let mut parts: Vec<&str> = spec.split('+').collect();
        // A trailing "+" means the plus key itself.
        let key = if spec.ends_with("++") || spec == "+" {
            parts.retain(|part| !part.is_empty());
            "+"
        } else {
            parts.pop().unwrap_or_default()
        };

        for part in parts {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                "" => {}
                other => bail!("unknown modifier `{other}` in key binding `{spec}`"),
            }
        }

        let code = match key.to_ascii_lowercase().as_str() {
            "space" => KeyCode::Char(' '),
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" => KeyCode::Backspace,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => KeyCode::Char(ch),
                    _ => bail!("unrecognised key `{key}` in key binding `{spec}`"),
                }
            }
        };

        Ok(Self { code, modifiers })
    }

    /// Whether `event` is this chord. Shift is ignored for printable characters since the
    /// terminal already reports the shifted character.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        if event.code != self.code {
            return false;
        }
        let mut pressed = event.modifiers;
        if matches!(event.code, KeyCode::Char(_)) {
            pressed.remove(KeyModifiers::SHIFT);
        }
        let mut wanted = self.modifiers;
        if matches!(self.code, KeyCode::Char(_)) {
            wanted.remove(KeyModifiers::SHIFT);
        }
        pressed == wanted
    }

    /// Display form used in on-screen hints, e.g. `y`, `ctrl+x`, `enter`.
    pub fn label(&self) -> String {
        let key = match self.code {
            KeyCode::Char(' ') => "space".to_string(),
            KeyCode::Char(ch) => ch.to_string(),
            KeyCode::Enter => "enter".into(),
            KeyCode::Esc => "esc".into(),
            KeyCode::Tab => "tab".into(),
            KeyCode::Backspace => "backspace".into(),
            KeyCode::Up => "up".into(),
            KeyCode::Down => "down".into(),
            KeyCode::Left => "left".into(),
            KeyCode::Right => "right".into(),
            other => format!("{other:?}").to_lowercase(),
        };
        let mut parts = Vec::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("ctrl".to_string());
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            parts.push("alt".to_string());
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            parts.push("shift".to_string());
        }
        parts.push(key);
        parts.join("+")
    }
}

/// Configurable bindings resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    up: KeyBinding,
    down: KeyBinding,
    bookmark: KeyBinding,
    confirm: KeyBinding,
    cancel: KeyBinding,
}

impl Keymap {
    pub fn from_config(bindings: &Keybindings) -> Result<Self> {
        Ok(Self {
            up: KeyBinding::parse(&bindings.up)?,
            down: KeyBinding::parse(&bindings.down)?,
            bookmark: KeyBinding::parse(&bindings.bookmark)?,
            confirm: KeyBinding::parse(&bindings.confirm)?,
            cancel: KeyBinding::parse(&bindings.cancel)?,
        })
    }

    pub fn is_up(&self, key: &KeyEvent) -> bool {
        key.code == KeyCode::Up || self.up.matches(key)
    }

    pub fn is_down(&self, key: &KeyEvent) -> bool {
        key.code == KeyCode::Down || self.down.matches(key)
    }

    pub fn is_bookmark(&self, key: &KeyEvent) -> bool {
        self.bookmark.matches(key)
    }

    pub fn is_confirm(&self, key: &KeyEvent) -> bool {
        key.code == KeyCode::Enter || self.confirm.matches(key)
    }

    pub fn confirm_label(&self) -> String {
        self.confirm.label()
    }

    pub fn cancel_label(&self) -> String {
        self.cancel.label()
    }

    /// `c` and `Esc` always cancel in addition to the configured key.
    pub fn is_cancel(&self, key: &KeyEvent) -> bool {
        matches!(key.code, KeyCode::Esc | KeyCode::Char('c')) || self.cancel.matches(key)
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            up: KeyBinding {
                code: KeyCode::Char('k'),
                modifiers: KeyModifiers::NONE,
            },
            down: KeyBinding {
                code: KeyCode::Char('j'),
                modifiers: KeyModifiers::NONE,
            },
            bookmark: KeyBinding {
                code: KeyCode::Char('b'),
                modifiers: KeyModifiers::NONE,
            },
            confirm: KeyBinding {
                code: KeyCode::Char('y'),
                modifiers: KeyModifiers::NONE,
            },
            cancel: KeyBinding {
                code: KeyCode::Char('n'),
                modifiers: KeyModifiers::NONE,
            },
        }
    }
}

/// Plain key press without modifiers, for tests and synthetic input.
pub fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_and_modified_keys() {
        let space = KeyBinding::parse("space").unwrap();
        assert!(space.matches(&press(KeyCode::Char(' '))));

        let ctrl_x = KeyBinding::parse("Ctrl+x").unwrap();
        assert!(ctrl_x.matches(&KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL)));
        assert!(!ctrl_x.matches(&press(KeyCode::Char('x'))));

        let plus = KeyBinding::parse("+").unwrap();
        assert!(plus.matches(&press(KeyCode::Char('+'))));
    }

    #[test]
    fn labels_round_trip_through_parse() {
        for spec in ["y", "ctrl+d", "enter", "space", "alt+x"] {
            assert_eq!(KeyBinding::parse(spec).unwrap().label(), spec);
        }
        assert_eq!(Keymap::default().confirm_label(), "y");
        assert_eq!(Keymap::default().cancel_label(), "n");
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(KeyBinding::parse("").is_err());
        assert!(KeyBinding::parse("hyper+k").is_err());
        assert!(KeyBinding::parse("pagedownish").is_err());
    }

    #[test]
    fn shifted_characters_match_their_binding() {
        let upper_b = KeyBinding::parse("B").unwrap();
        assert!(upper_b.matches(&KeyEvent::new(KeyCode::Char('B'), KeyModifiers::SHIFT)));
    }

    #[test]
    fn default_keymap_matches_default_config() {
        let keymap = Keymap::from_config(&Keybindings::default()).unwrap();
        assert_eq!(keymap, Keymap::default());
        assert!(keymap.is_up(&press(KeyCode::Up)));
        assert!(keymap.is_confirm(&press(KeyCode::Enter)));
        assert!(keymap.is_cancel(&press(KeyCode::Esc)));
        assert!(keymap.is_cancel(&press(KeyCode::Char('c'))));
        assert!(keymap.is_bookmark(&press(KeyCode::Char('b'))));
    }

    #[test]
    fn custom_bindings_replace_defaults() {
        let bindings = Keybindings {
            bookmark: "space".into(),
            ..Keybindings::default()
        };
        let keymap = Keymap::from_config(&bindings).unwrap();
        assert!(keymap.is_bookmark(&press(KeyCode::Char(' '))));
        assert!(!keymap.is_bookmark(&press(KeyCode::Char('b'))));
    }
}
