//! Key event model consumed by the dispatcher.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A single key-down event.
///
/// `key` is the character the keystroke produced (`"k"`, `"!"`) or a
/// lowercase name for non-character keys (`"enter"`, `"escape"`,
/// `"arrowdown"`, `"f5"`). An empty token marks a synthetic event the
/// dispatcher ignores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            meta: false,
            shift: false,
            alt: false,
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }
}

impl From<&KeyEvent> for KeyPress {
    fn from(event: &KeyEvent) -> Self {
        let key = match event.code {
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "enter".to_string(),
            KeyCode::Esc => "escape".to_string(),
            KeyCode::Backspace => "backspace".to_string(),
            KeyCode::Tab | KeyCode::BackTab => "tab".to_string(),
            KeyCode::Delete => "delete".to_string(),
            KeyCode::Insert => "insert".to_string(),
            KeyCode::Home => "home".to_string(),
            KeyCode::End => "end".to_string(),
            KeyCode::PageUp => "pageup".to_string(),
            KeyCode::PageDown => "pagedown".to_string(),
            KeyCode::Up => "arrowup".to_string(),
            KeyCode::Down => "arrowdown".to_string(),
            KeyCode::Left => "arrowleft".to_string(),
            KeyCode::Right => "arrowright".to_string(),
            KeyCode::F(n) => format!("f{n}"),
            _ => String::new(),
        };
        Self {
            key,
            ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
            meta: event.modifiers.contains(KeyModifiers::SUPER)
                || event.modifiers.contains(KeyModifiers::META),
            shift: event.modifiers.contains(KeyModifiers::SHIFT),
            alt: event.modifiers.contains(KeyModifiers::ALT),
        }
    }
}
