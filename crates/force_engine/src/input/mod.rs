//! Input interface consumed by behavior modules
//!
//! The windowing layer owns the real key state; modules only query it through
//! [`InputSource`]. [`KeyboardState`] is an in-memory implementation used for
//! headless runs and tests.

#[cfg(feature = "glfw")]
pub mod glfw_input;

use std::collections::HashSet;
use std::str::FromStr;

/// Key-state and cursor queries provided by the windowing layer
pub trait InputSource {
    /// Whether `key` is currently held down
    fn is_key_down(&self, key: KeyCode) -> bool;

    /// Last reported cursor position in window coordinates
    fn cursor_position(&self) -> (f64, f64) {
        (0.0, 0.0)
    }
}

/// Input source with no keys pressed
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl InputSource for NoInput {
    fn is_key_down(&self, _key: KeyCode) -> bool {
        false
    }
}

/// In-memory key and cursor state
#[derive(Debug, Default, Clone)]
pub struct KeyboardState {
    pressed: HashSet<KeyCode>,
    cursor: (f64, f64),
}

impl KeyboardState {
    /// Create a state with nothing pressed
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle key input
    pub fn handle_key_input(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.pressed.insert(key);
        } else {
            self.pressed.remove(&key);
        }
    }

    /// Handle mouse movement
    pub fn handle_mouse_move(&mut self, x: f64, y: f64) {
        self.cursor = (x, y);
    }

    /// Release every key
    pub fn clear(&mut self) {
        self.pressed.clear();
    }
}

impl InputSource for KeyboardState {
    fn is_key_down(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    fn cursor_position(&self) -> (f64, f64) {
        self.cursor
    }
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

impl FromStr for KeyCode {
    type Err = String;

    /// Parse the symbolic names used in scene files (`Space`, `W`, `Up`, ...)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s.to_ascii_uppercase().as_str() {
            "A" => Self::A,
            "B" => Self::B,
            "C" => Self::C,
            "D" => Self::D,
            "E" => Self::E,
            "F" => Self::F,
            "G" => Self::G,
            "H" => Self::H,
            "I" => Self::I,
            "J" => Self::J,
            "K" => Self::K,
            "L" => Self::L,
            "M" => Self::M,
            "N" => Self::N,
            "O" => Self::O,
            "P" => Self::P,
            "Q" => Self::Q,
            "R" => Self::R,
            "S" => Self::S,
            "T" => Self::T,
            "U" => Self::U,
            "V" => Self::V,
            "W" => Self::W,
            "X" => Self::X,
            "Y" => Self::Y,
            "Z" => Self::Z,
            "SPACE" => Self::Space,
            "ENTER" | "RETURN" => Self::Enter,
            "ESCAPE" | "ESC" => Self::Escape,
            "UP" => Self::Up,
            "DOWN" => Self::Down,
            "LEFT" => Self::Left,
            "RIGHT" => Self::Right,
            other => return Err(format!("unknown key '{other}'")),
        };
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_state_press_release() {
        let mut state = KeyboardState::new();
        assert!(!state.is_key_down(KeyCode::Space));

        state.handle_key_input(KeyCode::Space, true);
        assert!(state.is_key_down(KeyCode::Space));

        state.handle_key_input(KeyCode::Space, false);
        assert!(!state.is_key_down(KeyCode::Space));
    }

    #[test]
    fn test_key_names_parse_case_insensitively() {
        assert_eq!("space".parse::<KeyCode>(), Ok(KeyCode::Space));
        assert_eq!("W".parse::<KeyCode>(), Ok(KeyCode::W));
        assert!("F13".parse::<KeyCode>().is_err());
    }
}
