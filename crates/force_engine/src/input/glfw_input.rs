//! GLFW window adapter for [`InputSource`]

use super::{InputSource, KeyCode};

fn to_glfw_key(key: KeyCode) -> glfw::Key {
    match key {
        KeyCode::A => glfw::Key::A,
        KeyCode::B => glfw::Key::B,
        KeyCode::C => glfw::Key::C,
        KeyCode::D => glfw::Key::D,
        KeyCode::E => glfw::Key::E,
        KeyCode::F => glfw::Key::F,
        KeyCode::G => glfw::Key::G,
        KeyCode::H => glfw::Key::H,
        KeyCode::I => glfw::Key::I,
        KeyCode::J => glfw::Key::J,
        KeyCode::K => glfw::Key::K,
        KeyCode::L => glfw::Key::L,
        KeyCode::M => glfw::Key::M,
        KeyCode::N => glfw::Key::N,
        KeyCode::O => glfw::Key::O,
        KeyCode::P => glfw::Key::P,
        KeyCode::Q => glfw::Key::Q,
        KeyCode::R => glfw::Key::R,
        KeyCode::S => glfw::Key::S,
        KeyCode::T => glfw::Key::T,
        KeyCode::U => glfw::Key::U,
        KeyCode::V => glfw::Key::V,
        KeyCode::W => glfw::Key::W,
        KeyCode::X => glfw::Key::X,
        KeyCode::Y => glfw::Key::Y,
        KeyCode::Z => glfw::Key::Z,
        KeyCode::Space => glfw::Key::Space,
        KeyCode::Enter => glfw::Key::Enter,
        KeyCode::Escape => glfw::Key::Escape,
        KeyCode::Up => glfw::Key::Up,
        KeyCode::Down => glfw::Key::Down,
        KeyCode::Left => glfw::Key::Left,
        KeyCode::Right => glfw::Key::Right,
    }
}

impl InputSource for glfw::Window {
    fn is_key_down(&self, key: KeyCode) -> bool {
        self.get_key(to_glfw_key(key)) == glfw::Action::Press
    }

    fn cursor_position(&self) -> (f64, f64) {
        self.get_cursor_pos()
    }
}
