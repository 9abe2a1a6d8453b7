//! The world a graph runs against: input devices and character movement.
//!
//! World-query nodes read through these traits and fall back to `false`/`0` when the
//! subject does not expose the component they need.

use std::str::FromStr;

/// Keys addressable by name from input nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// `A`–`Z` and `0`–`9`, stored upper-case.
    Char(char),
    Space,
    Enter,
    Tab,
    Escape,
    Shift,
    Ctrl,
    Alt,
    Left,
    Right,
    Up,
    Down,
}

impl KeyCode {
    /// Resolve a key name. Named keys are case-sensitive; single characters are not.
    pub fn from_name(name: &str) -> Option<Self> {
        let named = match name {
            "Space" => Some(KeyCode::Space),
            "Enter" | "Return" => Some(KeyCode::Enter),
            "Tab" => Some(KeyCode::Tab),
            "Esc" | "Escape" => Some(KeyCode::Escape),
            "Shift" => Some(KeyCode::Shift),
            "Ctrl" => Some(KeyCode::Ctrl),
            "Alt" => Some(KeyCode::Alt),
            "Left" => Some(KeyCode::Left),
            "Right" => Some(KeyCode::Right),
            "Up" => Some(KeyCode::Up),
            "Down" => Some(KeyCode::Down),
            _ => None,
        };
        if named.is_some() {
            return named;
        }
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphanumeric() => {
                Some(KeyCode::Char(c.to_ascii_uppercase()))
            }
            _ => None,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown key name '{0}'")]
pub struct UnknownKey(pub String);

impl FromStr for KeyCode {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyCode::from_name(s).ok_or_else(|| UnknownKey(s.to_string()))
    }
}

pub trait InputSource {
    /// Held this frame.
    fn is_key_down(&self, key: KeyCode) -> bool;
    /// Went down this frame.
    fn is_key_pressed(&self, key: KeyCode) -> bool;
    fn mouse_position(&self) -> [f32; 2];
}

pub trait MovementSource {
    fn velocity(&self) -> [f32; 3];
    fn is_falling(&self) -> bool;
}

/// The owner a graph is evaluated for.
pub trait AnimSubject {
    fn input(&self) -> Option<&dyn InputSource> {
        None
    }

    fn movement(&self) -> Option<&dyn MovementSource> {
        None
    }
}

/// A subject exposing nothing; every world query yields its default.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSubject;

impl AnimSubject for NoSubject {}
