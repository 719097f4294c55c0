use std::collections::HashSet;

use macroquad::prelude::*;
use serde::Deserialize;

use crate::direction::Direction;

/// Per-frame key state.
pub trait Keyboard {
    /// Key is down this frame.
    fn hold(&self, key: KeyCode) -> bool;
    /// Key went down this frame.
    fn pressed(&self, key: KeyCode) -> bool;
    /// Key went up this frame.
    fn released(&self, key: KeyCode) -> bool;
}

/// Reads the macroquad window's keyboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct MacroquadKeyboard;

impl Keyboard for MacroquadKeyboard {
    fn hold(&self, key: KeyCode) -> bool {
        is_key_down(key)
    }

    fn pressed(&self, key: KeyCode) -> bool {
        is_key_pressed(key)
    }

    fn released(&self, key: KeyCode) -> bool {
        is_key_released(key)
    }
}

/// Keyboard state driven by hand, for replays and tests.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashSet<KeyCode>,
    pressed: HashSet<KeyCode>,
    released: HashSet<KeyCode>,
}

impl KeyState {
    /// Nothing held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts `key` down during the current frame.
    pub fn press(&mut self, key: KeyCode) {
        if self.held.insert(key) {
            self.pressed.insert(key);
        }
    }

    /// Lifts `key` during the current frame.
    pub fn release(&mut self, key: KeyCode) {
        if self.held.remove(&key) {
            self.released.insert(key);
        }
    }

    /// Forgets this frame's edges; held keys stay held.
    pub fn next_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }
}

impl Keyboard for KeyState {
    fn hold(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    fn pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    fn released(&self, key: KeyCode) -> bool {
        self.released.contains(&key)
    }
}

/// Ordered key set mapping keys to left, right, up and down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionKeys {
    keys: [KeyCode; 4],
}

impl DirectionKeys {
    /// Arrow keys.
    pub const ARROWS: DirectionKeys = DirectionKeys::new(
        KeyCode::Left,
        KeyCode::Right,
        KeyCode::Up,
        KeyCode::Down,
    );

    /// WASD.
    pub const WASD: DirectionKeys =
        DirectionKeys::new(KeyCode::A, KeyCode::D, KeyCode::W, KeyCode::S);

    /// WASD positions on a Neo2 layout.
    pub const WASD_NEO: DirectionKeys =
        DirectionKeys::new(KeyCode::U, KeyCode::A, KeyCode::V, KeyCode::I);

    /// Keys for left, right, up and down, in that order.
    pub const fn new(left: KeyCode, right: KeyCode, up: KeyCode, down: KeyCode) -> Self {
        DirectionKeys {
            keys: [left, right, up, down],
        }
    }

    /// Keys in left, right, up, down order.
    pub fn keys(&self) -> [KeyCode; 4] {
        self.keys
    }

    /// Direction bound to `key`.
    pub fn direction_of(&self, key: KeyCode) -> Option<Direction> {
        self.keys
            .iter()
            .position(|k| *k == key)
            .map(|i| Direction::ALL[i])
    }
}

impl Default for DirectionKeys {
    fn default() -> Self {
        DirectionKeys::ARROWS
    }
}

/// Named key sets for configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyPreset {
    /// Arrow keys.
    #[default]
    Arrows,
    /// WASD.
    Wasd,
    /// WASD on Neo2.
    WasdNeo,
}

impl From<KeyPreset> for DirectionKeys {
    fn from(p: KeyPreset) -> Self {
        match p {
            KeyPreset::Arrows => DirectionKeys::ARROWS,
            KeyPreset::Wasd => DirectionKeys::WASD,
            KeyPreset::WasdNeo => DirectionKeys::WASD_NEO,
        }
    }
}
