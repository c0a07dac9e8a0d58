//! Window-input collection.
//!
//! Accumulates winit keyboard/mouse events between frames and maps them to
//! the camera's input types. The host event loop feeds `handle_*` calls
//! and must call [`end_frame`](InputState::end_frame) after each update so
//! pointer deltas do not carry over.

use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

use crate::camera::{LookInput, MoveDirections};

#[derive(Default, Debug, Clone)]
pub struct InputState {
    /// Current cursor position in window coordinates.
    pub cursor_position: Vec2,
    /// Cursor displacement accumulated since the previous frame.
    pub cursor_delta: Vec2,
    /// Currently pressed keys.
    pub keys: HashSet<KeyCode>,
    /// Currently pressed mouse buttons.
    pub mouse_buttons: HashSet<MouseButton>,
    /// `None` until the first cursor event arrives; that event has no
    /// meaningful delta.
    last_cursor_position: Option<Vec2>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame-end cleanup: clears the accumulated pointer delta.
    pub fn end_frame(&mut self) {
        self.cursor_delta = Vec2::ZERO;
    }

    pub fn handle_cursor_move(&mut self, x: f64, y: f64) {
        let new_pos = Vec2::new(x as f32, y as f32);
        if let Some(last) = self.last_cursor_position {
            self.cursor_delta += new_pos - last;
        }
        self.last_cursor_position = Some(new_pos);
        self.cursor_position = new_pos;
    }

    pub fn handle_key(&mut self, state: ElementState, key: KeyCode) {
        match state {
            ElementState::Pressed => {
                self.keys.insert(key);
            }
            ElementState::Released => {
                self.keys.remove(&key);
            }
        }
    }

    pub fn handle_mouse_input(&mut self, state: ElementState, button: MouseButton) {
        match state {
            ElementState::Pressed => {
                self.mouse_buttons.insert(button);
            }
            ElementState::Released => {
                self.mouse_buttons.remove(&button);
            }
        }
    }

    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }

    /// Maps the current state onto the camera input types: WASD to
    /// directional flags, left/right buttons plus the cursor delta to the
    /// drag descriptor.
    pub fn camera_inputs(&self) -> (MoveDirections, LookInput) {
        let mut movement = MoveDirections::empty();
        if self.is_key_pressed(KeyCode::KeyW) {
            movement |= MoveDirections::FORWARD;
        }
        if self.is_key_pressed(KeyCode::KeyS) {
            movement |= MoveDirections::BACKWARD;
        }
        if self.is_key_pressed(KeyCode::KeyA) {
            movement |= MoveDirections::LEFT;
        }
        if self.is_key_pressed(KeyCode::KeyD) {
            movement |= MoveDirections::RIGHT;
        }

        let look = LookInput {
            primary: self.is_button_pressed(MouseButton::Left),
            secondary: self.is_button_pressed(MouseButton::Right),
            delta: self.cursor_delta,
        };

        (movement, look)
    }
}
