//! Input state tracking
//!
//! [`InputState`] accumulates raw winit events between frames. Once per frame
//! the editor takes a [`FrameInput`] snapshot and hands that single value to
//! every subsystem, so the camera and the edit gesture never disagree about
//! what the mouse was doing during a frame.

use std::collections::HashSet;

use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::core::types::Vec2;

/// Camera translation keys, in lookup priority order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Forward,
    Left,
    Backward,
    Right,
    Up,
    Down,
}

impl MoveKey {
    /// First held key in this order wins; only one direction applies per frame.
    pub const PRIORITY: [MoveKey; 6] = [
        MoveKey::Forward,
        MoveKey::Left,
        MoveKey::Backward,
        MoveKey::Right,
        MoveKey::Up,
        MoveKey::Down,
    ];

    /// Physical key bound to this movement
    pub fn key_code(self) -> KeyCode {
        match self {
            MoveKey::Forward => KeyCode::KeyW,
            MoveKey::Left => KeyCode::KeyA,
            MoveKey::Backward => KeyCode::KeyS,
            MoveKey::Right => KeyCode::KeyD,
            MoveKey::Up => KeyCode::KeyE,
            MoveKey::Down => KeyCode::KeyQ,
        }
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of held movement keys
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveKeys(u8);

impl MoveKeys {
    pub const NONE: MoveKeys = MoveKeys(0);

    /// Copy with `key` marked held
    pub fn with(self, key: MoveKey) -> Self {
        Self(self.0 | key.bit())
    }

    pub fn set(&mut self, key: MoveKey, held: bool) {
        if held {
            self.0 |= key.bit();
        } else {
            self.0 &= !key.bit();
        }
    }

    pub fn is_held(self, key: MoveKey) -> bool {
        self.0 & key.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Immutable per-frame view of the input devices
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Pointer in normalized window space, origin bottom-left, y up
    pub pointer: Vec2,
    /// Left mouse button held
    pub primary_held: bool,
    /// Right mouse button held
    pub secondary_held: bool,
    /// Any mouse button released since the previous frame
    pub button_released: bool,
    /// Camera-rotation modifier (Ctrl) held
    pub modifier_held: bool,
    /// Held movement keys
    pub move_keys: MoveKeys,
}

/// Tracks keyboard and mouse input state
pub struct InputState {
    /// Currently pressed keys
    keys_pressed: HashSet<KeyCode>,
    /// Keys pressed this frame
    keys_just_pressed: HashSet<KeyCode>,
    /// Currently pressed mouse buttons
    mouse_buttons: HashSet<MouseButton>,
    /// Mouse buttons released this frame
    mouse_buttons_just_released: HashSet<MouseButton>,
    /// Cursor position in physical pixels, origin top-left
    cursor_position: (f32, f32),
    /// Window inner size in physical pixels
    window_size: (u32, u32),
}

impl InputState {
    /// Create new input state for a window of the given size
    pub fn new(window_width: u32, window_height: u32) -> Self {
        Self {
            keys_pressed: HashSet::new(),
            keys_just_pressed: HashSet::new(),
            mouse_buttons: HashSet::new(),
            mouse_buttons_just_released: HashSet::new(),
            cursor_position: (0.0, 0.0),
            window_size: (window_width.max(1), window_height.max(1)),
        }
    }

    /// Process a window event
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    physical_key: PhysicalKey::Code(key_code),
                    state,
                    ..
                },
                ..
            } => {
                match state {
                    ElementState::Pressed => {
                        if !self.keys_pressed.contains(key_code) {
                            self.keys_just_pressed.insert(*key_code);
                        }
                        self.keys_pressed.insert(*key_code);
                    }
                    ElementState::Released => {
                        self.keys_pressed.remove(key_code);
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_position = (position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.set_mouse_button(*button, *state == ElementState::Pressed);
            }
            WindowEvent::Resized(size) => {
                self.window_size = (size.width.max(1), size.height.max(1));
            }
            WindowEvent::Focused(false) => {
                // Releases are never delivered to an unfocused window
                for button in self.mouse_buttons.drain() {
                    self.mouse_buttons_just_released.insert(button);
                }
                self.keys_pressed.clear();
            }
            _ => {}
        }
    }

    fn set_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.mouse_buttons.insert(button);
        } else if self.mouse_buttons.remove(&button) {
            self.mouse_buttons_just_released.insert(button);
        }
    }

    /// Call at end of frame to reset per-frame state
    pub fn end_frame(&mut self) {
        self.keys_just_pressed.clear();
        self.mouse_buttons_just_released.clear();
    }

    /// Check if key is currently pressed
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if key was just pressed this frame
    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.keys_just_pressed.contains(&key)
    }

    /// Check if mouse button is pressed
    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }

    /// Cursor position normalized to [0, 1], origin bottom-left
    pub fn normalized_cursor(&self) -> Vec2 {
        let (w, h) = self.window_size;
        let x = self.cursor_position.0 / w as f32;
        let y = 1.0 - self.cursor_position.1 / h as f32;
        Vec2::new(x, y).clamp(Vec2::ZERO, Vec2::ONE)
    }

    /// Window size in physical pixels
    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    /// Freeze this frame's input into a single value
    pub fn snapshot(&self) -> FrameInput {
        let mut move_keys = MoveKeys::NONE;
        for key in MoveKey::PRIORITY {
            move_keys.set(key, self.is_key_pressed(key.key_code()));
        }

        FrameInput {
            pointer: self.normalized_cursor(),
            primary_held: self.is_mouse_button_pressed(MouseButton::Left),
            secondary_held: self.is_mouse_button_pressed(MouseButton::Right),
            button_released: !self.mouse_buttons_just_released.is_empty(),
            modifier_held: self.is_key_pressed(KeyCode::ControlLeft)
                || self.is_key_pressed(KeyCode::ControlRight),
            move_keys,
        }
    }
}
