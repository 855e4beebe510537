//! Orbit/pan camera controller
//!
//! Ctrl + left-drag orbits the eye around the focus point; WASD/QE slide
//! both points together. Rotation is tried first each frame and translation
//! only runs when rotation did nothing.

use crate::core::config::CameraConfig;
use crate::core::input::{FrameInput, MoveKey};
use crate::core::types::{Vec2, Vec3};
use crate::math::{normalize, rotation_matrix};

/// Left axis used when the view is (nearly) parallel to `up`
pub const POLE_FALLBACK_LEFT: Vec3 = Vec3::new(-1.0, 0.0, 0.0);

/// Camera that orbits a focus point and pans with the keyboard
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    /// Eye position
    position: Vec3,
    /// Focus point, pivot of orbit rotations
    look_at: Vec3,
    /// Fixed unit world-up axis
    up: Vec3,
    /// Pointer position at the previous frame of an active drag
    last_pointer: Option<Vec2>,
    /// Translation per frame in world units
    move_step: f32,
    /// |cos| above which the view counts as looking along `up`
    pole_threshold: f32,
}

impl OrbitCamera {
    /// Create a camera with the default step and pole threshold
    pub fn new(position: Vec3, look_at: Vec3, up: Vec3) -> Self {
        Self::from_config(&CameraConfig {
            initial_position: position.to_array(),
            initial_look_at: look_at.to_array(),
            up: up.to_array(),
            ..Default::default()
        })
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        let position = config.initial_position();
        let look_at = config.initial_look_at();
        debug_assert!(position != look_at, "camera position coincides with its focus point");

        Self {
            position,
            look_at,
            up: normalize(config.up()),
            last_pointer: None,
            move_step: config.move_step,
            pole_threshold: config.pole_threshold,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Unit vector from the eye towards the focus point
    pub fn target_direction(&self) -> Vec3 {
        normalize(self.look_at - self.position)
    }

    /// Whether the camera reserves the mouse this frame (rotation modifier held)
    pub fn mouse_exclusive_owner(&self, input: &FrameInput) -> bool {
        input.modifier_held
    }

    /// Apply one frame of input. Returns true if the pose changed.
    pub fn update_from_input(&mut self, input: &FrameInput) -> bool {
        self.update_by_mouse(input) || self.update_by_keys(input)
    }

    /// Horizontal axis to the camera's left, stable near the poles
    pub fn compute_left_dir(&self, target_dir: Vec3) -> Vec3 {
        let cos = self.up.dot(target_dir);
        if cos.abs() > self.pole_threshold {
            return POLE_FALLBACK_LEFT;
        }
        self.up.cross(target_dir)
    }

    fn update_by_mouse(&mut self, input: &FrameInput) -> bool {
        if !self.mouse_exclusive_owner(input) || !input.primary_held {
            self.last_pointer = None;
            return false;
        }

        let pointer = input.pointer;
        let Some(last) = self.last_pointer.replace(pointer) else {
            // First frame of a drag only records the baseline
            return false;
        };

        let delta = last - pointer;
        self.orbit(delta.x, delta.y);
        true
    }

    /// Rotate the eye about the focus point: `dx` radians about `up`, then
    /// `dy` radians about the left axis.
    fn orbit(&mut self, dx: f32, dy: f32) {
        let out_dir = self.position - self.look_at;
        let left_dir = self.compute_left_dir(normalize(-out_dir));

        let rot_x = rotation_matrix(self.up, dx);
        let rot_y = rotation_matrix(left_dir, dy);

        let rotated = (rot_y * rot_x * out_dir.extend(0.0)).truncate();
        self.position = self.look_at + rotated;
    }

    fn update_by_keys(&mut self, input: &FrameInput) -> bool {
        let Some(key) = MoveKey::PRIORITY
            .into_iter()
            .find(|key| input.move_keys.is_held(*key))
        else {
            return false;
        };

        let target_dir = self.target_direction();
        let direction = match key {
            MoveKey::Forward => target_dir,
            MoveKey::Left => self.compute_left_dir(target_dir),
            MoveKey::Backward => -target_dir,
            MoveKey::Right => -self.compute_left_dir(target_dir),
            MoveKey::Up => Vec3::Y,
            MoveKey::Down => Vec3::NEG_Y,
        };

        let offset = direction * self.move_step;
        self.look_at += offset;
        self.position += offset;
        true
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}
