//! Per-frame decision of who owns the mouse

use crate::core::camera_controller::OrbitCamera;
use crate::core::input::FrameInput;

/// Subsystem allowed to act on mouse buttons this frame.
///
/// Camera rotation preempts editing: while the rotation modifier is held the
/// edit gesture must not raycast or mutate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseOwner {
    Camera,
    Editor,
}

impl MouseOwner {
    /// Resolve ownership once from the frame's input snapshot
    pub fn resolve(camera: &OrbitCamera, input: &FrameInput) -> Self {
        if camera.mouse_exclusive_owner(input) {
            MouseOwner::Camera
        } else {
            MouseOwner::Editor
        }
    }

    pub fn is_editor(self) -> bool {
        self == MouseOwner::Editor
    }
}
